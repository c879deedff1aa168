use sdp::util::ConnectionRole;
use sdp::SessionDescription;

/// <https://tools.ietf.org/html/rfc5763>
/// The answerer MUST use either a
/// setup attribute value of setup:active or setup:passive.
///
/// Decide if our DTLS role is server or client
pub(crate) const DEFAULT_DTLS_ROLE_ANSWER: DTLSRole = DTLSRole::Client;

/// <https://tools.ietf.org/html/rfc4145#section-4>
/// The active party MUST initiate a connection. The passive party
/// MUST wait for the active party to initiate the connection.
pub(crate) const DEFAULT_DTLS_ROLE_OFFER: DTLSRole = DTLSRole::Auto;

/// DTLSRole indicates the role of the DTLS transport.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DTLSRole {
    Auto = 0,
    Client = 1,
    Server = 2,
}

impl Default for DTLSRole {
    fn default() -> Self {
        Self::Auto
    }
}

const ATTRIBUTE_ACTIVE: &str = "active";
const ATTRIBUTE_PASSIVE: &str = "passive";
const ATTRIBUTE_ACTPASS: &str = "actpass";

/// Decide the DTLS Role from the a=setup attribute in a SessionDescription,
/// falling back to the offerer/answerer convention of RFC 5763 when absent:
/// the ICE-controlling/offering side is the DTLS client unless the answer
/// carries `a=setup:active`.
impl<'a> From<&'a SessionDescription> for DTLSRole {
    fn from(session_description: &'a SessionDescription) -> Self {
        for media_section in &session_description.media_descriptions {
            for attribute in &media_section.attributes {
                if attribute.key.trim() == "setup" {
                    if let Some(value) = &attribute.value {
                        match value.trim() {
                            ATTRIBUTE_ACTIVE => return DTLSRole::Client,
                            ATTRIBUTE_PASSIVE => return DTLSRole::Server,
                            ATTRIBUTE_ACTPASS => return DTLSRole::Auto,
                            _ => {}
                        }
                    }
                }
            }
        }

        DTLSRole::Auto
    }
}

impl DTLSRole {
    /// is_client resolves this role to the `is_client` flag the underlying
    /// `dtls::Conn` is constructed with. `Auto` must be resolved against the
    /// ICE role by the caller before reaching this point; it defaults to
    /// client here only as a last resort.
    pub(crate) fn is_client(&self) -> bool {
        !matches!(self, DTLSRole::Server)
    }

    /// to_connection_role maps this DTLS role onto the `a=setup` value an
    /// SDP offer/answer should carry, per RFC 4145/8842: `Auto` is offered as
    /// `actpass` so the remote side can pick, while a resolved role is
    /// offered as the complementary fixed value.
    pub(crate) fn to_connection_role(self) -> ConnectionRole {
        match self {
            DTLSRole::Client => ConnectionRole::Active,
            DTLSRole::Server => ConnectionRole::Passive,
            DTLSRole::Auto => ConnectionRole::Actpass,
        }
    }
}

impl std::fmt::Display for DTLSRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DTLSRole::Auto => "auto",
            DTLSRole::Client => "client",
            DTLSRole::Server => "server",
        };
        write!(f, "{s}")
    }
}
