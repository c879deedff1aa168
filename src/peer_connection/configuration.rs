use crate::ice_transport::ice_server::RTCIceServer;
use crate::peer_connection::certificate::RTCCertificate;
use crate::peer_connection::policy::bundle_policy::RTCBundlePolicy;
use crate::peer_connection::policy::ice_transport_policy::RTCIceTransportPolicy;
use crate::peer_connection::policy::rtcp_mux_policy::RTCRtcpMuxPolicy;
use crate::peer_connection::policy::sdp_semantics::RTCSdpSemantics;

/// A Configuration defines how peer-to-peer communication via PeerConnection
/// is established or re-established. Configurations may be set up once and
/// reused across multiple connections. Configurations are treated as
/// readonly. As long as they are unmodified, they are safe for concurrent
/// use.
///
/// ## Specifications
///
/// * [W3C]
///
/// [W3C]: https://w3c.github.io/webrtc-pc/#rtcconfiguration-dictionary
#[derive(Default)]
pub struct RTCConfiguration {
    /// ice_servers defines a slice describing servers available to be used by
    /// ICE, such as STUN and TURN servers.
    pub ice_servers: Vec<RTCIceServer>,

    /// ice_transport_policy indicates which candidates the ICEAgent is allowed
    /// to use.
    pub ice_transport_policy: RTCIceTransportPolicy,

    /// bundle_policy indicates which media-bundling policy to use when
    /// gathering ICE candidates.
    pub bundle_policy: RTCBundlePolicy,

    /// rtcp_mux_policy indicates which rtcp-mux policy to use when gathering
    /// ICE candidates.
    pub rtcp_mux_policy: RTCRtcpMuxPolicy,

    /// peer_identity sets the target peer identity for the PeerConnection.
    /// The PeerConnection will not establish a connection to a remote peer
    /// unless it can be successfully authenticated with the provided name.
    pub peer_identity: String,

    /// certificates describes a set of certificates that the PeerConnection
    /// uses to authenticate. Although any given DTLS connection uses only one
    /// certificate, this attribute allows the caller to provide multiple
    /// certificates that support different algorithms. If this value is
    /// absent, a default certificate is generated for each PeerConnection
    /// instance.
    pub certificates: Vec<RTCCertificate>,

    /// ice_candidate_pool_size describes the size of the prefetched ICE pool.
    pub ice_candidate_pool_size: u8,

    /// sdp_semantics controls which style of SDP offers and answers this
    /// PeerConnection produces and accepts.
    pub sdp_semantics: RTCSdpSemantics,
}

impl RTCConfiguration {
    /// get_ice_servers side-steps the strict parsing mode of the ice package
    /// (as defined in <https://tools.ietf.org/html/rfc7064>) by copying and
    /// then stripping any erroneous queries from "stun(s):" URLs before
    /// parsing.
    pub fn get_ice_servers(&self) -> Vec<RTCIceServer> {
        let mut ice_servers = self.ice_servers.clone();

        for ice_server in &mut ice_servers {
            for raw_url in &mut ice_server.urls {
                if raw_url.starts_with("stun") {
                    let parts: Vec<&str> = raw_url.split('?').collect();
                    *raw_url = parts[0].to_owned();
                }
            }
        }

        ice_servers
    }
}
