use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// ICECredentialType indicates the type of credentials used to connect to
/// an ICE server.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RTCIceCredentialType {
    /// Password indicates password credentials, as described in
    /// <https://tools.ietf.org/html/rfc5389>.
    #[default]
    Password,

    /// Oauth indicates token-based credential, as described in
    /// <https://tools.ietf.org/html/rfc7635>.
    Oauth,
}

/// ICEServer describes a single STUN/TURN server that can be used by the
/// ICEAgent to establish a connection with a peer.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct RTCIceServer {
    pub urls: Vec<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub credential: String,
    #[serde(default)]
    pub credential_type: RTCIceCredentialType,
}

impl RTCIceServer {
    fn parse_url(&self, url_str: &str) -> Result<ice::url::Url> {
        Ok(ice::url::Url::parse_url(url_str)?)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        self.urls()?;
        Ok(())
    }

    pub(crate) fn urls(&self) -> Result<Vec<ice::url::Url>> {
        let mut urls = vec![];

        for url_str in &self.urls {
            let mut url = self.parse_url(url_str)?;
            if url.scheme == ice::url::SchemeType::Turn || url.scheme == ice::url::SchemeType::Turns
            {
                // https://www.w3.org/TR/webrtc/#set-the-configuration (step #11.3.2)
                if self.username.is_empty() || self.credential.is_empty() {
                    return Err(Error::ErrNoTurnCredentials);
                }
                url.username = self.username.clone();

                match self.credential_type {
                    RTCIceCredentialType::Password => {
                        // https://www.w3.org/TR/webrtc/#set-the-configuration (step #11.3.3)
                        url.password = self.credential.clone();
                    }
                    RTCIceCredentialType::Oauth => {
                        // OAuth credentials are opaque tokens this crate does not interpret.
                    }
                };
            }

            urls.push(url);
        }

        Ok(urls)
    }
}
