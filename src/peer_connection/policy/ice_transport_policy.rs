use serde::{Deserialize, Serialize};
use std::fmt;

/// RTCIceTransportPolicy defines the ICE candidate policy, surfacing which
/// candidates are permitted to be used for connectivity checks.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum RTCIceTransportPolicy {
    Unspecified = 0,

    /// All indicates any type of candidate is used.
    #[serde(rename = "all")]
    All = 1,

    /// Relay indicates only media relay candidates such as candidates
    /// passing through a TURN server are used.
    #[serde(rename = "relay")]
    Relay = 2,
}

impl Default for RTCIceTransportPolicy {
    fn default() -> Self {
        RTCIceTransportPolicy::All
    }
}

const ICE_TRANSPORT_POLICY_RELAY_STR: &str = "relay";
const ICE_TRANSPORT_POLICY_ALL_STR: &str = "all";

impl From<&str> for RTCIceTransportPolicy {
    fn from(raw: &str) -> Self {
        match raw {
            ICE_TRANSPORT_POLICY_RELAY_STR => RTCIceTransportPolicy::Relay,
            ICE_TRANSPORT_POLICY_ALL_STR => RTCIceTransportPolicy::All,
            _ => RTCIceTransportPolicy::Unspecified,
        }
    }
}

impl fmt::Display for RTCIceTransportPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCIceTransportPolicy::Relay => ICE_TRANSPORT_POLICY_RELAY_STR,
            RTCIceTransportPolicy::All => ICE_TRANSPORT_POLICY_ALL_STR,
            RTCIceTransportPolicy::Unspecified => crate::UNSPECIFIED_STR,
        };
        write!(f, "{}", s)
    }
}
