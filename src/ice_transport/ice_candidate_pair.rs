use std::fmt;

use crate::ice_transport::ice_candidate::RTCIceCandidate;

/// RTCIceCandidatePair represents an ICE candidate pair, the local/remote
/// pair the ICE agent nominated (or is currently checking).
#[derive(Default, Debug, Clone, PartialEq)]
pub struct RTCIceCandidatePair {
    pub local: RTCIceCandidate,
    pub remote: RTCIceCandidate,
}

impl fmt::Display for RTCIceCandidatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.local, self.remote)
    }
}

impl RTCIceCandidatePair {
    pub fn new(local: RTCIceCandidate, remote: RTCIceCandidate) -> Self {
        Self { local, remote }
    }
}
