use crate::dtls_transport::dtls_fingerprint::RTCDtlsFingerprint;
use crate::dtls_transport::dtls_role::DTLSRole;

/// DTLSParameters holds information relating to DTLS configuration.
#[derive(Default, Debug, Clone)]
pub struct DTLSParameters {
    pub role: DTLSRole,
    pub fingerprints: Vec<RTCDtlsFingerprint>,
}
