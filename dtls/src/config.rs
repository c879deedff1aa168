use crate::cipher_suite::*;
use crate::crypto::Certificate;
use crate::error::*;
use crate::extension::extension_use_srtp::SrtpProtectionProfile;

use std::time::Duration;

// Config is used to configure a DTLS client or server.
// After a Config is passed to a DTLS function it must not be modified.
pub struct Config {
    // certificates contains certificate chain to present to the other side of the connection.
    // Server MUST set this if psk is none.
    // Client SHOULD set this so CertificateRequests can be handled if psk is none.
    pub certificates: Vec<Certificate>,

    // cipher_suites is a list of supported cipher suites.
    // If cipher_suites is nil, a default list is used
    pub cipher_suites: Vec<CipherSuiteId>,

    // signature_schemes contains the signature and hash schemes that the peer requests to verify.
    pub signature_schemes: Vec<rustls::SignatureScheme>,

    // srtpprotection_profiles are the supported protection profiles
    // Clients will send this via use_srtp and assert that the server properly responds
    // Servers will assert that clients send one of these profiles and will respond as needed
    pub srtp_protection_profiles: Vec<SrtpProtectionProfile>,

    // client_auth determines the server's policy for
    // TLS Client Authentication. The default is NoClientCert.
    pub client_auth: ClientAuthType,

    // extended_master_secret determines if the "Extended Master Secret" extension
    // should be disabled, requested, or required (default requested).
    pub extended_master_secret: ExtendedMasterSecretType,

    // flight_interval controls how often we send outbound handshake messages
    // defaults to time.Second
    pub flight_interval: Duration,

    // psk sets the pre-shared key used by this DTLS connection
    // If psk is non-nil only psk cipher_suites will be used
    pub psk: Option<PSKCallback>,
    pub psk_identity_hint: Vec<u8>,

    // insecure_skip_verify controls whether a client verifies the
    // server's certificate chain and host name.
    // If insecure_skip_verify is true, TLS accepts any certificate
    // presented by the server and any host name in that certificate.
    // In this mode, TLS is susceptible to man-in-the-middle attacks.
    // This should be used only for testing.
    pub insecure_skip_verify: bool,

    // insecure_hashes allows the use of hashing algorithms that are known
    // to be vulnerable.
    pub insecure_hashes: bool,

    // insecure_verification relaxes the public-key signature check done
    // while validating the peer's certificate chain. Used only for testing.
    pub insecure_verification: bool,

    // verify_peer_certificate, if not nil, is called after normal
    // certificate verification by either a client or server. It
    // receives the certificate provided by the peer and also a flag
    // that tells if normal verification has succeedded. If it returns a
    // non-nil error, the handshake is aborted and that error results.
    //
    // If normal verification fails then the handshake will abort before
    // considering this callback. If normal verification is disabled by
    // setting insecure_skip_verify, or (for a server) when client_auth is
    // RequestClientCert or RequireAnyClientCert, then this callback will
    // be considered but the verifiedChains will always be nil.
    pub verify_peer_certificate: Option<crate::handshaker::VerifyPeerCertificateFn>,

    // roots_cas defines the set of root certificate authorities
    // that a client uses when verifying the server's certificate.
    // Empty uses a self-signed fallback root (see gen_self_signed_root_cert).
    pub roots_cas: rustls::RootCertStore,

    // client_cas defines the set of root certificate authorities
    // that a server uses if required to verify a client certificate
    // by the policy in client_auth.
    pub client_cas: rustls::RootCertStore,

    // server_name is used to verify the hostname on the returned
    // certificates unless insecure_skip_verify is given.
    pub server_name: String,

    //TODO: LoggerFactory logging.LoggerFactory

    // ConnectContextMaker is a function to make a context used in Dial(),
    // Client(), Server(), and Accept(). If nil, the default ConnectContextMaker
    // is used. It can be implemented as following.
    //
    // 	func ConnectContextMaker() (context.Context, func()) {
    // 		return context.WithTimeout(context.Background(), 30*time.Second)
    // 	}
    //TODO: ConnectContextMaker func() (context.Context, func())

    // mtu is the length at which handshake messages will be fragmented to
    // fit within the maximum transmission unit (default is 1200 bytes)
    pub mtu: usize,

    // replay_protection_window is the size of the replay attack protection window.
    // Duplication of the sequence number is checked in this window size.
    // Packet with sequence number older than this value compared to the latest
    // accepted packet will be discarded. (default is 64)
    pub replay_protection_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            certificates: vec![],
            cipher_suites: vec![],
            signature_schemes: vec![],
            srtp_protection_profiles: vec![],
            client_auth: ClientAuthType::NoClientCert,
            extended_master_secret: ExtendedMasterSecretType::Request,
            flight_interval: Duration::from_secs(0),
            psk: None,
            psk_identity_hint: vec![],
            insecure_skip_verify: false,
            insecure_hashes: false,
            insecure_verification: false,
            verify_peer_certificate: None,
            roots_cas: rustls::RootCertStore::empty(),
            client_cas: rustls::RootCertStore::empty(),
            server_name: String::new(),
            mtu: 0,
            replay_protection_window: 0,
        }
    }
}

const DEFAULT_MTU: usize = 1200; // bytes

// PSKCallback is called once we have the remote's psk_identity_hint.
// If the remote provided none it will be nil
pub type PSKCallback = fn(&[u8]) -> std::result::Result<Vec<u8>, Error>;

// ClientAuthType declares the policy the server will follow for
// TLS Client Authentication.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClientAuthType {
    NoClientCert = 0,
    RequestClientCert = 1,
    RequireAnyClientCert = 2,
    VerifyClientCertIfGiven = 3,
    RequireAndVerifyClientCert = 4,
}

// ExtendedMasterSecretType declares the policy the client and server
// will follow for the Extended Master Secret extension
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExtendedMasterSecretType {
    Request = 0,
    Require = 1,
    Disable = 2,
}

pub(crate) fn validate_config(is_client: bool, config: &Config) -> std::result::Result<(), Error> {
    if !config.psk_identity_hint.is_empty() && config.psk.is_none() {
        return Err(Error::ErrIdentityNoPsk);
    }

    if !is_client && config.certificates.is_empty() && config.psk.is_none() {
        return Err(Error::ErrInvalidCertificate);
    }

    parse_cipher_suites(
        &config.cipher_suites,
        config.psk.is_none(),
        config.psk.is_some(),
    )?;

    Ok(())
}
