#![warn(rust_2018_idioms)]
#![allow(dead_code)]

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate serde_derive;

pub mod alert;
pub mod application_data;
pub mod change_cipher_spec;
pub mod cipher_suite;
pub mod client_certificate_type;
pub mod compression_methods;
pub mod config;
pub mod conn;
pub mod content;
pub mod crypto;
pub mod curve;
pub mod error;
pub mod extension;
pub mod flight;
pub mod fragment_buffer;
pub mod handshake;
pub mod handshaker;
pub mod prf;
pub mod record_layer;
pub mod signature_hash_algorithm;
pub mod state;

pub use error::Error;

use cipher_suite::CipherSuiteId;
use error::Result;
use extension::extension_use_srtp::SrtpProtectionProfile;

// find_matching_cipher_suite returns the first cipher_suite in offered that
// also appears in supported, preserving offered's preference order.
pub(crate) fn find_matching_cipher_suite(
    offered: &[CipherSuiteId],
    supported: &[CipherSuiteId],
) -> Result<CipherSuiteId> {
    for id in offered {
        for supported_id in supported {
            if id == supported_id {
                return Ok(*id);
            }
        }
    }
    Err(Error::ErrCipherSuiteNoIntersection)
}

// find_matching_srtp_profile returns the first srtp protection profile in
// offered that also appears in supported, preserving offered's preference order.
pub(crate) fn find_matching_srtp_profile(
    offered: &[SrtpProtectionProfile],
    supported: &[SrtpProtectionProfile],
) -> Result<SrtpProtectionProfile> {
    for profile in offered {
        for supported_profile in supported {
            if profile == supported_profile {
                return Ok(*profile);
            }
        }
    }
    Err(Error::ErrServerNoMatchingSrtpProfile)
}
