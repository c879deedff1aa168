#![warn(rust_2018_idioms)]
#![allow(dead_code)]

//! A pure Rust implementation of the WebRTC media transport pipeline:
//! ICE connectivity establishment, the DTLS handshake and SRTP key export,
//! the packet demultiplexer, per-SSRC SRTP, the RTP router, sender/receiver
//! pipeline (simulcast, VP9 SVC, DTMF) and transport-wide congestion
//! control, wired together by a peer connection orchestrator.
//!
//! SDP parsing/serialization beyond the candidate grammar, the signaling
//! transport, SCTP/DataChannel framing and media codec sample encode/decode
//! are external collaborators this crate does not implement; see
//! `SPEC_FULL.md` for the exact boundary.

// re-export sub-crates
pub use dtls;
pub use ice;
pub use interceptor;
pub use mdns;
pub use rtcp;
pub use rtp;
pub use sdp;
pub use srtp;
pub use stun;
pub use util;

pub mod api;
pub mod data_channel;
pub mod dtls_transport;
pub mod error;
pub mod ice_transport;
pub mod mux;
pub mod peer_connection;
pub mod rtp_transceiver;
pub mod sctp_transport;
pub mod stats;
pub mod track;
pub(crate) mod utilities;

pub use error::Error;

#[macro_use]
extern crate lazy_static;

use dtls::extension::extension_use_srtp::SrtpProtectionProfile;

pub(crate) const UNSPECIFIED_STR: &str = "Unspecified";

/// Equal to UDP MTU
pub(crate) const RECEIVE_MTU: usize = 1460;

pub(crate) const SDP_ATTRIBUTE_RID: &str = "rid";
pub(crate) const SDES_REPAIR_RTP_STREAM_ID_URI: &str =
    "urn:ietf:params:rtp-hdrext:sdes:repaired-rtp-stream-id";

/// The SRTP protection profiles offered/accepted when a [`SettingEngine`]
/// does not configure an explicit list.
///
/// [`SettingEngine`]: crate::api::setting_engine::SettingEngine
pub(crate) fn default_srtp_protection_profiles() -> Vec<SrtpProtectionProfile> {
    vec![
        SrtpProtectionProfile::Srtp_Aead_Aes_128_Gcm,
        SrtpProtectionProfile::Srtp_Aes128_Cm_Hmac_Sha1_80,
    ]
}
