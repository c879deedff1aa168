#![warn(rust_2018_idioms)]
#![allow(dead_code)]

//! Common utilities shared by the webrtc.rs protocol crates: an async `Conn`
//! abstraction over sockets, a replay-buffered `Buffer` for late-subscriber
//! broadcast, the byte-range packet demultiplexer, a sliding replay window,
//! marshal/unmarshal traits and a couple of small sync helpers.

#[cfg(feature = "buffer")]
pub mod buffer;
#[cfg(feature = "conn")]
pub mod conn;
#[cfg(feature = "ifaces")]
pub mod ifaces;
#[cfg(feature = "marshal")]
pub mod marshal;
pub mod replay_detector;
#[cfg(feature = "sync")]
pub mod sync;
#[cfg(feature = "vnet")]
pub mod vnet;

pub mod error;
pub mod mux;

#[cfg(feature = "buffer")]
pub use buffer::Buffer;
#[cfg(feature = "conn")]
pub use conn::Conn;
pub use error::Error;
#[cfg(feature = "marshal")]
pub use marshal::{Marshal, MarshalSize, Unmarshal};

pub type Result<T> = std::result::Result<T, Error>;

/// Exports keying material from a completed DTLS handshake (RFC 5705), so an
/// SRTP session can derive its master keys/salts without depending on the
/// DTLS crate directly.
#[async_trait::async_trait]
pub trait KeyingMaterialExporter {
    async fn export_keying_material(
        &self,
        label: &str,
        context: &[u8],
        length: usize,
    ) -> std::result::Result<Vec<u8>, KeyingMaterialExporterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum KeyingMaterialExporterError {
    #[error("handshake has not completed")]
    HandshakeInProgress,
    #[error("context is not supported for export_keying_material")]
    ContextUnsupported,
    #[error("export_keying_material can not be used with a reserved label")]
    ReservedExportKeyingMaterial,
    #[error("tls: internal error")]
    TlsInternalError,
    #[error("hash error: {0}")]
    Hash(String),
}
