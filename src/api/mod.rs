#[cfg(test)]
mod api_test;
pub mod interceptor_registry;
pub mod media_engine;
pub mod setting_engine;

use std::sync::Arc;

use interceptor::registry::Registry;
use interceptor::Interceptor;

use crate::dtls_transport::RTCDtlsTransport;
use crate::error::Result;
use crate::ice_transport::ice_gatherer::{RTCIceGatherOptions, RTCIceGatherer};
use crate::ice_transport::RTCIceTransport;
use crate::peer_connection::certificate::RTCCertificate;
use crate::peer_connection::configuration::RTCConfiguration;
use crate::peer_connection::RTCPeerConnection;
use crate::rtp_transceiver::rtp_codec::RTPCodecType;
use crate::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use crate::rtp_transceiver::rtp_sender::RTCRtpSender;
use crate::sctp_transport::RTCSctpTransport;
use crate::track::track_local::TrackLocal;
use media_engine::MediaEngine;
use setting_engine::SettingEngine;

/// API bundles the configuration surface (`MediaEngine` for codec/header
/// extension capabilities, `SettingEngine` for transport-level knobs) and is
/// the factory for every peer connection built from that configuration,
/// exactly like an `RTCPeerConnection` constructor in the W3C API this crate
/// mirrors.
pub struct API {
    pub(crate) setting_engine: Arc<SettingEngine>,
    pub(crate) media_engine: Arc<MediaEngine>,
    pub(crate) interceptor_registry: Registry,
}

impl API {
    /// new_ice_gatherer creates a new ice gatherer.
    pub(crate) fn new_ice_gatherer(&self, opts: RTCIceGatherOptions) -> Result<RTCIceGatherer> {
        let mut validated_servers = vec![];
        for server in &opts.ice_servers {
            server.validate()?;
            validated_servers.extend(server.urls()?);
        }

        Ok(RTCIceGatherer::new(
            validated_servers,
            opts.ice_gather_policy,
            self.setting_engine.clone(),
        ))
    }

    /// new_ice_transport creates a new ice transport.
    pub(crate) fn new_ice_transport(&self, gatherer: Arc<RTCIceGatherer>) -> RTCIceTransport {
        RTCIceTransport::new(gatherer)
    }

    /// new_dtls_transport creates a new dtls transport. Certificate
    /// validation/generation already happened in
    /// `RTCPeerConnection::init_configuration`; this just wires the
    /// negotiated certificates to the ICE transport they ride on.
    pub(crate) fn new_dtls_transport(
        &self,
        ice_transport: Arc<RTCIceTransport>,
        certificates: Vec<RTCCertificate>,
    ) -> Result<RTCDtlsTransport> {
        Ok(RTCDtlsTransport::new(
            ice_transport,
            self.setting_engine.clone(),
            certificates,
        ))
    }

    /// new_rtp_receiver constructs a new RTPReceiver for the given codec kind.
    pub(crate) fn new_rtp_receiver(
        &self,
        kind: RTPCodecType,
        transport: Arc<RTCDtlsTransport>,
        interceptor: Arc<dyn Interceptor + Send + Sync>,
    ) -> RTCRtpReceiver {
        RTCRtpReceiver::new(
            self.setting_engine.get_receive_mtu(),
            kind,
            transport,
            Arc::clone(&self.media_engine),
            interceptor,
        )
    }

    /// new_rtp_sender constructs a new RTPSender carrying an optional
    /// TrackLocal, ready to be attached to a transceiver.
    pub(crate) async fn new_rtp_sender(
        &self,
        track: Option<Arc<dyn TrackLocal + Send + Sync>>,
        transport: Arc<RTCDtlsTransport>,
        interceptor: Arc<dyn Interceptor + Send + Sync>,
    ) -> RTCRtpSender {
        RTCRtpSender::new(
            self.setting_engine.get_receive_mtu(),
            track,
            transport,
            Arc::clone(&self.media_engine),
            interceptor,
        )
        .await
    }

    /// new_sctp_transport constructs the DataChannel transport riding atop
    /// the already-negotiated DTLS transport.
    pub(crate) fn new_sctp_transport(
        &self,
        dtls_transport: Arc<RTCDtlsTransport>,
    ) -> Result<RTCSctpTransport> {
        Ok(RTCSctpTransport::new(dtls_transport))
    }

    /// new_peer_connection creates a new peer_connection with the provided configuration
    /// against the received API. The configuration is checked individually against
    /// ICE gathering policy.
    pub async fn new_peer_connection(
        &self,
        configuration: RTCConfiguration,
    ) -> Result<RTCPeerConnection> {
        RTCPeerConnection::new(self, configuration).await
    }
}

/// APIBuilder is a builder to create an API, which provides configuration
/// options for [`RTCPeerConnection`]. An API must not be modified after
/// being used to construct a RTCPeerConnection.
#[derive(Default)]
pub struct APIBuilder {
    setting_engine: Option<Arc<SettingEngine>>,
    media_engine: MediaEngine,
    interceptor_registry: Registry,
}

impl APIBuilder {
    pub fn new() -> Self {
        APIBuilder::default()
    }

    pub fn build(self) -> API {
        API {
            setting_engine: self.setting_engine.unwrap_or_default(),
            media_engine: Arc::new(self.media_engine),
            interceptor_registry: self.interceptor_registry,
        }
    }

    /// with_media_engine allows providing a MediaEngine that has been configured by the user.
    /// This allows users to wire custom codecs or header extensions.
    pub fn with_media_engine(mut self, media_engine: MediaEngine) -> Self {
        self.media_engine = media_engine;
        self
    }

    /// with_setting_engine allows providing a SettingEngine that has been configured by the user.
    pub fn with_setting_engine(mut self, setting_engine: SettingEngine) -> Self {
        self.setting_engine = Some(Arc::new(setting_engine));
        self
    }

    /// with_interceptor_registry allows providing Interceptors to the PeerConnection,
    /// the most commonly used is the TWCC receiver-side generator (C7).
    pub fn with_interceptor_registry(mut self, interceptor_registry: Registry) -> Self {
        self.interceptor_registry = interceptor_registry;
        self
    }
}

#[allow(dead_code)]
pub(crate) fn no_op_interceptor() -> Arc<dyn Interceptor + Send + Sync> {
    Arc::new(interceptor::noop::NoOp {})
}
