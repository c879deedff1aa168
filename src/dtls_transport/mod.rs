
pub mod dtls_fingerprint;
pub mod dtls_parameters;
pub mod dtls_role;
pub mod dtls_transport_state;

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use dtls::config::ClientAuthType;
use dtls::conn::DTLSConn;
use interceptor::stream_info::StreamInfo;
use interceptor::{Interceptor, RTCPReader, RTPReader};
use srtp::protection_profile::ProtectionProfile;
use srtp::session::Session;
use srtp::stream::Stream;
use tokio::sync::{mpsc, Mutex};
use util::Conn;

use dtls_parameters::DTLSParameters;
use dtls_role::{DTLSRole, DEFAULT_DTLS_ROLE_ANSWER};
use dtls_transport_state::RTCDtlsTransportState;

use crate::api::setting_engine::SettingEngine;
use crate::default_srtp_protection_profiles;
use crate::error::{Error, Result};
use crate::ice_transport::ice_role::RTCIceRole;
use crate::ice_transport::ice_transport_state::RTCIceTransportState;
use crate::ice_transport::RTCIceTransport;
use crate::mux::endpoint::Endpoint;
use crate::mux::mux_func::{match_dtls, match_srtcp, match_srtp, MatchFunc};
use crate::peer_connection::certificate::RTCCertificate;
use crate::rtp_transceiver::SSRC;
use crate::stats::stats_collector::StatsCollector;
use crate::stats::{CertificateStats, StatsReportType};

pub type OnStateChangeHdlrFn = Box<
    dyn (FnMut(RTCDtlsTransportState) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>)
        + Send
        + Sync,
>;

/// DTLSTransport allows an application access to information about the DTLS
/// transport over which RTP and RTCP packets are sent and received by
/// RTPSender and RTPReceiver, as well other data such as SCTP packets sent
/// and received by data channels.
#[derive(Default)]
pub struct RTCDtlsTransport {
    pub(crate) ice_transport: Arc<RTCIceTransport>,
    pub(crate) certificates: Vec<RTCCertificate>,
    pub(crate) setting_engine: Arc<SettingEngine>,

    remote_parameters: Mutex<DTLSParameters>,
    remote_certificate: Mutex<Bytes>,
    state: Arc<AtomicU8>,
    srtp_protection_profile: Mutex<ProtectionProfile>,
    on_state_change_handler: Mutex<Option<OnStateChangeHdlrFn>>,
    conn: Mutex<Option<Arc<DTLSConn>>>,

    srtp_session: Mutex<Option<Arc<Session>>>,
    srtcp_session: Mutex<Option<Arc<Session>>>,
    srtp_endpoint: Mutex<Option<Arc<Endpoint>>>,
    srtcp_endpoint: Mutex<Option<Arc<Endpoint>>>,

    simulcast_streams: Mutex<Vec<Arc<Stream>>>,
    pub(crate) srtp_ready_signal: AtomicBool,
    srtp_ready_tx: Mutex<Option<mpsc::Sender<()>>>,
    pub(crate) srtp_ready_rx: Mutex<Option<mpsc::Receiver<()>>>,

    dtls_matcher: Mutex<Option<MatchFunc>>,
}

impl RTCDtlsTransport {
    pub(crate) fn new(
        ice_transport: Arc<RTCIceTransport>,
        setting_engine: Arc<SettingEngine>,
        certificates: Vec<RTCCertificate>,
    ) -> Self {
        let (srtp_ready_tx, srtp_ready_rx) = mpsc::channel(1);
        RTCDtlsTransport {
            ice_transport,
            certificates,
            setting_engine,
            state: Arc::new(AtomicU8::new(RTCDtlsTransportState::New as u8)),
            srtp_ready_tx: Mutex::new(Some(srtp_ready_tx)),
            srtp_ready_rx: Mutex::new(Some(srtp_ready_rx)),
            dtls_matcher: Mutex::new(Some(Box::new(match_dtls))),
            ..Default::default()
        }
    }

    /// returns the currently-configured ICETransport
    pub fn ice_transport(&self) -> Arc<RTCIceTransport> {
        Arc::clone(&self.ice_transport)
    }

    /// state_change requires the caller holds no other lock on self
    async fn state_change(&self, state: RTCDtlsTransportState) {
        self.state.store(state as u8, Ordering::SeqCst);
        let mut handler = self.on_state_change_handler.lock().await;
        if let Some(f) = &mut *handler {
            f(state).await;
        }
    }

    /// on_state_change sets a handler that is fired when the DTLS
    /// connection state changes.
    pub async fn on_state_change(&self, f: OnStateChangeHdlrFn) {
        let mut on_state_change_handler = self.on_state_change_handler.lock().await;
        *on_state_change_handler = Some(f);
    }

    /// state returns the current dtls_transport transport state.
    pub fn state(&self) -> RTCDtlsTransportState {
        RTCDtlsTransportState::from(self.state.load(Ordering::SeqCst))
    }

    /// write_rtcp sends user provided RTCP packets to the connected peer. If
    /// no peer is connected the packets are discarded.
    pub(crate) async fn write_rtcp(
        &self,
        pkts: &[Box<dyn rtcp::packet::Packet + Send + Sync>],
    ) -> Result<usize> {
        let srtcp_session = self.srtcp_session.lock().await;
        if let Some(srtcp_session) = &*srtcp_session {
            let mut n = 0;
            for pkt in pkts {
                n += srtcp_session.write_rtcp(pkt.as_ref()).await?;
            }
            Ok(n)
        } else {
            Ok(0)
        }
    }

    /// get_local_parameters returns the DTLS parameters of the local
    /// DTLSTransport upon construction.
    pub fn get_local_parameters(&self) -> Result<DTLSParameters> {
        let mut fingerprints = vec![];

        for c in &self.certificates {
            fingerprints.extend(c.get_fingerprints()?);
        }

        Ok(DTLSParameters {
            role: DTLSRole::Auto, // always returns the default role
            fingerprints,
        })
    }

    /// get_remote_certificate returns the certificate chain in use by the
    /// remote side. Returns an empty list prior to selection of the remote
    /// certificate.
    pub async fn get_remote_certificate(&self) -> Bytes {
        self.remote_certificate.lock().await.clone()
    }

    pub(crate) async fn start_srtp(&self) -> Result<()> {
        let profile = *self.srtp_protection_profile.lock().await;
        let mut srtp_config = srtp::config::Config {
            profile,
            ..Default::default()
        };
        let mut srtcp_config = srtp::config::Config {
            profile,
            ..Default::default()
        };

        if self.setting_engine.replay_protection.srtp != 0 {
            srtp_config.remote_rtp_options = Some(srtp::option::srtp_replay_protection(
                self.setting_engine.replay_protection.srtp,
            ));
        } else if self.setting_engine.disable_srtp_replay_protection {
            srtp_config.remote_rtp_options = Some(srtp::option::srtp_no_replay_protection());
        }

        if self.setting_engine.replay_protection.srtcp != 0 {
            srtcp_config.remote_rtcp_options = Some(srtp::option::srtcp_replay_protection(
                self.setting_engine.replay_protection.srtcp,
            ));
        } else if self.setting_engine.disable_srtcp_replay_protection {
            srtcp_config.remote_rtcp_options = Some(srtp::option::srtcp_no_replay_protection());
        }

        {
            let conn = self.conn.lock().await;
            if let Some(conn) = &*conn {
                let conn_state = conn.connection_state().await;
                srtp_config
                    .extract_session_keys_from_dtls(&conn_state, self.role().await == DTLSRole::Client)
                    .await?;
                srtcp_config
                    .extract_session_keys_from_dtls(&conn_state, self.role().await == DTLSRole::Client)
                    .await?;
            } else {
                return Err(Error::ErrDtlsTransportNotStarted);
            }
        }

        let srtp_endpoint = self.srtp_endpoint.lock().await.clone();
        let mut srtp_session = self.srtp_session.lock().await;
        *srtp_session = if let Some(srtp_endpoint) = srtp_endpoint {
            Some(Arc::new(
                Session::new(srtp_endpoint as Arc<dyn Conn + Send + Sync>, srtp_config, true).await?,
            ))
        } else {
            None
        };

        let srtcp_endpoint = self.srtcp_endpoint.lock().await.clone();
        let mut srtcp_session = self.srtcp_session.lock().await;
        *srtcp_session = if let Some(srtcp_endpoint) = srtcp_endpoint {
            Some(Arc::new(
                Session::new(
                    srtcp_endpoint as Arc<dyn Conn + Send + Sync>,
                    srtcp_config,
                    false,
                )
                .await?,
            ))
        } else {
            None
        };

        self.srtp_ready_signal.store(true, Ordering::SeqCst);
        self.srtp_ready_tx.lock().await.take();

        Ok(())
    }

    pub(crate) async fn get_srtp_session(&self) -> Option<Arc<Session>> {
        self.srtp_session.lock().await.clone()
    }

    pub(crate) async fn get_srtcp_session(&self) -> Option<Arc<Session>> {
        self.srtcp_session.lock().await.clone()
    }

    /// role indicates the DTLS role negotiated for this transport, computed
    /// from the remote's offered role, any SettingEngine override, and
    /// finally the underlying ICE role.
    pub(crate) async fn role(&self) -> DTLSRole {
        // If remote has an explicit role use the inverse
        let remote_role = self.remote_parameters.lock().await.role;
        match remote_role {
            DTLSRole::Client => return DTLSRole::Server,
            DTLSRole::Server => return DTLSRole::Client,
            _ => {}
        };

        // If SettingEngine has an explicit role
        match self.setting_engine.answering_dtls_role {
            DTLSRole::Server => return DTLSRole::Server,
            DTLSRole::Client => return DTLSRole::Client,
            _ => {}
        };

        // Remote was auto and no explicit role was configured via SettingEngine
        if self.ice_transport.role().await == RTCIceRole::Controlling {
            return DTLSRole::Server;
        }

        DEFAULT_DTLS_ROLE_ANSWER
    }

    async fn prepare_transport(
        &self,
        remote_parameters: DTLSParameters,
    ) -> Result<(DTLSRole, dtls::config::Config)> {
        self.ensure_ice_conn()?;

        if self.state() != RTCDtlsTransportState::New {
            return Err(Error::ErrInvalidDTLSStart);
        }

        {
            let mut srtp_endpoint = self.srtp_endpoint.lock().await;
            *srtp_endpoint = self.ice_transport.new_endpoint(Box::new(match_srtp)).await;
        }
        {
            let mut srtcp_endpoint = self.srtcp_endpoint.lock().await;
            *srtcp_endpoint = self
                .ice_transport
                .new_endpoint(Box::new(match_srtcp))
                .await;
        }
        {
            let mut remote = self.remote_parameters.lock().await;
            *remote = remote_parameters;
        }

        let cert = self.certificates[0].certificate.clone();
        self.state_change(RTCDtlsTransportState::Connecting).await;

        let srtp_protection_profiles =
            if !self.setting_engine.srtp_protection_profiles.is_empty() {
                self.setting_engine.srtp_protection_profiles.clone()
            } else {
                default_srtp_protection_profiles()
            };

        Ok((
            self.role().await,
            dtls::config::Config {
                certificates: vec![cert],
                srtp_protection_profiles,
                client_auth: ClientAuthType::RequireAnyClientCert,
                insecure_skip_verify: true,
                ..Default::default()
            },
        ))
    }

    /// start DTLS transport negotiation with the parameters of the remote
    /// DTLS transport
    pub async fn start(&self, remote_parameters: DTLSParameters) -> Result<()> {
        let dtls_conn_result = if let Some(dtls_endpoint) =
            self.ice_transport.new_endpoint(Box::new(match_dtls)).await
        {
            let (role, mut dtls_config) = self.prepare_transport(remote_parameters).await?;
            if self.setting_engine.replay_protection.dtls != 0 {
                dtls_config.replay_protection_window = self.setting_engine.replay_protection.dtls;
            }

            // Connect as DTLS Client/Server. This is blocking and we must
            // not hold any lock on self while it runs.
            dtls::conn::DTLSConn::new(
                dtls_endpoint as Arc<dyn Conn + Send + Sync>,
                dtls_config,
                role == DTLSRole::Client,
                None,
            )
            .await
            .map_err(Error::ErrDtlsError)
        } else {
            Err(Error::new("ice_transport.new_endpoint failed".to_owned()))
        };

        let dtls_conn = match dtls_conn_result {
            Ok(dtls_conn) => dtls_conn,
            Err(err) => {
                self.state_change(RTCDtlsTransportState::Failed).await;
                return Err(err);
            }
        };

        let srtp_profile = dtls_conn.selected_srtpprotection_profile();
        let protection_profile = match srtp_profile {
            dtls::extension::extension_use_srtp::SrtpProtectionProfile::Srtp_Aead_Aes_128_Gcm => {
                ProtectionProfile::AeadAes128Gcm
            }
            dtls::extension::extension_use_srtp::SrtpProtectionProfile::Srtp_Aes128_Cm_Hmac_Sha1_80 => {
                ProtectionProfile::Aes128CmHmacSha1_80
            }
            _ => {
                self.state_change(RTCDtlsTransportState::Failed).await;
                return Err(Error::ErrNoSRTPProtectionProfile);
            }
        };
        *self.srtp_protection_profile.lock().await = protection_profile;

        if self
            .setting_engine
            .disable_certificate_fingerprint_verification
        {
            self.conn.lock().await.replace(Arc::new(dtls_conn));
            self.state_change(RTCDtlsTransportState::Connected).await;
            return self.start_srtp().await;
        }

        // Check the fingerprint if a certificate was exchanged
        let remote_certs = dtls_conn.connection_state().await.peer_certificates;
        if remote_certs.is_empty() {
            self.state_change(RTCDtlsTransportState::Failed).await;
            return Err(Error::ErrNoRemoteCertificate);
        }

        if let Err(err) = self.validate_fingerprint(&remote_certs[0]).await {
            self.state_change(RTCDtlsTransportState::Failed).await;
            return Err(err);
        }
        *self.remote_certificate.lock().await = Bytes::from(remote_certs[0].clone());

        self.conn.lock().await.replace(Arc::new(dtls_conn));
        self.state_change(RTCDtlsTransportState::Connected).await;

        self.start_srtp().await
    }

    /// stops and closes the DTLSTransport object.
    pub async fn stop(&self) -> Result<()> {
        let mut close_errs: Vec<Error> = vec![];

        if let Some(srtp_session) = self.srtp_session.lock().await.take() {
            if let Err(err) = srtp_session.close().await {
                close_errs.push(err.into());
            }
        }

        if let Some(srtcp_session) = self.srtcp_session.lock().await.take() {
            if let Err(err) = srtcp_session.close().await {
                close_errs.push(err.into());
            }
        }

        for ss in self.simulcast_streams.lock().await.drain(..) {
            if let Err(err) = ss.close().await {
                close_errs.push(err.into());
            }
        }

        if let Some(conn) = self.conn.lock().await.take() {
            // dtls_transport connection may be closed on sctp close.
            if let Err(err) = conn.close().await {
                if err != dtls::Error::ErrConnClosed {
                    close_errs.push(err.into());
                }
            }
        }

        self.state_change(RTCDtlsTransportState::Closed).await;

        if close_errs.is_empty() {
            Ok(())
        } else {
            let close_errs_strs: Vec<String> =
                close_errs.into_iter().map(|e| e.to_string()).collect();
            Err(Error::new(close_errs_strs.join("\n")))
        }
    }

    pub(crate) async fn validate_fingerprint(&self, remote_cert: &[u8]) -> Result<()> {
        use sha2::{Digest, Sha256};

        let remote_parameters = self.remote_parameters.lock().await;
        for fp in &remote_parameters.fingerprints {
            if !fp.algorithm.eq_ignore_ascii_case("sha-256") {
                continue;
            }

            let mut h = Sha256::new();
            h.update(remote_cert);
            let hashed = h.finalize();
            let remote_value: String = hashed
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<String>>()
                .join(":");

            if remote_value.eq_ignore_ascii_case(&fp.value) {
                return Ok(());
            }
        }

        Err(Error::ErrNoMatchingCertificateFingerprint)
    }

    pub(crate) fn ensure_ice_conn(&self) -> Result<()> {
        if self.ice_transport.state() == RTCIceTransportState::New {
            Err(Error::ErrICEConnectionNotStarted)
        } else {
            Ok(())
        }
    }

    pub(crate) async fn store_simulcast_stream(&self, stream: Arc<Stream>) {
        self.simulcast_streams.lock().await.push(stream)
    }

    pub(crate) async fn remove_simulcast_stream(&self, ssrc: SSRC) {
        let mut streams = self.simulcast_streams.lock().await;
        streams.retain(|s| s.get_ssrc() != ssrc);
    }

    /// streams_for_ssrc binds a freshly learned SSRC to the negotiated SRTP
    /// and SRTCP sessions, returning the raw streams plus the interceptor
    /// chain wired in front of each.
    pub(crate) async fn streams_for_ssrc(
        &self,
        ssrc: SSRC,
        stream_info: &StreamInfo,
        interceptor: &Arc<dyn Interceptor + Send + Sync>,
    ) -> Result<(
        Option<Arc<Stream>>,
        Option<Arc<dyn RTPReader + Send + Sync>>,
        Option<Arc<Stream>>,
        Option<Arc<dyn RTCPReader + Send + Sync>>,
    )> {
        let srtp_session = self
            .get_srtp_session()
            .await
            .ok_or(Error::ErrDtlsTransportNotStarted)?;
        let rtp_read_stream = srtp_session.open(ssrc).await;
        let rtp_stream_reader = Arc::clone(&rtp_read_stream) as Arc<dyn RTPReader + Send + Sync>;
        let rtp_interceptor = interceptor
            .bind_remote_stream(stream_info, rtp_stream_reader)
            .await;

        let srtcp_session = self
            .get_srtcp_session()
            .await
            .ok_or(Error::ErrDtlsTransportNotStarted)?;
        let rtcp_read_stream = srtcp_session.open(ssrc).await;
        let rtcp_stream_reader =
            Arc::clone(&rtcp_read_stream) as Arc<dyn RTCPReader + Send + Sync>;
        let rtcp_interceptor = interceptor.bind_rtcp_reader(rtcp_stream_reader).await;

        Ok((
            Some(rtp_read_stream),
            Some(rtp_interceptor),
            Some(rtcp_read_stream),
            Some(rtcp_interceptor),
        ))
    }

    pub(crate) async fn collect_stats(&self, collector: &StatsCollector) {
        for cert in &self.certificates {
            if let Ok(fingerprints) = cert.get_fingerprints() {
                if let Some(fingerprint) = fingerprints.into_iter().next() {
                    let stats = CertificateStats::new(cert, fingerprint);
                    collector.insert(cert.stats_id.clone(), StatsReportType::CertificateStats(stats));
                }
            }
        }
    }
}
