#[cfg(test)]
mod rtp_sender_test;

use crate::api::media_engine::MediaEngine;
use crate::dtls_transport::RTCDtlsTransport;
use crate::error::{Error, Result};
use crate::rtp_transceiver::bwe::{decode_transport_layer_cc, BandwidthEstimator, SentInfo};
use crate::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use crate::rtp_transceiver::srtp_writer_future::SrtpWriterFuture;
use crate::rtp_transceiver::{
    create_stream_info, RTCRtpCodingParameters, RTCRtpEncodingParameters,
    RTCRtpHeaderExtensionParameters, RTCRtpRtxParameters, RTCRtpSendParameters, SSRC,
};
use crate::track::track_local::track_local_static_rtp::TrackLocalStaticRTP;
use crate::track::track_local::{TrackLocal, TrackLocalContext, TrackLocalWriter};

use bytes::Bytes;
use ice::rand::generate_crypto_random_string;
use interceptor::stream_info::StreamInfo;
use interceptor::{Attributes, Interceptor, RTCPReader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::{Mutex, Notify};

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Header extension URI the sender binds `mid` to, per RFC 9143.
pub const SDES_MID_URI: &str = "urn:ietf:params:rtp-hdrext:sdes:mid";
/// Header extension URI for the abs-send-time timestamp used by REMB/TWCC estimators.
pub const ABS_SEND_TIME_URI: &str =
    "http://www.webrtc.org/experiments/rtp-hdrext/abs-send-time";
/// Header extension URI for transport-wide congestion control sequence numbers.
pub const TRANSPORT_CC_URI: &str =
    "http://www.ietf.org/id/draft-holmer-rmcat-transport-wide-cc-extensions-01";

/// Internal state shared with the [`SrtpWriterFuture`] this sender owns, kept
/// behind a `Weak` so the writer doesn't keep the sender alive past `stop`.
pub(crate) struct RTPSenderInternal {
    pub(crate) stop_called_signal: AtomicBool,
    pub(crate) stop_called_rx: Notify,
}

impl RTPSenderInternal {
    fn new() -> Self {
        RTPSenderInternal {
            stop_called_signal: AtomicBool::new(false),
            stop_called_rx: Notify::new(),
        }
    }
}

/// RTPSender allows an application to control how a given Track is encoded and transmitted to a remote peer
pub struct RTCRtpSender {
    pub(crate) track: Mutex<Option<Arc<dyn TrackLocal + Send + Sync>>>,

    pub(crate) srtp_stream: Arc<SrtpWriterFuture>,
    pub(crate) rtp_transport: Arc<RTCDtlsTransport>,
    rtcp_interceptor: Mutex<Option<Arc<dyn RTCPReader + Send + Sync>>>,
    stream_info: Mutex<StreamInfo>,

    context: Mutex<Option<TrackLocalContext>>,

    transport: Arc<RTCDtlsTransport>,

    /// Simulcast-capable encoding set. Index 0 is the primary encoding bound
    /// to this sender's `srtp_stream`/`id`; any additional entries (added via
    /// `add_encoding`) share the same SRTP session but carry their own SSRC,
    /// RID and RTX SSRC, per spec.md's simulcast requirements.
    encodings: Mutex<Vec<RTCRtpEncodingParameters>>,
    /// Per-encoding RTP sequence number counters, indices aligned with `encodings`.
    sequence_numbers: Mutex<Vec<u16>>,

    /// Negotiated header extensions and their wire IDs, populated by `send`.
    header_extensions: Mutex<Vec<RTCRtpHeaderExtensionParameters>>,

    /// The transaction id returned by the most recent `get_parameters` call;
    /// `set_parameters` is rejected unless it echoes this value back.
    transaction_id: Mutex<String>,

    ssrc: SSRC,

    /// Congestion/available-bitrate estimator fed by TWCC feedback arriving
    /// on this sender's RTCP reader; see [`crate::rtp_transceiver::bwe`].
    pub bandwidth_estimator: Arc<BandwidthEstimator>,

    /// negotiated tells if this sender's track has been added to an m-line
    /// so far, so renegotiation only adds it once.
    negotiated: AtomicBool,

    media_engine: Arc<MediaEngine>,
    interceptor: Arc<dyn Interceptor + Send + Sync>,

    pub(crate) id: String,
    receive_mtu: usize,

    send_called_signal: AtomicBool,
    internal: Arc<RTPSenderInternal>,
}

impl RTCRtpSender {
    pub async fn new(
        receive_mtu: usize,
        track: Option<Arc<dyn TrackLocal + Send + Sync>>,
        transport: Arc<RTCDtlsTransport>,
        media_engine: Arc<MediaEngine>,
        interceptor: Arc<dyn Interceptor + Send + Sync>,
    ) -> RTCRtpSender {
        let id = generate_crypto_random_string(
            32,
            b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
        );
        let ssrc = rand::random::<u32>();

        let internal = Arc::new(RTPSenderInternal::new());

        let srtp_stream = Arc::new(SrtpWriterFuture {
            closed: AtomicBool::new(false),
            ssrc,
            rtp_sender: Arc::downgrade(&internal),
            rtp_transport: Arc::clone(&transport),
            rtcp_read_stream: Mutex::new(None),
            rtp_write_session: Mutex::new(None),
        });

        let srtp_rtcp_reader = Arc::clone(&srtp_stream) as Arc<dyn RTCPReader + Send + Sync>;
        let rtcp_interceptor = interceptor.bind_rtcp_reader(srtp_rtcp_reader).await;

        RTCRtpSender {
            track: Mutex::new(track),

            srtp_stream,
            rtp_transport: Arc::clone(&transport),
            rtcp_interceptor: Mutex::new(Some(rtcp_interceptor)),
            stream_info: Mutex::new(StreamInfo {
                ssrc,
                ..Default::default()
            }),

            context: Mutex::new(None),
            transport,

            encodings: Mutex::new(vec![RTCRtpCodingParameters {
                ssrc,
                payload_type: 0,
                ..Default::default()
            }]),
            sequence_numbers: Mutex::new(vec![rand::random::<u16>()]),
            header_extensions: Mutex::new(vec![]),
            transaction_id: Mutex::new(id.clone()),
            ssrc,

            bandwidth_estimator: BandwidthEstimator::new(),

            negotiated: AtomicBool::new(false),

            media_engine,
            interceptor,

            id,
            receive_mtu: if receive_mtu == 0 {
                crate::RECEIVE_MTU
            } else {
                receive_mtu
            },

            send_called_signal: AtomicBool::new(false),
            internal,
        }
    }

    /// transport returns the currently-configured DTLSTransport, if any.
    pub fn transport(&self) -> Arc<RTCDtlsTransport> {
        Arc::clone(&self.transport)
    }

    /// get_parameters describes the current configuration for the encoding
    /// and transmission of media on the sender's track. The returned
    /// `transaction_id` is a new snapshot token: `set_parameters` only
    /// succeeds if it's called with a `RTCRtpSendParameters` obtained from
    /// this, the most recent, call.
    pub async fn get_parameters(&self) -> RTCRtpSendParameters {
        let codecs = {
            let track = self.track.lock().await;
            let kind = track.as_ref().map(|t| t.kind()).unwrap_or_default();
            self.media_engine.get_codecs_by_kind(kind).await
        };
        let encodings = self.encodings.lock().await.clone();
        let header_extensions = self.header_extensions.lock().await.clone();

        let transaction_id = generate_crypto_random_string(
            32,
            b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
        );
        {
            let mut current = self.transaction_id.lock().await;
            *current = transaction_id.clone();
        }

        RTCRtpSendParameters {
            rtp_parameters: crate::rtp_transceiver::RTCRtpParameters {
                header_extensions,
                codecs,
            },
            encodings,
            transaction_id,
        }
    }

    /// set_parameters applies a previously-retrieved, possibly-modified
    /// [`RTCRtpSendParameters`]. It's rejected if `params.transaction_id`
    /// isn't the one handed out by the most recent `get_parameters`, or if
    /// it tries to change the number of encodings or any encoding's RID --
    /// simulcast layers are fixed once negotiated.
    pub async fn set_parameters(&self, params: RTCRtpSendParameters) -> Result<()> {
        {
            let current = self.transaction_id.lock().await;
            if *current != params.transaction_id {
                return Err(Error::ErrStaleParameterTransaction);
            }
        }

        let mut encodings = self.encodings.lock().await;
        if encodings.len() != params.encodings.len() {
            return Err(Error::ErrRTPSenderEncodingCountMismatch);
        }
        for (have, want) in encodings.iter().zip(params.encodings.iter()) {
            if have.rid != want.rid {
                return Err(Error::ErrRTPSenderRidMismatch);
            }
        }

        *encodings = params.encodings;

        Ok(())
    }

    /// add_encoding declares an additional simulcast layer identified by
    /// `rid`, with its own SSRC (and, if `rtx` is set, a paired RTX SSRC for
    /// RFC 4588 retransmission of that layer). Returns the layer's SSRC.
    pub async fn add_encoding(&self, rid: String, rtx: bool) -> SSRC {
        let layer_ssrc = rand::random::<u32>();
        let mut encodings = self.encodings.lock().await;
        encodings.push(RTCRtpCodingParameters {
            rid,
            ssrc: layer_ssrc,
            payload_type: 0,
            rtx: if rtx {
                RTCRtpRtxParameters {
                    ssrc: rand::random::<u32>(),
                }
            } else {
                RTCRtpRtxParameters::default()
            },
        });
        drop(encodings);

        let mut sequence_numbers = self.sequence_numbers.lock().await;
        sequence_numbers.push(rand::random::<u16>());

        layer_ssrc
    }

    /// header_extension_id looks up the wire id negotiated for a header
    /// extension URI (e.g. [`SDES_MID_URI`], [`ABS_SEND_TIME_URI`],
    /// [`TRANSPORT_CC_URI`]), or `None` if it wasn't negotiated for this sender.
    pub async fn header_extension_id(&self, uri: &str) -> Option<isize> {
        let header_extensions = self.header_extensions.lock().await;
        header_extensions
            .iter()
            .find(|h| h.uri == uri)
            .map(|h| h.id)
    }

    /// track returns the RTCRtpTransceiver track, or None.
    pub async fn track(&self) -> Option<Arc<dyn TrackLocal + Send + Sync>> {
        let track = self.track.lock().await;
        track.clone()
    }

    /// replace_track replaces the track currently being used as the sender's source with a new TrackLocal.
    /// The new track must be of the same media kind (audio/video) and switching the track should not
    /// require negotiation.
    pub async fn replace_track(
        &self,
        track: Option<Arc<dyn TrackLocal + Send + Sync>>,
    ) -> Result<()> {
        if let Some(t) = &track {
            let mut context = self.context.lock().await;
            if let Some(context) = &mut *context {
                let mut old_track = self.track.lock().await;
                if let Some(old) = &*old_track {
                    if let Err(err) = old.unbind(context).await {
                        *old_track = Some(t.clone());
                        return Err(err);
                    }
                }

                let new_context = TrackLocalContext::new(
                    context.id().to_owned(),
                    self.media_engine.get_codecs_by_kind(t.kind()).await,
                    context.ssrc(),
                    context.write_stream(),
                    context.mid().to_owned(),
                );
                match t.bind(&new_context).await {
                    Ok(new_codec) => {
                        let mut encodings = self.encodings.lock().await;
                        if let Some(primary) = encodings.first_mut() {
                            primary.payload_type = new_codec.payload_type;
                        }
                        *context = new_context;
                    }
                    Err(err) => {
                        if let Some(old) = &*old_track {
                            old.bind(context).await?;
                        }
                        return Err(err);
                    }
                }

                *old_track = Some(t.clone());
            } else {
                let mut old_track = self.track.lock().await;
                *old_track = Some(t.clone());
            }
        } else {
            let mut old_track = self.track.lock().await;
            *old_track = None;
        }

        Ok(())
    }

    /// register_nonstandard_track binds a [`TrackLocalStaticRTP`] in
    /// nonstandard mode as this sender's track: packets forwarded through it
    /// have their payload type rewritten to this sender's negotiated codec,
    /// for relaying RTX/FEC/padding-only packets whose original payload type
    /// wasn't itself negotiated.
    pub async fn register_nonstandard_track(
        &self,
        codec: RTCRtpCodecCapability,
        stream_id: String,
    ) -> Result<Arc<TrackLocalStaticRTP>> {
        let track = Arc::new(TrackLocalStaticRTP::register_nonstandard_track(
            codec,
            self.id.clone(),
            stream_id,
        ));
        self.replace_track(Some(Arc::clone(&track) as Arc<dyn TrackLocal + Send + Sync>))
            .await?;
        Ok(track)
    }

    /// register_track_for_forward binds a [`TrackLocalStaticRTP`] in
    /// echo/forward mode as this sender's track: SSRC and header extensions
    /// are rewritten per this sender, but the incoming payload type is kept
    /// as-is.
    pub async fn register_track_for_forward(
        &self,
        codec: RTCRtpCodecCapability,
        stream_id: String,
    ) -> Result<Arc<TrackLocalStaticRTP>> {
        let track = Arc::new(TrackLocalStaticRTP::register_track_for_forward(
            codec,
            self.id.clone(),
            stream_id,
        ));
        self.replace_track(Some(Arc::clone(&track) as Arc<dyn TrackLocal + Send + Sync>))
            .await?;
        Ok(track)
    }

    /// forward_cached_packets replays packets (e.g. a cached keyframe) to
    /// this sender through a `track` obtained from
    /// `register_nonstandard_track`/`register_track_for_forward`, so a
    /// receiver joining mid-stream doesn't have to wait for the next natural
    /// keyframe.
    pub async fn forward_cached_packets(
        &self,
        track: &TrackLocalStaticRTP,
        packets: &[rtp::packet::Packet],
    ) -> Result<()> {
        track.forward_cached_packets(&self.id, packets).await
    }

    /// send_rtp packetizes `payload` for the simulcast layer at `encoding_idx`
    /// (0 is the primary, non-simulcast encoding) and writes it out over this
    /// sender's SRTP session, auto-incrementing that layer's sequence number.
    pub async fn send_rtp(
        &self,
        payload: Bytes,
        encoding_idx: usize,
        marker: bool,
        timestamp: u32,
    ) -> Result<usize> {
        let (ssrc, payload_type) = {
            let encodings = self.encodings.lock().await;
            let enc = encodings
                .get(encoding_idx)
                .ok_or(Error::ErrRTPSenderNoSuchEncoding)?;
            (enc.ssrc, enc.payload_type)
        };

        let sequence_number = {
            let mut sequence_numbers = self.sequence_numbers.lock().await;
            let seq = sequence_numbers
                .get_mut(encoding_idx)
                .ok_or(Error::ErrRTPSenderNoSuchEncoding)?;
            let current = *seq;
            *seq = seq.wrapping_add(1);
            current
        };

        let pkt = rtp::packet::Packet {
            header: rtp::header::Header {
                version: 2,
                marker,
                payload_type,
                sequence_number,
                timestamp,
                ssrc,
                ..Default::default()
            },
            payload,
        };

        let n = self.srtp_stream.write_rtp(&pkt).await?;

        self.bandwidth_estimator.rtp_packet_sent(SentInfo {
            wide_seq: sequence_number,
            size: n,
            sending_at_ms: now_ms(),
            sent_at_ms: now_ms(),
            is_probation: false,
        });

        Ok(n)
    }

    /// Like `send_rtp`, but stamps `payload_type` instead of the encoding's
    /// negotiated one. Used by the DTMF sender, which shares its audio
    /// sender's SSRC and sequence-number space (RFC 4733) but carries its
    /// own `telephone-event` payload type.
    pub async fn send_rtp_with_payload_type(
        &self,
        payload: Bytes,
        encoding_idx: usize,
        marker: bool,
        timestamp: u32,
        payload_type: u8,
    ) -> Result<usize> {
        let ssrc = {
            let encodings = self.encodings.lock().await;
            let enc = encodings
                .get(encoding_idx)
                .ok_or(Error::ErrRTPSenderNoSuchEncoding)?;
            enc.ssrc
        };

        let sequence_number = {
            let mut sequence_numbers = self.sequence_numbers.lock().await;
            let seq = sequence_numbers
                .get_mut(encoding_idx)
                .ok_or(Error::ErrRTPSenderNoSuchEncoding)?;
            let current = *seq;
            *seq = seq.wrapping_add(1);
            current
        };

        let pkt = rtp::packet::Packet {
            header: rtp::header::Header {
                version: 2,
                marker,
                payload_type,
                sequence_number,
                timestamp,
                ssrc,
                ..Default::default()
            },
            payload,
        };

        self.srtp_stream.write_rtp(&pkt).await
    }

    /// Feeds a received TWCC feedback report into this sender's bandwidth
    /// estimator, correlating it against packets previously recorded by
    /// `send_rtp`.
    pub fn handle_transport_cc_feedback(
        &self,
        pkt: &rtcp::transport_feedbacks::transport_layer_cc::TransportLayerCc,
        now_ms: u64,
    ) {
        let records = decode_transport_layer_cc(pkt);
        self.bandwidth_estimator.on_feedback(&records, now_ms);
    }

    /// send activates the RTPSender for this track, allowing packets written to its
    /// track to begin leaving the PeerConnection.
    pub async fn send(&self, parameters: &RTCRtpSendParameters) -> Result<()> {
        if self.has_sent().await {
            return Err(Error::ErrRTPSenderSendAlreadyCalled);
        }

        let track = {
            let track = self.track.lock().await;
            track.clone().ok_or(Error::ErrRTPSenderTrackNil)?
        };

        let write_stream = Arc::clone(&self.srtp_stream) as Arc<dyn TrackLocalWriter + Send + Sync>;

        let context = TrackLocalContext::new(
            self.id.clone(),
            parameters.rtp_parameters.codecs.clone(),
            self.ssrc,
            Some(write_stream),
            String::new(),
        );

        let codec = track.bind(&context).await?;
        {
            let mut encodings = self.encodings.lock().await;
            if !parameters.encodings.is_empty() {
                *encodings = parameters.encodings.clone();
            }
            if let Some(primary) = encodings.first_mut() {
                primary.payload_type = codec.payload_type;
            }
            let len = encodings.len();
            let mut sequence_numbers = self.sequence_numbers.lock().await;
            while sequence_numbers.len() < len {
                sequence_numbers.push(rand::random::<u16>());
            }
        }
        {
            let mut header_extensions = self.header_extensions.lock().await;
            *header_extensions = parameters.rtp_parameters.header_extensions.clone();
        }
        {
            let mut stream_info = self.stream_info.lock().await;
            *stream_info = create_stream_info(
                self.id.clone(),
                self.ssrc,
                codec.payload_type,
                codec.capability.clone(),
                &parameters.rtp_parameters.header_extensions,
            );
        }
        {
            let mut ctx = self.context.lock().await;
            *ctx = Some(context);
        }

        self.send_called_signal.store(true, Ordering::SeqCst);

        Ok(())
    }

    /// stop irreversibly stops the RTPSender
    pub async fn stop(&self) -> Result<()> {
        if self.internal.stop_called_signal.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.internal.stop_called_rx.notify_waiters();

        if !self.has_sent().await {
            return Ok(());
        }

        self.replace_track(None).await?;

        self.srtp_stream.close().await
    }

    /// read reads incoming RTCP for this RTPSender
    pub async fn read(&self, b: &mut [u8]) -> Result<usize> {
        self.srtp_stream.read(b).await
    }

    /// read_rtcp is a convenience method that wraps read and unmarshals for
    /// you. It also runs any configured interceptors.
    pub async fn read_rtcp(
        &self,
    ) -> Result<(Vec<Box<dyn rtcp::packet::Packet>>, Attributes)> {
        let a = if let Some(rtcp_interceptor) = self.rtcp_interceptor.lock().await.clone() {
            rtcp_interceptor
        } else {
            return Err(Error::ErrInterceptorNotBind);
        };

        let mut b = vec![0u8; self.receive_mtu];
        let (n, attributes) = a
            .read(&mut b, &Attributes::new())
            .await
            .map_err(|_| Error::ErrInterceptorNotBind)?;

        let mut buf = bytes::BytesMut::from(&b[..n]);
        let pkts = rtcp::packet::unmarshal(&mut buf)?;
        Ok((pkts, attributes))
    }

    /// has_sent tells if the RTPSender's track has been bound for sending.
    pub async fn has_sent(&self) -> bool {
        self.send_called_signal.load(Ordering::SeqCst)
    }

    /// has_stopped tells if stop has been called.
    pub async fn has_stopped(&self) -> bool {
        self.internal.stop_called_signal.load(Ordering::SeqCst)
    }

    /// is_negotiated tells if this sender's track has been added to an m-line
    /// so far, so renegotiation only adds it once.
    pub(crate) fn is_negotiated(&self) -> bool {
        self.negotiated.load(Ordering::SeqCst)
    }

    pub(crate) fn set_negotiated(&self) {
        self.negotiated.store(true, Ordering::SeqCst);
    }

    pub(crate) fn ssrc(&self) -> SSRC {
        self.ssrc
    }

    /// rtx_ssrc returns the RTX SSRC paired with the given layer's RID (or
    /// the primary encoding's, for `rid == ""`), if RTX was negotiated for it.
    pub async fn rtx_ssrc(&self, rid: &str) -> Option<SSRC> {
        let encodings = self.encodings.lock().await;
        encodings
            .iter()
            .find(|e| e.rid == rid)
            .filter(|e| e.rtx.ssrc != 0)
            .map(|e| e.rtx.ssrc)
    }

    /// encodings returns a snapshot of this sender's simulcast encodings.
    pub async fn encodings(&self) -> Vec<RTCRtpEncodingParameters> {
        self.encodings.lock().await.clone()
    }
}

