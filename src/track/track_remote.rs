use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use interceptor::{Attributes, Interceptor, RTCPReader, RTPReader};
use rtcp::packet::Packet as RtcpPacket;
use rtp::packet::Packet;
use tokio::sync::Mutex;
use util::Unmarshal;

use crate::api::media_engine::MediaEngine;
use crate::error::{Error, Result};
use crate::rtp_transceiver::rtp_codec::{RTCRtpCodecParameters, RTPCodecType};
use crate::rtp_transceiver::SSRC;

/// TrackRemote represents a single inbound source of media produced by a
/// remote peer, created by an RTCRtpReceiver when negotiation tells it
/// which SSRC(s)/RID(s) to expect. Unlike a TrackLocal it never produces
/// RTP itself; it only exposes reads of what arrived.
pub struct TrackRemote {
    id: Mutex<String>,
    stream_id: Mutex<String>,

    payload_type: AtomicU8,
    kind: Mutex<RTPCodecType>,
    ssrc: SSRC,
    rid: String,

    codec: Mutex<RTCRtpCodecParameters>,

    media_engine: Arc<MediaEngine>,

    rtp_interceptor: Mutex<Option<Arc<dyn RTPReader + Send + Sync>>>,
    rtcp_interceptor: Mutex<Option<Arc<dyn RTCPReader + Send + Sync>>>,

    received: std::sync::atomic::AtomicBool,

    total_received_bytes: AtomicU32,
}

impl TrackRemote {
    pub(crate) fn new(
        kind: RTPCodecType,
        ssrc: SSRC,
        rid: String,
        _receiver_interceptor: Arc<dyn Interceptor + Send + Sync>,
        media_engine: Arc<MediaEngine>,
        _interceptor: Arc<dyn Interceptor + Send + Sync>,
    ) -> Self {
        TrackRemote {
            id: Mutex::new(String::new()),
            stream_id: Mutex::new(String::new()),
            payload_type: AtomicU8::new(0),
            kind: Mutex::new(kind),
            ssrc,
            rid,
            codec: Mutex::new(RTCRtpCodecParameters::default()),
            media_engine,
            rtp_interceptor: Mutex::new(None),
            rtcp_interceptor: Mutex::new(None),
            received: std::sync::atomic::AtomicBool::new(false),
            total_received_bytes: AtomicU32::new(0),
        }
    }

    pub fn ssrc(&self) -> SSRC {
        self.ssrc
    }

    pub fn rid(&self) -> &str {
        self.rid.as_str()
    }

    pub async fn id(&self) -> String {
        self.id.lock().await.clone()
    }

    pub(crate) async fn set_id(&self, id: String) {
        *self.id.lock().await = id;
    }

    pub async fn stream_id(&self) -> String {
        self.stream_id.lock().await.clone()
    }

    pub(crate) async fn set_stream_id(&self, stream_id: String) {
        *self.stream_id.lock().await = stream_id;
    }

    pub async fn kind(&self) -> RTPCodecType {
        *self.kind.lock().await
    }

    pub async fn codec(&self) -> RTCRtpCodecParameters {
        self.codec.lock().await.clone()
    }

    pub(crate) async fn set_codec(&self, codec: RTCRtpCodecParameters) {
        self.payload_type
            .store(codec.payload_type, Ordering::SeqCst);
        *self.codec.lock().await = codec;
    }

    pub fn payload_type(&self) -> u8 {
        self.payload_type.load(Ordering::SeqCst)
    }

    pub(crate) async fn bind(
        &self,
        rtp_interceptor: Arc<dyn RTPReader + Send + Sync>,
        rtcp_interceptor: Arc<dyn RTCPReader + Send + Sync>,
    ) {
        *self.rtp_interceptor.lock().await = Some(rtp_interceptor);
        *self.rtcp_interceptor.lock().await = Some(rtcp_interceptor);
        self.received.store(true, Ordering::SeqCst);
    }

    pub fn has_received(&self) -> bool {
        self.received.load(Ordering::SeqCst)
    }

    /// read reads a single RTP packet forwarded through this track's
    /// receiver-side interceptor chain (jitter buffer, NACK generator,
    /// RTX depacketization), returning the packet and its attributes.
    pub async fn read(&self, b: &mut [u8]) -> Result<(Packet, Attributes)> {
        let interceptor = {
            self.rtp_interceptor
                .lock()
                .await
                .clone()
                .ok_or(Error::ErrRTPSenderTrackNil)?
        };
        let a = Attributes::default();
        let (n, attributes) = interceptor.read(b, &a).await?;
        self.total_received_bytes
            .fetch_add(n as u32, Ordering::SeqCst);
        let mut buf = &b[..n];
        let pkt = Packet::unmarshal(&mut buf)?;
        Ok((pkt, attributes))
    }

    /// read_rtcp reads the RTCP packets associated with this track's SSRC
    /// (sender reports, PLI/FIR replies to our receiver estimation, etc).
    pub async fn read_rtcp(&self, b: &mut [u8]) -> Result<(Vec<Box<dyn RtcpPacket>>, Attributes)> {
        let interceptor = {
            self.rtcp_interceptor
                .lock()
                .await
                .clone()
                .ok_or(Error::ErrRTPSenderTrackNil)?
        };
        let a = Attributes::default();
        let (n, attributes) = interceptor.read(b, &a).await?;
        let mut buf = bytes::BytesMut::from(&b[..n]);
        let pkts = rtcp::packet::unmarshal(&mut buf)?;
        Ok((pkts, attributes))
    }

    pub fn total_received_bytes(&self) -> u32 {
        self.total_received_bytes.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for TrackRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackRemote")
            .field("ssrc", &self.ssrc)
            .field("rid", &self.rid)
            .finish()
    }
}
