pub mod track_local_static_rtp;
pub mod track_local_static_sample;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::rtp_transceiver::rtp_codec::{RTCRtpCodecParameters, RTPCodecType};

/// TrackLocalContext is the context passed to a TrackLocal when it is bound
/// to an RTCRtpSender after negotiation completes, and again when it is
/// unbound on removal.
#[derive(Default, Debug, Clone)]
pub struct TrackLocalContext {
    id: String,
    params: Vec<RTCRtpCodecParameters>,
    ssrc: u32,
    write_stream: Option<Arc<dyn TrackLocalWriter + Send + Sync>>,
    mid: String,
}

impl TrackLocalContext {
    pub fn new(
        id: String,
        params: Vec<RTCRtpCodecParameters>,
        ssrc: u32,
        write_stream: Option<Arc<dyn TrackLocalWriter + Send + Sync>>,
        mid: String,
    ) -> Self {
        TrackLocalContext {
            id,
            params,
            ssrc,
            write_stream,
            mid,
        }
    }

    /// codec_parameters returns the negotiated codecs, in priority order,
    /// that a TrackLocal may write against for this bind.
    pub fn codec_parameters(&self) -> &[RTCRtpCodecParameters] {
        &self.params
    }

    /// write_stream is used to write RTP for this TrackLocal directly to the
    /// underlying SRTP session without going through the sender's own
    /// serialization.
    pub fn write_stream(&self) -> Option<Arc<dyn TrackLocalWriter + Send + Sync>> {
        self.write_stream.clone()
    }

    /// id is a unique identifier that is used for both bind and unbind.
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// ssrc is the negotiated SSRC of this track.
    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    /// mid is the negotiated media ID for this TrackLocal. Empty before negotiation.
    pub fn mid(&self) -> &str {
        self.mid.as_str()
    }
}

/// TrackLocalWriter is the writer a bound TrackLocal uses to emit outbound RTP.
#[async_trait]
pub trait TrackLocalWriter: fmt::Debug + Send + Sync {
    /// write_rtp writes an already-parsed RTP packet to the writer.
    async fn write_rtp(&self, pkt: &rtp::packet::Packet) -> Result<usize>;

    /// write writes a raw RTP packet buffer to the writer.
    async fn write(&self, b: &[u8]) -> Result<usize>;
}

/// TrackLocal is a local media source that can be bound to one or more
/// RTCRtpSenders. How it produces RTP (encoding a frame, forwarding another
/// track, echoing a remote track) is up to the implementation; see
/// `track_local_static_sample` and `track_local_static_rtp`.
#[async_trait]
pub trait TrackLocal: fmt::Debug {
    /// bind is called by the sender after negotiation completes, asserting
    /// that the TrackLocal has the ability to send media with one of the
    /// negotiated codecs. Called once per sender a track is attached to.
    async fn bind(&self, t: &TrackLocalContext) -> Result<RTCRtpCodecParameters>;

    /// unbind is called when the track is removed from a sender, releasing
    /// resources allocated for that specific bind.
    async fn unbind(&self, t: &TrackLocalContext) -> Result<()>;

    /// id is the unique identifier for this track within its stream.
    fn id(&self) -> &str;

    /// stream_id is the media stream group this track belongs to.
    fn stream_id(&self) -> &str;

    /// rid is the RTP stream identifier assigned to this track when it is
    /// one encoding of a simulcast group.
    fn rid(&self) -> Option<&str> {
        None
    }

    /// kind is whether this track is audio or video.
    fn kind(&self) -> RTPCodecType;
}

pub(crate) const RTP_OUTBOUND_MTU: usize = 1200;
