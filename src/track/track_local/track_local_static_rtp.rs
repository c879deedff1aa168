use std::sync::Arc;

use async_trait::async_trait;
use rtp::packet::Packet;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::rtp_transceiver::rtp_codec::{
    codec_parameters_fuzzy_search, CodecMatch, RTCRtpCodecCapability, RTCRtpCodecParameters,
    RTPCodecType,
};

use super::{TrackLocal, TrackLocalContext, TrackLocalWriter};

struct TrackBinding {
    id: String,
    ssrc: u32,
    payload_type: u8,
    write_stream: Arc<dyn TrackLocalWriter + Send + Sync>,
}

/// TrackLocalStaticRTP is a TrackLocal that forwards pre-encoded RTP packets
/// from a remote/cached source. Unlike TrackLocalStaticSample it never
/// packetizes media itself: callers hand it already-formed `rtp::packet::Packet`
/// values, and it rewrites SSRC/header extensions per bound sender before
/// forwarding. `rewrite_payload_type` additionally remaps the payload type,
/// matching the outbound path used when forwarding RTX/padding probes whose
/// payload type differs from the negotiated media codec's.
pub struct TrackLocalStaticRTP {
    bindings: Mutex<Vec<TrackBinding>>,
    codec: Mutex<RTCRtpCodecCapability>,
    id: String,
    stream_id: String,
    rewrite_payload_type: bool,
}

impl std::fmt::Debug for TrackLocalStaticRTP {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackLocalStaticRTP")
            .field("id", &self.id)
            .field("stream_id", &self.stream_id)
            .finish()
    }
}

impl TrackLocalStaticRTP {
    pub fn new(codec: RTCRtpCodecCapability, id: String, stream_id: String) -> Self {
        TrackLocalStaticRTP {
            bindings: Mutex::new(vec![]),
            codec: Mutex::new(codec),
            id,
            stream_id,
            rewrite_payload_type: false,
        }
    }

    /// register_nonstandard_track configures this track for forwarding
    /// pre-encoded packets whose payload type may not match what was
    /// negotiated (RTX, FEC, padding-only probes). Packets whose payload
    /// type the sender did not negotiate are rewritten to the bound codec's
    /// payload type rather than dropped.
    pub fn register_nonstandard_track(codec: RTCRtpCodecCapability, id: String, stream_id: String) -> Self {
        TrackLocalStaticRTP {
            bindings: Mutex::new(vec![]),
            codec: Mutex::new(codec),
            id,
            stream_id,
            rewrite_payload_type: true,
        }
    }

    /// register_track_for_forward is the echo/forward mode: SSRC and header
    /// extensions are rewritten per bound sender, but the payload type is
    /// always preserved from the incoming packet.
    pub fn register_track_for_forward(codec: RTCRtpCodecCapability, id: String, stream_id: String) -> Self {
        TrackLocalStaticRTP {
            bindings: Mutex::new(vec![]),
            codec: Mutex::new(codec),
            id,
            stream_id,
            rewrite_payload_type: false,
        }
    }

    /// write_rtp rewrites and forwards a single packet to every bound sender.
    pub async fn write_rtp(&self, p: &Packet) -> Result<()> {
        let bindings = self.bindings.lock().await;
        let mut write_errs = vec![];
        for b in bindings.iter() {
            let mut out = p.clone();
            out.header.ssrc = b.ssrc;
            if self.rewrite_payload_type {
                out.header.payload_type = b.payload_type;
            }
            if let Err(err) = b.write_stream.write_rtp(&out).await {
                write_errs.push(err);
            }
        }
        if let Some(err) = write_errs.into_iter().next() {
            Err(err)
        } else {
            Ok(())
        }
    }

    /// forward_cached_packets replays a keyframe/cache (e.g. the last IDR and
    /// any packets held for retransmission) to a single, newly-bound sender
    /// identified by `id`, so a receiver that joins mid-stream doesn't have
    /// to wait for the next natural keyframe.
    pub async fn forward_cached_packets(&self, id: &str, packets: &[Packet]) -> Result<()> {
        let bindings = self.bindings.lock().await;
        let b = bindings
            .iter()
            .find(|b| b.id == id)
            .ok_or(Error::ErrRTPSenderTrackNil)?;
        for p in packets {
            let mut out = p.clone();
            out.header.ssrc = b.ssrc;
            if self.rewrite_payload_type {
                out.header.payload_type = b.payload_type;
            }
            b.write_stream.write_rtp(&out).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TrackLocal for TrackLocalStaticRTP {
    async fn bind(&self, t: &TrackLocalContext) -> Result<RTCRtpCodecParameters> {
        let codec = self.codec.lock().await.clone();
        let (codec, match_type) = codec_parameters_fuzzy_search(
            &RTCRtpCodecParameters {
                capability: codec,
                ..Default::default()
            },
            t.codec_parameters(),
        );
        if match_type == CodecMatch::None {
            return Err(Error::ErrUnsupportedCodec);
        }

        let write_stream = t.write_stream().ok_or(Error::ErrRTPSenderTrackNil)?;

        let mut bindings = self.bindings.lock().await;
        bindings.push(TrackBinding {
            id: t.id().to_owned(),
            ssrc: t.ssrc(),
            payload_type: codec.payload_type,
            write_stream,
        });

        Ok(codec)
    }

    async fn unbind(&self, t: &TrackLocalContext) -> Result<()> {
        let mut bindings = self.bindings.lock().await;
        bindings.retain(|b| b.id != t.id());
        Ok(())
    }

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn stream_id(&self) -> &str {
        self.stream_id.as_str()
    }

    fn kind(&self) -> RTPCodecType {
        RTPCodecType::Video
    }
}
