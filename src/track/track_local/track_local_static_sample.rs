use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rtp::codecs::{g722::G722, h264::H264Payloader, opus::OpusPayloader, vp8::Vp8Payloader};
use rtp::packetizer::{new_packetizer, Packetizer, Payloader};
use rtp::sequence::new_random_sequencer;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::rtp_transceiver::rtp_codec::{
    codec_parameters_fuzzy_search, CodecMatch, RTCRtpCodecCapability, RTCRtpCodecParameters,
    RTPCodecType, MIME_TYPE_G722, MIME_TYPE_H264, MIME_TYPE_OPUS, MIME_TYPE_PCMA, MIME_TYPE_PCMU,
    MIME_TYPE_VP8,
};

use super::{TrackLocal, TrackLocalContext, TrackLocalWriter, RTP_OUTBOUND_MTU};

/// Sample is a single frame/sample of media handed to a TrackLocalStaticSample,
/// with its associated playout duration.
#[derive(Debug, Default, Clone)]
pub struct Sample {
    pub data: Bytes,
    pub duration: Duration,
    pub prev_dropped_packets: u16,
}

fn payloader_for_codec(capability: &RTCRtpCodecCapability) -> Result<Box<dyn Payloader + Send + Sync>> {
    match capability.mime_type.to_lowercase().as_str() {
        t if t == MIME_TYPE_H264.to_lowercase() => Ok(Box::new(H264Payloader::default())),
        t if t == MIME_TYPE_VP8.to_lowercase() => Ok(Box::new(Vp8Payloader::default())),
        t if t == MIME_TYPE_OPUS.to_lowercase() => Ok(Box::new(OpusPayloader)),
        t if t == MIME_TYPE_G722.to_lowercase() => Ok(Box::new(G722::default())),
        t if t == MIME_TYPE_PCMU.to_lowercase() || t == MIME_TYPE_PCMA.to_lowercase() => {
            Err(Error::ErrUnsupportedCodec)
        }
        _ => Err(Error::ErrUnsupportedCodec),
    }
}

struct TrackBinding {
    id: String,
    ssrc: u32,
    payload_type: u8,
    write_stream: Arc<dyn TrackLocalWriter + Send + Sync>,
    packetizer: Box<dyn Packetizer + Send + Sync>,
    clock_rate: u32,
}

/// TrackLocalStaticSample is a TrackLocal that accepts already-decoded media
/// samples (e.g. encoder output) and packetizes them into RTP itself. Every
/// sender this track is bound to runs its own packetizer, so a single track
/// can fan out to multiple senders with independent sequence/timestamp state.
pub struct TrackLocalStaticSample {
    bindings: Mutex<Vec<TrackBinding>>,
    codec: Mutex<RTCRtpCodecCapability>,
    id: String,
    stream_id: String,
}

impl std::fmt::Debug for TrackLocalStaticSample {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackLocalStaticSample")
            .field("id", &self.id)
            .field("stream_id", &self.stream_id)
            .finish()
    }
}

impl TrackLocalStaticSample {
    pub fn new(codec: RTCRtpCodecCapability, id: String, stream_id: String) -> Self {
        TrackLocalStaticSample {
            bindings: Mutex::new(vec![]),
            codec: Mutex::new(codec),
            id,
            stream_id,
        }
    }

    /// write_sample packetizes and writes the sample to every bound sender.
    pub async fn write_sample(&self, sample: &Sample) -> Result<()> {
        let clock_rate = { self.codec.lock().await.clock_rate };
        let samples = if clock_rate == 0 {
            0
        } else {
            (sample.duration.as_secs_f64() * clock_rate as f64).round() as u32
        };

        let mut bindings = self.bindings.lock().await;
        let mut write_errs = vec![];
        for b in bindings.iter_mut() {
            match b.packetizer.packetize(&sample.data, samples) {
                Ok(packets) => {
                    for p in packets {
                        if let Err(err) = b.write_stream.write_rtp(&p).await {
                            write_errs.push(err);
                        }
                    }
                }
                Err(err) => write_errs.push(err.into()),
            }
        }

        if let Some(err) = write_errs.into_iter().next() {
            Err(err)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TrackLocal for TrackLocalStaticSample {
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

        let payloader = payloader_for_codec(&codec.capability)?;
        let sequencer = new_random_sequencer();
        let packetizer = new_packetizer(
            RTP_OUTBOUND_MTU,
            codec.payload_type,
            t.ssrc(),
            payloader,
            Box::new(sequencer),
            codec.capability.clock_rate,
        );

        let write_stream = t
            .write_stream()
            .ok_or(Error::ErrRTPSenderTrackNil)?;

        let mut bindings = self.bindings.lock().await;
        bindings.push(TrackBinding {
            id: t.id().to_owned(),
            ssrc: t.ssrc(),
            payload_type: codec.payload_type,
            write_stream,
            packetizer: Box::new(packetizer),
            clock_rate: codec.capability.clock_rate,
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
