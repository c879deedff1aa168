#[cfg(test)]
mod dtmf_sender_test;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::rtp_transceiver::rtp_sender::RTCRtpSender;

/// RFC 4733 minimum/maximum tone duration and minimum inter-tone gap, in ms.
const MIN_TONE_DURATION_MS: u16 = 40;
const MAX_TONE_DURATION_MS: u16 = 6000;
const MIN_INTER_TONE_GAP_MS: u16 = 30;

/// How often an in-progress tone's RTP packet is refreshed while held.
const PACKETIZATION_INTERVAL_MS: u64 = 20;
/// `telephone-event` clock rate assumed for the duration field (RFC 4733 §2.3
/// ties it to the associated audio codec's clock; 8000 Hz is standard for
/// the narrowband codecs this sender is normally paired with).
const CLOCK_RATE_HZ: u32 = 8000;
const END_PACKET_RETRANSMISSIONS: u32 = 3;

pub type OnToneChangeHdlrFn =
    Box<dyn (FnMut(String) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>) + Send + Sync>;

fn tone_to_event_code(tone: char) -> Result<u8> {
    match tone {
        '0'..='9' => Ok(tone as u8 - b'0'),
        '*' => Ok(10),
        '#' => Ok(11),
        'A'..='D' => Ok(12 + (tone as u8 - b'A')),
        _ => Err(Error::ErrDTMFSenderInvalidTone),
    }
}

fn marshal_telephone_event(event: u8, end: bool, volume: u8, duration: u16) -> Bytes {
    let mut buf = [0u8; 4];
    buf[0] = event;
    buf[1] = ((end as u8) << 7) | (volume & 0x3f);
    buf[2] = (duration >> 8) as u8;
    buf[3] = (duration & 0xff) as u8;
    Bytes::copy_from_slice(&buf)
}

/// Sends DTMF (RFC 4733 `telephone-event`) tones over an `RTCRtpSender`'s
/// audio stream, sharing its SSRC/sequence-number space but stamping its own
/// `payload_type`.
pub struct DtmfSender {
    sender: Arc<RTCRtpSender>,
    payload_type: u8,
    on_tone_change: Mutex<Option<OnToneChangeHdlrFn>>,
    playout: Mutex<Option<JoinHandle<()>>>,
}

impl DtmfSender {
    pub fn new(sender: Arc<RTCRtpSender>, payload_type: u8) -> Arc<Self> {
        Arc::new(DtmfSender {
            sender,
            payload_type,
            on_tone_change: Mutex::new(None),
            playout: Mutex::new(None),
        })
    }

    pub async fn on_tone_change(&self, f: OnToneChangeHdlrFn) {
        let mut handler = self.on_tone_change.lock().await;
        *handler = Some(f);
    }

    async fn fire_tone_change(&self, tone: String) {
        let mut handler = self.on_tone_change.lock().await;
        if let Some(f) = &mut *handler {
            f(tone).await;
        }
    }

    /// Queues `tones` for playout, cancelling any tone sequence already in
    /// progress. Per RFC 4733 `duration`/`inter_tone_gap` are clamped to
    /// [40, 6000]ms and a floor of 30ms respectively.
    pub async fn insert_dtmf(
        self: &Arc<Self>,
        tones: &str,
        duration: u16,
        inter_tone_gap: u16,
    ) -> Result<()> {
        let tones: Vec<char> = tones.chars().collect();
        for t in &tones {
            tone_to_event_code(*t)?;
        }

        let duration = duration.clamp(MIN_TONE_DURATION_MS, MAX_TONE_DURATION_MS);
        let inter_tone_gap = inter_tone_gap.max(MIN_INTER_TONE_GAP_MS);

        {
            let mut playout = self.playout.lock().await;
            if let Some(handle) = playout.take() {
                handle.abort();
            }
        }

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            this.play_tones(tones, duration, inter_tone_gap).await;
        });

        *self.playout.lock().await = Some(handle);
        Ok(())
    }

    async fn play_tones(self: Arc<Self>, tones: Vec<char>, duration: u16, inter_tone_gap: u16) {
        for tone in tones {
            self.fire_tone_change(tone.to_string()).await;
            self.play_one_tone(tone, duration).await;
            tokio::time::sleep(std::time::Duration::from_millis(inter_tone_gap as u64)).await;
            self.fire_tone_change(String::new()).await;
        }
    }

    async fn play_one_tone(&self, tone: char, duration_ms: u16) {
        let Ok(event) = tone_to_event_code(tone) else {
            return;
        };
        let volume = 10u8;
        let timestamp = rand::random::<u32>();

        let mut elapsed_ms: u32 = 0;
        let mut marker = true;
        while elapsed_ms < duration_ms as u32 {
            let duration_samples = (elapsed_ms * CLOCK_RATE_HZ / 1000) as u16;
            let payload = marshal_telephone_event(event, false, volume, duration_samples);
            let _ = self
                .sender
                .send_rtp_with_payload_type(payload, 0, marker, timestamp, self.payload_type)
                .await;
            marker = false;

            tokio::time::sleep(std::time::Duration::from_millis(PACKETIZATION_INTERVAL_MS)).await;
            elapsed_ms += PACKETIZATION_INTERVAL_MS as u32;
        }

        let full_duration_samples = (duration_ms as u32 * CLOCK_RATE_HZ / 1000) as u16;
        for _ in 0..END_PACKET_RETRANSMISSIONS {
            let payload = marshal_telephone_event(event, true, volume, full_duration_samples);
            let _ = self
                .sender
                .send_rtp_with_payload_type(payload, 0, false, timestamp, self.payload_type)
                .await;
        }
    }
}
