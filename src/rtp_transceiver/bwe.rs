#[cfg(test)]
mod bwe_test;

use std::collections::HashMap;
use std::sync::Mutex as SyncMutex;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use portable_atomic::{AtomicBool, AtomicI32, AtomicU32, Ordering};
use rtcp::transport_feedbacks::transport_layer_cc::{
    PacketStatusChunk, SymbolTypeTcc, TransportLayerCc,
};

/// A record of one RTP packet handed to the transport, keyed by its
/// transport-wide sequence number (the same space the TWCC header extension
/// stamps on outgoing packets).
#[derive(Debug, Clone, Copy)]
pub struct SentInfo {
    pub wide_seq: u16,
    pub size: usize,
    pub sending_at_ms: u64,
    pub sent_at_ms: u64,
    pub is_probation: bool,
}

/// One entry of a decoded TWCC feedback report: the transport-wide sequence
/// number it covers, and the receiver's timestamp for it, or `None` if the
/// receiver reported it missing.
#[derive(Debug, Clone, Copy)]
pub struct FeedbackRecord {
    pub wide_seq: u16,
    pub recv_time_ms: Option<u64>,
}

/// Expands a TWCC feedback packet's run-length/status-vector chunks and
/// recv-delta list into one `FeedbackRecord` per packet the report covers.
///
/// `reference_time` is 64ms ticks from an arbitrary epoch; each recv delta is
/// a running offset from it in 250us units for 1-byte (small) deltas, scaled
/// by 4 for 2-byte (large) deltas per draft-holmer-rmcat-transport-wide-cc.
pub fn decode_transport_layer_cc(pkt: &TransportLayerCc) -> Vec<FeedbackRecord> {
    let mut symbols = Vec::new();
    for chunk in &pkt.packet_chunks {
        match chunk {
            PacketStatusChunk::RunLengthChunk(c) => {
                for _ in 0..c.run_length {
                    symbols.push(c.packet_status_symbol);
                }
            }
            PacketStatusChunk::StatusVectorChunk(c) => {
                symbols.extend(c.symbol_list.iter().copied());
            }
        }
    }

    let base_time_ms = pkt.reference_time as u64 * 64;
    let mut running_us: i64 = 0;
    let mut deltas = pkt.recv_deltas.iter();

    let mut records = Vec::with_capacity(symbols.len());
    for (i, symbol) in symbols.into_iter().enumerate() {
        let wide_seq = pkt.base_sequence_number.wrapping_add(i as u16);
        let recv_time_ms = match symbol {
            SymbolTypeTcc::PacketNotReceived => None,
            SymbolTypeTcc::PacketReceivedWithoutDelta => Some(base_time_ms),
            SymbolTypeTcc::PacketReceivedSmallDelta | SymbolTypeTcc::PacketReceivedLargeDelta => {
                deltas.next().map(|d| {
                    running_us += d.delta;
                    base_time_ms.saturating_add((running_us / 1000) as u64)
                })
            }
        };
        records.push(FeedbackRecord {
            wide_seq,
            recv_time_ms,
        });
    }

    records
}

#[derive(Default, Debug, Clone, Copy)]
struct CumulativeResult {
    packets: u32,
    bytes: u64,
    min_send_ms: u64,
    max_send_ms: u64,
    min_recv_ms: u64,
    max_recv_ms: u64,
}

impl CumulativeResult {
    fn record(&mut self, size: usize, send_ms: u64, recv_ms: u64) {
        if self.packets == 0 {
            self.min_send_ms = send_ms;
            self.max_send_ms = send_ms;
            self.min_recv_ms = recv_ms;
            self.max_recv_ms = recv_ms;
        } else {
            self.min_send_ms = self.min_send_ms.min(send_ms);
            self.max_send_ms = self.max_send_ms.max(send_ms);
            self.min_recv_ms = self.min_recv_ms.min(recv_ms);
            self.max_recv_ms = self.max_recv_ms.max(recv_ms);
        }
        self.packets += 1;
        self.bytes += size as u64;
    }

    /// bits-per-second implied by the send-side span of this window, or
    /// `None` if the span is degenerate (all packets sent at the same ms).
    fn send_bitrate_bps(&self) -> Option<u64> {
        let span_ms = self.max_send_ms.saturating_sub(self.min_send_ms);
        (span_ms > 0).then(|| self.bytes * 8 * 1000 / span_ms)
    }

    /// bits-per-second implied by the receive-side span of this window.
    fn recv_bitrate_bps(&self) -> Option<u64> {
        let span_ms = self.max_recv_ms.saturating_sub(self.min_recv_ms);
        (span_ms > 0).then(|| self.bytes * 8 * 1000 / span_ms)
    }
}

const CONGESTION_COUNTER_MAX: i32 = 20;
const CONGESTION_COUNTER_MIN: i32 = -20;
const CONGESTION_SCORE_CAP: u32 = 10;
const CUMULATIVE_WINDOW_MIN_MS: u64 = 100;
const CUMULATIVE_WINDOW_MIN_PACKETS: u32 = 20;
const STALL_RESET_MS: u64 = 1000;

pub type OnAvailableBitrateFn = Box<dyn Fn(u64) + Send + Sync>;
pub type OnCongestionFn = Box<dyn Fn(bool) + Send + Sync>;

/// Sender-side bandwidth estimator driven by TWCC feedback: tracks a
/// congestion counter and score from feedback cadence and loss, and
/// estimates `available_bitrate` from the send/receive byte rate of packets
/// the remote actually reported receiving.
///
/// Per spec: reaching +20 on the congestion counter (continued silence from
/// the remote, or a full second elapsing unanswered) raises `on_congestion(true)`
/// once and bumps the score, capped at 10; recovering drains the counter back
/// down and, at -20 with score > 1, lowers the score and raises
/// `on_congestion(false)`. Missing feedback alone never declares congestion --
/// it only feeds the counter, which has to actually reach a threshold.
pub struct BandwidthEstimator {
    sent: SyncMutex<HashMap<u16, SentInfo>>,
    cumulative: SyncMutex<CumulativeResult>,
    first_packet_sent_at_ms: SyncMutex<Option<u64>>,
    last_reset_at_ms: SyncMutex<u64>,

    congestion_counter: AtomicI32,
    congestion_score: AtomicU32,
    congested: AtomicBool,

    on_available_bitrate: ArcSwapOption<OnAvailableBitrateFn>,
    on_congestion: ArcSwapOption<OnCongestionFn>,
}

impl BandwidthEstimator {
    pub fn new() -> Arc<Self> {
        Arc::new(BandwidthEstimator {
            sent: SyncMutex::new(HashMap::new()),
            cumulative: SyncMutex::new(CumulativeResult::default()),
            first_packet_sent_at_ms: SyncMutex::new(None),
            last_reset_at_ms: SyncMutex::new(0),
            congestion_counter: AtomicI32::new(0),
            congestion_score: AtomicU32::new(0),
            congested: AtomicBool::new(false),
            on_available_bitrate: ArcSwapOption::empty(),
            on_congestion: ArcSwapOption::empty(),
        })
    }

    pub fn on_available_bitrate(&self, f: OnAvailableBitrateFn) {
        self.on_available_bitrate.store(Some(Arc::new(f)));
    }

    pub fn on_congestion(&self, f: OnCongestionFn) {
        self.on_congestion.store(Some(Arc::new(f)));
    }

    /// Records an RTP packet as sent; `rtp_packet_sent` in spec terms.
    pub fn rtp_packet_sent(&self, info: SentInfo) {
        let mut first = self.first_packet_sent_at_ms.lock().unwrap();
        if first.is_none() {
            *first = Some(info.sending_at_ms);
        }
        drop(first);

        let mut sent = self.sent.lock().unwrap();
        sent.insert(info.wide_seq, info);
    }

    /// Feeds one decoded TWCC feedback report through the estimator.
    pub fn on_feedback(&self, records: &[FeedbackRecord], now_ms: u64) {
        let first_packet_sent_at_ms = {
            let first = self.first_packet_sent_at_ms.lock().unwrap();
            first.unwrap_or(now_ms)
        };

        if now_ms.saturating_sub(first_packet_sent_at_ms) > STALL_RESET_MS {
            *self.cumulative.lock().unwrap() = CumulativeResult::default();
            *self.last_reset_at_ms.lock().unwrap() = now_ms;

            let counter = self
                .congestion_counter
                .fetch_add(1, Ordering::SeqCst)
                .saturating_add(1)
                .min(CONGESTION_COUNTER_MAX);
            self.congestion_counter.store(counter, Ordering::SeqCst);

            if counter >= CONGESTION_COUNTER_MAX && !self.congested.swap(true, Ordering::SeqCst) {
                self.raise_congestion(true);
                self.congestion_score
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |s| {
                        Some((s + 1).min(CONGESTION_SCORE_CAP))
                    })
                    .ok();
            }
        }

        let mut sent = self.sent.lock().unwrap();
        let mut cumulative = self.cumulative.lock().unwrap();
        for record in records {
            let Some(recv_time_ms) = record.recv_time_ms else {
                continue;
            };
            if let Some(info) = sent.remove(&record.wide_seq) {
                if !info.is_probation {
                    cumulative.record(info.size, info.sent_at_ms, recv_time_ms);
                }
            }
        }

        let elapsed_ms = now_ms.saturating_sub(
            self.last_reset_at_ms
                .lock()
                .unwrap()
                .max(first_packet_sent_at_ms),
        );

        if elapsed_ms >= CUMULATIVE_WINDOW_MIN_MS && cumulative.packets >= CUMULATIVE_WINDOW_MIN_PACKETS
        {
            if let (Some(send_bps), Some(recv_bps)) =
                (cumulative.send_bitrate_bps(), cumulative.recv_bitrate_bps())
            {
                let available_bitrate = send_bps.min(recv_bps);
                if let Some(hdlr) = self.on_available_bitrate.load_full() {
                    hdlr(available_bitrate);
                }
            }

            // Recovery: a healthy feedback round decays the congestion
            // counter back toward zero.
            let counter = self
                .congestion_counter
                .fetch_sub(1, Ordering::SeqCst)
                .saturating_sub(1)
                .max(CONGESTION_COUNTER_MIN);
            self.congestion_counter.store(counter, Ordering::SeqCst);

            if counter <= CONGESTION_COUNTER_MIN {
                let score = self.congestion_score.load(Ordering::SeqCst);
                if score > 1 {
                    self.congestion_score.store(score - 1, Ordering::SeqCst);
                    if self.congested.swap(false, Ordering::SeqCst) {
                        self.raise_congestion(false);
                    }
                }
            }
        }
    }

    fn raise_congestion(&self, congested: bool) {
        if let Some(hdlr) = self.on_congestion.load_full() {
            hdlr(congested);
        }
    }

    pub fn congestion_score(&self) -> u32 {
        self.congestion_score.load(Ordering::SeqCst)
    }

    pub fn is_congested(&self) -> bool {
        self.congested.load(Ordering::SeqCst)
    }
}
