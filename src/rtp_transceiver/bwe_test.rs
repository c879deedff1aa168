use super::*;
use rtcp::transport_feedbacks::transport_layer_cc::{
    PacketStatusChunk, RecvDelta, RunLengthChunk, SymbolTypeTcc,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as StdOrdering};

fn sent(wide_seq: u16, size: usize, sending_at_ms: u64, sent_at_ms: u64) -> SentInfo {
    SentInfo {
        wide_seq,
        size,
        sending_at_ms,
        sent_at_ms,
        is_probation: false,
    }
}

#[test]
fn test_available_bitrate_from_healthy_feedback() {
    let bwe = BandwidthEstimator::new();
    let seen = Arc::new(AtomicU64::new(0));
    let seen2 = Arc::clone(&seen);
    bwe.on_available_bitrate(Box::new(move |bps| {
        seen2.store(bps, StdOrdering::SeqCst);
    }));

    for i in 0..25u16 {
        bwe.rtp_packet_sent(sent(i, 1200, i as u64, i as u64));
    }

    let records: Vec<FeedbackRecord> = (0..25u16)
        .map(|i| FeedbackRecord {
            wide_seq: i,
            recv_time_ms: Some(i as u64 + 10),
        })
        .collect();

    bwe.on_feedback(&records, 200);

    assert!(seen.load(StdOrdering::SeqCst) > 0);
}

#[test]
fn test_congestion_raised_after_sustained_silence() {
    let bwe = BandwidthEstimator::new();
    let congested = Arc::new(AtomicBool::new(false));
    let congested2 = Arc::clone(&congested);
    bwe.on_congestion(Box::new(move |c| {
        congested2.store(c, StdOrdering::SeqCst);
    }));

    bwe.rtp_packet_sent(sent(0, 100, 0, 0));

    // 20 rounds of feedback arriving more than a second after the first
    // packet, each with nothing received, ratchets the counter to +20.
    for round in 1..=20u64 {
        bwe.on_feedback(&[], 1000 + round);
    }

    assert!(bwe.is_congested());
    assert!(congested.load(StdOrdering::SeqCst));
    assert_eq!(bwe.congestion_score(), 1);
}

#[test]
fn test_missing_feedback_alone_does_not_congest() {
    let bwe = BandwidthEstimator::new();
    bwe.rtp_packet_sent(sent(0, 100, 0, 0));

    // A single late feedback round only nudges the counter by one.
    bwe.on_feedback(&[], 1500);

    assert!(!bwe.is_congested());
}

#[test]
fn test_decode_transport_layer_cc_run_length_chunk() {
    let pkt = TransportLayerCc {
        base_sequence_number: 10,
        reference_time: 1,
        packet_chunks: vec![PacketStatusChunk::RunLengthChunk(RunLengthChunk {
            packet_status_symbol: SymbolTypeTcc::PacketReceivedSmallDelta,
            run_length: 3,
            ..Default::default()
        })],
        recv_deltas: vec![
            RecvDelta {
                type_tcc_packet: SymbolTypeTcc::PacketReceivedSmallDelta,
                delta: 4000,
            },
            RecvDelta {
                type_tcc_packet: SymbolTypeTcc::PacketReceivedSmallDelta,
                delta: 4000,
            },
            RecvDelta {
                type_tcc_packet: SymbolTypeTcc::PacketReceivedSmallDelta,
                delta: 4000,
            },
        ],
        ..Default::default()
    };

    let records = decode_transport_layer_cc(&pkt);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].wide_seq, 10);
    assert_eq!(records[2].wide_seq, 12);
    assert!(records[0].recv_time_ms.unwrap() < records[2].recv_time_ms.unwrap());
}

#[test]
fn test_decode_transport_layer_cc_marks_not_received() {
    let pkt = TransportLayerCc {
        base_sequence_number: 0,
        reference_time: 0,
        packet_chunks: vec![PacketStatusChunk::RunLengthChunk(RunLengthChunk {
            packet_status_symbol: SymbolTypeTcc::PacketNotReceived,
            run_length: 2,
            ..Default::default()
        })],
        recv_deltas: vec![],
        ..Default::default()
    };

    let records = decode_transport_layer_cc(&pkt);
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.recv_time_ms.is_none()));
}
