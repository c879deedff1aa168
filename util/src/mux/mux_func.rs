/// A `MatchFunc` decides whether a datagram belongs to one demuxed class.
/// Tried in registration order by `Mux::dispatch`.
pub type MatchFunc = Box<dyn Fn(&[u8]) -> bool + Send + Sync>;

/// RFC 5764 §5.1.2 packet demultiplexing, byte 0: STUN is 0-3, DTLS records
/// are TLS content types 20-63, SRTP/SRTCP is 128-191. spec.md §4.3 folds
/// the 0-3 STUN range out (it is consumed before the mux ever sees it) and
/// treats anything outside 20-63/128-191 as a DTLS fallback.
pub fn match_dtls(b: &[u8]) -> bool {
    !b.is_empty() && (20..=63).contains(&b[0])
}

pub fn match_srtp(b: &[u8]) -> bool {
    !b.is_empty() && (128..=191).contains(&b[0])
}

pub fn match_stun(b: &[u8]) -> bool {
    !b.is_empty() && (0..=3).contains(&b[0])
}

/// match_srtcp distinguishes an SRTCP packet from SRTP within the 128-191
/// range by RTCP payload-type convention (200-204 are standard RTCP types).
pub fn match_srtcp(b: &[u8]) -> bool {
    b.len() > 1 && (128..=191).contains(&b[0]) && (192..=223).contains(&b[1])
}
