/// MatchFunc decides whether a demultiplexed datagram belongs to this
/// endpoint. Tried in registration order by `Mux::dispatch`.
pub type MatchFunc = Box<dyn Fn(&[u8]) -> bool + Send + Sync>;

/// RFC 5764 §5.1.2 packet demultiplexing off the single 5-tuple the ICE
/// agent hands back: STUN is byte 0 in 0-3, DTLS content types are 20-63,
/// SRTP/SRTCP is 128-191. STUN never reaches this mux (the ICE agent keeps
/// it), so match_dtls is used as the fallback matcher.
pub fn match_dtls(b: &[u8]) -> bool {
    !b.is_empty() && (20..=63).contains(&b[0])
}

/// match_srtcp distinguishes SRTCP from SRTP within the 128-191 range by
/// the RTCP payload-type convention (200-204 for the common types).
pub fn match_srtcp(b: &[u8]) -> bool {
    b.len() > 1 && (128..=191).contains(&b[0]) && (192..=223).contains(&b[1])
}

pub fn match_srtp(b: &[u8]) -> bool {
    !b.is_empty() && (128..=191).contains(&b[0]) && !match_srtcp(b)
}

#[allow(dead_code)]
pub fn match_all(_b: &[u8]) -> bool {
    true
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_match_funcs() {
        assert!(match_dtls(&[20]));
        assert!(match_dtls(&[63]));
        assert!(!match_dtls(&[19]));
        assert!(!match_dtls(&[64]));

        assert!(match_srtp(&[128, 0]));
        assert!(!match_srtp(&[128, 200]));
        assert!(match_srtcp(&[128, 200]));
        assert!(!match_srtcp(&[128, 0]));
    }
}
