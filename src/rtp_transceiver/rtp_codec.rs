use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rtp_transceiver::{PayloadType, RTCPFeedback};

/// MIME_TYPE_H264 H264 MIME type.
/// Note: Matching should be case insensitive.
pub const MIME_TYPE_H264: &str = "video/H264";
/// MIME_TYPE_OPUS Opus MIME type
pub const MIME_TYPE_OPUS: &str = "audio/opus";
/// MIME_TYPE_VP8 VP8 MIME type
pub const MIME_TYPE_VP8: &str = "video/VP8";
/// MIME_TYPE_VP9 VP9 MIME type
pub const MIME_TYPE_VP9: &str = "video/VP9";
/// MIME_TYPE_AV1 AV1 MIME type
pub const MIME_TYPE_AV1: &str = "video/AV1";
/// MIME_TYPE_G722 G722 MIME type
pub const MIME_TYPE_G722: &str = "audio/G722";
/// MIME_TYPE_PCMU PCMU MIME type
pub const MIME_TYPE_PCMU: &str = "audio/PCMU";
/// MIME_TYPE_PCMA PCMA MIME type
pub const MIME_TYPE_PCMA: &str = "audio/PCMA";

/// RTPCodecType determines the type of a codec.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RTPCodecType {
    #[default]
    Unspecified = 0,

    /// Audio indicates this is an audio codec.
    Audio = 1,

    /// Video indicates this is a video codec.
    Video = 2,
}

impl fmt::Display for RTPCodecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTPCodecType::Audio => "audio",
            RTPCodecType::Video => "video",
            RTPCodecType::Unspecified => crate::UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

impl From<&str> for RTPCodecType {
    fn from(raw: &str) -> Self {
        match raw {
            "audio" => RTPCodecType::Audio,
            "video" => RTPCodecType::Video,
            _ => RTPCodecType::Unspecified,
        }
    }
}

/// RTCRtpCodecCapability provides information about codec capabilities.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct RTCRtpCodecCapability {
    pub mime_type: String,
    pub clock_rate: u32,
    pub channels: u16,
    pub sdp_fmtp_line: String,
    pub rtcp_feedback: Vec<RTCPFeedback>,
}

impl RTCRtpCodecCapability {
    /// is_rtx indicates whether this is the RTX (retransmission) codec.
    pub(crate) fn is_rtx(&self) -> bool {
        self.mime_type.to_uppercase() == "VIDEO/RTX"
    }
}

/// RTCRtpHeaderExtensionCapability is used to define a RFC5285 RTP header
/// extension supported by the codec.
#[derive(Default, Debug, Clone)]
pub struct RTCRtpHeaderExtensionCapability {
    pub uri: String,
}

/// RTCRtpHeaderExtensionParameters represents a negotiated RFC5285 RTP header
/// extension, carrying its negotiated (one-byte or two-byte) identifier.
#[derive(Default, Debug, Clone)]
pub struct RTCRtpHeaderExtensionParameters {
    pub uri: String,
    pub id: isize,
}

/// RTCRtpCodecParameters is a sequence containing the media codecs that an
/// RTCRtpSender will choose from, as well as entries for RTX, RED and FEC
/// mechanisms. This also includes the PayloadType that has been negotiated.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct RTCRtpCodecParameters {
    pub capability: RTCRtpCodecCapability,
    pub payload_type: PayloadType,
    pub stats_id: String,
}

/// RTCRtpParameters is a list of negotiated codecs and header extensions.
#[derive(Default, Debug, Clone)]
pub struct RTCRtpParameters {
    pub header_extensions: Vec<RTCRtpHeaderExtensionParameters>,
    pub codecs: Vec<RTCRtpCodecParameters>,
}

/// CodecMatch indicates whether a local codec matches a remote codec, and if
/// so how exactly.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CodecMatch {
    /// None indicates that the codecs don't match.
    None,

    /// Partial indicates that the codecs match except for fmtp parameters
    /// ("partial match" per the W3C WebRTC spec's codec matching algorithm).
    Partial,

    /// Exact indicates a codec and fmtp match.
    Exact,
}

/// codec_parameters_fuzzy_search searches a list of codecs for one that
/// matches `needle`, preferring an exact (mime type + clock rate + channels +
/// fmtp line) match over a partial one (mime type + clock rate + channels
/// only), mirroring the codec matching algorithm of RFC 8839 / WebRTC-PC's
/// `[[SetCodecPreferences]]`.
pub(crate) fn codec_parameters_fuzzy_search(
    needle: &RTCRtpCodecParameters,
    haystack: &[RTCRtpCodecParameters],
) -> (RTCRtpCodecParameters, CodecMatch) {
    let needle_fmtp = codec_parameters_fmtp(needle);

    // First attempt an exact match (mime type + sdp_fmtp_line)
    for candidate in haystack {
        let candidate_fmtp = codec_parameters_fmtp(candidate);
        if needle_fmtp.mime_type.to_uppercase() == candidate_fmtp.mime_type.to_uppercase()
            && needle_fmtp.fmtp == candidate_fmtp.fmtp
        {
            return (candidate.clone(), CodecMatch::Exact);
        }
    }

    // Fallback to partial match (mime type only)
    for candidate in haystack {
        let candidate_fmtp = codec_parameters_fmtp(candidate);
        if needle_fmtp.mime_type.to_uppercase() == candidate_fmtp.mime_type.to_uppercase() {
            return (candidate.clone(), CodecMatch::Partial);
        }
    }

    (RTCRtpCodecParameters::default(), CodecMatch::None)
}

struct FuzzySearchParams {
    mime_type: String,
    fmtp: String,
}

fn codec_parameters_fmtp(codec: &RTCRtpCodecParameters) -> FuzzySearchParams {
    FuzzySearchParams {
        mime_type: codec.capability.mime_type.clone(),
        fmtp: codec.capability.sdp_fmtp_line.clone(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn codec(mime_type: &str, fmtp: &str) -> RTCRtpCodecParameters {
        RTCRtpCodecParameters {
            capability: RTCRtpCodecCapability {
                mime_type: mime_type.to_owned(),
                sdp_fmtp_line: fmtp.to_owned(),
                ..Default::default()
            },
            payload_type: 96,
            ..Default::default()
        }
    }

    #[test]
    fn test_codec_parameters_fuzzy_search_exact() {
        let haystack = vec![codec(MIME_TYPE_VP8, "max-fr=30")];
        let (found, match_type) =
            codec_parameters_fuzzy_search(&codec(MIME_TYPE_VP8, "max-fr=30"), &haystack);
        assert_eq!(match_type, CodecMatch::Exact);
        assert_eq!(found.capability.mime_type, MIME_TYPE_VP8);
    }

    #[test]
    fn test_codec_parameters_fuzzy_search_partial() {
        let haystack = vec![codec(MIME_TYPE_VP8, "max-fr=30")];
        let (_, match_type) =
            codec_parameters_fuzzy_search(&codec(MIME_TYPE_VP8, "max-fr=15"), &haystack);
        assert_eq!(match_type, CodecMatch::Partial);
    }

    #[test]
    fn test_codec_parameters_fuzzy_search_none() {
        let haystack = vec![codec(MIME_TYPE_VP8, "max-fr=30")];
        let (_, match_type) = codec_parameters_fuzzy_search(&codec(MIME_TYPE_OPUS, ""), &haystack);
        assert_eq!(match_type, CodecMatch::None);
    }

    #[test]
    fn test_rtp_codec_type_string() {
        assert_eq!(RTPCodecType::Audio.to_string(), "audio");
        assert_eq!(RTPCodecType::Video.to_string(), "video");
        assert_eq!(RTPCodecType::Unspecified.to_string(), crate::UNSPECIFIED_STR);
    }
}
