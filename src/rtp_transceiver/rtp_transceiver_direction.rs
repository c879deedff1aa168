use std::fmt;

/// RTCRtpTransceiverDirection indicates the direction of the RTPTransceiver.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RTCRtpTransceiverDirection {
    #[default]
    Unspecified,

    /// Sendrecv indicates that the RTCRtpTransceiver's RTCRtpSender will offer
    /// to send RTP and RTCRtpReceiver will offer to receive RTP.
    Sendrecv,

    /// Sendonly indicates that the RTCRtpTransceiver's RTCRtpSender will offer
    /// to send RTP and RTCRtpReceiver will not offer to receive RTP.
    Sendonly,

    /// Recvonly indicates that the RTCRtpTransceiver's RTCRtpSender will not
    /// offer to send RTP and RTCRtpReceiver will offer to receive RTP.
    Recvonly,

    /// Inactive indicates that the RTCRtpTransceiver's RTCRtpSender will not
    /// offer to send RTP and RTCRtpReceiver will not offer to receive RTP.
    Inactive,
}

const RTP_TRANSCEIVER_DIRECTION_SENDRECV_STR: &str = "sendrecv";
const RTP_TRANSCEIVER_DIRECTION_SENDONLY_STR: &str = "sendonly";
const RTP_TRANSCEIVER_DIRECTION_RECVONLY_STR: &str = "recvonly";
const RTP_TRANSCEIVER_DIRECTION_INACTIVE_STR: &str = "inactive";

impl From<&str> for RTCRtpTransceiverDirection {
    fn from(raw: &str) -> Self {
        match raw {
            RTP_TRANSCEIVER_DIRECTION_SENDRECV_STR => RTCRtpTransceiverDirection::Sendrecv,
            RTP_TRANSCEIVER_DIRECTION_SENDONLY_STR => RTCRtpTransceiverDirection::Sendonly,
            RTP_TRANSCEIVER_DIRECTION_RECVONLY_STR => RTCRtpTransceiverDirection::Recvonly,
            RTP_TRANSCEIVER_DIRECTION_INACTIVE_STR => RTCRtpTransceiverDirection::Inactive,
            _ => RTCRtpTransceiverDirection::Unspecified,
        }
    }
}

impl fmt::Display for RTCRtpTransceiverDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCRtpTransceiverDirection::Sendrecv => RTP_TRANSCEIVER_DIRECTION_SENDRECV_STR,
            RTCRtpTransceiverDirection::Sendonly => RTP_TRANSCEIVER_DIRECTION_SENDONLY_STR,
            RTCRtpTransceiverDirection::Recvonly => RTP_TRANSCEIVER_DIRECTION_RECVONLY_STR,
            RTCRtpTransceiverDirection::Inactive => RTP_TRANSCEIVER_DIRECTION_INACTIVE_STR,
            RTCRtpTransceiverDirection::Unspecified => crate::UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

impl RTCRtpTransceiverDirection {
    /// reverse indicates the opposite direction from the perspective of the
    /// remote side of a transceiver, used when generating answers.
    pub(crate) fn reverse(&self) -> Self {
        match *self {
            RTCRtpTransceiverDirection::Sendonly => RTCRtpTransceiverDirection::Recvonly,
            RTCRtpTransceiverDirection::Recvonly => RTCRtpTransceiverDirection::Sendonly,
            direction => direction,
        }
    }

    pub(crate) fn intersect(&self, other: Self) -> Self {
        use RTCRtpTransceiverDirection::*;
        let can_send = matches!(self, Sendrecv | Sendonly) && matches!(other, Sendrecv | Sendonly);
        let can_recv = matches!(self, Sendrecv | Recvonly) && matches!(other, Sendrecv | Recvonly);
        match (can_send, can_recv) {
            (true, true) => Sendrecv,
            (true, false) => Sendonly,
            (false, true) => Recvonly,
            (false, false) => Inactive,
        }
    }
}
