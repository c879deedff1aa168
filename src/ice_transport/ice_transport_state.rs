use std::fmt;

use ice::state::ConnectionState;

/// RTCIceTransportState represents the current state of the ICE transport.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum RTCIceTransportState {
    #[default]
    Unspecified,

    /// New indicates that any of the ICETransports are in the "new" state
    /// and none of them are in the "checking", "disconnected" or "failed"
    /// state, or all RTCIceTransports are in the "closed" state.
    New,

    /// Checking indicates that any of the ICETransports are in the
    /// "checking" state and none of them are in the "disconnected" or
    /// "failed" state.
    Checking,

    /// Connected indicates that all RTCIceTransports are in the "connected",
    /// "completed" or "closed" state and at least one of them is in the
    /// "connected" state.
    Connected,

    /// Completed indicates that all RTCIceTransports are in the "completed"
    /// or "closed" state and at least one of them is in the "completed"
    /// state.
    Completed,

    /// Disconnected indicates that any of the ICETransports are in the
    /// "disconnected" state and none of them are in the "failed" state.
    Disconnected,

    /// Failed indicates that any of the ICETransports are in the "failed"
    /// state.
    Failed,

    /// Closed indicates that the RTCPeerConnection's isClosed is true.
    Closed,
}

const ICE_TRANSPORT_STATE_NEW_STR: &str = "new";
const ICE_TRANSPORT_STATE_CHECKING_STR: &str = "checking";
const ICE_TRANSPORT_STATE_CONNECTED_STR: &str = "connected";
const ICE_TRANSPORT_STATE_COMPLETED_STR: &str = "completed";
const ICE_TRANSPORT_STATE_DISCONNECTED_STR: &str = "disconnected";
const ICE_TRANSPORT_STATE_FAILED_STR: &str = "failed";
const ICE_TRANSPORT_STATE_CLOSED_STR: &str = "closed";

impl From<&str> for RTCIceTransportState {
    fn from(raw: &str) -> Self {
        match raw {
            ICE_TRANSPORT_STATE_NEW_STR => RTCIceTransportState::New,
            ICE_TRANSPORT_STATE_CHECKING_STR => RTCIceTransportState::Checking,
            ICE_TRANSPORT_STATE_CONNECTED_STR => RTCIceTransportState::Connected,
            ICE_TRANSPORT_STATE_COMPLETED_STR => RTCIceTransportState::Completed,
            ICE_TRANSPORT_STATE_DISCONNECTED_STR => RTCIceTransportState::Disconnected,
            ICE_TRANSPORT_STATE_FAILED_STR => RTCIceTransportState::Failed,
            ICE_TRANSPORT_STATE_CLOSED_STR => RTCIceTransportState::Closed,
            _ => RTCIceTransportState::Unspecified,
        }
    }
}

impl From<u8> for RTCIceTransportState {
    fn from(v: u8) -> Self {
        match v {
            1 => RTCIceTransportState::New,
            2 => RTCIceTransportState::Checking,
            3 => RTCIceTransportState::Connected,
            4 => RTCIceTransportState::Completed,
            5 => RTCIceTransportState::Disconnected,
            6 => RTCIceTransportState::Failed,
            7 => RTCIceTransportState::Closed,
            _ => RTCIceTransportState::Unspecified,
        }
    }
}

impl From<ConnectionState> for RTCIceTransportState {
    fn from(cs: ConnectionState) -> Self {
        match cs {
            ConnectionState::New => RTCIceTransportState::New,
            ConnectionState::Checking => RTCIceTransportState::Checking,
            ConnectionState::Connected => RTCIceTransportState::Connected,
            ConnectionState::Completed => RTCIceTransportState::Completed,
            ConnectionState::Disconnected => RTCIceTransportState::Disconnected,
            ConnectionState::Failed => RTCIceTransportState::Failed,
            ConnectionState::Closed => RTCIceTransportState::Closed,
            _ => RTCIceTransportState::Unspecified,
        }
    }
}

impl fmt::Display for RTCIceTransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCIceTransportState::New => ICE_TRANSPORT_STATE_NEW_STR,
            RTCIceTransportState::Checking => ICE_TRANSPORT_STATE_CHECKING_STR,
            RTCIceTransportState::Connected => ICE_TRANSPORT_STATE_CONNECTED_STR,
            RTCIceTransportState::Completed => ICE_TRANSPORT_STATE_COMPLETED_STR,
            RTCIceTransportState::Disconnected => ICE_TRANSPORT_STATE_DISCONNECTED_STR,
            RTCIceTransportState::Failed => ICE_TRANSPORT_STATE_FAILED_STR,
            RTCIceTransportState::Closed => ICE_TRANSPORT_STATE_CLOSED_STR,
            RTCIceTransportState::Unspecified => crate::UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}
