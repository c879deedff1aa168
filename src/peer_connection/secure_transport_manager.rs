#[cfg(test)]
mod secure_transport_manager_test;

use crate::dtls_transport::dtls_transport_state::RTCDtlsTransportState;
use crate::ice_transport::ice_connection_state::RTCIceConnectionState;
use crate::ice_transport::ice_gathering_state::RTCIceGatheringState;
use crate::peer_connection::peer_connection_state::RTCPeerConnectionState;

/// One per-m-line (or, under `bundle_policy != disable`, the single bundled)
/// transport's gathering/ICE/DTLS state, as tracked by its owning
/// `RTCIceTransport`/`RTCDtlsTransport` pair.
#[derive(Debug, Clone, Copy)]
pub struct TransportState {
    pub ice_gathering: RTCIceGatheringState,
    pub ice_connection: RTCIceConnectionState,
    pub dtls: RTCDtlsTransportState,
}

/// Reduces the gathering/ICE/DTLS state of every transport a peer connection
/// owns (one per m-line when `bundle_policy = disable`, otherwise the single
/// bundled transport) into the three aggregate states the application reads:
/// `ice_gathering_state`, `ice_connection_state`, and `connection_state`, per
/// spec.md §4.8's W3C tables.
#[derive(Default)]
pub struct SecureTransportManager;

impl SecureTransportManager {
    /// `complete` if every transport finished gathering, else `gathering` if
    /// any transport is still gathering, else `new`.
    pub fn ice_gathering_state(transports: &[TransportState]) -> RTCIceGatheringState {
        if transports.is_empty() {
            return RTCIceGatheringState::New;
        }
        if transports
            .iter()
            .all(|t| t.ice_gathering == RTCIceGatheringState::Complete)
        {
            RTCIceGatheringState::Complete
        } else if transports
            .iter()
            .any(|t| t.ice_gathering == RTCIceGatheringState::Gathering)
        {
            RTCIceGatheringState::Gathering
        } else {
            RTCIceGatheringState::New
        }
    }

    /// W3C `RTCIceTransport` aggregation table.
    pub fn ice_connection_state(transports: &[TransportState]) -> RTCIceConnectionState {
        let ice_states: Vec<RTCIceConnectionState> =
            transports.iter().map(|t| t.ice_connection).collect();

        if ice_states.is_empty() {
            return RTCIceConnectionState::New;
        }
        if ice_states.iter().any(|s| *s == RTCIceConnectionState::Failed) {
            RTCIceConnectionState::Failed
        } else if ice_states
            .iter()
            .any(|s| *s == RTCIceConnectionState::Disconnected)
        {
            RTCIceConnectionState::Disconnected
        } else if ice_states
            .iter()
            .all(|s| matches!(s, RTCIceConnectionState::New | RTCIceConnectionState::Closed))
        {
            RTCIceConnectionState::New
        } else if ice_states
            .iter()
            .any(|s| matches!(s, RTCIceConnectionState::New | RTCIceConnectionState::Checking))
        {
            RTCIceConnectionState::Checking
        } else if ice_states.iter().all(|s| {
            matches!(
                s,
                RTCIceConnectionState::Completed | RTCIceConnectionState::Closed
            )
        }) {
            RTCIceConnectionState::Completed
        } else if ice_states.iter().all(|s| {
            matches!(
                s,
                RTCIceConnectionState::Connected
                    | RTCIceConnectionState::Completed
                    | RTCIceConnectionState::Closed
            )
        }) {
            RTCIceConnectionState::Connected
        } else {
            RTCIceConnectionState::New
        }
    }

    /// W3C `RTCPeerConnection.connectionState` aggregation table.
    pub fn connection_state(
        transports: &[TransportState],
        is_closed: bool,
    ) -> RTCPeerConnectionState {
        if is_closed {
            return RTCPeerConnectionState::Closed;
        }
        if transports.is_empty() {
            return RTCPeerConnectionState::New;
        }

        let any_failed = transports.iter().any(|t| {
            t.ice_connection == RTCIceConnectionState::Failed
                || t.dtls == RTCDtlsTransportState::Failed
        });
        let any_disconnected = transports
            .iter()
            .any(|t| t.ice_connection == RTCIceConnectionState::Disconnected);
        let any_connected = transports.iter().any(|t| {
            matches!(
                t.ice_connection,
                RTCIceConnectionState::Connected | RTCIceConnectionState::Completed
            ) && t.dtls == RTCDtlsTransportState::Connected
        });
        let any_connecting = transports.iter().any(|t| {
            matches!(
                t.ice_connection,
                RTCIceConnectionState::Checking | RTCIceConnectionState::New
            ) && t.dtls == RTCDtlsTransportState::Connecting
        });
        let all_closed = transports
            .iter()
            .all(|t| t.dtls == RTCDtlsTransportState::Closed);

        if any_failed {
            RTCPeerConnectionState::Failed
        } else if any_disconnected {
            RTCPeerConnectionState::Disconnected
        } else if any_connected {
            RTCPeerConnectionState::Connected
        } else if any_connecting {
            RTCPeerConnectionState::Connecting
        } else if all_closed {
            RTCPeerConnectionState::Closed
        } else {
            RTCPeerConnectionState::New
        }
    }
}
