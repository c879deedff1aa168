pub mod sctp_transport_capabilities;
pub mod sctp_transport_state;

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::data_channel::data_channel_state::RTCDataChannelState;
use crate::data_channel::RTCDataChannel;
use crate::dtls_transport::dtls_role::DTLSRole;
use crate::dtls_transport::dtls_transport_state::RTCDtlsTransportState;
use crate::dtls_transport::RTCDtlsTransport;
use crate::error::{Error, Result};
use crate::peer_connection::OnDataChannelHdlrFn;
use crate::sctp_transport::sctp_transport_capabilities::SCTPTransportCapabilities;
use crate::sctp_transport::sctp_transport_state::RTCSctpTransportState;
use crate::stats::stats_collector::StatsCollector;
use crate::stats::{DataChannelStats, PeerConnectionStats, StatsReportType};

const SCTP_MAX_CHANNELS: u16 = u16::MAX;

/// RTCSctpTransport provides details about the SCTP transport.
///
/// A full stack negotiates a real SCTP association over the DTLS transport
/// here and demultiplexes DataChannel streams off of it. This crate treats
/// that association as an external collaborator (see `SPEC_FULL.md`):
/// [`RTCSctpTransport`] only tracks the state, IDs and handlers a
/// [`RTCDataChannel`] needs, while the bytes themselves move through
/// `send`/`on_message` on an in-memory stand-in.
#[derive(Default)]
pub struct RTCSctpTransport {
    pub(crate) dtls_transport: Arc<RTCDtlsTransport>,

    state: AtomicU8,
    is_started: AtomicBool,
    max_message_size: AtomicU32,
    max_channels: u16,

    pub(crate) data_channels: Mutex<Vec<Arc<RTCDataChannel>>>,
    pub(crate) data_channels_opened: AtomicU32,
    pub(crate) data_channels_requested: AtomicU32,
    data_channels_accepted: AtomicU32,

    on_data_channel_handler: Mutex<Option<OnDataChannelHdlrFn>>,
}

impl RTCSctpTransport {
    pub(crate) fn new(dtls_transport: Arc<RTCDtlsTransport>) -> Self {
        RTCSctpTransport {
            dtls_transport,
            state: AtomicU8::new(RTCSctpTransportState::Connecting as u8),
            is_started: AtomicBool::new(false),
            max_message_size: AtomicU32::new(Self::calc_message_size(65536, 65536) as u32),
            max_channels: SCTP_MAX_CHANNELS,
            data_channels: Mutex::new(vec![]),
            data_channels_opened: AtomicU32::new(0),
            data_channels_requested: AtomicU32::new(0),
            data_channels_accepted: AtomicU32::new(0),
            on_data_channel_handler: Mutex::new(None),
        }
    }

    /// transport returns the DTLS transport this SCTP association rides on.
    pub fn transport(&self) -> Arc<RTCDtlsTransport> {
        Arc::clone(&self.dtls_transport)
    }

    /// get_capabilities returns the SCTPCapabilities of the SCTPTransport.
    pub fn get_capabilities(&self) -> SCTPTransportCapabilities {
        SCTPTransportCapabilities {
            max_message_size: self.max_message_size.load(Ordering::SeqCst),
        }
    }

    /// start the SCTPTransport. Both peers create an RTCSctpTransport and
    /// SCTP SO (Simultaneous Open) establishes the association; since that
    /// association isn't implemented here, start just marks the transport
    /// connected once the DTLS transport it rides on is up.
    pub(crate) async fn start(&self, remote_caps: SCTPTransportCapabilities) -> Result<()> {
        if self.is_started.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.max_message_size.store(
            Self::calc_message_size(
                remote_caps.max_message_size as usize,
                self.max_message_size.load(Ordering::SeqCst) as usize,
            ) as u32,
            Ordering::SeqCst,
        );

        if self.dtls_transport.state() == RTCDtlsTransportState::Failed
            || self.dtls_transport.state() == RTCDtlsTransportState::Closed
        {
            return Err(Error::ErrSCTPTransportDTLS);
        }

        self.state
            .store(RTCSctpTransportState::Connected as u8, Ordering::SeqCst);

        Ok(())
    }

    /// stop stops the SCTPTransport
    pub async fn stop(&self) -> Result<()> {
        self.state
            .store(RTCSctpTransportState::Closed as u8, Ordering::SeqCst);
        Ok(())
    }

    fn calc_message_size(remote_max_message_size: usize, can_send_size: usize) -> usize {
        if remote_max_message_size == 0 && can_send_size == 0 {
            usize::MAX
        } else if remote_max_message_size == 0 {
            can_send_size
        } else if can_send_size == 0 || can_send_size > remote_max_message_size {
            remote_max_message_size
        } else {
            can_send_size
        }
    }

    /// max_channels is the maximum number of RTCDataChannels that can be
    /// open simultaneously.
    pub fn max_channels(&self) -> u16 {
        if self.max_channels == 0 {
            SCTP_MAX_CHANNELS
        } else {
            self.max_channels
        }
    }

    /// state returns the current state of the SCTPTransport.
    pub fn state(&self) -> RTCSctpTransportState {
        RTCSctpTransportState::from(self.state.load(Ordering::SeqCst))
    }

    /// on_data_channel sets an event handler which is invoked when a data
    /// channel message arrives from a remote peer.
    pub async fn on_data_channel(&self, f: OnDataChannelHdlrFn) {
        let mut handler = self.on_data_channel_handler.lock().await;
        *handler = Some(f);
    }

    /// dtls_role returns the DTLS role the data channel ID allocation is
    /// keyed off of; it is the same role negotiated for the DTLS transport
    /// this SCTP association would ride on.
    pub(crate) async fn dtls_role(&self) -> DTLSRole {
        self.dtls_transport.role().await
    }

    pub(crate) async fn generate_and_set_data_channel_id(&self, dtls_role: DTLSRole) -> Result<u16> {
        let mut id = 0u16;
        if dtls_role != DTLSRole::Client {
            id += 1;
        }

        let ids_in_use: HashSet<u16> = {
            let data_channels = self.data_channels.lock().await;
            data_channels.iter().map(|dc| dc.id()).collect()
        };

        let max = self.max_channels();
        while id < max - 1 {
            if ids_in_use.contains(&id) {
                id += 2;
            } else {
                return Ok(id);
            }
        }

        Err(Error::ErrMaxDataChannelID)
    }

    pub(crate) fn data_channels_accepted(&self) -> u32 {
        self.data_channels_accepted.load(Ordering::SeqCst)
    }

    pub(crate) fn data_channels_opened(&self) -> u32 {
        self.data_channels_opened.load(Ordering::SeqCst)
    }

    pub(crate) fn data_channels_requested(&self) -> u32 {
        self.data_channels_requested.load(Ordering::SeqCst)
    }

    pub(crate) async fn collect_stats(&self, collector: &StatsCollector, stats_id: String) {
        let mut data_channels_closed = 0;
        {
            let data_channels = self.data_channels.lock().await;
            for data_channel in &*data_channels {
                match data_channel.ready_state() {
                    RTCDataChannelState::Connecting | RTCDataChannelState::Open => (),
                    _ => data_channels_closed += 1,
                }
                collector.insert(
                    data_channel.get_stats_id().to_owned(),
                    StatsReportType::DataChannel(DataChannelStats::from(data_channel.as_ref())),
                );
            }
        }

        let peer_connection_stats =
            PeerConnectionStats::new(self, stats_id.clone(), data_channels_closed);
        collector.insert(stats_id, StatsReportType::PeerConnection(peer_connection_stats));
    }
}
