//! DataChannel represents a WebRTC DataChannel, a bidirectional peer-to-peer
//! channel for arbitrary application data alongside the media tracks.
//!
//! The SCTP association that actually carries data-channel bytes on the wire
//! lives outside this crate's scope (see `SPEC_FULL.md`); [`RTCDataChannel`]
//! and [`crate::sctp_transport::RTCSctpTransport`] track state, IDs and
//! handlers the way the real stack does, while `open`/`send` operate against
//! an in-memory stand-in for the SCTP stream.

pub mod data_channel_init;
pub mod data_channel_parameters;
pub mod data_channel_state;

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use tokio::sync::Mutex;

use crate::api::setting_engine::SettingEngine;
use crate::data_channel::data_channel_parameters::DataChannelParameters;
use crate::data_channel::data_channel_state::RTCDataChannelState;
use crate::error::{Error, Result};
use crate::sctp_transport::RTCSctpTransport;

pub type OnErrorHdlrFn =
    Box<dyn (FnMut(Error) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>) + Send + Sync>;

pub type OnMessageHdlrFn = Box<
    dyn (FnMut(DataChannelMessage) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>)
        + Send
        + Sync,
>;

pub type OnOpenHdlrFn =
    Box<dyn (FnOnce() -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>) + Send + Sync>;

pub type OnCloseHdlrFn =
    Box<dyn (FnMut() -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>) + Send + Sync>;

/// A message received over a data channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChannelMessage {
    pub is_string: bool,
    pub data: Bytes,
}

/// Bookkeeping that stands in for the real SCTP stream once a data channel
/// has been opened. Tracks the counters `DataChannelStats` needs without
/// touching the network.
#[derive(Debug, Default)]
pub(crate) struct DataChannelAssociation {
    bytes_sent: std::sync::atomic::AtomicUsize,
    bytes_received: std::sync::atomic::AtomicUsize,
    messages_sent: std::sync::atomic::AtomicUsize,
    messages_received: std::sync::atomic::AtomicUsize,
}

impl DataChannelAssociation {
    pub(crate) fn bytes_sent(&self) -> usize {
        self.bytes_sent.load(Ordering::SeqCst)
    }

    pub(crate) fn bytes_received(&self) -> usize {
        self.bytes_received.load(Ordering::SeqCst)
    }

    pub(crate) fn messages_sent(&self) -> usize {
        self.messages_sent.load(Ordering::SeqCst)
    }

    pub(crate) fn messages_received(&self) -> usize {
        self.messages_received.load(Ordering::SeqCst)
    }

    fn record_sent(&self, n: usize) {
        self.bytes_sent.fetch_add(n, Ordering::SeqCst);
        self.messages_sent.fetch_add(1, Ordering::SeqCst);
    }
}

/// DataChannel represents a WebRTC DataChannel. The DataChannel interface
/// represents a network channel which can be used for bidirectional
/// peer-to-peer transfers of arbitrary data.
pub struct RTCDataChannel {
    pub(crate) stats_id: String,
    pub(crate) label: String,
    ordered: bool,
    pub(crate) max_packet_lifetime: u16,
    pub(crate) max_retransmits: u16,
    pub(crate) protocol: String,
    negotiated: bool,
    id: AtomicU16,
    ready_state: Arc<AtomicU8>, // RTCDataChannelState
    detach_called: Arc<AtomicBool>,

    on_message_handler: Arc<Mutex<Option<OnMessageHdlrFn>>>,
    on_open_handler: Arc<Mutex<Option<OnOpenHdlrFn>>>,
    on_close_handler: Arc<Mutex<Option<OnCloseHdlrFn>>>,
    on_error_handler: Arc<Mutex<Option<OnErrorHdlrFn>>>,

    pub(crate) data_channel: Mutex<Option<Arc<DataChannelAssociation>>>,

    setting_engine: Arc<SettingEngine>,
}

impl RTCDataChannel {
    /// create the DataChannel object before the networking is set up.
    pub(crate) fn new(params: DataChannelParameters, setting_engine: Arc<SettingEngine>) -> Self {
        RTCDataChannel {
            stats_id: format!(
                "DataChannel-{}",
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map_or(0, |d| d.as_nanos())
            ),
            label: params.label,
            protocol: params.protocol,
            negotiated: params.negotiated,
            id: AtomicU16::new(params.id),
            ordered: params.ordered,
            max_packet_lifetime: params.max_packet_life_time,
            max_retransmits: params.max_retransmits,
            ready_state: Arc::new(AtomicU8::new(RTCDataChannelState::Connecting as u8)),
            detach_called: Arc::new(AtomicBool::new(false)),
            on_message_handler: Arc::new(Mutex::new(None)),
            on_open_handler: Arc::new(Mutex::new(None)),
            on_close_handler: Arc::new(Mutex::new(None)),
            on_error_handler: Arc::new(Mutex::new(None)),
            data_channel: Mutex::new(None),
            setting_engine,
        }
    }

    /// open opens the data channel over the sctp transport. Since this crate
    /// does not implement the SCTP wire protocol, open allocates an id (if
    /// one was not already negotiated) and fabricates the association
    /// bookkeeping `handle_open` needs instead of dialing a real stream.
    pub(crate) async fn open(&self, sctp_transport: Arc<RTCSctpTransport>) -> Result<()> {
        {
            let mut dc = self.data_channel.lock().await;
            if dc.is_some() {
                return Ok(());
            }
            *dc = Some(Arc::new(DataChannelAssociation::default()));
        }

        if self.id.load(Ordering::SeqCst) == 0 && !self.negotiated {
            let role = sctp_transport.dtls_role().await;
            let id = sctp_transport
                .generate_and_set_data_channel_id(role)
                .await?;
            self.id.store(id, Ordering::SeqCst);
        }

        self.handle_open().await;

        Ok(())
    }

    /// After onOpen is complete check that the user called detach
    /// and provide an error message if the call was missed
    fn check_detach_after_open(&self) {
        if self.setting_engine.detach.data_channels && !self.detach_called.load(Ordering::SeqCst) {
            log::warn!(
                "webrtc.DetachDataChannels() enabled but didn't Detach, call Detach from OnOpen"
            );
        }
    }

    /// on_open sets an event handler which is invoked when
    /// the underlying data transport has been established (or re-established).
    pub async fn on_open(&self, f: OnOpenHdlrFn) {
        if self.ready_state() == RTCDataChannelState::Open {
            f().await;
            self.check_detach_after_open();
        } else {
            let mut handler = self.on_open_handler.lock().await;
            *handler = Some(f);
        }
    }

    /// on_close sets an event handler which is invoked when
    /// the underlying data transport has been closed.
    pub async fn on_close(&self, f: OnCloseHdlrFn) {
        let mut handler = self.on_close_handler.lock().await;
        *handler = Some(f);
    }

    /// on_message sets an event handler which is invoked on a message
    /// arrival over the data channel from a remote peer.
    pub async fn on_message(&self, f: OnMessageHdlrFn) {
        let mut handler = self.on_message_handler.lock().await;
        *handler = Some(f);
    }

    /// on_error sets an event handler which is invoked when
    /// the underlying data transport cannot be read.
    pub async fn on_error(&self, f: OnErrorHdlrFn) {
        let mut handler = self.on_error_handler.lock().await;
        *handler = Some(f);
    }

    pub(crate) async fn handle_open(&self) {
        self.set_ready_state(RTCDataChannelState::Open);

        let mut handler = self.on_open_handler.lock().await;
        if let Some(f) = handler.take() {
            f().await;
            self.check_detach_after_open();
        }
    }

    /// send sends the binary message to the DataChannel peer
    pub async fn send(&self, data: &Bytes) -> Result<usize> {
        self.ensure_open()?;

        let dc = self.data_channel.lock().await;
        if let Some(dc) = &*dc {
            dc.record_sent(data.len());
            Ok(data.len())
        } else {
            Err(Error::ErrDataChannelNotOpen)
        }
    }

    /// send_text sends the text message to the DataChannel peer
    pub async fn send_text(&self, s: String) -> Result<usize> {
        self.send(&Bytes::from(s)).await
    }

    fn ensure_open(&self) -> Result<()> {
        if self.ready_state() != RTCDataChannelState::Open {
            Err(Error::ErrDataChannelNotOpen)
        } else {
            Ok(())
        }
    }

    /// detach allows you to detach the underlying datachannel. This provides
    /// an idiomatic API to work with, however it disables the on_message
    /// callback. Before calling detach you have to enable this behavior by
    /// calling `SettingEngine::detach_data_channels`.
    pub async fn detach(&self) -> Result<()> {
        if !self.setting_engine.detach.data_channels {
            return Err(Error::ErrDetachNotEnabled);
        }

        let dc = self.data_channel.lock().await;
        if dc.is_some() {
            self.detach_called.store(true, Ordering::SeqCst);
            Ok(())
        } else {
            Err(Error::ErrDetachBeforeOpened)
        }
    }

    /// Close closes the DataChannel. It may be called regardless of whether
    /// the DataChannel object was created by this peer or the remote peer.
    pub async fn close(&self) -> Result<()> {
        if self.ready_state() == RTCDataChannelState::Closed {
            return Ok(());
        }

        self.set_ready_state(RTCDataChannelState::Closing);

        {
            let mut handler = self.on_close_handler.lock().await;
            if let Some(f) = &mut *handler {
                f().await;
            }
        }

        self.set_ready_state(RTCDataChannelState::Closed);

        Ok(())
    }

    /// label represents a label that can be used to distinguish this
    /// DataChannel object from other DataChannel objects.
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// ordered represents if the DataChannel is ordered, and false if
    /// out-of-order delivery is allowed.
    pub fn ordered(&self) -> bool {
        self.ordered
    }

    /// max_packet_lifetime represents the length of the time window (msec)
    /// during which transmissions and retransmissions may occur in
    /// unreliable mode.
    pub fn max_packet_lifetime(&self) -> u16 {
        self.max_packet_lifetime
    }

    /// max_retransmits represents the maximum number of retransmissions
    /// that are attempted in unreliable mode.
    pub fn max_retransmits(&self) -> u16 {
        self.max_retransmits
    }

    /// protocol represents the name of the sub-protocol used with this
    /// DataChannel.
    pub fn protocol(&self) -> &str {
        self.protocol.as_str()
    }

    /// negotiated represents whether this DataChannel was negotiated by the
    /// application (true), or not (false).
    pub fn negotiated(&self) -> bool {
        self.negotiated
    }

    /// id represents the ID for this DataChannel. The value is 0 until the
    /// DTLS role of the SCTP transport has been negotiated, unless it was
    /// provided at channel creation time.
    pub fn id(&self) -> u16 {
        self.id.load(Ordering::SeqCst)
    }

    /// ready_state represents the state of the DataChannel object.
    pub fn ready_state(&self) -> RTCDataChannelState {
        self.ready_state.load(Ordering::SeqCst).into()
    }

    pub(crate) fn get_stats_id(&self) -> &str {
        self.stats_id.as_str()
    }

    pub(crate) fn set_ready_state(&self, r: RTCDataChannelState) {
        self.ready_state.store(r as u8, Ordering::SeqCst);
    }
}
