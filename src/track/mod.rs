pub mod track_local;
pub mod track_remote;

use std::sync::Arc;

use interceptor::stream_info::StreamInfo;
use interceptor::{RTCPReader, RTPReader};

use track_remote::TrackRemote;

/// TrackStreams groups a TrackRemote with the read side of its negotiated
/// SRTP stream(s). For a single-SSRC receive the streams are bound
/// immediately; for a simulcast/SVC encoding they stay `None` until the
/// first RTP packet for that RID arrives and tells us which SSRC to bind.
pub(crate) struct TrackStreams {
    pub(crate) track: Arc<TrackRemote>,
    pub(crate) stream_info: StreamInfo,
    pub(crate) rtp_read_stream: Option<Arc<srtp::stream::Stream>>,
    pub(crate) rtp_interceptor: Option<Arc<dyn RTPReader + Send + Sync>>,
    pub(crate) rtcp_read_stream: Option<Arc<srtp::stream::Stream>>,
    pub(crate) rtcp_interceptor: Option<Arc<dyn RTCPReader + Send + Sync>>,

    /// RTX (RFC4588) repair flow bound to this track's RID, if any.
    pub(crate) repair_ssrc: u32,
    pub(crate) repair_rtp_read_stream: Option<Arc<srtp::stream::Stream>>,
    pub(crate) repair_rtp_interceptor: Option<Arc<dyn RTPReader + Send + Sync>>,
    pub(crate) repair_rtcp_read_stream: Option<Arc<srtp::stream::Stream>>,
    pub(crate) repair_rtcp_interceptor: Option<Arc<dyn RTCPReader + Send + Sync>>,
}

/// TrackStream is the late-binding counterpart of TrackStreams used when a
/// simulcast RID's SSRC is only learned from the RTP Stream Identifier (RID)
/// header extension on the first packet received for it.
pub(crate) struct TrackStream {
    pub(crate) stream_info: Option<StreamInfo>,
    pub(crate) rtp_read_stream: Option<Arc<srtp::stream::Stream>>,
    pub(crate) rtp_interceptor: Option<Arc<dyn RTPReader + Send + Sync>>,
    pub(crate) rtcp_read_stream: Option<Arc<srtp::stream::Stream>>,
    pub(crate) rtcp_interceptor: Option<Arc<dyn RTCPReader + Send + Sync>>,
}
