#[cfg(test)]
mod svc_filter_test;

use std::sync::Mutex;

use rtp::codecs::vp9::Vp9Packet;

/// Tracks the currently forwarded VP9 SVC layers for one receiver and decides,
/// packet by packet, whether a given spatial/temporal layer should be
/// forwarded. Spatial layer switches are two-phase: a downgrade or upgrade
/// requested with `immediate=false` only takes effect once a clean switch
/// point arrives (`SID==0 && begin_of_frame` on a key frame); `immediate=true`
/// applies to the very next packet.
pub struct SvcFilter {
    state: Mutex<SvcFilterState>,
}

struct SvcFilterState {
    max_sid: u8,
    max_tid: u8,
    pending_sid: Option<u8>,
}

impl SvcFilter {
    pub fn new(max_sid: u8, max_tid: u8) -> Self {
        SvcFilter {
            state: Mutex::new(SvcFilterState {
                max_sid,
                max_tid,
                pending_sid: None,
            }),
        }
    }

    /// Requests a new maximum spatial layer. With `immediate=false` the
    /// current selection keeps applying until the next clean switch point;
    /// with `immediate=true` it applies starting with the next packet.
    pub fn select_spatial_layer(&self, max_sid: u8, immediate: bool) {
        let mut state = self.state.lock().unwrap();
        if immediate {
            state.max_sid = max_sid;
            state.pending_sid = None;
        } else {
            state.pending_sid = Some(max_sid);
        }
    }

    pub fn select_temporal_layer(&self, max_tid: u8) {
        self.state.lock().unwrap().max_tid = max_tid;
    }

    /// Returns whether `pkt` should be forwarded under the current selection,
    /// applying any pending switch first if `pkt` is a clean switch point.
    pub fn should_forward(&self, pkt: &Vp9Packet) -> bool {
        let mut state = self.state.lock().unwrap();

        if let Some(pending) = state.pending_sid {
            let keyframe = !pkt.p;
            if pkt.sid == 0 && pkt.b && keyframe {
                state.max_sid = pending;
                state.pending_sid = None;
            }
        }

        pkt.sid <= state.max_sid && pkt.tid <= state.max_tid
    }
}
