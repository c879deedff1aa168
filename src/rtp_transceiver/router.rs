#[cfg(test)]
mod router_test;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use crate::rtp_transceiver::SSRC;

/// A single incoming RTP packet's routing-relevant header fields: the SSRC
/// every packet carries, and the RID (`a=rid`/`urn:ietf:params:rtp-hdrext:sdes:rtp-stream-id`)
/// extension value, if the packet carried one and a receiver already
/// registered it.
#[derive(Debug, Clone)]
pub struct RoutingKey {
    pub ssrc: SSRC,
    pub rid: Option<String>,
}

/// Dispatches incoming RTP packets to the `RTCRtpReceiver` that should
/// consume them, per spec.md §4.5: a RID match wins outright and memoizes
/// the SSRC for subsequent packets that don't carry a RID extension (not all
/// do, depending on muxing), falling back to the SSRC table, and finally to
/// binding a still-unseen SSRC onto a RID-registered receiver's own track.
/// A packet that matches nothing is dropped by the caller.
pub struct RtpRouter {
    ssrc_table: Mutex<HashMap<SSRC, Arc<RTCRtpReceiver>>>,
    rid_table: Mutex<HashMap<String, Arc<RTCRtpReceiver>>>,
    ext_id_uri_map: Mutex<HashMap<u8, String>>,
}

impl RtpRouter {
    pub fn new() -> Self {
        RtpRouter {
            ssrc_table: Mutex::new(HashMap::new()),
            rid_table: Mutex::new(HashMap::new()),
            ext_id_uri_map: Mutex::new(HashMap::new()),
        }
    }

    /// Registers the header extension wire id negotiated for `uri`, so
    /// callers parsing raw packets know which extension id to read the RID
    /// (or any other routing-relevant extension) out of.
    pub async fn set_extension_id(&self, id: u8, uri: String) {
        self.ext_id_uri_map.lock().await.insert(id, uri);
    }

    pub async fn extension_id_for_uri(&self, uri: &str) -> Option<u8> {
        let map = self.ext_id_uri_map.lock().await;
        map.iter()
            .find(|(_, v)| v.as_str() == uri)
            .map(|(id, _)| *id)
    }

    /// Registers `receiver` as the target for RID `rid`. Simulcast receivers
    /// call this once per advertised RID before any packets arrive.
    pub async fn register_rid(&self, rid: String, receiver: Arc<RTCRtpReceiver>) {
        self.rid_table.lock().await.insert(rid, receiver);
    }

    /// Registers `receiver` as the target for a known SSRC directly (the
    /// non-simulcast case, where RID never enters into it).
    pub async fn register_ssrc(&self, ssrc: SSRC, receiver: Arc<RTCRtpReceiver>) {
        self.ssrc_table.lock().await.insert(ssrc, receiver);
    }

    pub async fn unregister_ssrc(&self, ssrc: SSRC) {
        self.ssrc_table.lock().await.remove(&ssrc);
    }

    /// Resolves the receiver that should handle a packet with the given
    /// routing key, applying spec.md §4.5's dispatch order. Returns `None`
    /// only when none of RID table, SSRC table, or RID-binding fallback
    /// produced a match — the caller drops the packet.
    pub async fn route(&self, key: &RoutingKey) -> Option<Arc<RTCRtpReceiver>> {
        if let Some(rid) = &key.rid {
            let rid_table = self.rid_table.lock().await;
            if let Some(receiver) = rid_table.get(rid) {
                let receiver = Arc::clone(receiver);
                drop(rid_table);
                // Memoize: subsequent packets on this SSRC may arrive
                // without the RID extension (some encoders only stamp it on
                // the first few packets of a layer).
                self.ssrc_table
                    .lock()
                    .await
                    .insert(key.ssrc, Arc::clone(&receiver));
                return Some(receiver);
            }
        }

        if let Some(receiver) = self.ssrc_table.lock().await.get(&key.ssrc) {
            return Some(Arc::clone(receiver));
        }

        // Fall back to binding this still-unseen SSRC onto a RID receiver
        // that's already registered but hasn't bound an SSRC yet -- only
        // valid when there is exactly one such receiver, since otherwise the
        // binding would be a guess the spec doesn't license.
        let rid_table = self.rid_table.lock().await;
        let mut candidates = rid_table.values();
        if let (Some(only), None) = (candidates.next(), candidates.next()) {
            let receiver = Arc::clone(only);
            drop(rid_table);
            self.ssrc_table
                .lock()
                .await
                .insert(key.ssrc, Arc::clone(&receiver));
            return Some(receiver);
        }

        None
    }
}

impl Default for RtpRouter {
    fn default() -> Self {
        Self::new()
    }
}
