use super::*;
use crate::api::media_engine::MediaEngine;
use crate::api::APIBuilder;
use crate::dtls_transport::RTCDtlsTransport;
use crate::rtp_transceiver::rtp_codec::RTPCodecType;

async fn new_receiver() -> Arc<RTCRtpReceiver> {
    let mut m = MediaEngine::default();
    m.register_default_codecs().unwrap();
    let api = APIBuilder::new().with_media_engine(m).build();
    let interceptor = api.interceptor_registry.build("").unwrap();
    let transport = Arc::new(RTCDtlsTransport::default());
    Arc::new(api.new_rtp_receiver(RTPCodecType::Video, transport, interceptor))
}

#[tokio::test]
async fn test_router_dispatches_by_rid_and_memoizes_ssrc() {
    let router = RtpRouter::new();
    let receiver = new_receiver().await;
    router.register_rid("h".to_string(), Arc::clone(&receiver)).await;

    let routed = router
        .route(&RoutingKey {
            ssrc: 111,
            rid: Some("h".to_string()),
        })
        .await;
    assert!(Arc::ptr_eq(&routed.unwrap(), &receiver));

    // A later packet on the same SSRC but with no RID extension should
    // still land on the same receiver via the memoized SSRC table.
    let routed_again = router
        .route(&RoutingKey {
            ssrc: 111,
            rid: None,
        })
        .await;
    assert!(Arc::ptr_eq(&routed_again.unwrap(), &receiver));
}

#[tokio::test]
async fn test_router_dispatches_by_ssrc_table() {
    let router = RtpRouter::new();
    let receiver = new_receiver().await;
    router.register_ssrc(42, Arc::clone(&receiver)).await;

    let routed = router
        .route(&RoutingKey {
            ssrc: 42,
            rid: None,
        })
        .await;
    assert!(Arc::ptr_eq(&routed.unwrap(), &receiver));
}

#[tokio::test]
async fn test_router_binds_unseen_ssrc_to_sole_rid_receiver() {
    let router = RtpRouter::new();
    let receiver = new_receiver().await;
    router.register_rid("h".to_string(), Arc::clone(&receiver)).await;

    // No RID on the packet, no prior SSRC binding, but exactly one RID
    // receiver registered -- bind to it.
    let routed = router
        .route(&RoutingKey {
            ssrc: 7,
            rid: None,
        })
        .await;
    assert!(Arc::ptr_eq(&routed.unwrap(), &receiver));
}

#[tokio::test]
async fn test_router_drops_unknown_ssrc_with_multiple_rid_receivers() {
    let router = RtpRouter::new();
    let a = new_receiver().await;
    let b = new_receiver().await;
    router.register_rid("h".to_string(), Arc::clone(&a)).await;
    router.register_rid("l".to_string(), Arc::clone(&b)).await;

    let routed = router
        .route(&RoutingKey {
            ssrc: 99,
            rid: None,
        })
        .await;
    assert!(routed.is_none());
}

#[tokio::test]
async fn test_router_extension_id_roundtrip() {
    let router = RtpRouter::new();
    router.set_extension_id(3, "urn:ietf:params:rtp-hdrext:sdes:rtp-stream-id".to_string()).await;
    assert_eq!(
        router
            .extension_id_for_uri("urn:ietf:params:rtp-hdrext:sdes:rtp-stream-id")
            .await,
        Some(3)
    );
    assert_eq!(router.extension_id_for_uri("unknown").await, None);
}
