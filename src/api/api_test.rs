use super::*;
use crate::peer_connection::configuration::RTCConfiguration;

#[tokio::test]
async fn new_peer_connection_generates_a_self_signed_certificate() {
    let api = APIBuilder::new().build();
    let pc = api
        .new_peer_connection(RTCConfiguration::default())
        .await
        .expect("peer connection construction should succeed");
    assert!(!pc.get_configuration().await.certificates.is_empty());
}
