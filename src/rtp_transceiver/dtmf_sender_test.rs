use super::*;
use crate::api::media_engine::MediaEngine;
use crate::api::APIBuilder;
use crate::dtls_transport::RTCDtlsTransport;
use tokio::sync::mpsc;

async fn new_dtmf_sender() -> Arc<DtmfSender> {
    let mut m = MediaEngine::default();
    m.register_default_codecs().unwrap();
    let api = APIBuilder::new().with_media_engine(m).build();
    let interceptor = api.interceptor_registry.build("").unwrap();
    let transport = Arc::new(RTCDtlsTransport::default());
    let sender = Arc::new(api.new_rtp_sender(None, transport, interceptor).await);
    DtmfSender::new(sender, 101)
}

#[test]
fn test_tone_to_event_code() {
    assert_eq!(tone_to_event_code('0').unwrap(), 0);
    assert_eq!(tone_to_event_code('9').unwrap(), 9);
    assert_eq!(tone_to_event_code('*').unwrap(), 10);
    assert_eq!(tone_to_event_code('#').unwrap(), 11);
    assert_eq!(tone_to_event_code('A').unwrap(), 12);
    assert_eq!(tone_to_event_code('D').unwrap(), 15);
    assert!(tone_to_event_code('x').is_err());
}

#[test]
fn test_marshal_telephone_event_layout() {
    let buf = marshal_telephone_event(5, true, 10, 320);
    assert_eq!(buf[0], 5);
    assert_eq!(buf[1] & 0x80, 0x80);
    assert_eq!(buf[1] & 0x3f, 10);
    assert_eq!(((buf[2] as u16) << 8) | buf[3] as u16, 320);
}

#[tokio::test]
async fn test_insert_dtmf_rejects_invalid_tone() {
    let dtmf = new_dtmf_sender().await;
    let err = dtmf.insert_dtmf("1X", 100, 70).await.unwrap_err();
    assert!(matches!(err, Error::ErrDTMFSenderInvalidTone));
}

#[tokio::test]
async fn test_insert_dtmf_emits_tone_change_sequence() {
    let dtmf = new_dtmf_sender().await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    dtmf.on_tone_change(Box::new(move |tone| {
        let tx = tx.clone();
        Box::pin(async move {
            let _ = tx.send(tone);
        })
    }))
    .await;

    dtmf.insert_dtmf("1A", 40, 30).await.unwrap();

    let mut seen = Vec::new();
    for _ in 0..4 {
        if let Some(tone) = rx.recv().await {
            seen.push(tone);
        }
    }

    assert_eq!(seen, vec!["1", "", "A", ""]);
}
