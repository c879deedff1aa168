use super::*;

#[test]
fn test_key_len() {
    assert_eq!(ProtectionProfile::Aes128CmHmacSha1_80.key_len(), 16);
    assert_eq!(ProtectionProfile::Aes128CmHmacSha1_32.key_len(), 16);
    assert_eq!(ProtectionProfile::AeadAes128Gcm.key_len(), 16);
    assert_eq!(ProtectionProfile::AeadAes256Gcm.key_len(), 32);
}

#[test]
fn test_salt_len() {
    assert_eq!(ProtectionProfile::Aes128CmHmacSha1_80.salt_len(), 14);
    assert_eq!(ProtectionProfile::Aes128CmHmacSha1_32.salt_len(), 14);
    assert_eq!(ProtectionProfile::AeadAes128Gcm.salt_len(), 12);
    assert_eq!(ProtectionProfile::AeadAes256Gcm.salt_len(), 12);
}

#[test]
fn test_auth_tag_len() {
    assert_eq!(ProtectionProfile::Aes128CmHmacSha1_80.rtp_auth_tag_len(), 10);
    assert_eq!(ProtectionProfile::Aes128CmHmacSha1_32.rtp_auth_tag_len(), 4);
    assert_eq!(ProtectionProfile::Aes128CmHmacSha1_80.rtcp_auth_tag_len(), 10);
    assert_eq!(ProtectionProfile::Aes128CmHmacSha1_32.rtcp_auth_tag_len(), 10);
    assert_eq!(ProtectionProfile::AeadAes128Gcm.aead_auth_tag_len(), 16);
    assert_eq!(ProtectionProfile::AeadAes256Gcm.aead_auth_tag_len(), 16);
}
