// AES-GCM (Galois Counter Mode)
// The most widely used block cipher worldwide.
// Mandatory as of TLS 1.2 (2008) and used by default by most clients.
// RFC 5288 year 2008 https://tools.ietf.org/html/rfc5288

// https://github.com/RustCrypto/AEADs
// https://docs.rs/aes-gcm/0.8.0/aes_gcm/

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::AeadInPlace;
use aes_gcm::KeyInit;
use aes_gcm::Aes128Gcm;

use crate::content::*;
use crate::error::*;
use crate::record_layer::record_layer_header::*;

use super::generate_aead_additional_data;

const CRYPTO_GCM_TAG_LENGTH: usize = 16;
const CRYPTO_GCM_NONCE_LENGTH: usize = 12;

// fixed component of the nonce, derived from the key block
const CRYPTO_GCM_FIXED_NONCE_LENGTH: usize = 4;

/// State needed to handle encrypted input/output for AES-GCM cipher suites.
#[derive(Clone)]
pub struct CryptoGcm {
    local_gcm: Aes128Gcm,
    remote_gcm: Aes128Gcm,
    local_write_iv: Vec<u8>,
    remote_write_iv: Vec<u8>,
}

impl CryptoGcm {
    pub fn new(
        local_key: &[u8],
        local_write_iv: &[u8],
        remote_key: &[u8],
        remote_write_iv: &[u8],
    ) -> Self {
        let key = GenericArray::from_slice(local_key);
        let local_gcm = Aes128Gcm::new(key);

        let key = GenericArray::from_slice(remote_key);
        let remote_gcm = Aes128Gcm::new(key);

        CryptoGcm {
            local_gcm,
            remote_gcm,
            local_write_iv: local_write_iv.to_vec(),
            remote_write_iv: remote_write_iv.to_vec(),
        }
    }

    pub fn encrypt(&self, pkt_rlh: &RecordLayerHeader, raw: &[u8]) -> Result<Vec<u8>> {
        let payload = &raw[RECORD_LAYER_HEADER_SIZE..];
        let raw_header = &raw[..RECORD_LAYER_HEADER_SIZE];

        // 8-byte explicit nonce: epoch (2 bytes) over the top of the 48-bit
        // sequence number, mirroring generate_aead_additional_data's layout
        let mut explicit_nonce = pkt_rlh.sequence_number.to_be_bytes().to_vec();
        explicit_nonce[..2].copy_from_slice(&pkt_rlh.epoch.to_be_bytes());

        let mut nonce = vec![0u8; CRYPTO_GCM_NONCE_LENGTH];
        nonce[..CRYPTO_GCM_FIXED_NONCE_LENGTH]
            .copy_from_slice(&self.local_write_iv[..CRYPTO_GCM_FIXED_NONCE_LENGTH]);
        nonce[CRYPTO_GCM_FIXED_NONCE_LENGTH..].copy_from_slice(&explicit_nonce);
        let nonce = GenericArray::from_slice(&nonce);

        let additional_data = generate_aead_additional_data(pkt_rlh, payload.len());

        let mut buffer: Vec<u8> = Vec::new();
        buffer.extend_from_slice(payload);

        let tag = self
            .local_gcm
            .encrypt_in_place_detached(nonce, &additional_data, &mut buffer)
            .map_err(|e| Error::Other(e.to_string()))?;

        let mut r = Vec::with_capacity(
            raw_header.len() + explicit_nonce.len() + buffer.len() + tag.len(),
        );
        r.extend_from_slice(raw_header);
        r.extend_from_slice(&explicit_nonce);
        r.extend_from_slice(&buffer);
        r.extend_from_slice(&tag);

        // Update recordLayer size to include explicit nonce
        let r_len = (r.len() - RECORD_LAYER_HEADER_SIZE) as u16;
        r[RECORD_LAYER_HEADER_SIZE - 2..RECORD_LAYER_HEADER_SIZE]
            .copy_from_slice(&r_len.to_be_bytes());

        Ok(r)
    }

    pub fn decrypt(&self, r: &[u8]) -> Result<Vec<u8>> {
        let mut reader = std::io::Cursor::new(r);
        let h = RecordLayerHeader::unmarshal(&mut reader)?;
        if h.content_type == ContentType::ChangeCipherSpec {
            // Nothing to encrypt with ChangeCipherSpec
            return Ok(r.to_vec());
        }

        let nonce_end = RECORD_LAYER_HEADER_SIZE + CRYPTO_GCM_FIXED_NONCE_LENGTH * 2;
        if r.len() <= nonce_end + CRYPTO_GCM_TAG_LENGTH {
            return Err(Error::Other("dtls: packet too short".to_owned()));
        }
        let explicit_nonce = &r[RECORD_LAYER_HEADER_SIZE..nonce_end];

        let mut nonce = vec![0u8; CRYPTO_GCM_NONCE_LENGTH];
        nonce[..CRYPTO_GCM_FIXED_NONCE_LENGTH]
            .copy_from_slice(&self.remote_write_iv[..CRYPTO_GCM_FIXED_NONCE_LENGTH]);
        nonce[CRYPTO_GCM_FIXED_NONCE_LENGTH..].copy_from_slice(explicit_nonce);
        let nonce = GenericArray::from_slice(&nonce);

        let out = &r[nonce_end..];

        let additional_data = generate_aead_additional_data(&h, out.len() - CRYPTO_GCM_TAG_LENGTH);

        let mut buffer: Vec<u8> = Vec::new();
        buffer.extend_from_slice(out);

        self.remote_gcm
            .decrypt_in_place(nonce, &additional_data, &mut buffer)
            .map_err(|e| Error::Other(e.to_string()))?;

        let mut d = Vec::with_capacity(RECORD_LAYER_HEADER_SIZE + buffer.len());
        d.extend_from_slice(&r[..RECORD_LAYER_HEADER_SIZE]);
        d.extend_from_slice(&buffer);

        Ok(d)
    }
}
