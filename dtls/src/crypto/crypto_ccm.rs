// AES-CCM (Counter with CBC-MAC)
// Alternative to GCM mode.
// Available in OpenSSL as of TLS 1.3 (2018), but disabled by default.
// Two AES computations per block, thus expected to be somewhat slower than AES-GCM.
// RFC 6655 year 2012 https://tools.ietf.org/html/rfc6655
// Much lower adoption, probably because it came after GCM and offer no significant benefit.

// https://github.com/RustCrypto/AEADs
// https://docs.rs/ccm/0.3.0/ccm/

use aes::Aes128;
use ccm::aead::generic_array::GenericArray;
use ccm::aead::AeadInPlace;
use ccm::KeyInit;
use ccm::consts::{U12, U16, U8};
use ccm::Ccm;

use crate::content::*;
use crate::error::*;
use crate::record_layer::record_layer_header::*;

use super::generate_aead_additional_data;

const CRYPTO_CCM_NONCE_LENGTH: usize = 12;
const CRYPTO_CCM_FIXED_NONCE_LENGTH: usize = 4;

type Aes128Ccm = Ccm<Aes128, U16, U12>;
type Aes128Ccm8 = Ccm<Aes128, U8, U12>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CryptoCcmTagLen {
    CryptoCcmTagLength,
    CryptoCcm8TagLength,
}

impl CryptoCcmTagLen {
    fn tag_len(&self) -> usize {
        match self {
            CryptoCcmTagLen::CryptoCcmTagLength => 16,
            CryptoCcmTagLen::CryptoCcm8TagLength => 8,
        }
    }
}

#[derive(Clone)]
enum CcmVariant {
    Full(Box<Aes128Ccm>, Box<Aes128Ccm>),
    Ccm8(Box<Aes128Ccm8>, Box<Aes128Ccm8>),
}

/// State needed to handle encrypted input/output for AES-CCM cipher suites.
#[derive(Clone)]
pub struct CryptoCcm {
    local_ccm: CcmVariant,
    tag_len: CryptoCcmTagLen,
    local_write_iv: Vec<u8>,
    remote_write_iv: Vec<u8>,
}

impl CryptoCcm {
    pub fn new(
        tag_len: &CryptoCcmTagLen,
        local_key: &[u8],
        local_write_iv: &[u8],
        remote_key: &[u8],
        remote_write_iv: &[u8],
    ) -> Self {
        let local_ccm = match tag_len {
            CryptoCcmTagLen::CryptoCcmTagLength => CcmVariant::Full(
                Box::new(Aes128Ccm::new(GenericArray::from_slice(local_key))),
                Box::new(Aes128Ccm::new(GenericArray::from_slice(remote_key))),
            ),
            CryptoCcmTagLen::CryptoCcm8TagLength => CcmVariant::Ccm8(
                Box::new(Aes128Ccm8::new(GenericArray::from_slice(local_key))),
                Box::new(Aes128Ccm8::new(GenericArray::from_slice(remote_key))),
            ),
        };

        CryptoCcm {
            local_ccm,
            tag_len: *tag_len,
            local_write_iv: local_write_iv.to_vec(),
            remote_write_iv: remote_write_iv.to_vec(),
        }
    }

    pub fn encrypt(&self, pkt_rlh: &RecordLayerHeader, raw: &[u8]) -> Result<Vec<u8>> {
        let payload = &raw[RECORD_LAYER_HEADER_SIZE..];
        let raw_header = &raw[..RECORD_LAYER_HEADER_SIZE];

        let mut explicit_nonce = pkt_rlh.sequence_number.to_be_bytes().to_vec();
        explicit_nonce[..2].copy_from_slice(&pkt_rlh.epoch.to_be_bytes());

        let mut nonce = vec![0u8; CRYPTO_CCM_NONCE_LENGTH];
        nonce[..CRYPTO_CCM_FIXED_NONCE_LENGTH]
            .copy_from_slice(&self.local_write_iv[..CRYPTO_CCM_FIXED_NONCE_LENGTH]);
        nonce[CRYPTO_CCM_FIXED_NONCE_LENGTH..].copy_from_slice(&explicit_nonce);

        let additional_data = generate_aead_additional_data(pkt_rlh, payload.len());

        let mut buffer: Vec<u8> = Vec::new();
        buffer.extend_from_slice(payload);

        let tag = match &self.local_ccm {
            CcmVariant::Full(local, _) => local
                .encrypt_in_place_detached(
                    GenericArray::from_slice(&nonce),
                    &additional_data,
                    &mut buffer,
                )
                .map_err(|e| Error::Other(e.to_string()))?
                .to_vec(),
            CcmVariant::Ccm8(local, _) => local
                .encrypt_in_place_detached(
                    GenericArray::from_slice(&nonce),
                    &additional_data,
                    &mut buffer,
                )
                .map_err(|e| Error::Other(e.to_string()))?
                .to_vec(),
        };

        let mut r = Vec::with_capacity(
            raw_header.len() + explicit_nonce.len() + buffer.len() + tag.len(),
        );
        r.extend_from_slice(raw_header);
        r.extend_from_slice(&explicit_nonce);
        r.extend_from_slice(&buffer);
        r.extend_from_slice(&tag);

        let r_len = (r.len() - RECORD_LAYER_HEADER_SIZE) as u16;
        r[RECORD_LAYER_HEADER_SIZE - 2..RECORD_LAYER_HEADER_SIZE]
            .copy_from_slice(&r_len.to_be_bytes());

        Ok(r)
    }

    pub fn decrypt(&self, r: &[u8]) -> Result<Vec<u8>> {
        let mut reader = std::io::Cursor::new(r);
        let h = RecordLayerHeader::unmarshal(&mut reader)?;
        if h.content_type == ContentType::ChangeCipherSpec {
            return Ok(r.to_vec());
        }

        let nonce_end = RECORD_LAYER_HEADER_SIZE + CRYPTO_CCM_FIXED_NONCE_LENGTH * 2;
        if r.len() <= nonce_end + self.tag_len.tag_len() {
            return Err(Error::Other("dtls: packet too short".to_owned()));
        }
        let explicit_nonce = &r[RECORD_LAYER_HEADER_SIZE..nonce_end];

        let mut nonce = vec![0u8; CRYPTO_CCM_NONCE_LENGTH];
        nonce[..CRYPTO_CCM_FIXED_NONCE_LENGTH]
            .copy_from_slice(&self.remote_write_iv[..CRYPTO_CCM_FIXED_NONCE_LENGTH]);
        nonce[CRYPTO_CCM_FIXED_NONCE_LENGTH..].copy_from_slice(explicit_nonce);

        let out = &r[nonce_end..];
        let additional_data =
            generate_aead_additional_data(&h, out.len() - self.tag_len.tag_len());

        let mut buffer: Vec<u8> = Vec::new();
        buffer.extend_from_slice(out);

        match &self.local_ccm {
            CcmVariant::Full(_, remote) => remote
                .decrypt_in_place(GenericArray::from_slice(&nonce), &additional_data, &mut buffer)
                .map_err(|e| Error::Other(e.to_string()))?,
            CcmVariant::Ccm8(_, remote) => remote
                .decrypt_in_place(GenericArray::from_slice(&nonce), &additional_data, &mut buffer)
                .map_err(|e| Error::Other(e.to_string()))?,
        };

        let mut d = Vec::with_capacity(RECORD_LAYER_HEADER_SIZE + buffer.len());
        d.extend_from_slice(&r[..RECORD_LAYER_HEADER_SIZE]);
        d.extend_from_slice(&buffer);

        Ok(d)
    }
}
