// AES-CBC (Cipher Block Chaining)
// First historic block cipher for AES.
// CBC mode is insecure and must not be used. It’s been progressively deprecated and
// removed from SSL libraries.
// Introduced with TLS 1.0 year 2002. Superseded by GCM in TLS 1.2 year 2008.
// Removed in TLS 1.3 year 2018.
// RFC 3268 year 2002 https://tools.ietf.org/html/rfc3268

// https://github.com/RustCrypto/block-ciphers

use aes::Aes256;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha1::Sha1;

use crate::content::*;
use crate::error::*;
use crate::record_layer::record_layer_header::*;

use super::padding::DtlsPadding;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type HmacSha1 = Hmac<Sha1>;

const MAC_LENGTH: usize = 20;
const BLOCK_SIZE: usize = 16;

/// State needed to handle encrypted input/output for AES-CBC cipher suites
/// using HMAC-SHA1 per-record authentication (RFC 5246 6.2.3.2).
#[derive(Clone)]
pub struct CryptoCbc {
    local_key: Vec<u8>,
    local_mac_key: Vec<u8>,
    remote_key: Vec<u8>,
    remote_mac_key: Vec<u8>,
}

impl CryptoCbc {
    pub fn new(
        local_key: &[u8],
        _local_write_iv: &[u8],
        local_mac_key: &[u8],
        remote_key: &[u8],
        _remote_write_iv: &[u8],
        remote_mac_key: &[u8],
    ) -> Result<Self> {
        Ok(CryptoCbc {
            local_key: local_key.to_vec(),
            local_mac_key: local_mac_key.to_vec(),
            remote_key: remote_key.to_vec(),
            remote_mac_key: remote_mac_key.to_vec(),
        })
    }

    fn mac(
        mac_key: &[u8],
        epoch: u16,
        sequence_number: u64,
        content_type: ContentType,
        protocol_version: ProtocolVersion,
        payload: &[u8],
    ) -> Result<Vec<u8>> {
        let mut hmac =
            HmacSha1::new_from_slice(mac_key).map_err(|e| Error::Other(e.to_string()))?;

        let mut msg = Vec::with_capacity(13 + payload.len());
        msg.extend_from_slice(&sequence_number.to_be_bytes());
        msg[..2].copy_from_slice(&epoch.to_be_bytes());
        msg.push(content_type as u8);
        msg.push(protocol_version.major);
        msg.push(protocol_version.minor);
        msg.extend_from_slice(&(payload.len() as u16).to_be_bytes());
        msg.extend_from_slice(payload);

        hmac.update(&msg);
        Ok(hmac.finalize().into_bytes().to_vec())
    }

    pub fn encrypt(&self, pkt_rlh: &RecordLayerHeader, raw: &[u8]) -> Result<Vec<u8>> {
        let payload = &raw[RECORD_LAYER_HEADER_SIZE..];
        let raw_header = &raw[..RECORD_LAYER_HEADER_SIZE];

        let mac = CryptoCbc::mac(
            &self.local_mac_key,
            pkt_rlh.epoch,
            pkt_rlh.sequence_number,
            pkt_rlh.content_type,
            pkt_rlh.protocol_version,
            payload,
        )?;

        let mut plaintext = Vec::with_capacity(payload.len() + MAC_LENGTH);
        plaintext.extend_from_slice(payload);
        plaintext.extend_from_slice(&mac);

        let mut iv = vec![0u8; BLOCK_SIZE];
        rand::thread_rng().fill_bytes(&mut iv);

        let padded_len = ((plaintext.len() / BLOCK_SIZE) + 1) * BLOCK_SIZE;
        plaintext.resize(padded_len, 0);

        let enc = Aes256CbcEnc::new(self.local_key.as_slice().into(), iv.as_slice().into());
        let ciphertext = enc
            .encrypt_padded_mut::<DtlsPadding>(&mut plaintext, padded_len - BLOCK_SIZE)
            .map_err(|e| Error::Other(e.to_string()))?;

        let mut r = Vec::with_capacity(raw_header.len() + iv.len() + ciphertext.len());
        r.extend_from_slice(raw_header);
        r.extend_from_slice(&iv);
        r.extend_from_slice(ciphertext);

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

        if r.len() < RECORD_LAYER_HEADER_SIZE + BLOCK_SIZE * 2 {
            return Err(Error::Other("dtls: packet too short".to_owned()));
        }

        let iv = &r[RECORD_LAYER_HEADER_SIZE..RECORD_LAYER_HEADER_SIZE + BLOCK_SIZE];
        let mut ciphertext = r[RECORD_LAYER_HEADER_SIZE + BLOCK_SIZE..].to_vec();

        let dec = Aes256CbcDec::new(self.remote_key.as_slice().into(), iv.into());
        let plaintext = dec
            .decrypt_padded_mut::<DtlsPadding>(&mut ciphertext)
            .map_err(|_| Error::ErrInvalidMac)?;

        if plaintext.len() < MAC_LENGTH {
            return Err(Error::ErrInvalidMac);
        }
        let split = plaintext.len() - MAC_LENGTH;
        let (payload, mac) = plaintext.split_at(split);

        let expected_mac = CryptoCbc::mac(
            &self.remote_mac_key,
            h.epoch,
            h.sequence_number,
            h.content_type,
            h.protocol_version,
            payload,
        )?;

        if mac != expected_mac.as_slice() {
            return Err(Error::ErrInvalidMac);
        }

        let mut d = Vec::with_capacity(RECORD_LAYER_HEADER_SIZE + payload.len());
        d.extend_from_slice(&r[..RECORD_LAYER_HEADER_SIZE]);
        d.extend_from_slice(payload);

        Ok(d)
    }
}
