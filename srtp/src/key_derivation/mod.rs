
use aes::cipher::{KeyIvInit, StreamCipher};
use aes::Aes128;
use ctr::Ctr128BE;

use crate::error::{Error, Result};

pub(crate) const LABEL_SRTP_ENCRYPTION: u8 = 0x00;
pub(crate) const LABEL_SRTP_AUTHENTICATION_TAG: u8 = 0x01;
pub(crate) const LABEL_SRTP_SALT: u8 = 0x02;
pub(crate) const LABEL_SRTCP_ENCRYPTION: u8 = 0x03;
pub(crate) const LABEL_SRTCP_AUTHENTICATION_TAG: u8 = 0x04;
pub(crate) const LABEL_SRTCP_SALT: u8 = 0x05;

type Aes128Ctr = Ctr128BE<Aes128>;

/// aes_cm_key_derivation derives session keys/salts/auth-tags from a master
/// key and salt per https://tools.ietf.org/html/rfc3711#appendix-B.3
pub(crate) fn aes_cm_key_derivation(
    label: u8,
    master_key: &[u8],
    master_salt: &[u8],
    index_over_kdr: usize,
    out_len: usize,
) -> Result<Vec<u8>> {
    if index_over_kdr != 0 {
        return Err(Error::UnsupportedIndexOverKdr);
    }

    let mut iv = master_salt.to_vec();
    iv.resize(16, 0);
    iv[7] ^= label;

    let mut cipher = Aes128Ctr::new(master_key.into(), iv.as_slice().into());

    let mut output = vec![0u8; out_len];
    cipher.apply_keystream(&mut output);

    Ok(output)
}

/// generate_counter builds the 16-octet AES-CM counter block for a single
/// RTP/RTCP packet, per https://tools.ietf.org/html/rfc3711#section-4.1.1
pub(crate) fn generate_counter(
    sequence_number: u16,
    rollover_counter: u32,
    ssrc: u32,
    session_salt: &[u8],
) -> [u8; 16] {
    let mut counter = [0u8; 16];
    counter[4..8].copy_from_slice(&ssrc.to_be_bytes());
    counter[8..12].copy_from_slice(&rollover_counter.to_be_bytes());
    counter[12..16].copy_from_slice(&((sequence_number as u32) << 16).to_be_bytes());

    for (c, s) in counter.iter_mut().zip(session_salt.iter()) {
        *c ^= *s;
    }

    counter
}
