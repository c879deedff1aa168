
use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use super::*;

// SrtpProtectionProfile defines the parameters and options that are in effect for the SRTP processing
// https://tools.ietf.org/html/rfc5764#section-4.1.2
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SrtpProtectionProfile {
    Srtp_Aes128_Cm_Hmac_Sha1_80 = 0x0001,
    Srtp_Aes128_Cm_Hmac_Sha1_32 = 0x0002,
    Srtp_Aead_Aes_128_Gcm = 0x0007,
    Srtp_Aead_Aes_256_Gcm = 0x0008,
    Unsupported,
}

impl From<u16> for SrtpProtectionProfile {
    fn from(val: u16) -> Self {
        match val {
            0x0001 => SrtpProtectionProfile::Srtp_Aes128_Cm_Hmac_Sha1_80,
            0x0002 => SrtpProtectionProfile::Srtp_Aes128_Cm_Hmac_Sha1_32,
            0x0007 => SrtpProtectionProfile::Srtp_Aead_Aes_128_Gcm,
            0x0008 => SrtpProtectionProfile::Srtp_Aead_Aes_256_Gcm,
            _ => SrtpProtectionProfile::Unsupported,
        }
    }
}

const EXTENSION_USE_SRTP_HEADER_SIZE: usize = 2;
const EXTENSION_USE_SRTP_MKI_LENGTH_SIZE: usize = 1;
const EXTENSION_USE_SRTP_PROTECTION_PROFILES_LENGTH_SIZE: usize = 2;

// https://tools.ietf.org/html/rfc5764#section-4.1.1
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtensionUseSrtp {
    pub protection_profiles: Vec<SrtpProtectionProfile>,
}

impl ExtensionUseSrtp {
    pub fn extension_value(&self) -> ExtensionValue {
        ExtensionValue::UseSrtp
    }

    pub fn size(&self) -> usize {
        EXTENSION_USE_SRTP_HEADER_SIZE
            + EXTENSION_USE_SRTP_PROTECTION_PROFILES_LENGTH_SIZE
            + self.protection_profiles.len() * 2
            + EXTENSION_USE_SRTP_MKI_LENGTH_SIZE
    }

    pub fn marshal<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u16::<BigEndian>(
            (EXTENSION_USE_SRTP_PROTECTION_PROFILES_LENGTH_SIZE
                + self.protection_profiles.len() * 2
                + EXTENSION_USE_SRTP_MKI_LENGTH_SIZE) as u16,
        )?;
        writer.write_u16::<BigEndian>((self.protection_profiles.len() * 2) as u16)?;
        for p in &self.protection_profiles {
            writer.write_u16::<BigEndian>(*p as u16)?;
        }
        writer.write_u8(0)?; // srtp_mki, we don't support this

        Ok(writer.flush()?)
    }

    pub fn unmarshal<R: Read>(reader: &mut R) -> Result<Self> {
        let _ = reader.read_u16::<BigEndian>()? as usize;
        let profiles_len = reader.read_u16::<BigEndian>()? as usize;
        let profile_count = profiles_len / 2;

        let mut protection_profiles = Vec::with_capacity(profile_count);
        for _ in 0..profile_count {
            let id = reader.read_u16::<BigEndian>()?;
            protection_profiles.push(SrtpProtectionProfile::from(id));
        }

        let mki_len = reader.read_u8()? as usize;
        if mki_len > 0 {
            let mut mki = vec![0u8; mki_len];
            reader.read_exact(&mut mki)?;
        }

        Ok(ExtensionUseSrtp {
            protection_profiles,
        })
    }
}
