#[cfg(test)]
mod signature_hash_algorithm_test;

use crate::error::*;

// HashAlgorithm is used to indicate the hash algorithm used
// https://www.iana.org/assignments/tls-parameters/tls-parameters.xhtml#tls-parameters-18
// Supported hash hash algorithms
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md2 = 0,  // Blacklisted
    Md5 = 1,  // Blacklisted
    Sha1 = 2, // Blacklisted
    Sha224 = 3,
    Sha256 = 4,
    Sha384 = 5,
    Sha512 = 6,
    Ed25519 = 8,
    Unsupported,
}

impl From<u8> for HashAlgorithm {
    fn from(val: u8) -> Self {
        match val {
            0 => HashAlgorithm::Md2,
            1 => HashAlgorithm::Md5,
            2 => HashAlgorithm::Sha1,
            3 => HashAlgorithm::Sha224,
            4 => HashAlgorithm::Sha256,
            5 => HashAlgorithm::Sha384,
            6 => HashAlgorithm::Sha512,
            8 => HashAlgorithm::Ed25519,
            _ => HashAlgorithm::Unsupported,
        }
    }
}

// https://www.iana.org/assignments/tls-parameters/tls-parameters.xhtml#tls-parameters-16
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    Rsa = 1,
    Ecdsa = 3,
    Ed25519 = 7,
    Unsupported,
}

impl From<u8> for SignatureAlgorithm {
    fn from(val: u8) -> Self {
        match val {
            1 => SignatureAlgorithm::Rsa,
            3 => SignatureAlgorithm::Ecdsa,
            7 => SignatureAlgorithm::Ed25519,
            _ => SignatureAlgorithm::Unsupported,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SignatureHashAlgorithm {
    pub hash: HashAlgorithm,
    pub signature: SignatureAlgorithm,
}

impl HashAlgorithm {
    // is_known reports whether this hash is one we can negotiate at all,
    // independent of whether it's insecure.
    fn is_known(&self) -> bool {
        matches!(
            self,
            HashAlgorithm::Sha1
                | HashAlgorithm::Sha224
                | HashAlgorithm::Sha256
                | HashAlgorithm::Sha384
                | HashAlgorithm::Sha512
                | HashAlgorithm::Ed25519
        )
    }

    fn is_insecure(&self) -> bool {
        matches!(self, HashAlgorithm::Md2 | HashAlgorithm::Md5 | HashAlgorithm::Sha1)
    }
}

impl SignatureAlgorithm {
    fn is_known(&self) -> bool {
        matches!(
            self,
            SignatureAlgorithm::Rsa | SignatureAlgorithm::Ecdsa | SignatureAlgorithm::Ed25519
        )
    }
}

// https://www.iana.org/assignments/tls-parameters/tls-parameters.xhtml#tls-signaturescheme
#[allow(non_camel_case_types, dead_code)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignatureScheme {
    Pkcs1WithSha256 = 0x0401,
    Pkcs1WithSha384 = 0x0501,
    Pkcs1WithSha512 = 0x0601,
    EcdsaWithP256AndSha256 = 0x0403,
    EcdsaWithP384AndSha384 = 0x0503,
    EcdsaWithP521AndSha512 = 0x0603,
    Ed25519 = 0x0807,
    // Legacy signature and hash algorithms for TLS 1.2.
    Pkcs1WithSha1 = 0x0201,
    EcdsaWithSha1 = 0x0203,
}

// parse_signature_schemes translates a list of TLS SignatureScheme code
// points into the (hash, signature) pairs this implementation supports,
// filtering out insecure hashes unless explicitly permitted.
pub fn parse_signature_schemes(
    sigs: &[u16],
    insecure_hashes: bool,
) -> Result<Vec<SignatureHashAlgorithm>> {
    let mut out = vec![];

    for ss in sigs {
        let hash = HashAlgorithm::from((*ss >> 8) as u8);
        if !hash.is_known() {
            return Err(Error::ErrInvalidHashAlgorithm);
        }
        if hash.is_insecure() && !insecure_hashes {
            continue;
        }

        let signature = SignatureAlgorithm::from((*ss & 0xFF) as u8);
        if !signature.is_known() {
            return Err(Error::ErrInvalidSignatureAlgorithm);
        }

        out.push(SignatureHashAlgorithm { hash, signature });
    }

    if out.is_empty() {
        Err(Error::ErrNoAvailableSignatureSchemes)
    } else {
        Ok(out)
    }
}
