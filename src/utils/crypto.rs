use ring::digest::{Context, SHA256, SHA256_OUTPUT_LEN};
use ring::rand::SystemRandom;
use ring::signature::{RsaKeyPair, RsaPublicKeyComponents, RSA_PSS_2048_8192_SHA256, RSA_PSS_SHA256};

use crate::error::{Result, WeaveError};

/// Public exponent every weave key uses (65537, "AQAB" in a JWK)
pub const RSA_PUBLIC_EXPONENT: [u8; 3] = [0x01, 0x00, 0x01];

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

/// Same as [`sha256_digest`] but sized, for record ids
pub fn sha256_array(data: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    let digest = ring::digest::digest(&SHA256, data);
    let mut out = [0u8; SHA256_OUTPUT_LEN];
    out.copy_from_slice(digest.as_ref());
    out
}

/// RSA-PSS with SHA-256, MGF1-SHA256 and a 32 byte salt.
///
/// `ring` hashes `message` itself, so callers pass the bytes they want
/// covered, not a pre-computed digest of them.
pub fn rsa_pss_sha256_sign(key_pair: &RsaKeyPair, message: &[u8]) -> Result<Vec<u8>> {
    let rng = SystemRandom::new();
    let mut signature = vec![0u8; key_pair.public().modulus_len()];
    key_pair
        .sign(&RSA_PSS_SHA256, &rng, message, &mut signature)
        .map_err(|e| WeaveError::Crypto(format!("Failed to sign message: {e}")))?;
    Ok(signature)
}

pub fn rsa_pss_sha256_verify(
    modulus: &[u8],
    exponent: &[u8],
    message: &[u8],
    signature: &[u8],
) -> bool {
    let public_key = RsaPublicKeyComponents {
        n: modulus,
        e: exponent,
    };
    public_key
        .verify(&RSA_PSS_2048_8192_SHA256, message, signature)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        let digest = sha256_digest(b"abc");
        assert_eq!(digest[0], 0xba);
        assert_eq!(digest[31], 0xad);
        assert_eq!(sha256_array(b"abc").to_vec(), digest);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let modulus = vec![0xC3u8; 256];
        assert!(!rsa_pss_sha256_verify(
            &modulus,
            &RSA_PUBLIC_EXPONENT,
            b"message",
            &[0u8; 256]
        ));
    }
}
