use crate::error::{Result, WeaveError};
use crate::utils::{
    base64url_encode, rsa_pss_sha256_sign, rsa_pss_sha256_verify, sha256_digest,
    RSA_PUBLIC_EXPONENT,
};
use crate::wallet::Signer;
use num_bigint::BigUint;
use ring::signature::{RsaKeyPair, RsaPublicKeyComponents};
use std::fmt;

/// An RSA identity on the weave.
///
/// The private half only ever lives inside the `ring` key pair; nothing here
/// serializes it.
pub struct Wallet {
    key_pair: RsaKeyPair,
    modulus: BigUint,
    exponent: Vec<u8>,
    address: String,
}

impl Wallet {
    pub fn from_key_pair(key_pair: RsaKeyPair) -> Result<Wallet> {
        let public: RsaPublicKeyComponents<Vec<u8>> = key_pair.public().into();
        if public.n.is_empty() {
            return Err(WeaveError::Crypto("RSA key has an empty modulus".to_string()));
        }
        let modulus = BigUint::from_bytes_be(&public.n);
        let address = address_from_modulus(&modulus);
        log::debug!(
            "Loaded {}-bit RSA wallet {address}",
            modulus.bits()
        );
        Ok(Wallet {
            key_pair,
            modulus,
            exponent: public.e,
            address,
        })
    }

    pub fn get_address(&self) -> &str {
        self.address.as_str()
    }

    pub fn get_modulus(&self) -> &BigUint {
        &self.modulus
    }

    pub fn get_exponent(&self) -> &[u8] {
        self.exponent.as_slice()
    }
}

impl Signer for Wallet {
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        rsa_pss_sha256_sign(&self.key_pair, message)
    }

    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()> {
        let modulus = self.modulus.to_bytes_be();
        if rsa_pss_sha256_verify(&modulus, &self.exponent, message, signature) {
            Ok(())
        } else {
            Err(WeaveError::Crypto(format!(
                "Signature does not verify for wallet {}",
                self.address
            )))
        }
    }

    fn address(&self) -> &str {
        self.get_address()
    }

    fn owner(&self) -> &BigUint {
        self.get_modulus()
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address)
            .field("modulus_bits", &self.modulus.bits())
            .finish()
    }
}

/// base64url(SHA-256(n)), with `n` serialized big-endian without a leading zero.
pub fn address_from_modulus(modulus: &BigUint) -> String {
    let digest = sha256_digest(&modulus.to_bytes_be());
    base64url_encode(&digest)
}

/// Verify a signature using only an owner modulus, the way a reader checks a
/// record it fetched. The exponent is fixed at 65537.
pub fn verify_with_modulus(modulus: &BigUint, message: &[u8], signature: &[u8]) -> bool {
    rsa_pss_sha256_verify(
        &modulus.to_bytes_be(),
        &RSA_PUBLIC_EXPONENT,
        message,
        signature,
    )
}
