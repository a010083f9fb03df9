use crate::error::Result;
use num_bigint::BigUint;

/// What a record needs from an identity in order to be signed.
///
/// [`crate::wallet::Wallet`] is the real implementation; tests swap in
/// doubles that misbehave on purpose.
pub trait Signer {
    /// Sign `message` with RSA-PSS (SHA-256, MGF1-SHA256, 32 byte salt).
    ///
    /// `message` is the full canonical record message, not a digest: the PSS
    /// message hash is SHA-256(`message`).
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>>;

    /// Check that `signature` was produced over `message` by this identity.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<()>;

    /// base64url(SHA-256(modulus))
    fn address(&self) -> &str;

    /// The RSA public modulus, placed in a record's `owner` field.
    fn owner(&self) -> &BigUint;
}
