//! Utility functions and helpers
//!
//! This module contains the hashing and RSA-PSS primitives and the
//! base64url codec used for every binary record field.

pub mod crypto;
pub mod encoding;

pub use crypto::{
    rsa_pss_sha256_sign, rsa_pss_sha256_verify, sha256_array, sha256_digest, RSA_PUBLIC_EXPONENT,
};

pub use encoding::{base64url_decode, base64url_encode, decode_field};
