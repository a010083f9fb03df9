//! Wallet management and cryptographic identity
//!
//! This module holds the RSA identity that signs records, the address
//! derivation, key-file loading and the [`Signer`] seam the rest of the
//! crate signs through.

pub mod keyfile;
pub mod signer;
#[allow(clippy::module_inception)]
pub mod wallet;

pub use signer::Signer;
pub use wallet::{address_from_modulus, verify_with_modulus, Wallet};
