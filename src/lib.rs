//! # Weave Client - Signed Records and Chunk Chains
//!
//! This is my client for a content-addressed ledger. It signs records with
//! RSA-PSS, splits large payloads into chunk records linked backward, and
//! walks those chains from the head to rebuild the payload.
//! When I come back to this code, here's what I need to remember:
//!
//! ## What I Built
//! - **Signed Records**: canonical message, RSA-PSS over SHA-256, id = SHA-256 of the signature
//! - **Wallets**: RSA keys from JWK or PKCS#8, address = SHA-256 of the modulus
//! - **Chunking**: fixed-size raw-byte chunks with explicit positions
//! - **Batching**: one signed record per chunk, each naming its predecessor
//! - **Combining**: head-first walk with position and cycle checks
//! - **Local Ledgers**: in-memory and Sled-backed, for tests and the CLI
//!
//! ## How I Organized My Code
//! - `core/`: records, tags, chunker, linkage tag, batcher, combiner
//! - `wallet/`: key loading, signing, address derivation
//! - `network/`: the `Ledger` trait and the `Transactor` that talks to it
//! - `storage/`: the bundled ledgers
//! - `config/`: `WEAVE_*` environment settings
//! - `utils/`: base64url and crypto helpers
//! - `cli/`: command-line interface
//!
//! ## When I Need to Understand Something
//! 1. `core/transaction.rs` for what gets signed and how it is checked
//! 2. `core/batcher.rs` and `core/combiner.rs` for the chain format
//! 3. `network/ledger.rs` for what a ledger has to provide

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod storage;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{Config, GLOBAL_CONFIG};
pub use core::{
    recombine, Batcher, Chunk, ChunkLink, Chunker, Combiner, Tag, Transaction,
    TransactionBuilder, TransactionJson, CHUNKER_TAG_NAME, CHUNKER_VERSION,
    DEFAULT_MAX_CHUNK_SIZE,
};
pub use error::{Result, WeaveError};
pub use network::{FeeSchedule, Ledger, Transactor, NO_TRANSFER};
pub use storage::{MemoryLedger, SledLedger};
pub use utils::{base64url_decode, base64url_encode, sha256_digest};
pub use wallet::{address_from_modulus, verify_with_modulus, Signer, Wallet};
