//! Records and chunk chains
//!
//! This module contains the signed record model and everything built on top
//! of it: splitting payloads into chunks, linking chunk records backward, and
//! walking a chain from its head to rebuild the payload.

pub mod batcher;
pub mod chunker;
pub mod combiner;
pub mod linkage;
pub mod tag;
pub mod transaction;

pub use batcher::Batcher;
pub use chunker::{recombine, Chunk, Chunker, DEFAULT_MAX_CHUNK_SIZE, KB};
pub use combiner::Combiner;
pub use linkage::{ChunkLink, CHUNKER_TAG_NAME, CHUNKER_VERSION};
pub use tag::{Tag, TagJson};
pub use transaction::{Transaction, TransactionBuilder, TransactionJson, ID_LEN};
