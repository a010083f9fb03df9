//! Bundled ledgers
//!
//! Two in-process implementations of [`crate::network::Ledger`]: one kept in
//! memory (tests, embedding) and one persisted with Sled (the CLI).

pub mod memory_ledger;
pub mod sled_ledger;

pub use memory_ledger::MemoryLedger;
pub use sled_ledger::SledLedger;
