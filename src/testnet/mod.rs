//! Test fixtures
//!
//! Fixture wallets loaded from `tests/fixtures/` and ledger doubles for
//! exercising batches and chain walks without a real node.

pub mod test_utils;

pub use test_utils::*;
