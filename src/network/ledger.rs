//! The ledger collaborator
//!
//! The batcher and combiner only ever talk to a ledger through [`Ledger`], so
//! an HTTP client, the in-process ledgers in [`crate::storage`] and test
//! doubles are interchangeable.

use crate::core::Transaction;
use crate::error::{Result, WeaveError};
use log::debug;
use std::sync::Arc;

/// Read/write access to a ledger node.
///
/// Implementations report a missing record as [`WeaveError::NotFound`] and any
/// other failure as [`WeaveError::Transport`]. Nothing here retries.
pub trait Ledger {
    /// Fetch a record by its address (base64url id).
    fn fetch_record(&self, address: &str) -> Result<Transaction>;

    /// Submit a signed record in wire JSON form. Returns the node's response token.
    fn submit_record(&self, signed: &[u8]) -> Result<String>;

    /// The anchor (`last_tx`) the next record from `address` must carry.
    fn fetch_account_anchor(&self, address: &str) -> Result<String>;

    /// Fee, as a decimal string, for a record carrying `payload_size` bytes.
    fn fetch_fee(&self, payload_size: usize) -> Result<String>;
}

impl<L: Ledger + ?Sized> Ledger for &L {
    fn fetch_record(&self, address: &str) -> Result<Transaction> {
        (**self).fetch_record(address)
    }

    fn submit_record(&self, signed: &[u8]) -> Result<String> {
        (**self).submit_record(signed)
    }

    fn fetch_account_anchor(&self, address: &str) -> Result<String> {
        (**self).fetch_account_anchor(address)
    }

    fn fetch_fee(&self, payload_size: usize) -> Result<String> {
        (**self).fetch_fee(payload_size)
    }
}

impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    fn fetch_record(&self, address: &str) -> Result<Transaction> {
        (**self).fetch_record(address)
    }

    fn submit_record(&self, signed: &[u8]) -> Result<String> {
        (**self).submit_record(signed)
    }

    fn fetch_account_anchor(&self, address: &str) -> Result<String> {
        (**self).fetch_account_anchor(address)
    }

    fn fetch_fee(&self, payload_size: usize) -> Result<String> {
        (**self).fetch_fee(payload_size)
    }
}

/// Linear pricing used by the bundled ledgers: `base + per_byte * size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub base: u64,
    pub per_byte: u64,
}

impl FeeSchedule {
    pub fn new(base: u64, per_byte: u64) -> Self {
        Self { base, per_byte }
    }

    pub fn fee_for(&self, payload_size: usize) -> String {
        let fee = u128::from(self.base) + u128::from(self.per_byte) * payload_size as u128;
        fee.to_string()
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self::new(1_000, 10)
    }
}

/// Decode a submitted record and check its signature. Every bundled ledger
/// runs submissions through this before storing them.
pub fn accept_submission(signed: &[u8]) -> Result<Transaction> {
    let tx = Transaction::from_json_bytes(signed)?;
    tx.verify()?;
    debug!(
        "Accepted record {} from {} ({} data bytes)",
        tx.id_string(),
        tx.owner_address(),
        tx.get_data().len()
    );
    Ok(tx)
}

/// A record's anchor must be empty (first record of an account) or name a
/// record the ledger already holds.
pub fn check_anchor<F>(tx: &Transaction, is_known: F) -> Result<()>
where
    F: Fn(&str) -> Result<bool>,
{
    let anchor = tx.get_last_tx();
    if anchor.is_empty() || is_known(anchor)? {
        return Ok(());
    }
    Err(WeaveError::Transport(format!(
        "record {} is anchored to unknown record `{anchor}`",
        tx.id_string()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransactionBuilder;
    use crate::testnet::load_test_wallet;

    #[test]
    fn test_fee_schedule() {
        let fees = FeeSchedule::new(5, 2);
        assert_eq!(fees.fee_for(0), "5");
        assert_eq!(fees.fee_for(10), "25");
        assert_eq!(FeeSchedule::new(u64::MAX, u64::MAX).fee_for(2).len(), 20);
    }

    #[test]
    fn test_accept_submission_checks_signature() {
        let wallet = load_test_wallet();
        let tx = TransactionBuilder::new("", wallet.get_modulus().clone(), "0", "", b"x".to_vec(), "1")
            .sign(&wallet)
            .unwrap();
        let accepted = accept_submission(&tx.to_json_bytes().unwrap()).unwrap();
        assert_eq!(accepted, tx);

        let mut json = tx.to_json();
        json.reward = "2".to_string();
        let tampered = serde_json::to_vec(&json).unwrap();
        assert!(matches!(
            accept_submission(&tampered),
            Err(WeaveError::Crypto(_))
        ));
        assert!(accept_submission(b"not json").is_err());
    }

    #[test]
    fn test_check_anchor() {
        let wallet = load_test_wallet();
        let tx = TransactionBuilder::new("AAAA", wallet.get_modulus().clone(), "0", "", vec![], "1")
            .sign(&wallet)
            .unwrap();
        assert!(check_anchor(&tx, |anchor| Ok(anchor == "AAAA")).is_ok());
        assert!(check_anchor(&tx, |_| Ok(false)).is_err());
    }
}
