//! Shared fixtures for unit tests

use crate::core::Transaction;
use crate::error::{Result, WeaveError};
use crate::network::Ledger;
use crate::storage::MemoryLedger;
use crate::wallet::Wallet;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

/// 2048-bit RSA key as a JWK
pub const WALLET_A_JWK: &str = include_str!("../../tests/fixtures/wallet_a.json");
/// Same key as `WALLET_A_JWK`, PKCS#8 DER
pub const WALLET_A_PKCS8: &[u8] = include_bytes!("../../tests/fixtures/wallet_a.pk8");
pub const WALLET_A_ADDRESS: &str = "WRgDiinoZU6_HiVKLT7c3KfKgmNFe1j0OEGdDW8l-v8";

pub const WALLET_B_JWK: &str = include_str!("../../tests/fixtures/wallet_b.json");
pub const WALLET_B_ADDRESS: &str = "ZImx1C0bjqW64TEFOMzGv8AufxhTsC66SGCKY28MZJ0";

pub fn load_test_wallet() -> Wallet {
    Wallet::from_jwk_str(WALLET_A_JWK).unwrap()
}

pub fn load_second_test_wallet() -> Wallet {
    Wallet::from_jwk_str(WALLET_B_JWK).unwrap()
}

/// A memory ledger that starts refusing submissions after `accept` of them
/// went through.
pub struct FlakyLedger {
    inner: MemoryLedger,
    accept: usize,
    accepted: AtomicUsize,
}

impl FlakyLedger {
    pub fn new(accept: usize) -> FlakyLedger {
        FlakyLedger {
            inner: MemoryLedger::new(),
            accept,
            accepted: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &MemoryLedger {
        &self.inner
    }
}

impl Ledger for FlakyLedger {
    fn fetch_record(&self, address: &str) -> Result<Transaction> {
        self.inner.fetch_record(address)
    }

    fn submit_record(&self, signed: &[u8]) -> Result<String> {
        if self.accepted.load(Ordering::SeqCst) >= self.accept {
            return Err(WeaveError::Transport("connection reset".to_string()));
        }
        let id = self.inner.submit_record(signed)?;
        self.accepted.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    fn fetch_account_anchor(&self, address: &str) -> Result<String> {
        self.inner.fetch_account_anchor(address)
    }

    fn fetch_fee(&self, payload_size: usize) -> Result<String> {
        self.inner.fetch_fee(payload_size)
    }
}

/// A memory ledger that raises a cancellation flag once `cancel_after`
/// submissions went through, the way a user interrupting an upload would.
pub struct CancellingLedger {
    inner: MemoryLedger,
    cancel_after: usize,
    accepted: AtomicUsize,
    flag: Arc<AtomicBool>,
}

impl CancellingLedger {
    pub fn new(cancel_after: usize, flag: Arc<AtomicBool>) -> CancellingLedger {
        CancellingLedger {
            inner: MemoryLedger::new(),
            cancel_after,
            accepted: AtomicUsize::new(0),
            flag,
        }
    }

    pub fn inner(&self) -> &MemoryLedger {
        &self.inner
    }
}

impl Ledger for CancellingLedger {
    fn fetch_record(&self, address: &str) -> Result<Transaction> {
        self.inner.fetch_record(address)
    }

    fn submit_record(&self, signed: &[u8]) -> Result<String> {
        let id = self.inner.submit_record(signed)?;
        if self.accepted.fetch_add(1, Ordering::SeqCst) + 1 >= self.cancel_after {
            self.flag.store(true, Ordering::SeqCst);
        }
        Ok(id)
    }

    fn fetch_account_anchor(&self, address: &str) -> Result<String> {
        self.inner.fetch_account_anchor(address)
    }

    fn fetch_fee(&self, payload_size: usize) -> Result<String> {
        self.inner.fetch_fee(payload_size)
    }
}

/// Serves hand-placed records under arbitrary addresses, for chains a real
/// ledger could never hold (cycles, mislabelled positions).
#[derive(Default)]
pub struct ScriptedLedger {
    records: RwLock<HashMap<String, Transaction>>,
}

impl ScriptedLedger {
    pub fn new() -> ScriptedLedger {
        ScriptedLedger::default()
    }

    pub fn insert(&self, address: &str, tx: Transaction) {
        self.records
            .write()
            .unwrap()
            .insert(address.to_string(), tx);
    }
}

impl Ledger for ScriptedLedger {
    fn fetch_record(&self, address: &str) -> Result<Transaction> {
        self.records
            .read()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| WeaveError::NotFound(address.to_string()))
    }

    fn submit_record(&self, _signed: &[u8]) -> Result<String> {
        Err(WeaveError::Transport("scripted ledger is read-only".to_string()))
    }

    fn fetch_account_anchor(&self, _address: &str) -> Result<String> {
        Ok(String::new())
    }

    fn fetch_fee(&self, _payload_size: usize) -> Result<String> {
        Ok("0".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_addresses() {
        assert_eq!(load_test_wallet().get_address(), WALLET_A_ADDRESS);
        assert_eq!(load_second_test_wallet().get_address(), WALLET_B_ADDRESS);
    }

    #[test]
    fn test_flaky_ledger_refuses_after_limit() {
        let ledger = FlakyLedger::new(0);
        assert!(matches!(
            ledger.submit_record(b"{}"),
            Err(WeaveError::Transport(_))
        ));
    }
}
