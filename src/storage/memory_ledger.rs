use crate::core::Transaction;
use crate::error::{Result, WeaveError};
use crate::network::{accept_submission, check_anchor, FeeSchedule, Ledger};
use log::info;
use std::collections::HashMap;
use std::sync::RwLock;

/// An in-process ledger. Records live in memory for the lifetime of the value.
///
/// ( K -> record id, V => Transaction ) plus ( K -> owner address, V => latest id )
pub struct MemoryLedger {
    records: RwLock<HashMap<String, Transaction>>,
    anchors: RwLock<HashMap<String, String>>,
    fees: FeeSchedule,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    pub fn new() -> MemoryLedger {
        Self::with_fee_schedule(FeeSchedule::default())
    }

    pub fn with_fee_schedule(fees: FeeSchedule) -> MemoryLedger {
        MemoryLedger {
            records: RwLock::new(HashMap::new()),
            anchors: RwLock::new(HashMap::new()),
            fees,
        }
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        self.fees
    }

    pub fn contains(&self, id: &str) -> Result<bool> {
        let records = self.records.read().map_err(|_| poisoned("records"))?;
        Ok(records.contains_key(id))
    }

    pub fn len(&self) -> Result<usize> {
        let records = self.records.read().map_err(|_| poisoned("records"))?;
        Ok(records.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned(what: &str) -> WeaveError {
    log::error!("Failed to acquire lock on memory ledger {what}");
    WeaveError::Database(format!("memory ledger {what} lock poisoned"))
}

impl Ledger for MemoryLedger {
    fn fetch_record(&self, address: &str) -> Result<Transaction> {
        let records = self.records.read().map_err(|_| poisoned("records"))?;
        records
            .get(address)
            .cloned()
            .ok_or_else(|| WeaveError::NotFound(address.to_string()))
    }

    fn submit_record(&self, signed: &[u8]) -> Result<String> {
        let tx = accept_submission(signed)?;
        let id = tx.id_string();
        let owner = tx.owner_address();

        let mut records = self.records.write().map_err(|_| poisoned("records"))?;
        if records.contains_key(&id) {
            return Ok(id);
        }
        check_anchor(&tx, |anchor| Ok(records.contains_key(anchor)))?;
        records.insert(id.clone(), tx);
        drop(records);

        let mut anchors = self.anchors.write().map_err(|_| poisoned("anchors"))?;
        anchors.insert(owner.clone(), id.clone());
        info!("Memory ledger stored record {id} for {owner}");
        Ok(id)
    }

    fn fetch_account_anchor(&self, address: &str) -> Result<String> {
        let anchors = self.anchors.read().map_err(|_| poisoned("anchors"))?;
        Ok(anchors.get(address).cloned().unwrap_or_default())
    }

    fn fetch_fee(&self, payload_size: usize) -> Result<String> {
        Ok(self.fees.fee_for(payload_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TransactionBuilder;
    use crate::testnet::load_test_wallet;
    use crate::utils::base64url_encode;

    #[test]
    fn test_unknown_record_is_not_found() {
        let ledger = MemoryLedger::new();
        assert!(matches!(
            ledger.fetch_record("nope"),
            Err(WeaveError::NotFound(_))
        ));
        assert_eq!(ledger.fetch_account_anchor("someone").unwrap(), "");
        assert!(ledger.is_empty().unwrap());
    }

    #[test]
    fn test_resubmission_is_idempotent() {
        let ledger = MemoryLedger::new();
        let wallet = load_test_wallet();
        let tx = TransactionBuilder::new("", wallet.get_modulus().clone(), "0", "", b"x".to_vec(), "1")
            .sign(&wallet)
            .unwrap();
        let body = tx.to_json_bytes().unwrap();

        assert_eq!(ledger.submit_record(&body).unwrap(), tx.id_string());
        assert_eq!(ledger.submit_record(&body).unwrap(), tx.id_string());
        assert_eq!(ledger.len().unwrap(), 1);
        assert_eq!(
            ledger.fetch_account_anchor(wallet.get_address()).unwrap(),
            tx.id_string()
        );
    }

    #[test]
    fn test_unknown_anchor_rejected() {
        let ledger = MemoryLedger::new();
        let wallet = load_test_wallet();
        let tx = TransactionBuilder::new(
            base64url_encode(&[1u8; 32]),
            wallet.get_modulus().clone(),
            "0",
            "",
            vec![],
            "1",
        )
        .sign(&wallet)
        .unwrap();
        assert!(matches!(
            ledger.submit_record(&tx.to_json_bytes().unwrap()),
            Err(WeaveError::Transport(_))
        ));
        assert!(ledger.is_empty().unwrap());
    }
}
