// A ledger that persists records in a Sled database on disk, so the CLI can
// upload in one run and download in another. Records are stored in their wire
// JSON form and re-verified on the way in, never trusted blindly.

use crate::core::Transaction;
use crate::error::{Result, WeaveError};
use crate::network::{accept_submission, check_anchor, FeeSchedule, Ledger};
use log::info;
use sled::{Db, Tree};
use std::path::{Path, PathBuf};

const RECORDS_TREE: &str = "records"; // record id -> wire JSON
const ANCHORS_TREE: &str = "anchors"; // owner address -> latest record id

#[derive(Clone)]
pub struct SledLedger {
    db: Db,
    records: Tree,
    anchors: Tree,
    fees: FeeSchedule,
    db_path: PathBuf,
}

impl SledLedger {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SledLedger> {
        Self::open_with_fee_schedule(path, FeeSchedule::default())
    }

    pub fn open_with_fee_schedule<P: AsRef<Path>>(path: P, fees: FeeSchedule) -> Result<SledLedger> {
        let db_path = path.as_ref().to_path_buf();
        let db = sled::open(&db_path)
            .map_err(|e| WeaveError::Database(format!("Failed to open ledger database: {e}")))?;
        let records = db
            .open_tree(RECORDS_TREE)
            .map_err(|e| WeaveError::Database(format!("Failed to open records tree: {e}")))?;
        let anchors = db
            .open_tree(ANCHORS_TREE)
            .map_err(|e| WeaveError::Database(format!("Failed to open anchors tree: {e}")))?;
        info!("Opened ledger at {}", db_path.display());

        Ok(SledLedger {
            db,
            records,
            anchors,
            fees,
            db_path,
        })
    }

    pub fn get_db_path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub fn count_records(&self) -> usize {
        self.records.len()
    }

    /// Raw wire JSON of a stored record
    pub fn fetch_record_json(&self, address: &str) -> Result<Vec<u8>> {
        self.records
            .get(address)?
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| WeaveError::NotFound(address.to_string()))
    }
}

impl Ledger for SledLedger {
    fn fetch_record(&self, address: &str) -> Result<Transaction> {
        let bytes = self.fetch_record_json(address)?;
        Transaction::from_json_bytes(&bytes)
    }

    fn submit_record(&self, signed: &[u8]) -> Result<String> {
        let tx = accept_submission(signed)?;
        let id = tx.id_string();
        if self.records.contains_key(id.as_bytes())? {
            return Ok(id);
        }
        check_anchor(&tx, |anchor| Ok(self.records.contains_key(anchor.as_bytes())?))?;

        // Store what we verified, re-encoded, not the caller's bytes
        self.records.insert(id.as_bytes(), tx.to_json_bytes()?)?;
        self.anchors
            .insert(tx.owner_address().as_bytes(), id.as_bytes())?;
        self.db.flush()?;
        info!("Ledger stored record {id}");
        Ok(id)
    }

    fn fetch_account_anchor(&self, address: &str) -> Result<String> {
        match self.anchors.get(address)? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map_err(|e| WeaveError::Database(format!("Invalid anchor format: {e}"))),
            None => Ok(String::new()),
        }
    }

    fn fetch_fee(&self, payload_size: usize) -> Result<String> {
        Ok(self.fees.fee_for(payload_size))
    }
}
