use crate::core::{Transaction, TransactionBuilder};
use crate::error::{Result, WeaveError};
use crate::network::Ledger;
use crate::wallet::Signer;
use log::info;

/// Quantity used for records that carry data but move no value
pub const NO_TRANSFER: &str = "0";

/// Builds records against a ledger's current state and submits them once signed
pub struct Transactor<L: Ledger> {
    client: L,
}

impl<L: Ledger> Transactor<L> {
    pub fn new(client: L) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &L {
        &self.client
    }

    /// Start a record from `signer`, taking the anchor and the fee from the ledger.
    pub fn create_transaction<S: Signer + ?Sized>(
        &self,
        signer: &S,
        quantity: &str,
        data: Vec<u8>,
        target: &str,
    ) -> Result<TransactionBuilder> {
        let last_tx = self.client.fetch_account_anchor(signer.address())?;
        let reward = self.client.fetch_fee(data.len())?;

        Ok(TransactionBuilder::new(
            last_tx,
            signer.owner().clone(),
            quantity,
            target,
            data,
            reward,
        ))
    }

    /// A record that only stores `data`
    pub fn create_data_transaction<S: Signer + ?Sized>(
        &self,
        signer: &S,
        data: Vec<u8>,
    ) -> Result<TransactionBuilder> {
        self.create_transaction(signer, NO_TRANSFER, data, "")
    }

    /// Serialize to wire JSON and hand it to the ledger
    pub fn send_transaction(&self, tx: &Transaction) -> Result<String> {
        if tx.get_signature().is_empty() {
            return Err(WeaveError::InvalidInput(format!(
                "record {} is missing its signature",
                tx.id_string()
            )));
        }
        let serialized = tx.to_json_bytes()?;
        let response = self.client.submit_record(&serialized)?;
        info!("Submitted record {} ({} bytes)", tx.id_string(), serialized.len());
        Ok(response)
    }
}
