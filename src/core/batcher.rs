// Turns a payload into a backward-linked chain of signed chunk records.
//
// Records are produced and submitted strictly in order: record i names record
// i-1 in its linkage tag, and only the last one is marked as the head. A
// reader needs the head's address to walk the chain back to position 0.

use crate::core::{Chunker, ChunkLink};
use crate::error::{Result, WeaveError};
use crate::network::{Ledger, Transactor};
use crate::wallet::Signer;
use log::{debug, info, warn};
use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Owns its [`Transactor`] the way [`crate::core::Combiner`] owns its ledger;
/// hand it a `Transactor<&L>` to keep using the ledger afterwards.
pub struct Batcher<'a, L: Ledger, S: Signer + ?Sized, R: Read> {
    transactor: Transactor<L>,
    signer: &'a S,
    chunker: Chunker<R>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a, L: Ledger, S: Signer + ?Sized, R: Read> Batcher<'a, L, S, R> {
    pub fn new(transactor: Transactor<L>, signer: &'a S, reader: R, total_size: u64) -> Self {
        Batcher {
            transactor,
            signer,
            chunker: Chunker::new(reader, total_size),
            cancel: None,
        }
    }

    pub fn with_max_chunk_size(mut self, max_chunk_size: u64) -> Result<Self> {
        self.chunker.set_max_chunk_size(max_chunk_size)?;
        Ok(self)
    }

    /// Checked between chunks. Setting it stops the batch before the next
    /// record is built; records already submitted stay on the ledger.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn total_chunks(&self) -> u64 {
        self.chunker.total_chunks()
    }

    pub fn transactor(&self) -> &Transactor<L> {
        &self.transactor
    }

    /// Submit every chunk and return the record addresses in production
    /// order. The last address is the head of the chain.
    pub fn send_batch(&mut self) -> Result<Vec<String>> {
        let total_chunks = self.chunker.total_chunks();
        if total_chunks == 0 {
            return Err(WeaveError::InvalidInput(
                "nothing to upload: the payload is empty".to_string(),
            ));
        }

        let mut submitted: Vec<String> = Vec::new();
        loop {
            if self.is_cancelled() {
                warn!(
                    "Batch cancelled after {}/{total_chunks} chunk(s)",
                    submitted.len()
                );
                return Err(WeaveError::Cancelled { submitted });
            }

            let previous = submitted.last().map(String::as_str).unwrap_or("");
            match self.send_next(previous, total_chunks) {
                Ok(Some(id)) => {
                    info!(
                        "Submitted chunk {}/{total_chunks} as {id}",
                        submitted.len() + 1
                    );
                    submitted.push(id);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Batch aborted after {} chunk(s): {e}", submitted.len());
                    return Err(WeaveError::BatchAborted {
                        submitted,
                        source: Box::new(e),
                    });
                }
            }
        }

        info!(
            "Batch complete: {} record(s), head {}",
            submitted.len(),
            submitted.last().map(String::as_str).unwrap_or("")
        );
        Ok(submitted)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    // Build, sign and submit the record for the next chunk. `None` once the
    // chunker is drained.
    fn send_next(&mut self, previous: &str, total_chunks: u64) -> Result<Option<String>> {
        let chunk = match self.chunker.next_chunk()? {
            Some(chunk) => chunk,
            None => return Ok(None),
        };
        let position = chunk.get_position();
        let is_head = position + 1 == total_chunks;

        let mut builder = self
            .transactor
            .create_data_transaction(self.signer, chunk.to_envelope()?)?;
        builder.add_tag(ChunkLink::new(previous, is_head, position).to_tag()?);
        let tx = builder.sign(self.signer)?;
        debug!("Signed chunk {position} as {}", tx.id_string());

        self.transactor.send_transaction(&tx).map(Some)
    }
}
