use crate::core::{recombine, Chunk, ChunkLink};
use crate::error::{Result, WeaveError};
use crate::network::Ledger;
use log::{debug, info};
use std::collections::HashSet;
use std::io::Write;

/// Walks a chunk chain backward from its head and rebuilds the payload.
///
/// Nothing is written until the whole chain has been fetched and checked, so
/// a broken chain never produces partial output.
pub struct Combiner<L: Ledger> {
    ledger: L,
}

impl<L: Ledger> Combiner<L> {
    pub fn new(ledger: L) -> Combiner<L> {
        Combiner { ledger }
    }

    /// Fetch every chunk reachable from `head_address`, head first.
    pub fn get_all_chunks(&self, head_address: &str) -> Result<Vec<Chunk>> {
        let mut visited: HashSet<String> = HashSet::new();
        let mut chunks: Vec<Chunk> = Vec::new();
        let mut address = head_address.to_string();
        let mut expected_position: Option<u64> = None;

        loop {
            if !visited.insert(address.clone()) {
                return Err(WeaveError::Protocol(format!(
                    "chunk chain loops back to {address}"
                )));
            }

            let tx = self.ledger.fetch_record(&address)?;
            tx.verify()?;
            let link = ChunkLink::from_transaction(&tx)?;

            match expected_position {
                None if !link.is_head => {
                    return Err(WeaveError::Protocol(format!(
                        "{address} is not the head of a chunk chain"
                    )));
                }
                Some(_) if link.is_head => {
                    return Err(WeaveError::Protocol(format!(
                        "{address} is marked as head but sits inside the chain"
                    )));
                }
                Some(expected) if link.position != expected => {
                    return Err(WeaveError::Protocol(format!(
                        "{address} has position {}, expected {expected}",
                        link.position
                    )));
                }
                _ => {}
            }

            let chunk = Chunk::from_envelope(tx.get_data())?;
            if chunk.get_position() != link.position {
                return Err(WeaveError::Protocol(format!(
                    "{address} carries chunk {} but is linked as {}",
                    chunk.get_position(),
                    link.position
                )));
            }
            debug!("Fetched chunk {} from {address}", link.position);
            chunks.push(chunk);

            if link.is_first() {
                if link.position != 0 {
                    return Err(WeaveError::Protocol(format!(
                        "chain ends at {address} with position {}, not 0",
                        link.position
                    )));
                }
                break;
            }
            if link.position == 0 {
                return Err(WeaveError::Protocol(format!(
                    "{address} is position 0 but names a previous chunk"
                )));
            }

            expected_position = Some(link.position - 1);
            address = link.previous_chunk;
        }

        info!("Fetched {} chunk(s) from head {head_address}", chunks.len());
        Ok(chunks)
    }

    /// Write head-first `chunks` to `w` in payload order
    pub fn recombine<W: Write + ?Sized>(&self, chunks: &[Chunk], w: &mut W) -> Result<u64> {
        recombine(chunks.iter().rev(), w)
    }

    pub fn combine<W: Write + ?Sized>(&self, head_address: &str, w: &mut W) -> Result<u64> {
        let chunks = self.get_all_chunks(head_address)?;
        self.recombine(&chunks, w)
    }
}
