// Splits a sequential byte source into bounded chunks and puts them back
// together. Sizes are counted in raw payload bytes, before any base64url
// expansion, so the chunk boundaries never depend on the wire encoding.

use crate::error::{Result, WeaveError};
use crate::utils::{base64url_encode, decode_field};
use log::debug;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

pub const KB: u64 = 1 << 10;

/// Raw bytes per chunk by default: what fits in 750 KiB once base64url encoded.
pub const DEFAULT_MAX_CHUNK_SIZE: u64 = 750 * KB * 3 / 4;

/// One piece of a payload, tagged with where it sits in the sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    data: Vec<u8>,
    position: u64,
}

// What goes into a record's data field
#[derive(Debug, Serialize, Deserialize)]
struct ChunkEnvelope {
    data: String,
    position: u64,
}

impl Chunk {
    pub fn new(data: Vec<u8>, position: u64) -> Chunk {
        Chunk { data, position }
    }

    pub fn get_data(&self) -> &[u8] {
        self.data.as_slice()
    }

    pub fn get_position(&self) -> u64 {
        self.position
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// `{"data": "<base64url>", "position": n}`
    pub fn to_envelope(&self) -> Result<Vec<u8>> {
        let envelope = ChunkEnvelope {
            data: base64url_encode(&self.data),
            position: self.position,
        };
        Ok(serde_json::to_vec(&envelope)?)
    }

    pub fn from_envelope(bytes: &[u8]) -> Result<Chunk> {
        let envelope: ChunkEnvelope = serde_json::from_slice(bytes)
            .map_err(|e| WeaveError::Encoding(format!("record data is not a chunk: {e}")))?;
        Ok(Chunk {
            data: decode_field("chunk.data", &envelope.data)?,
            position: envelope.position,
        })
    }
}

/// Pulls fixed-size chunks out of a reader whose total length is known up front.
///
/// Once `total_chunks` chunks have been produced the chunker is exhausted and
/// [`Chunker::next_chunk`] keeps returning `Ok(None)`.
pub struct Chunker<R: Read> {
    reader: R,
    total_size: u64,
    total_chunks: u64,
    current_chunk: u64,
    max_chunk_size: u64,
}

impl<R: Read> Chunker<R> {
    pub fn new(reader: R, total_size: u64) -> Chunker<R> {
        Chunker {
            reader,
            total_size,
            total_chunks: calculate_total_chunks(total_size, DEFAULT_MAX_CHUNK_SIZE),
            current_chunk: 0,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
        }
    }

    pub fn with_max_chunk_size(reader: R, total_size: u64, max_chunk_size: u64) -> Result<Chunker<R>> {
        let mut chunker = Chunker::new(reader, total_size);
        chunker.set_max_chunk_size(max_chunk_size)?;
        Ok(chunker)
    }

    /// Change the chunk size. Only allowed before the first chunk is read,
    /// since moving the boundaries mid-stream would break the positions.
    pub fn set_max_chunk_size(&mut self, max_chunk_size: u64) -> Result<()> {
        if max_chunk_size == 0 {
            return Err(WeaveError::InvalidInput(
                "maximum chunk size must be positive".to_string(),
            ));
        }
        if self.current_chunk != 0 {
            return Err(WeaveError::InvalidInput(format!(
                "cannot change chunk size after {} chunk(s) were read",
                self.current_chunk
            )));
        }
        self.max_chunk_size = max_chunk_size;
        self.total_chunks = calculate_total_chunks(self.total_size, max_chunk_size);
        Ok(())
    }

    pub fn size(&self) -> u64 {
        self.total_size
    }

    pub fn total_chunks(&self) -> u64 {
        self.total_chunks
    }

    pub fn max_chunk_size(&self) -> u64 {
        self.max_chunk_size
    }

    /// Position the next chunk will carry
    pub fn current_position(&self) -> u64 {
        self.current_chunk
    }

    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        if self.current_chunk >= self.total_chunks {
            return Ok(None);
        }

        let offset = self.current_chunk * self.max_chunk_size;
        let chunk_size = self.max_chunk_size.min(self.total_size - offset);

        // Grows with what the reader actually yields, not with what the
        // caller claimed the source holds
        let mut data = Vec::new();
        let read = (&mut self.reader)
            .take(chunk_size)
            .read_to_end(&mut data)
            .map_err(|e| WeaveError::Io(e.to_string()))?;
        if (read as u64) < chunk_size {
            return Err(WeaveError::Protocol(format!(
                "source ended early: chunk {} expected {chunk_size} bytes, got {read}",
                self.current_chunk
            )));
        }

        let chunk = Chunk::new(data, self.current_chunk);
        debug!(
            "Produced chunk {}/{} ({chunk_size} bytes)",
            self.current_chunk + 1,
            self.total_chunks
        );
        self.current_chunk += 1;
        Ok(Some(chunk))
    }

    /// Rewinds the position counter and drains every chunk. The reader itself
    /// is not rewound, so call this on a fresh chunker.
    pub fn chunk_all(&mut self) -> Result<Vec<Chunk>> {
        self.current_chunk = 0;
        let mut chunks = Vec::new();
        while let Some(chunk) = self.next_chunk()? {
            chunks.push(chunk);
        }
        Ok(chunks)
    }
}

impl<R: Read> Iterator for Chunker<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

fn calculate_total_chunks(total_size: u64, max_chunk_size: u64) -> u64 {
    total_size.div_ceil(max_chunk_size)
}

/// Write chunks to `w` in production order.
///
/// The first chunk must be position 0 and every following one exactly one
/// higher; a gap or repeat aborts before anything past it is written.
pub fn recombine<'a, I, W>(chunks: I, w: &mut W) -> Result<u64>
where
    I: IntoIterator<Item = &'a Chunk>,
    W: Write + ?Sized,
{
    let mut expected = 0u64;
    let mut written = 0u64;
    for chunk in chunks {
        if chunk.position != expected {
            return Err(WeaveError::Protocol(format!(
                "chunks not in order: expected position {expected}, found {}",
                chunk.position
            )));
        }
        w.write_all(&chunk.data)?;
        written += chunk.data.len() as u64;
        expected += 1;
    }
    w.flush()?;
    Ok(written)
}
