//! Error handling for the weave client
//!
//! Every fallible operation in the crate returns [`WeaveError`]. None of these
//! errors are retried locally; they abort the current signing, batch or
//! reconstruction and are handed back to the caller.

use std::fmt;

/// Result type alias for weave client operations
pub type Result<T> = std::result::Result<T, WeaveError>;

/// Error types for record signing, chunk chaining and ledger access
#[derive(Debug, Clone)]
pub enum WeaveError {
    /// Malformed base64url or JSON in a record field
    Encoding(String),
    /// Caller supplied an argument that can never succeed
    InvalidInput(String),
    /// Key rejected, signing failed, or a signature did not verify
    Crypto(String),
    /// Chunk chain production or reconstruction broke an ordering rule
    Protocol(String),
    /// The ledger has no record at the requested address
    NotFound(String),
    /// The ledger collaborator failed for any other reason
    Transport(String),
    /// Embedded database errors
    Database(String),
    /// Serialization errors outside of record decoding
    Serialization(String),
    /// File I/O errors
    Io(String),
    /// Configuration errors
    Config(String),
    /// Key file could not be parsed
    Wallet(String),
    /// Batch stopped between chunks because cancellation was requested
    Cancelled { submitted: Vec<String> },
    /// Batch failed part way; `submitted` records are already on the ledger
    BatchAborted {
        submitted: Vec<String>,
        source: Box<WeaveError>,
    },
}

impl fmt::Display for WeaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeaveError::Encoding(msg) => write!(f, "Encoding error: {msg}"),
            WeaveError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            WeaveError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            WeaveError::Protocol(msg) => write!(f, "Protocol error: {msg}"),
            WeaveError::NotFound(addr) => write!(f, "Record not found: {addr}"),
            WeaveError::Transport(msg) => write!(f, "Transport error: {msg}"),
            WeaveError::Database(msg) => write!(f, "Database error: {msg}"),
            WeaveError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            WeaveError::Io(msg) => write!(f, "I/O error: {msg}"),
            WeaveError::Config(msg) => write!(f, "Configuration error: {msg}"),
            WeaveError::Wallet(msg) => write!(f, "Wallet error: {msg}"),
            WeaveError::Cancelled { submitted } => {
                write!(
                    f,
                    "Batch cancelled after {} submitted record(s)",
                    submitted.len()
                )
            }
            WeaveError::BatchAborted { submitted, source } => {
                write!(
                    f,
                    "Batch aborted after {} submitted record(s): {source}",
                    submitted.len()
                )
            }
        }
    }
}

impl std::error::Error for WeaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WeaveError::BatchAborted { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WeaveError {
    fn from(err: std::io::Error) -> Self {
        WeaveError::Io(err.to_string())
    }
}

impl From<sled::Error> for WeaveError {
    fn from(err: sled::Error) -> Self {
        WeaveError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for WeaveError {
    fn from(err: serde_json::Error) -> Self {
        WeaveError::Serialization(err.to_string())
    }
}

impl From<data_encoding::DecodeError> for WeaveError {
    fn from(err: data_encoding::DecodeError) -> Self {
        WeaveError::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_batch_aborted_exposes_source() {
        let err = WeaveError::BatchAborted {
            submitted: vec!["a".to_string(), "b".to_string()],
            source: Box::new(WeaveError::Transport("node offline".to_string())),
        };
        assert!(err.to_string().contains("2 submitted"));
        assert!(err.to_string().contains("node offline"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err: WeaveError = io.into();
        assert!(matches!(err, WeaveError::Io(_)));
    }
}
