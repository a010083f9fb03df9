use crate::core::{Tag, Transaction};
use crate::error::{Result, WeaveError};
use serde::{Deserialize, Serialize};

/// Name of the tag that links a chunk record to its predecessor
pub const CHUNKER_TAG_NAME: &str = "chunker";

/// Version written into every linkage tag
pub const CHUNKER_VERSION: &str = "0.0.1";

/// Chain metadata carried as JSON in the `chunker` tag value.
///
/// Links point backward: each record names the one produced before it, and
/// only the last produced record is the head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkLink {
    pub previous_chunk: String,
    pub is_head: bool,
    pub version: String,
    pub position: u64,
}

impl ChunkLink {
    pub fn new(previous_chunk: impl Into<String>, is_head: bool, position: u64) -> ChunkLink {
        ChunkLink {
            previous_chunk: previous_chunk.into(),
            is_head,
            version: CHUNKER_VERSION.to_string(),
            position,
        }
    }

    pub fn is_first(&self) -> bool {
        self.previous_chunk.is_empty()
    }

    pub fn to_tag(&self) -> Result<Tag> {
        Ok(Tag::new(CHUNKER_TAG_NAME, serde_json::to_vec(self)?))
    }

    /// Read the linkage tag off a fetched record
    pub fn from_transaction(tx: &Transaction) -> Result<ChunkLink> {
        let tag = tx.find_tag(CHUNKER_TAG_NAME).ok_or_else(|| {
            WeaveError::Protocol(format!(
                "record {} has no `{CHUNKER_TAG_NAME}` linkage tag",
                tx.id_string()
            ))
        })?;
        serde_json::from_slice(tag.get_value()).map_err(|e| {
            WeaveError::Protocol(format!(
                "record {} has a malformed linkage tag: {e}",
                tx.id_string()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_value_uses_wire_field_names() {
        let link = ChunkLink::new("prev-id", true, 4);
        let tag = link.to_tag().unwrap();
        assert!(tag.name_is(CHUNKER_TAG_NAME));

        let value: serde_json::Value = serde_json::from_slice(tag.get_value()).unwrap();
        assert_eq!(value["previous_chunk"], "prev-id");
        assert_eq!(value["is_head"], true);
        assert_eq!(value["version"], CHUNKER_VERSION);
        assert_eq!(value["position"], 4);
    }

    #[test]
    fn test_first_link() {
        assert!(ChunkLink::new("", false, 0).is_first());
        assert!(!ChunkLink::new("x", false, 1).is_first());
    }
}
