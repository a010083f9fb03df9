use crate::error::Result;
use crate::utils::{base64url_encode, decode_field};
use serde::{Deserialize, Serialize};

/// A name/value pair attached to a record. Both halves are opaque bytes;
/// order is significant because tags are part of the signed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    name: Vec<u8>,
    value: Vec<u8>,
}

/// Wire form of a tag, each half base64url encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagJson {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Tag {
        Tag {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn get_name(&self) -> &[u8] {
        self.name.as_slice()
    }

    pub fn get_value(&self) -> &[u8] {
        self.value.as_slice()
    }

    pub fn name_is(&self, name: &str) -> bool {
        self.name == name.as_bytes()
    }

    pub fn to_json(&self) -> TagJson {
        TagJson {
            name: base64url_encode(&self.name),
            value: base64url_encode(&self.value),
        }
    }

    pub fn from_json(json: &TagJson) -> Result<Tag> {
        Ok(Tag {
            name: decode_field("tags.name", &json.name)?,
            value: decode_field("tags.value", &json.value)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_form_is_base64url() {
        let tag = Tag::new("Content-Type", "text/plain");
        let json = tag.to_json();
        assert_eq!(json.name, "Q29udGVudC1UeXBl");
        assert_eq!(Tag::from_json(&json).unwrap(), tag);
        assert!(tag.name_is("Content-Type"));
    }

    #[test]
    fn test_bad_value_is_rejected() {
        let json = TagJson {
            name: "YQ".to_string(),
            value: "a=b".to_string(),
        };
        let err = Tag::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("tags.value"));
    }
}
