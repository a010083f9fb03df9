// Every binary field that leaves this crate goes through these two helpers,
// so the wire always sees unpadded base64url.

use crate::error::{Result, WeaveError};
use data_encoding::BASE64URL_NOPAD;

pub fn base64url_encode(data: &[u8]) -> String {
    BASE64URL_NOPAD.encode(data)
}

/// Decode unpadded base64url. The empty string is valid and decodes to no bytes.
pub fn base64url_decode(data: &str) -> Result<Vec<u8>> {
    BASE64URL_NOPAD
        .decode(data.as_bytes())
        .map_err(|e| WeaveError::Encoding(format!("Invalid base64url encoding: {e}")))
}

/// Like [`base64url_decode`] but names the offending field in the error.
pub fn decode_field(field: &str, data: &str) -> Result<Vec<u8>> {
    BASE64URL_NOPAD
        .decode(data.as_bytes())
        .map_err(|e| WeaveError::Encoding(format!("Field `{field}` is not valid base64url: {e}")))
}
