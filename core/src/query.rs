//! GET payload codec.
//!
//! A GET request cannot carry a body, so its wire payload travels in the URI
//! as a single query parameter: the JSON text of the payload, base64url
//! encoded (URL-safe alphabet, no padding), under the name `payload`. This is
//! the only encoding the client emits; servers decode it with
//! [`decode_payload`].

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;
use thiserror::Error;

/// Query parameter that carries a GET payload.
pub const PAYLOAD_PARAM: &str = "payload";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn encode_payload(payload: &Value) -> Result<String, serde_json::Error> {
    Ok(URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload)?))
}

pub fn decode_payload(encoded: &str) -> Result<Value, QueryError> {
    let bytes = URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Append `payload` to `uri`, keeping any query the URI already carries.
pub fn append_payload(uri: &str, payload: &Value) -> Result<String, serde_json::Error> {
    let separator = if uri.contains('?') { '&' } else { '?' };
    Ok(format!(
        "{uri}{separator}{PAYLOAD_PARAM}={}",
        encode_payload(payload)?
    ))
}
