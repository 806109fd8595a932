//! Request body collection and decoding.
//!
//! Bodies are buffered in full before parsing. The content type picks the
//! decoder: anything containing `application/json` is parsed as JSON,
//! everything else as URL-encoded form data.

use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::header::CONTENT_TYPE;
use hyper::Request;
use serde_json::Value;
use thiserror::Error;

/// Decoded body: string keys mapped to JSON values. Form fields decode as
/// strings; JSON bodies may carry arbitrary value types.
pub type BodyMap = serde_json::Map<String, Value>;

/// Body decoding failure. Converted to a 500 at the handler boundary.
#[derive(Debug, Error)]
pub enum BodyError {
    #[error("failed to read request body: {0}")]
    Read(#[from] hyper::Error),
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid form body: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
}

/// Collect the whole request body and decode it per the content type.
pub async fn read_body(req: Request<Incoming>) -> Result<BodyMap, BodyError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let raw = req.collect().await?.to_bytes();
    decode_body(&raw, &content_type)
}

/// Decode an already-buffered body.
///
/// An empty JSON body decodes to an empty map. Non-object JSON (arrays,
/// scalars) also decodes to an empty map: field lookups on it miss, which
/// surfaces as a missing-parameter rejection rather than a decode error.
pub fn decode_body(raw: &[u8], content_type: &str) -> Result<BodyMap, BodyError> {
    if content_type.contains("application/json") {
        if raw.is_empty() {
            return Ok(BodyMap::new());
        }
        let value: Value = serde_json::from_slice(raw)?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Ok(BodyMap::new()),
        }
    } else {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(raw)?;
        Ok(pairs
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect())
    }
}
