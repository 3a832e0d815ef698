//! Body parsing utilities for HTTP requests
//!
//! Provides async body collection and parsing for JSON bodies and
//! urlencoded query strings.

use crate::error::FrameworkError;
use bytes::Bytes;
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use serde::de::DeserializeOwned;

/// Collect the full body from an Incoming stream, refusing bodies over `limit` bytes
pub async fn collect_body(body: Incoming, limit: usize) -> Result<Bytes, FrameworkError> {
    Limited::new(body, limit)
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| {
            if e.downcast_ref::<http_body_util::LengthLimitError>().is_some() {
                FrameworkError::PayloadTooLarge { limit }
            } else {
                FrameworkError::internal(format!("Failed to read request body: {}", e))
            }
        })
}

/// Parse bytes as JSON into the target type
///
/// An empty body is treated as `{}` so that endpoints whose fields are all
/// optional accept a bare request.
pub fn parse_json<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, FrameworkError> {
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        &bytes[..]
    };
    serde_json::from_slice(bytes)
        .map_err(|e| FrameworkError::bad_request(format!("Invalid JSON body: {}", e)))
}

/// Parse a raw query string into the target type
pub fn parse_query<T: DeserializeOwned>(query: &str) -> Result<T, FrameworkError> {
    serde_urlencoded::from_str(query)
        .map_err(|e| FrameworkError::bad_request(format!("Invalid query string: {}", e)))
}
