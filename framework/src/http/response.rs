use crate::error::FrameworkError;
use bytes::Bytes;
use http_body_util::Full;
use serde::Serialize;

/// HTTP Response builder
#[derive(Debug)]
pub struct HttpResponse {
    status: u16,
    body: String,
    headers: Vec<(String, String)>,
}

/// Response type alias - allows using `?` operator for early returns
pub type Response = Result<HttpResponse, HttpResponse>;

impl HttpResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            body: String::new(),
            headers: Vec::new(),
        }
    }

    /// Create a JSON response from a serde_json::Value
    pub fn json(body: serde_json::Value) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    /// Create a JSON response from any serializable value
    pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, FrameworkError> {
        let body = serde_json::to_string(value)
            .map_err(|e| FrameworkError::internal(format!("Failed to serialize response: {}", e)))?;
        Ok(Self {
            status: 200,
            body,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        })
    }

    /// Empty 204 response
    pub fn no_content() -> Self {
        Self::new().status(204)
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Convert to hyper response
    pub fn into_hyper(self) -> hyper::Response<Full<Bytes>> {
        let mut builder = hyper::Response::builder().status(self.status);

        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder
            .body(Full::new(Bytes::from(self.body)))
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "invalid response parts");
                let mut fallback = hyper::Response::new(Full::new(Bytes::new()));
                *fallback.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
                fallback
            })
    }
}

impl Default for HttpResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Auto-convert FrameworkError to HttpResponse
///
/// This is the single place errors are classified. Anticipated errors are
/// serialized with their name, message and details; anything else is logged
/// and replaced by a generic internal error body.
impl From<FrameworkError> for HttpResponse {
    fn from(err: FrameworkError) -> HttpResponse {
        if !err.is_expected() {
            tracing::error!(error = %err, "unexpected error");
        }
        HttpResponse::json(err.to_json()).status(err.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_keeps_status() {
        let response: HttpResponse = FrameworkError::not_found("Item").into();
        assert_eq!(response.status_code(), 404);
        assert!(response.body().contains("NotFoundError"));
    }

    #[test]
    fn test_serialize_sets_json_content_type() {
        let response = HttpResponse::serialize(&vec![1, 2, 3]).unwrap();
        assert_eq!(response.body(), "[1,2,3]");
        assert!(response
            .headers()
            .iter()
            .any(|(k, v)| k == "Content-Type" && v == "application/json"));
    }

    #[test]
    fn test_no_content() {
        let response = HttpResponse::no_content();
        assert_eq!(response.status_code(), 204);
        assert!(response.body().is_empty());
    }
}
