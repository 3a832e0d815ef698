//! Framework-wide error types
//!
//! Provides a unified error type that can be used throughout the framework
//! and the application, and converts to a JSON HTTP response at the edge.
//!
//! Every error is classified into one of a small set of kinds when it
//! reaches the HTTP boundary:
//!
//! | Kind                    | Status | Variants                                         |
//! |-------------------------|--------|--------------------------------------------------|
//! | `NotFoundError`         | 404    | `NotFound`, `RouteNotFound`                      |
//! | `BadRequestError`       | 400    | `BadRequest`, `Validation`, `ParamParse`         |
//! | `PayloadTooLargeError`  | 413    | `PayloadTooLarge`                                |
//! | `InternalServerError`   | 500    | `Database`, `Internal`                           |

use std::collections::BTreeMap;
use thiserror::Error;

/// Message returned to clients for any unexpected failure
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Field-level validation errors
///
/// Contains a map of field names to error messages, supporting multiple
/// errors per field. Serialized as the `details` of a `BadRequestError`:
///
/// ```json
/// {
///     "error": {
///         "name": "BadRequestError",
///         "message": "The given data was invalid.",
///         "details": { "title": ["title must not be empty"] }
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    /// Map of field names to their validation error messages
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an error for a specific field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Convert from validator crate's ValidationErrors
    ///
    /// Nested list errors (e.g. `items[1].description`) are flattened into
    /// dotted field paths.
    pub fn from_validator(errors: validator::ValidationErrors) -> Self {
        let mut result = Self::new();
        result.collect(None, &errors);
        result
    }

    fn collect(&mut self, prefix: Option<&str>, errors: &validator::ValidationErrors) {
        use validator::ValidationErrorsKind;

        for (field, kind) in errors.errors() {
            let path = match prefix {
                Some(prefix) => format!("{}.{}", prefix, field),
                None => field.to_string(),
            };
            match kind {
                ValidationErrorsKind::Field(field_errors) => {
                    for error in field_errors {
                        let message = error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Validation failed for field '{}'", path));
                        self.add(path.clone(), message);
                    }
                }
                ValidationErrorsKind::Struct(nested) => self.collect(Some(&path), nested),
                ValidationErrorsKind::List(entries) => {
                    for (index, nested) in entries {
                        self.collect(Some(&format!("{}[{}]", path, index)), nested);
                    }
                }
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.errors)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Validation failed: {:?}", self.errors)
    }
}

impl std::error::Error for ValidationErrors {}

/// Framework-wide error type
///
/// `FrameworkError` implements `From` for `sea_orm::DbErr`, so store failures
/// propagate with `?` untouched until the HTTP boundary classifies them.
///
/// ```rust,ignore
/// use kit::FrameworkError;
///
/// pub async fn find(&self, id: i32) -> Result<todos::Model, FrameworkError> {
///     todos::Entity::find_by_id(id)
///         .one(self.db.inner())
///         .await?                                   // DbErr converts automatically
///         .ok_or_else(|| FrameworkError::not_found("Todo"))
/// }
/// ```
#[derive(Debug, Clone, Error)]
pub enum FrameworkError {
    /// A referenced entity does not exist (404)
    #[error("{message}")]
    NotFound { message: String },

    /// No route matches the request (404)
    #[error("Route {method} {path} not found")]
    RouteNotFound { method: String, path: String },

    /// Malformed or invalid input (400)
    #[error("{message}")]
    BadRequest { message: String },

    /// Field validation errors (400)
    #[error("The given data was invalid.")]
    Validation(ValidationErrors),

    /// A path parameter could not be parsed (400)
    #[error("Invalid parameter '{param}': expected {expected_type}, got '{value}'")]
    ParamParse {
        param: String,
        value: String,
        expected_type: &'static str,
    },

    /// Request body exceeds the configured limit (413)
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),

    /// Generic internal server error (500)
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl FrameworkError {
    /// Create a NotFound error for an entity, e.g. `not_found("Todo")`
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound {
            message: format!("{} not found", entity.into()),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn validation_errors(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }

    /// A path parameter `param` whose raw `value` is not a valid `expected_type`
    pub fn param_parse(
        param: impl Into<String>,
        value: impl Into<String>,
        expected_type: &'static str,
    ) -> Self {
        Self::ParamParse {
            param: param.into(),
            value: value.into(),
            expected_type,
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } | Self::RouteNotFound { .. } => 404,
            Self::BadRequest { .. } | Self::Validation(_) | Self::ParamParse { .. } => 400,
            Self::PayloadTooLarge { .. } => 413,
            Self::Database(_) | Self::Internal { .. } => 500,
        }
    }

    /// Error kind name used in the response envelope
    pub fn name(&self) -> &'static str {
        match self.status_code() {
            404 => "NotFoundError",
            400 => "BadRequestError",
            413 => "PayloadTooLargeError",
            _ => "InternalServerError",
        }
    }

    /// Whether this error is an anticipated client-facing condition
    ///
    /// Unexpected errors are logged and never expose their message.
    pub fn is_expected(&self) -> bool {
        self.status_code() < 500
    }

    /// Structured details attached to the error, if any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Validation(errors) => Some(errors.to_json()),
            _ => None,
        }
    }

    /// The `{"error": {...}}` body sent to clients
    pub fn to_json(&self) -> serde_json::Value {
        if !self.is_expected() {
            return serde_json::json!({
                "error": {
                    "name": self.name(),
                    "message": INTERNAL_ERROR_MESSAGE,
                }
            });
        }

        let mut error = serde_json::json!({
            "name": self.name(),
            "message": self.to_string(),
        });
        if let Some(details) = self.details() {
            error["details"] = details;
        }
        serde_json::json!({ "error": error })
    }
}

impl From<sea_orm::DbErr> for FrameworkError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<validator::ValidationErrors> for FrameworkError {
    fn from(e: validator::ValidationErrors) -> Self {
        Self::Validation(ValidationErrors::from_validator(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_codes() {
        assert_eq!(FrameworkError::not_found("Todo").status_code(), 404);
        assert_eq!(FrameworkError::bad_request("nope").status_code(), 400);
        assert_eq!(FrameworkError::param_parse("id", "x", "i32").status_code(), 400);
        assert_eq!(FrameworkError::database("gone").status_code(), 500);
        assert_eq!(FrameworkError::internal("boom").status_code(), 500);
    }

    #[test]
    fn test_not_found_envelope() {
        let body = FrameworkError::not_found("Todo").to_json();
        assert_eq!(
            body,
            serde_json::json!({
                "error": { "name": "NotFoundError", "message": "Todo not found" }
            })
        );
    }

    #[test]
    fn test_param_parse_names_the_parameter() {
        let body = FrameworkError::param_parse("todo_id", "abc", "i32").to_json();
        assert_eq!(
            body,
            serde_json::json!({
                "error": {
                    "name": "BadRequestError",
                    "message": "Invalid parameter 'todo_id': expected i32, got 'abc'"
                }
            })
        );
    }

    #[test]
    fn test_bad_request_has_no_details() {
        let body = FrameworkError::bad_request("Title is required").to_json();
        assert_eq!(body["error"]["message"], "Title is required");
        assert!(body["error"].get("details").is_none());
    }

    #[test]
    fn test_internal_errors_hide_detail() {
        let body = FrameworkError::database("connection refused on 10.0.0.3").to_json();
        assert_eq!(body["error"]["name"], "InternalServerError");
        assert_eq!(body["error"]["message"], INTERNAL_ERROR_MESSAGE);
        assert!(body["error"].get("details").is_none());
    }

    #[test]
    fn test_validation_errors_group_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "title must not be empty");
        errors.add("title", "title is too long");
        errors.add("status", "unknown status");

        let body = FrameworkError::validation_errors(errors).to_json();
        assert_eq!(body["error"]["name"], "BadRequestError");
        assert_eq!(body["error"]["details"]["title"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["error"]["details"]["status"][0], "unknown status");
    }
}
