use super::body::{parse_json, parse_query};
use super::ParamError;
use crate::error::FrameworkError;
use bytes::Bytes;
use http::request::Parts;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;

/// HTTP Request with its body already collected
///
/// The server reads the body (bounded by `ServerConfig::max_body_size`)
/// before dispatch, so handlers can parse it synchronously and tests can
/// build requests without a socket.
pub struct Request {
    parts: Parts,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub fn new(parts: Parts, body: Bytes) -> Self {
        Self {
            parts,
            body,
            params: HashMap::new(),
        }
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn method(&self) -> &http::Method {
        &self.parts.method
    }

    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Raw query string without the leading `?`
    pub fn query_string(&self) -> &str {
        self.parts.uri.query().unwrap_or("")
    }

    /// Get a route parameter by name (e.g., /todos/{id})
    /// Returns Err(ParamError) if the parameter is missing, enabling use of `?` operator
    pub fn param(&self, name: &str) -> Result<&str, ParamError> {
        self.params
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| ParamError {
                param_name: name.to_string(),
            })
    }

    /// Get a route parameter parsed into `T`
    ///
    /// Fails with `ParamParse` (400) when the value does not parse.
    pub fn param_as<T: FromStr>(&self, name: &str) -> Result<T, FrameworkError> {
        let raw = self.param(name)?;
        raw.parse()
            .map_err(|_| FrameworkError::param_parse(name, raw, std::any::type_name::<T>()))
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parse the request body as JSON
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// #[derive(Deserialize)]
    /// struct CreateTodo { title: String }
    ///
    /// pub async fn store(state: AppState, req: Request) -> Response {
    ///     let data: CreateTodo = req.json()?;
    ///     // ...
    /// }
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        parse_json(&self.body)
    }

    /// Parse the query string into a typed struct
    ///
    /// Missing keys map to `None` for `Option` fields; values are parsed
    /// from their string form (`limit=5`, `isCompleted=true`).
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        parse_query(self.query_string())
    }
}
