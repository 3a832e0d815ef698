//! Testing utilities
//!
//! - `expect!` macro for fluent assertions with clear expected/received output
//! - `TestDatabase` for isolated, migrated in-memory databases
//! - `TestClient` for driving a `Router` without opening a socket
//!
//! # Example
//!
//! ```rust,ignore
//! use kit::expect;
//! use kit::testing::{TestClient, TestDatabase};
//!
//! #[tokio::test]
//! async fn creates_a_todo() {
//!     let db = TestDatabase::new::<Migrator>().await.unwrap();
//!     let client = TestClient::new(routes::register(db.connection()));
//!
//!     let res = client.post("/todos", json!({ "title": "Groceries" })).await;
//!     expect!(res.status).to_equal(201);
//! }
//! ```

mod expect;

pub use expect::Expect;

use crate::database::{DatabaseConfig, DbConnection};
use crate::error::FrameworkError;
use crate::http::Request;
use crate::routing::Router;
use bytes::Bytes;
use sea_orm_migration::MigratorTrait;

/// A fresh SQLite in-memory database with all migrations applied
///
/// Each instance is fully isolated; dropping it drops the database.
pub struct TestDatabase {
    conn: DbConnection,
}

impl TestDatabase {
    pub async fn new<M: MigratorTrait>() -> Result<Self, FrameworkError> {
        let config = DatabaseConfig::builder()
            .url("sqlite::memory:")
            .connect_timeout(5)
            .logging(false)
            .build();
        let conn = DbConnection::connect(&config).await?;
        M::up(conn.inner(), None).await?;
        Ok(Self { conn })
    }

    /// A handle to pass into repositories under test
    pub fn connection(&self) -> DbConnection {
        self.conn.clone()
    }
}

/// Response captured by [`TestClient`]
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub body: String,
}

impl TestResponse {
    /// Body parsed as JSON; `Null` for an empty body
    pub fn json(&self) -> serde_json::Value {
        if self.body.is_empty() {
            return serde_json::Value::Null;
        }
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("response body is not JSON ({}): {}", e, self.body))
    }
}

/// Sends requests straight into [`Router::dispatch`]
pub struct TestClient<S> {
    router: Router<S>,
}

impl<S> TestClient<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new(router: Router<S>) -> Self {
        Self { router }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: serde_json::Value) -> TestResponse {
        self.send("PATCH", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send("DELETE", uri, None).await
    }

    /// Send a raw body, e.g. to exercise malformed JSON handling
    pub async fn send_raw(&self, method: &str, uri: &str, body: &'static str) -> TestResponse {
        self.dispatch(method, uri, Bytes::from_static(body.as_bytes()))
            .await
    }

    async fn send(&self, method: &str, uri: &str, body: Option<serde_json::Value>) -> TestResponse {
        let bytes = body
            .map(|b| Bytes::from(b.to_string()))
            .unwrap_or_default();
        self.dispatch(method, uri, bytes).await
    }

    async fn dispatch(&self, method: &str, uri: &str, body: Bytes) -> TestResponse {
        let (parts, ()) = hyper::Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(())
            .unwrap_or_else(|e| panic!("invalid test request {} {}: {}", method, uri, e))
            .into_parts();

        let response = self.router.dispatch(Request::new(parts, body)).await;
        TestResponse {
            status: response.status_code(),
            body: response.body().to_string(),
        }
    }
}
