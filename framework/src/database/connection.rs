//! Database connection management

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::sync::Arc;
use std::time::Duration;

use crate::database::config::DatabaseConfig;
use crate::error::FrameworkError;

/// Cheaply clonable handle to the SeaORM connection pool
///
/// Repositories receive one of these through their constructor.
///
/// # Example
///
/// ```rust,ignore
/// let conn = DbConnection::connect(&config.database).await?;
/// let todos = TodoRepository::new(conn.clone());
/// ```
#[derive(Clone)]
pub struct DbConnection {
    inner: Arc<DatabaseConnection>,
}

impl DbConnection {
    /// Open a connection pool from config
    ///
    /// SQLite database files (and their parent directories) are created on
    /// first use. In-memory SQLite is pinned to a single pooled connection,
    /// since every new connection would otherwise see an empty database.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, FrameworkError> {
        let url = sqlite_file_url(&config.url).unwrap_or_else(|| config.url.clone());

        let (max, min) = if config.is_in_memory() {
            (1, 1)
        } else {
            (config.max_connections, config.min_connections)
        };

        let mut opt = ConnectOptions::new(&url);
        opt.max_connections(max)
            .min_connections(min)
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .sqlx_logging(config.logging);
        if config.is_in_memory() {
            // Dropping the last connection would drop the database with it
            opt.idle_timeout(Duration::from_secs(u32::MAX as u64))
                .max_lifetime(Duration::from_secs(u32::MAX as u64));
        }

        let conn = Database::connect(opt)
            .await
            .map_err(|e| FrameworkError::database(e.to_string()))?;

        tracing::info!(
            backend = ?conn.get_database_backend(),
            max_connections = max,
            "database connected"
        );

        Ok(Self::new(conn))
    }

    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            inner: Arc::new(conn),
        }
    }

    /// Get a reference to the underlying SeaORM connection
    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }
}

/// Rewrite `sqlite://path` into the `sqlite:path?mode=rwc` form, creating
/// the file if needed. Returns `None` for non-file URLs.
fn sqlite_file_url(url: &str) -> Option<String> {
    let path = url.strip_prefix("sqlite://")?;
    let path = path.trim_start_matches("./");
    if path.starts_with(":memory:") {
        return None;
    }

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(dir = %parent.display(), error = %e, "could not create database directory");
            }
        }
    }

    Some(format!("sqlite:{}?mode=rwc", path))
}

impl AsRef<DatabaseConnection> for DbConnection {
    fn as_ref(&self) -> &DatabaseConnection {
        &self.inner
    }
}

impl std::ops::Deref for DbConnection {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
