pub mod app;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod logging;
pub mod routing;
pub mod server;
pub mod testing;

pub use crate::app::{Application, BoxError, NoMigrator};
pub use crate::config::{AppConfig, Config, DatabaseConfig, Environment, LogFormat, ServerConfig};
pub use crate::database::DbConnection;
pub use crate::error::{FrameworkError, ValidationErrors};
pub use crate::http::{HttpResponse, Request, Response};
pub use crate::routing::Router;
pub use crate::server::Server;

