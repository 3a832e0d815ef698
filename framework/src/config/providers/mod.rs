mod app;
mod server;

pub use app::{AppConfig, AppConfigBuilder, LogFormat};
pub use server::{ServerConfig, ServerConfigBuilder};
