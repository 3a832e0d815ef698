//! Configuration module
//!
//! - Automatic `.env` file loading with environment-based precedence
//! - Type-safe configuration structs built from environment variables
//!
//! # Example
//!
//! ```rust,no_run
//! use kit::Config;
//!
//! let config = Config::init(std::path::Path::new("."));
//! println!("Server port: {}", config.server.port);
//! ```

pub mod env;
pub mod providers;

pub use env::{env, env_optional, load_dotenv, Environment};
pub use providers::{
    AppConfig, AppConfigBuilder, LogFormat, ServerConfig, ServerConfigBuilder,
};

pub use crate::database::{DatabaseConfig, DatabaseConfigBuilder};

use std::path::Path;

/// Bundle of every typed config the service reads at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl Config {
    /// Load `.env` files from `project_root` and build all configs
    ///
    /// Call once at startup, before anything reads the environment.
    pub fn init(project_root: &Path) -> Self {
        env::load_dotenv(project_root);
        Self::from_env()
    }

    /// Build all configs from the current process environment
    pub fn from_env() -> Self {
        Self {
            app: AppConfig::from_env(),
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.app.environment
    }
}
