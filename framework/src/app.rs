//! Application builder
//!
//! Provides a fluent builder API to configure and run the service binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use kit::Application;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kit::BoxError> {
//!     Application::new()
//!         .migrations::<migrations::Migrator>()
//!         .routes(routes::register)
//!         .run()
//!         .await
//! }
//! ```

use crate::config::Config;
use crate::database::DbConnection;
use crate::routing::Router;
use crate::server::Server;
use clap::{Parser, Subcommand};
use sea_orm_migration::prelude::*;
use std::marker::PhantomData;
use std::path::Path;

/// Boxed error returned by the binary entry point
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// CLI structure for the service binary
#[derive(Parser)]
#[command(about = "Todo service HTTP server and database utilities")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (default command)
    Serve {
        /// Skip running migrations on startup
        #[arg(long)]
        no_migrate: bool,
    },
    /// Run pending database migrations
    Migrate,
    /// Show migration status
    #[command(name = "migrate:status")]
    MigrateStatus,
    /// Rollback the last migration(s)
    #[command(name = "migrate:rollback")]
    MigrateRollback {
        /// Number of migrations to rollback
        #[arg(default_value = "1")]
        steps: u32,
    },
    /// Drop all tables and re-run all migrations
    #[command(name = "migrate:fresh")]
    MigrateFresh,
}

type RoutesFn<S> = Box<dyn FnOnce(DbConnection) -> Router<S> + Send>;

/// Application builder
///
/// The routes function receives the database connection and builds the
/// router together with its state, so every dependency is wired explicitly.
pub struct Application<M = NoMigrator, S = ()>
where
    M: MigratorTrait,
{
    routes_fn: Option<RoutesFn<S>>,
    _migrator: PhantomData<M>,
}

/// Placeholder type for when no migrator is configured
pub struct NoMigrator;

impl MigratorTrait for NoMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![]
    }
}

impl Application<NoMigrator, ()> {
    pub fn new() -> Self {
        Application {
            routes_fn: None,
            _migrator: PhantomData,
        }
    }
}

impl Default for Application<NoMigrator, ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M, S> Application<M, S>
where
    M: MigratorTrait,
    S: Clone + Send + Sync + 'static,
{
    /// Register the function that builds the router
    pub fn routes<NewS, F>(self, f: F) -> Application<M, NewS>
    where
        F: FnOnce(DbConnection) -> Router<NewS> + Send + 'static,
    {
        Application {
            routes_fn: Some(Box::new(f)),
            _migrator: PhantomData,
        }
    }

    /// Configure the migrator type for database migrations
    pub fn migrations<NewM>(self) -> Application<NewM, S>
    where
        NewM: MigratorTrait,
    {
        Application {
            routes_fn: self.routes_fn,
            _migrator: PhantomData,
        }
    }

    /// Parse CLI arguments and execute the selected command
    ///
    /// - `serve` (default): migrate, then run the web server
    /// - `migrate`, `migrate:status`, `migrate:rollback`, `migrate:fresh`
    pub async fn run(self) -> Result<(), BoxError> {
        let cli = Cli::parse();

        let config = Config::init(Path::new("."));
        crate::logging::init(&config.app);
        tracing::info!(
            app = %config.app.name,
            environment = %config.environment(),
            "starting"
        );

        let db = DbConnection::connect(&config.database).await?;

        match cli.command {
            None | Some(Commands::Serve { no_migrate: false }) => {
                M::up(db.inner(), None).await?;
                tracing::info!("migrations applied");
                self.serve(db, &config).await
            }
            Some(Commands::Serve { no_migrate: true }) => self.serve(db, &config).await,
            Some(Commands::Migrate) => {
                M::up(db.inner(), None).await?;
                tracing::info!("migrations completed");
                Ok(())
            }
            Some(Commands::MigrateStatus) => {
                M::status(db.inner()).await?;
                Ok(())
            }
            Some(Commands::MigrateRollback { steps }) => {
                tracing::info!(steps, "rolling back migrations");
                M::down(db.inner(), Some(steps)).await?;
                Ok(())
            }
            Some(Commands::MigrateFresh) => {
                tracing::warn!("dropping all tables and re-running migrations");
                M::fresh(db.inner()).await?;
                Ok(())
            }
        }
    }

    async fn serve(self, db: DbConnection, config: &Config) -> Result<(), BoxError> {
        let routes_fn = self
            .routes_fn
            .ok_or("no routes registered; call Application::routes before run")?;

        Server::from_config(routes_fn(db), &config.server)
            .run()
            .await
    }
}
