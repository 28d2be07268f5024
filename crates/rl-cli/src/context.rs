//! Runtime context for CLI commands

use anyhow::{Context, Result};
use rl_core::{Config, DatabaseConfig};
use rl_db::{connect, Database};
use rl_migrate::{versions, Capabilities, Migrator, VersionTable};
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Loaded configuration, an open database and a migrator over it
pub struct RuntimeContext {
    pub config: Config,

    pub database: DatabaseConfig,

    pub db: Arc<dyn Database>,

    pub migrator: Migrator,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub async fn new(args: &GlobalArgs) -> Result<Self> {
        let project_path = Path::new(&args.project_dir);

        let config = if let Some(config_path) = &args.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(project_path).context("Failed to load project configuration")?
        };

        let target = Config::resolve_target(args.target.as_deref());
        let mut database = config
            .get_database_config(target.as_deref())
            .context("Failed to resolve database target")?;

        // Paths in the config file are relative to the project directory
        match &args.database {
            Some(path) => database.path = path.clone(),
            None if database.path != ":memory:" && Path::new(&database.path).is_relative() => {
                database.path = project_path.join(&database.path).display().to_string();
            }
            None => {}
        }

        let db = connect(&database).context("Failed to connect to database")?;

        let overrides = config.get_capability_overrides(target.as_deref())?;
        let capabilities = Capabilities::for_dialect(database.dialect).with_overrides(&overrides);
        log::debug!(
            "Using {} at {} (restore_dropped_tables: {})",
            database.dialect,
            database.path,
            capabilities.restore_dropped_tables
        );

        let migrator = Migrator::new(Arc::clone(&db), versions::all())
            .context("Invalid revision history")?
            .with_capabilities(capabilities)
            .with_version_table(VersionTable::new(config.version_table.clone())?);

        Ok(Self {
            config,
            database,
            db,
            migrator,
        })
    }
}
