//! Entrypoint configuration management.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{EntrypointError, EntrypointResult};

/// Environment variable prefix, e.g. `ENTRYPOINT__MIGRATION__DIR`.
pub const ENV_PREFIX: &str = "ENTRYPOINT";

/// Entrypoint configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EntrypointConfig {
    /// Schema migration step.
    #[serde(default)]
    pub migration: MigrationConfig,
    /// Application the final command belongs to.
    #[serde(default)]
    pub app: AppSection,
    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Schema migration configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Run the migration step at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Directory holding the migration metadata; the tool runs from here.
    #[serde(default = "default_migration_dir")]
    pub dir: PathBuf,
    /// Migration tool executable.
    #[serde(default = "default_migration_program")]
    pub program: String,
    /// Arguments that bring the schema to the latest revision.
    #[serde(default = "default_migration_args")]
    pub args: Vec<String>,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            dir: default_migration_dir(),
            program: default_migration_program(),
            args: default_migration_args(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_migration_dir() -> PathBuf {
    PathBuf::from("/app/models/db_schemas/nutrition_rag")
}

fn default_migration_program() -> String {
    "alembic".to_string()
}

fn default_migration_args() -> Vec<String> {
    vec!["upgrade".to_string(), "head".to_string()]
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AppSection {
    /// Working directory of the final command.
    #[serde(default = "default_app_root")]
    pub root: PathBuf,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            root: default_app_root(),
        }
    }
}

fn default_app_root() -> PathBuf {
    PathBuf::from("/app")
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// Single-line human-readable output.
    Compact,
    /// One JSON object per line.
    Json,
}

impl EntrypointConfig {
    /// Loads configuration from `./config` and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> EntrypointResult<Self> {
        Self::load_from(Path::new("config"))
    }

    /// Loads configuration from files in `config_dir` and the environment.
    ///
    /// Files are optional. `default` is read first, then the file named after
    /// `RUN_MODE` (default `production`), then `ENTRYPOINT__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(config_dir: &Path) -> EntrypointResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "production".to_string());
        let default_file = config_dir.join("default");
        let mode_file = config_dir.join(&run_mode);

        let config = config::Config::builder()
            .add_source(config::File::with_name(&default_file.to_string_lossy()).required(false))
            .add_source(config::File::with_name(&mode_file.to_string_lossy()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(" ")
                    .with_list_parse_key("migration.args"),
            )
            .build()?;

        let mut loaded: Self = config.try_deserialize()?;
        loaded.validate()?;

        let cwd = std::env::current_dir().map_err(|e| {
            EntrypointError::invalid_config(format!("cannot read working directory: {e}"))
        })?;
        loaded.resolve_paths(&cwd);
        Ok(loaded)
    }

    /// Anchors relative `migration.dir` and `app.root` at `base`.
    ///
    /// Startup changes directory before entering the app root, so both paths
    /// must not depend on the current directory at that point.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.migration.dir.is_relative() {
            self.migration.dir = base.join(&self.migration.dir);
        }
        if self.app.root.is_relative() {
            self.app.root = base.join(&self.app.root);
        }
    }

    /// Checks values serde cannot reject on its own.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first offending key.
    pub fn validate(&self) -> EntrypointResult<()> {
        if self.migration.enabled {
            if self.migration.program.trim().is_empty() {
                return Err(EntrypointError::invalid_config(
                    "migration.program must not be empty",
                ));
            }
            if self.migration.dir.as_os_str().is_empty() {
                return Err(EntrypointError::invalid_config(
                    "migration.dir must not be empty",
                ));
            }
        }
        if self.app.root.as_os_str().is_empty() {
            return Err(EntrypointError::invalid_config("app.root must not be empty"));
        }
        Ok(())
    }
}
