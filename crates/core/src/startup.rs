//! Startup sequence.
//!
//! 1. Enter the migration directory.
//! 2. Run the migration tool; any failure aborts startup.
//! 3. Return to the application root.
//!
//! Step 4, replacing the process, lives in [`crate::handoff`] because it never
//! returns on success.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use entrypoint_shared::{EntrypointConfig, EntrypointError, EntrypointResult, MigrationConfig};
use tracing::{error, info, warn};

use crate::command::CommandLine;
use crate::host::{ProcessHost, RunOutcome};

/// Runs migrations and prepares the final command.
#[derive(Debug)]
pub struct StartupWrapper<H> {
    host: H,
    migration: MigrationConfig,
    app_root: PathBuf,
}

impl<H: ProcessHost> StartupWrapper<H> {
    /// Creates a wrapper driving `host` with the given configuration.
    pub fn new(host: H, config: &EntrypointConfig) -> Self {
        Self {
            host,
            migration: config.migration.clone(),
            app_root: config.app.root.clone(),
        }
    }

    /// Migrates the schema and moves to the application root.
    ///
    /// `argv` is the container command, program first. It is returned as a
    /// [`CommandLine`] unchanged, or `None` when it is empty.
    ///
    /// # Errors
    ///
    /// Fails without touching the application root if the migration
    /// directory cannot be entered or the migration tool does not succeed.
    pub fn prepare<I, S>(&mut self, argv: I) -> EntrypointResult<Option<CommandLine>>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let command = CommandLine::from_argv(argv);

        if self.migration.enabled {
            self.migrate()?;
        } else {
            warn!(target: "migrate", "Database migrations disabled, skipping");
        }

        let app_root = self.app_root.clone();
        self.enter(&app_root)?;
        Ok(command)
    }

    #[cfg(test)]
    fn host(&self) -> &H {
        &self.host
    }

    fn migrate(&mut self) -> EntrypointResult<()> {
        let dir = self.migration.dir.clone();
        let tool = CommandLine::new(&self.migration.program).with_args(&self.migration.args);

        self.enter(&dir)?;

        info!(
            target: "migrate",
            dir = %dir.display(),
            command = %tool,
            "Running database migrations..."
        );

        let outcome = self
            .host
            .run(&tool)
            .map_err(|source| EntrypointError::MigrationSpawn {
                program: tool.program_lossy(),
                source,
            })?;

        match outcome {
            RunOutcome::Exited(0) => {
                info!(target: "migrate", "Migrations completed successfully");
                Ok(())
            }
            RunOutcome::Exited(code) => {
                error!(target: "migrate", code, "Migration failed");
                Err(EntrypointError::MigrationFailed { code })
            }
            RunOutcome::Signaled(signal) => {
                error!(target: "migrate", signal, "Migration terminated by signal");
                Err(EntrypointError::MigrationTerminated { signal })
            }
        }
    }

    fn enter(&mut self, dir: &Path) -> EntrypointResult<()> {
        self.host
            .change_dir(dir)
            .map_err(|source| EntrypointError::ChangeDir {
                path: dir.to_path_buf(),
                source,
            })
    }
}
