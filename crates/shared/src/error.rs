//! Entrypoint error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `EntrypointError`.
pub type EntrypointResult<T> = Result<T, EntrypointError>;

/// Exit code for an unusable configuration (`EX_CONFIG` from sysexits.h).
pub const EXIT_CONFIG: i32 = 78;

/// Exit code a POSIX shell reports for a command it cannot find.
pub const EXIT_NOT_FOUND: i32 = 127;

/// Exit code a POSIX shell reports for a command it found but cannot run.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum EntrypointError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration loaded but holds an unusable value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The working directory could not be changed.
    #[error("Cannot change directory to {}: {source}", path.display())]
    ChangeDir {
        /// Target directory.
        path: PathBuf,
        /// Underlying OS error.
        source: io::Error,
    },

    /// The migration tool could not be started.
    #[error("Cannot start migration tool {program}: {source}")]
    MigrationSpawn {
        /// Migration executable.
        program: String,
        /// Underlying OS error.
        source: io::Error,
    },

    /// The migration tool exited with a non-zero status.
    #[error("Migration failed with exit code {code}")]
    MigrationFailed {
        /// Exit code reported by the migration tool.
        code: i32,
    },

    /// The migration tool was killed by a signal.
    #[error("Migration terminated by signal {signal}")]
    MigrationTerminated {
        /// Signal number.
        signal: i32,
    },

    /// The final command could not replace the current process.
    #[error("Cannot execute {program}: {source}")]
    Exec {
        /// Command that was to be executed.
        program: String,
        /// Underlying OS error.
        source: io::Error,
    },
}

impl EntrypointError {
    /// Returns the process exit code for this error.
    ///
    /// Follows shell conventions so the container runtime sees the same
    /// status a shell-script entrypoint would have produced.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidConfig(_) => EXIT_CONFIG,
            Self::ChangeDir { .. } => 1,
            Self::MigrationSpawn { source, .. } | Self::Exec { source, .. } => {
                launch_failure_code(source)
            }
            Self::MigrationFailed { code } => *code,
            Self::MigrationTerminated { signal } => 128 + signal,
        }
    }

    /// Returns the error code used in log output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::InvalidConfig(_) => "CONFIG_ERROR",
            Self::ChangeDir { .. } => "CHANGE_DIR_FAILED",
            Self::MigrationSpawn { .. } => "MIGRATION_SPAWN_FAILED",
            Self::MigrationFailed { .. } => "MIGRATION_FAILED",
            Self::MigrationTerminated { .. } => "MIGRATION_TERMINATED",
            Self::Exec { .. } => "EXEC_FAILED",
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

fn launch_failure_code(err: &io::Error) -> i32 {
    if err.kind() == io::ErrorKind::NotFound {
        EXIT_NOT_FOUND
    } else {
        EXIT_NOT_EXECUTABLE
    }
}
