//! Container entrypoint.
//!
//! Usage: `entrypoint <command> [args...]`
//!
//! Runs the database migration tool from the migration directory, returns to
//! the application root and replaces itself with `<command>`. Every argument
//! is forwarded verbatim; the wrapper has no flags of its own. Configuration
//! comes from `config/` files and `ENTRYPOINT__*` environment variables.
//! Relative paths in it are taken from the starting directory.
//!
//! A `.env` file, if present, is loaded into the process environment before
//! anything else. Its variables are visible to the migration tool and are
//! inherited by `<command>`; variables already set are never overridden.

use std::process::ExitCode;

use entrypoint_core::{StartupWrapper, SystemHost, handoff};
use entrypoint_shared::{EntrypointConfig, EntrypointResult, LogFormat, LoggingConfig};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = match EntrypointConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("entrypoint: {err}");
            return exit_code(err.exit_code());
        }
    };

    if let Err(err) = init_tracing(&config.logging) {
        eprintln!("entrypoint: {err:#}");
        return ExitCode::FAILURE;
    }

    match launch(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(
                error_code = err.error_code(),
                exit_code = err.exit_code(),
                "{err}"
            );
            exit_code(err.exit_code())
        }
    }
}

/// Migrates, then hands the process over to the container command.
///
/// Returns `Ok` only when there was no command to run.
fn launch(config: &EntrypointConfig) -> EntrypointResult<()> {
    let mut wrapper = StartupWrapper::new(SystemHost, config);

    let Some(command) = wrapper.prepare(std::env::args_os().skip(1))? else {
        info!("No command supplied, nothing to run");
        return Ok(());
    };

    info!(
        command = %command,
        cwd = %config.app.root.display(),
        "Handing off to container command"
    );
    Err(handoff::replace(&command))
}

/// Installs the tracing subscriber. Logs go to stderr so the command's
/// stdout stays untouched.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.filter))
        .map_err(|e| anyhow::anyhow!("Invalid log filter {:?}: {}", logging.filter, e))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_in_range() {
        assert_eq!(exit_code(0), ExitCode::SUCCESS);
        assert_eq!(exit_code(3), ExitCode::from(3));
        assert_eq!(exit_code(143), ExitCode::from(143));
    }

    #[test]
    fn test_exit_code_out_of_range_is_failure() {
        assert_eq!(exit_code(-1), ExitCode::FAILURE);
        assert_eq!(exit_code(300), ExitCode::FAILURE);
    }
}
