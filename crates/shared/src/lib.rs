//! Shared configuration and error types for the container entrypoint.
//!
//! This crate provides:
//! - Layered configuration (defaults, config files, environment)
//! - The error type every startup step reports, with its exit code

pub mod config;
pub mod error;

pub use config::{AppSection, EntrypointConfig, LogFormat, LoggingConfig, MigrationConfig};
pub use error::{EntrypointError, EntrypointResult};
