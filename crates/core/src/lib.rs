//! Startup wrapper for the application container.
//!
//! Brings the database schema to the latest revision with an external
//! migration tool, then replaces the current process with the command the
//! container was started with.
//!
//! # Modules
//!
//! - `command` - Program plus argument vector, passed through untouched
//! - `host` - Working directory and child process operations
//! - `startup` - The migrate-then-return-to-app-root sequence
//! - `handoff` - Process replacement with the final command

pub mod command;
pub mod handoff;
pub mod host;
pub mod startup;

pub use command::CommandLine;
pub use host::{ProcessHost, RunOutcome, SystemHost};
pub use startup::StartupWrapper;
