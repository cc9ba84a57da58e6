//! Process host operations.
//!
//! The startup sequence only touches the OS through [`ProcessHost`], so it can
//! be driven by a recording host in tests.

use std::io;
use std::path::Path;
use std::process::ExitStatus;

use crate::command::CommandLine;

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exited normally with this code.
    Exited(i32),
    /// Killed by this signal.
    Signaled(i32),
}

impl RunOutcome {
    /// True for a zero exit code.
    pub const fn success(self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

impl From<ExitStatus> for RunOutcome {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Exited(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signaled(signal);
            }
        }
        Self::Exited(1)
    }
}

/// OS operations used during startup.
pub trait ProcessHost {
    /// Changes the working directory of the current process.
    fn change_dir(&mut self, dir: &Path) -> io::Result<()>;

    /// Runs a command to completion with inherited streams and environment.
    fn run(&mut self, command: &CommandLine) -> io::Result<RunOutcome>;
}

/// [`ProcessHost`] backed by the real operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl ProcessHost for SystemHost {
    fn change_dir(&mut self, dir: &Path) -> io::Result<()> {
        std::env::set_current_dir(dir)
    }

    fn run(&mut self, command: &CommandLine) -> io::Result<RunOutcome> {
        command.to_command().status().map(RunOutcome::from)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::process::ExitStatusExt;

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, RunOutcome::Exited(0))]
    #[case(3 << 8, RunOutcome::Exited(3))]
    #[case(255 << 8, RunOutcome::Exited(255))]
    #[case(9, RunOutcome::Signaled(9))]
    #[case(15, RunOutcome::Signaled(15))]
    fn test_outcome_from_wait_status(#[case] raw: i32, #[case] expected: RunOutcome) {
        assert_eq!(RunOutcome::from(ExitStatus::from_raw(raw)), expected);
    }

    #[test]
    fn test_success() {
        assert!(RunOutcome::Exited(0).success());
        assert!(!RunOutcome::Exited(1).success());
        assert!(!RunOutcome::Signaled(15).success());
    }

    #[test]
    fn test_system_host_runs_child() {
        let mut host = SystemHost;
        let outcome = host
            .run(&CommandLine::new("sh").with_args(["-c", "exit 4"]))
            .unwrap();
        assert_eq!(outcome, RunOutcome::Exited(4));
    }

    #[test]
    fn test_system_host_missing_program() {
        let mut host = SystemHost;
        let err = host
            .run(&CommandLine::new("entrypoint-test-no-such-program"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
