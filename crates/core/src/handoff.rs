//! Process replacement with the final command.

use entrypoint_shared::EntrypointError;

use crate::command::CommandLine;

/// Replaces the current process image with `command`.
///
/// The program is looked up on `PATH`, the environment and working directory
/// are inherited, and the process ID is kept, so signals sent to the
/// container reach the command directly. Only returns if the replacement
/// failed.
#[cfg(unix)]
pub fn replace(command: &CommandLine) -> EntrypointError {
    use std::os::unix::process::CommandExt;

    let source = command.to_command().exec();
    EntrypointError::Exec {
        program: command.program_lossy(),
        source,
    }
}

/// Runs `command` and exits with its status.
///
/// There is no `exec` here, so the command runs as a child and its exit code
/// is forwarded. Only returns if the command could not be started.
#[cfg(not(unix))]
pub fn replace(command: &CommandLine) -> EntrypointError {
    match command.to_command().status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(source) => EntrypointError::Exec {
            program: command.program_lossy(),
            source,
        },
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_reports_not_found() {
        let err = replace(&CommandLine::new("entrypoint-test-no-such-program").with_args(["x"]));
        assert!(matches!(err, EntrypointError::Exec { ref program, .. } if program == "entrypoint-test-no-such-program"));
        assert_eq!(err.exit_code(), 127);
    }

    #[test]
    fn test_non_executable_file_reports_126() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("not-executable");
        std::fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();

        let err = replace(&CommandLine::new(script.as_os_str()));

        assert!(matches!(err, EntrypointError::Exec { .. }));
        assert_eq!(err.exit_code(), 126);
    }
}
