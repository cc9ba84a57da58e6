//! Command line values.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::process::Command;

/// A program and its argument vector.
///
/// Arguments are kept as `OsString` so nothing is lost on non-UTF-8 input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandLine {
    /// Creates a command with no arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Builds a command from an argument vector whose first element is the
    /// program. Returns `None` for an empty vector.
    pub fn from_argv<I, S>(argv: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv.next()?;
        Some(Self {
            program,
            args: argv.collect(),
        })
    }

    /// The program to run.
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Arguments after the program.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Program followed by its arguments.
    pub fn to_argv(&self) -> Vec<OsString> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Program name for log and error output.
    pub fn program_lossy(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Builds a `std::process::Command` inheriting environment and streams.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_from_argv_empty() {
        assert_eq!(CommandLine::from_argv(Vec::<OsString>::new()), None);
    }

    #[test]
    fn test_from_argv_program_only() {
        let command = CommandLine::from_argv(["uvicorn"]).unwrap();
        assert_eq!(command.program(), "uvicorn");
        assert!(command.args().is_empty());
    }

    #[test]
    fn test_from_argv_keeps_flags_and_separators() {
        let command =
            CommandLine::from_argv(["uvicorn", "main:app", "--", "--host", "0.0.0.0", ""]).unwrap();
        assert_eq!(command.program(), "uvicorn");
        assert_eq!(command.args(), ["main:app", "--", "--host", "0.0.0.0", ""]);
    }

    #[test]
    fn test_with_args() {
        let command = CommandLine::new("alembic").with_args(["upgrade", "head"]);
        assert_eq!(command.to_argv(), ["alembic", "upgrade", "head"]);
        assert_eq!(command.to_string(), "alembic upgrade head");
        assert_eq!(command.program_lossy(), "alembic");
    }

    #[test]
    fn test_to_command() {
        let command = CommandLine::new("echo").with_args(["a", "b"]);
        let std_command = command.to_command();
        assert_eq!(std_command.get_program(), "echo");
        assert_eq!(std_command.get_args().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_argument_preserved() {
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![0x66, 0x6f, 0xff, 0x6f]);
        let command = CommandLine::from_argv([OsString::from("cat"), raw.clone()]).unwrap();
        assert_eq!(command.args(), [raw]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Any non-empty argument vector survives unchanged, in order.
        #[test]
        fn prop_argv_passes_through(argv in prop::collection::vec(".*", 1..12)) {
            let command = CommandLine::from_argv(argv.clone()).unwrap();
            let expected: Vec<OsString> = argv.into_iter().map(OsString::from).collect();
            prop_assert_eq!(command.to_argv(), expected);
        }
    }
}
