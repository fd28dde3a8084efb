//! Run a cached prebuilt binary.

use camino::Utf8Path;
use log::debug;
use std::process::{Command, ExitStatus};

use crate::error::{FetchError, Result};

/// Abstraction for launching the fetched binary.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Run `program` with `args`, inheriting stdio, and wait for it.
    ///
    /// # Errors
    ///
    /// Returns the spawn error when the program cannot be started.
    fn run(&self, program: &Utf8Path, args: &[String]) -> std::io::Result<ExitStatus>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &Utf8Path, args: &[String]) -> std::io::Result<ExitStatus> {
        Command::new(program).args(args).status()
    }
}

/// Run `binary` with `args` and return the exit code to propagate.
///
/// A process killed by a signal reports `128 + signal` on Unix, as shells do.
///
/// # Errors
///
/// Returns [`FetchError::CommandFailed`] if the binary cannot be launched.
pub fn run_prebuilt(binary: &Utf8Path, args: &[String], runner: &dyn CommandRunner) -> Result<i32> {
    debug!("running {binary} with {} argument(s)", args.len());
    let status = runner
        .run(binary, args)
        .map_err(|source| FetchError::CommandFailed {
            program: binary.to_owned(),
            source,
        })?;
    Ok(exit_code(status))
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    signal_exit_code(status)
}

#[cfg(unix)]
fn signal_exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status.signal().map_or(1, |signal| 128 + signal)
}

#[cfg(not(unix))]
fn signal_exit_code(_status: ExitStatus) -> i32 {
    1
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::os::unix::process::ExitStatusExt;

    #[rstest]
    #[case::success(0, 0)]
    #[case::failure(3 << 8, 3)]
    #[case::killed(9, 137)]
    fn propagates_the_exit_code(#[case] raw: i32, #[case] expected: i32) {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(|program, args| {
                program == "/cache/traceconv" && args == ["json", "trace.pb", "trace.json"]
            })
            .times(1)
            .returning(move |_, _| Ok(ExitStatus::from_raw(raw)));

        let args = ["json", "trace.pb", "trace.json"].map(String::from);
        let code = run_prebuilt(Utf8Path::new("/cache/traceconv"), &args, &runner).expect("run");
        assert_eq!(code, expected);
    }

    #[test]
    fn launch_failure_names_the_program() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .returning(|_, _| Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied)));

        let err = run_prebuilt(Utf8Path::new("/cache/traceconv"), &[], &runner)
            .expect_err("launch failure");
        assert!(
            matches!(err, FetchError::CommandFailed { ref program, .. } if program == "/cache/traceconv"),
            "{err}"
        );
    }
}
