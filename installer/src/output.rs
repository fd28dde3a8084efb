//! Progress output helpers.
//!
//! Progress and diagnostics go to stderr so that stdout carries only command
//! results such as paths and JSON documents.

use std::io::Write;

/// Write `message` followed by a newline, ignoring write failures.
///
/// # Examples
///
/// ```
/// use prebuilts_installer::output::write_stderr_line;
///
/// let mut stderr = Vec::new();
/// write_stderr_line(&mut stderr, "Downloading traceconv...");
/// assert_eq!(stderr, b"Downloading traceconv...\n");
/// ```
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress output; ignore write failures.
    }
}

/// Write `message` unless `quiet` is set.
pub fn progress(stderr: &mut dyn Write, quiet: bool, message: impl std::fmt::Display) {
    if !quiet {
        write_stderr_line(stderr, message);
    }
}
