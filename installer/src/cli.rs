//! CLI argument definitions for the `prebuilts` binary.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Fetch, verify, and run prebuilt trace-conversion binaries.
#[derive(Parser, Debug)]
#[command(name = "prebuilts")]
#[command(version, about)]
#[command(long_about = concat!(
    "Fetch, verify, and run prebuilt trace-conversion binaries.\n\n",
    "Each release ships one binary per operating system and CPU architecture. ",
    "This tool picks the binary for the current host (or the one named with ",
    "--arch), downloads it into a per-user cache, checks its size and SHA-256 ",
    "digest against the manifest, and runs it.\n\n",
    "Android binaries are never chosen by host detection; select them with ",
    "--arch.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Show every artifact in the embedded manifest:\n",
    "    $ prebuilts list\n\n",
    "  Show which binary this host would use:\n",
    "    $ prebuilts resolve\n\n",
    "  Download the binary for an Android device:\n",
    "    $ prebuilts fetch --arch android-arm64\n\n",
    "  Check a binary downloaded by other means:\n",
    "    $ prebuilts verify ./traceconv\n\n",
    "  Convert a trace:\n",
    "    $ prebuilts run -- json trace.pb trace.json\n\n",
    "ENVIRONMENT:\n",
    "  PREBUILTS_CONFIG     Configuration file used when --config is absent\n",
    "  PREBUILTS_CACHE_DIR  Cache directory overriding the configuration file",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file [default: <config dir>/prebuilts.toml].
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Use a JSON manifest instead of the embedded one.
    #[arg(long, global = true, value_name = "FILE")]
    pub manifest: Option<Utf8PathBuf>,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every artifact in the manifest.
    List(ListArgs),

    /// Show the artifact selected for a host or arch.
    Resolve(ResolveArgs),

    /// Download the selected artifact into the cache and print its path.
    Fetch(FetchArgs),

    /// Check a local file against the selected artifact.
    Verify(VerifyArgs),

    /// Fetch the selected artifact and run it.
    Run(RunArgs),
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArgs {
    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the resolve command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveArgs {
    /// Select by arch identifier instead of host matching.
    #[arg(long, value_name = "ARCH", conflicts_with_all = ["platform", "machine"])]
    pub arch: Option<String>,

    /// Platform identifier to match, e.g. `linux` or `darwin`.
    #[arg(long, value_name = "PLATFORM", requires = "machine")]
    pub platform: Option<String>,

    /// Machine identifier to match, e.g. `x86_64` or `aarch64`.
    #[arg(long, value_name = "MACHINE", requires = "platform")]
    pub machine: Option<String>,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the fetch command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchArgs {
    /// Select by arch identifier instead of host matching.
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,

    /// Cache directory [default: platform-specific].
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Exit successfully, printing nothing, when no binary serves this host.
    #[arg(long)]
    pub soft_fail: bool,
}

/// Arguments for the verify command.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct VerifyArgs {
    /// File to check.
    #[arg(value_name = "FILE")]
    pub file: Utf8PathBuf,

    /// Check against this arch instead of the host's entry.
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,
}

/// Arguments for the run command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct RunArgs {
    /// Select by arch identifier instead of host matching.
    #[arg(long, value_name = "ARCH")]
    pub arch: Option<String>,

    /// Cache directory [default: platform-specific].
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Arguments passed to the binary, after `--`.
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl Command {
    /// The `--arch` value of commands that accept one.
    #[must_use]
    pub fn arch(&self) -> Option<&str> {
        match self {
            Self::List(_) => None,
            Self::Resolve(args) => args.arch.as_deref(),
            Self::Fetch(args) => args.arch.as_deref(),
            Self::Verify(args) => args.arch.as_deref(),
            Self::Run(args) => args.arch.as_deref(),
        }
    }

    /// The `--cache-dir` value of commands that accept one.
    #[must_use]
    pub fn cache_dir(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::Fetch(args) => args.cache_dir.as_ref(),
            Self::Run(args) => args.cache_dir.as_ref(),
            Self::List(_) | Self::Resolve(_) | Self::Verify(_) => None,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
