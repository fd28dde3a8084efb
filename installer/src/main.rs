//! `prebuilts` CLI entrypoint.
//!
//! This binary lists, resolves, fetches, verifies, and runs the prebuilt
//! binaries described by a release manifest. Results go to stdout; progress
//! and errors go to stderr.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use prebuilts::manifest::arch::ArchId;
use prebuilts::manifest::traceconv;
use prebuilts::{ArtifactRegistry, HostIdentity, Selection};
use prebuilts_installer::cli::{Cli, Command, FetchArgs, ResolveArgs, RunArgs, VerifyArgs};
use prebuilts_installer::config::InstallerConfig;
use prebuilts_installer::dirs::{BaseDirs, SystemBaseDirs, prebuilt_cache_dir};
use prebuilts_installer::download::{ArtefactDownloader, HttpDownloader};
use prebuilts_installer::error::{FetchError, Result};
use prebuilts_installer::fetch::{FetchOptions, fetch_descriptor, fetch_prebuilt};
use prebuilts_installer::list_output::{
    format_descriptor, format_descriptor_json, format_human, format_json,
};
use prebuilts_installer::output::write_stderr_line;
use prebuilts_installer::run::{CommandRunner, SystemCommandRunner, run_prebuilt};
use std::borrow::Cow;
use std::io::Write;

struct RunContext<'a> {
    cli: &'a Cli,
    config: &'a InstallerConfig,
    dirs: &'a dyn BaseDirs,
    registry: &'a ArtifactRegistry,
    downloader: &'a dyn ArtefactDownloader,
    runner: &'a dyn CommandRunner,
}

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<i32> {
    let dirs = SystemBaseDirs::new();
    let config = InstallerConfig::load(cli.config.as_deref(), &dirs)?;
    let registry = load_registry(cli.manifest.as_deref())?;
    let downloader = HttpDownloader::new(config.timeout());

    let context = RunContext {
        cli,
        config: &config,
        dirs: &dirs,
        registry: &registry,
        downloader: &downloader,
        runner: &SystemCommandRunner,
    };
    dispatch(&context, stdout, stderr)
}

/// Runs the selected subcommand and returns the process exit code.
fn dispatch(context: &RunContext<'_>, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<i32> {
    match &context.cli.command {
        Command::List(args) => {
            let text = if args.json {
                format_json(context.registry)
            } else {
                format_human(context.registry)
            };
            write_stdout(stdout, text)?;
            Ok(0)
        }
        Command::Resolve(args) => resolve(context, args, stdout),
        Command::Fetch(args) => fetch(context, args, stdout, stderr),
        Command::Verify(args) => verify(context, args, stdout),
        Command::Run(args) => run_binary(context, args, stderr),
    }
}

fn resolve(context: &RunContext<'_>, args: &ResolveArgs, stdout: &mut dyn Write) -> Result<i32> {
    let selection = selection_for(&context.cli.command, context.config)?;
    let descriptor = context.registry.select(&selection)?;
    let text = if args.json {
        format_descriptor_json(descriptor)
    } else {
        format_descriptor(descriptor)
    };
    write_stdout(stdout, text)?;
    Ok(0)
}

fn fetch(
    context: &RunContext<'_>,
    args: &FetchArgs,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<i32> {
    let selection = selection_for(&context.cli.command, context.config)?;
    let options = FetchOptions {
        cache_dir: cache_dir_for(context)?,
        soft_fail: args.soft_fail,
        quiet: context.cli.quiet,
    };
    let fetched = fetch_prebuilt(
        context.registry,
        &selection,
        &options,
        context.downloader,
        stderr,
    )?;
    if let Some(path) = fetched {
        write_stdout(stdout, path)?;
    }
    Ok(0)
}

fn verify(context: &RunContext<'_>, args: &VerifyArgs, stdout: &mut dyn Write) -> Result<i32> {
    let selection = selection_for(&context.cli.command, context.config)?;
    let descriptor = context.registry.select(&selection)?;
    let file = std::fs::File::open(&args.file).map_err(|source| FetchError::ReadFailed {
        path: args.file.clone(),
        source,
    })?;
    descriptor.verify_reader(std::io::BufReader::new(file))?;
    write_stdout(stdout, format!("{}: OK ({})", args.file, descriptor.arch()))?;
    Ok(0)
}

fn run_binary(context: &RunContext<'_>, args: &RunArgs, stderr: &mut dyn Write) -> Result<i32> {
    let selection = selection_for(&context.cli.command, context.config)?;
    let descriptor = context.registry.select(&selection)?;
    let options = FetchOptions {
        cache_dir: cache_dir_for(context)?,
        soft_fail: false,
        quiet: context.cli.quiet,
    };
    let binary = fetch_descriptor(
        context.registry,
        descriptor,
        &options,
        context.downloader,
        stderr,
    )?;
    run_prebuilt(&binary, &args.args, context.runner)
}

/// Loads the manifest named by `--manifest`, or the embedded one.
fn load_registry(manifest: Option<&Utf8Path>) -> Result<Cow<'static, ArtifactRegistry>> {
    let Some(path) = manifest else {
        return Ok(Cow::Borrowed(traceconv::registry()?));
    };
    let json = std::fs::read_to_string(path).map_err(|source| FetchError::ReadFailed {
        path: path.to_owned(),
        source,
    })?;
    let registry = ArtifactRegistry::from_json(traceconv::TOOL, path.as_str(), &json)?;
    Ok(Cow::Owned(registry))
}

/// Picks the artifact selection: `--arch`, then `--platform`/`--machine`,
/// then the configured arch, then the running host.
fn selection_for(command: &Command, config: &InstallerConfig) -> Result<Selection> {
    if let Some(arch) = command.arch() {
        return Ok(Selection::Arch(ArchId::try_from(arch)?));
    }
    if let Command::Resolve(ResolveArgs {
        platform: Some(platform),
        machine: Some(machine),
        ..
    }) = command
    {
        return Ok(Selection::Host(HostIdentity::new(platform, machine)));
    }
    if let Some(arch) = config.arch.as_deref() {
        return Ok(Selection::Arch(ArchId::try_from(arch)?));
    }
    Ok(Selection::current_host())
}

/// Determines the cache directory: `--cache-dir`, then configuration, then
/// the platform default.
fn cache_dir_for(context: &RunContext<'_>) -> Result<Utf8PathBuf> {
    if let Some(dir) = context.cli.command.cache_dir() {
        return Ok(dir.clone());
    }
    if let Some(dir) = &context.config.cache_dir {
        return Ok(dir.clone());
    }
    prebuilt_cache_dir(context.dirs)
}

fn exit_code_for_run_result(result: Result<i32>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(code) => code,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stdout(stdout: &mut dyn Write, message: impl std::fmt::Display) -> Result<()> {
    writeln!(stdout, "{message}").map_err(|source| FetchError::WriteFailed { source })
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
