//! Tests for CLI parsing.

use super::*;
use rstest::rstest;

#[test]
fn cli_parses_list_defaults() {
    let cli = Cli::parse_from(["prebuilts", "list"]);
    assert_eq!(cli.command, Command::List(ListArgs::default()));
    assert!(cli.config.is_none());
    assert!(cli.manifest.is_none());
    assert!(!cli.quiet);
}

#[test]
fn cli_parses_list_with_json() {
    let cli = Cli::parse_from(["prebuilts", "list", "--json"]);
    assert_eq!(cli.command, Command::List(ListArgs { json: true }));
}

#[test]
fn cli_requires_a_subcommand() {
    assert!(Cli::try_parse_from(["prebuilts"]).is_err());
}

#[rstest]
#[case::before_subcommand(&["prebuilts", "--manifest", "m.json", "-q", "list"])]
#[case::after_subcommand(&["prebuilts", "list", "--manifest", "m.json", "--quiet"])]
fn global_flags_parse_anywhere(#[case] argv: &[&str]) {
    let cli = Cli::parse_from(argv);
    assert_eq!(cli.manifest, Some(Utf8PathBuf::from("m.json")));
    assert!(cli.quiet);
}

#[test]
fn cli_parses_resolve_by_host() {
    let cli = Cli::parse_from([
        "prebuilts",
        "resolve",
        "--platform",
        "linux",
        "--machine",
        "aarch64",
    ]);
    match cli.command {
        Command::Resolve(args) => {
            assert_eq!(args.platform.as_deref(), Some("linux"));
            assert_eq!(args.machine.as_deref(), Some("aarch64"));
            assert!(args.arch.is_none());
        }
        other => panic!("expected Resolve command, got {other:?}"),
    }
}

#[rstest]
#[case::platform_without_machine(&["prebuilts", "resolve", "--platform", "linux"])]
#[case::machine_without_platform(&["prebuilts", "resolve", "--machine", "x86_64"])]
#[case::arch_and_host(&[
    "prebuilts", "resolve", "--arch", "linux-amd64", "--platform", "linux", "--machine", "x86_64",
])]
#[case::verify_without_file(&["prebuilts", "verify"])]
fn cli_rejects_invalid_combinations(#[case] argv: &[&str]) {
    assert!(Cli::try_parse_from(argv).is_err());
}

#[test]
fn cli_parses_fetch_options() {
    let cli = Cli::parse_from([
        "prebuilts",
        "fetch",
        "--arch",
        "android-arm64",
        "--cache-dir",
        "/tmp/prebuilts",
        "--soft-fail",
    ]);
    assert_eq!(
        cli.command,
        Command::Fetch(FetchArgs {
            arch: Some("android-arm64".to_owned()),
            cache_dir: Some(Utf8PathBuf::from("/tmp/prebuilts")),
            soft_fail: true,
        })
    );
    assert_eq!(cli.command.arch(), Some("android-arm64"));
    assert_eq!(
        cli.command.cache_dir(),
        Some(&Utf8PathBuf::from("/tmp/prebuilts"))
    );
}

#[test]
fn cli_parses_verify() {
    let cli = Cli::parse_from(["prebuilts", "verify", "./traceconv", "--arch", "mac-arm64"]);
    assert_eq!(
        cli.command,
        Command::Verify(VerifyArgs {
            file: Utf8PathBuf::from("./traceconv"),
            arch: Some("mac-arm64".to_owned()),
        })
    );
}

#[test]
fn cli_passes_trailing_arguments_to_run() {
    let cli = Cli::parse_from([
        "prebuilts", "run", "--arch", "linux-amd64", "--", "json", "--full-sort", "trace.pb",
    ]);
    match cli.command {
        Command::Run(args) => {
            assert_eq!(args.arch.as_deref(), Some("linux-amd64"));
            assert_eq!(args.args, ["json", "--full-sort", "trace.pb"]);
        }
        other => panic!("expected Run command, got {other:?}"),
    }
}

#[test]
fn list_has_no_arch_or_cache_dir() {
    let command = Command::List(ListArgs::default());
    assert!(command.arch().is_none());
    assert!(command.cache_dir().is_none());
}
