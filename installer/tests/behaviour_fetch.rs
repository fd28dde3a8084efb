//! BDD tests for fetching prebuilt binaries into the cache.
//!
//! Downloads are served by the recording `StubDownloader` from the
//! `test-support` feature, so no scenario touches the network. Tests use the
//! rstest-bdd v0.5.0 mutable world pattern.

use camino::Utf8PathBuf;
use prebuilts::manifest::arch::ArchId;
use prebuilts::manifest::sha256_digest::Sha256Digest;
use prebuilts::{ArtifactRegistry, HostIdentity, Selection};
use prebuilts_installer::cache::CacheEntry;
use prebuilts_installer::error::FetchError;
use prebuilts_installer::fetch::{FetchOptions, fetch_prebuilt};
use prebuilts_installer::test_utils::{PAYLOAD, StubDownloader, payload_registry};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const ALTERED: &[u8] = b"#!/bin/sh\necho traceconx\n";

struct FetchWorld {
    _temp_dir: tempfile::TempDir,
    cache_dir: Utf8PathBuf,
    registry: Option<ArtifactRegistry>,
    downloader: StubDownloader,
    soft_fail: bool,
    result: Option<Result<Option<Utf8PathBuf>, FetchError>>,
}

impl FetchWorld {
    fn entry(&self) -> CacheEntry {
        CacheEntry::new(&self.cache_dir, "traceconv")
    }

    fn fetch(&mut self, selection: &Selection) {
        let options = FetchOptions {
            cache_dir: self.cache_dir.clone(),
            soft_fail: self.soft_fail,
            quiet: true,
        };
        let registry = self.registry.as_ref().expect("manifest set");
        let result = fetch_prebuilt(
            registry,
            selection,
            &options,
            &self.downloader,
            &mut std::io::sink(),
        );
        self.result = Some(result);
    }

    fn fetched(&self) -> &Option<Utf8PathBuf> {
        match self.result.as_ref().expect("fetch attempted") {
            Ok(path) => path,
            Err(err) => panic!("expected a successful fetch, got {err}"),
        }
    }

    fn error(&self) -> &FetchError {
        match self.result.as_ref().expect("fetch attempted") {
            Ok(path) => panic!("expected a failed fetch, got {path:?}"),
            Err(err) => err,
        }
    }

    fn seed(&self, binary: &[u8], stamp: &str) {
        std::fs::create_dir_all(&self.cache_dir).expect("create cache");
        let entry = self.entry();
        std::fs::write(entry.binary(), binary).expect("seed binary");
        std::fs::write(entry.stamp(), stamp).expect("seed stamp");
    }
}

#[fixture]
fn world() -> FetchWorld {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let cache_dir =
        Utf8PathBuf::try_from(temp_dir.path().join("prebuilts")).expect("UTF-8 path");
    FetchWorld {
        _temp_dir: temp_dir,
        cache_dir,
        registry: None,
        downloader: StubDownloader::serving(PAYLOAD),
        soft_fail: false,
        result: None,
    }
}

#[given("a manifest describing the served payload")]
fn given_payload_manifest(world: &mut FetchWorld) {
    world.registry = Some(payload_registry(PAYLOAD));
}

#[given("an empty cache")]
fn given_empty_cache(world: &mut FetchWorld) {
    assert!(!world.cache_dir.exists());
}

#[given("a cache already holding the payload")]
fn given_warm_cache(world: &mut FetchWorld) {
    world.seed(PAYLOAD, Sha256Digest::of_bytes(PAYLOAD).as_str());
}

#[given("a cache holding an older release")]
fn given_stale_cache(world: &mut FetchWorld) {
    let old = b"older release";
    world.seed(old, Sha256Digest::of_bytes(old).as_str());
}

#[given("the server returns altered bytes")]
fn given_altered_server(world: &mut FetchWorld) {
    world.downloader = StubDownloader::serving(ALTERED);
}

#[given("soft failure is enabled")]
fn given_soft_fail(world: &mut FetchWorld) {
    world.soft_fail = true;
}

#[when("the host \"{platform}\" \"{machine}\" is fetched")]
fn when_host_fetched(world: &mut FetchWorld, platform: String, machine: String) {
    world.fetch(&Selection::Host(HostIdentity::new(platform, machine)));
}

#[when("the arch \"{arch}\" is fetched")]
fn when_arch_fetched(world: &mut FetchWorld, arch: String) {
    let arch = ArchId::try_from(arch).expect("valid arch");
    world.fetch(&Selection::Arch(arch));
}

#[then("the cached binary matches the payload")]
fn then_binary_matches(world: &mut FetchWorld) {
    let path = world.fetched().as_ref().expect("a binary path");
    assert_eq!(path, world.entry().binary());
    assert_eq!(std::fs::read(path).expect("read binary"), PAYLOAD);
}

#[then("the stamp records the payload digest")]
fn then_stamp_records_digest(world: &mut FetchWorld) {
    let stamp = std::fs::read_to_string(world.entry().stamp()).expect("read stamp");
    assert_eq!(stamp, Sha256Digest::of_bytes(PAYLOAD).as_str());
}

#[then("exactly one download was requested")]
fn then_one_download(world: &mut FetchWorld) {
    assert_eq!(world.downloader.calls().len(), 1);
}

#[then("no download was requested")]
fn then_no_download(world: &mut FetchWorld) {
    assert!(world.downloader.calls().is_empty());
}

#[then("the download came from the \"{arch}\" URL")]
fn then_download_url(world: &mut FetchWorld, arch: String) {
    let calls = world.downloader.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains(&format!("/{arch}/")), "{calls:?}");
}

#[then("the fetch fails with an integrity mismatch")]
fn then_integrity_mismatch(world: &mut FetchWorld) {
    let err = world.error();
    assert!(
        matches!(err, FetchError::Manifest(inner) if inner.is_integrity_mismatch()),
        "expected an integrity mismatch, got {err}"
    );
}

#[then("the fetch fails as unsupported")]
fn then_unsupported(world: &mut FetchWorld) {
    assert!(world.error().is_unsupported_platform());
}

#[then("the cache holds no leftover files")]
fn then_no_leftovers(world: &mut FetchWorld) {
    let entry = world.entry();
    assert!(!entry.binary().exists());
    assert!(!entry.stamp().exists());
    assert!(!entry.temp().exists());
}

#[then("no binary is returned")]
fn then_no_binary(world: &mut FetchWorld) {
    assert!(world.fetched().is_none());
}

#[scenario(
    path = "tests/features/fetch.feature",
    name = "First fetch downloads and stamps the binary"
)]
fn scenario_first_fetch(world: FetchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/fetch.feature",
    name = "A valid stamp skips the download"
)]
fn scenario_cache_hit(world: FetchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/fetch.feature",
    name = "A stale stamp triggers a fresh download"
)]
fn scenario_stale_stamp(world: FetchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/fetch.feature",
    name = "A corrupted download leaves nothing behind"
)]
fn scenario_corrupted_download(world: FetchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/fetch.feature",
    name = "Soft failure on an unsupported host"
)]
fn scenario_soft_failure(world: FetchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/fetch.feature",
    name = "An unsupported host is an error by default"
)]
fn scenario_unsupported_host(world: FetchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/fetch.feature",
    name = "Android binaries are fetched by arch"
)]
fn scenario_android_by_arch(world: FetchWorld) {
    let _ = world;
}
