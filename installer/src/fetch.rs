//! Select, download, and cache the prebuilt binary for a host.
//!
//! [`fetch_prebuilt`] joins the registry lookup to the cache: it picks the
//! descriptor for a [`Selection`], reports progress, and returns the path of a
//! verified binary. With `soft_fail`, a host the manifest does not cover yields
//! `Ok(None)` so callers can carry on without the tool.

use camino::Utf8PathBuf;
use log::{debug, warn};
use prebuilts::{ArtifactDescriptor, ArtifactRegistry, Selection};
use std::io::Write;

use crate::cache::{CacheEntry, fetch_cached};
use crate::download::ArtefactDownloader;
use crate::error::Result;
use crate::output::progress;

/// Options for a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Directory holding cached binaries and their stamps.
    pub cache_dir: Utf8PathBuf,
    /// Return `Ok(None)` instead of an error when the host is unsupported.
    pub soft_fail: bool,
    /// Suppress progress output.
    pub quiet: bool,
}

impl FetchOptions {
    /// Options with `soft_fail` and `quiet` disabled.
    #[must_use]
    pub fn new(cache_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            soft_fail: false,
            quiet: false,
        }
    }
}

/// Fetch the binary chosen by `selection` into the cache.
///
/// Returns the cached path, or `None` when `options.soft_fail` is set and no
/// entry serves the host.
///
/// # Errors
///
/// Returns lookup errors (including an unsupported host without
/// `soft_fail`), download failures, integrity mismatches, and cache I/O
/// failures.
///
/// # Examples
///
/// ```no_run
/// use prebuilts::{Selection, manifest::traceconv};
/// use prebuilts_installer::download::HttpDownloader;
/// use prebuilts_installer::fetch::{FetchOptions, fetch_prebuilt};
/// use std::time::Duration;
///
/// let registry = traceconv::registry()?;
/// let options = FetchOptions::new("/tmp/prebuilts");
/// let downloader = HttpDownloader::new(Duration::from_secs(60));
/// let path = fetch_prebuilt(
///     registry,
///     &Selection::current_host(),
///     &options,
///     &downloader,
///     &mut std::io::stderr(),
/// )?;
/// println!("{path:?}");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn fetch_prebuilt(
    registry: &ArtifactRegistry,
    selection: &Selection,
    options: &FetchOptions,
    downloader: &dyn ArtefactDownloader,
    stderr: &mut dyn Write,
) -> Result<Option<Utf8PathBuf>> {
    let descriptor = match registry.select(selection) {
        Ok(descriptor) => descriptor,
        Err(e) if options.soft_fail && e.is_unsupported_platform() => {
            warn!("{e}; continuing without {}", registry.tool());
            progress(stderr, options.quiet, format!("Skipping {}: {e}", registry.tool()));
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };
    debug!("selected {} for {selection:?}", descriptor.arch());
    fetch_descriptor(registry, descriptor, options, downloader, stderr).map(Some)
}

/// Fetch an already selected `descriptor` into the cache.
///
/// Progress is reported only when a download is needed.
///
/// # Errors
///
/// Returns download failures, integrity mismatches, and cache I/O failures.
pub fn fetch_descriptor(
    registry: &ArtifactRegistry,
    descriptor: &ArtifactDescriptor,
    options: &FetchOptions,
    downloader: &dyn ArtefactDownloader,
    stderr: &mut dyn Write,
) -> Result<Utf8PathBuf> {
    if !CacheEntry::new(&options.cache_dir, descriptor.file_name()).is_fresh(descriptor.sha256()) {
        progress(
            stderr,
            options.quiet,
            format!(
                "Downloading {} {} ({})...",
                registry.tool(),
                registry.version(),
                descriptor.arch()
            ),
        );
    }
    fetch_cached(descriptor, &options.cache_dir, downloader)
}
