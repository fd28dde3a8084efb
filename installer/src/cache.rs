//! Content-addressed cache of downloaded prebuilt binaries.
//!
//! Each artifact occupies three names in the cache directory:
//!
//! - `<file_name>`: the verified, executable binary.
//! - `<file_name>.sha256`: the stamp, holding the digest the binary was
//!   verified against. It is written last, so a present stamp implies a
//!   complete binary.
//! - `<file_name>.tmp`: the in-flight download, renamed over the binary once
//!   verified and removed on any failure.
//!
//! A cache hit is decided from the stamp alone; the binary is not re-hashed.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use prebuilts::ArtifactDescriptor;
use prebuilts::manifest::sha256_digest::Sha256Digest;

use crate::download::ArtefactDownloader;
use crate::error::{FetchError, Result};

/// Paths of one artifact inside the cache directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    binary: Utf8PathBuf,
    stamp: Utf8PathBuf,
    temp: Utf8PathBuf,
}

impl CacheEntry {
    /// Locate the cache entry for `file_name` under `cache_dir`.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use prebuilts_installer::cache::CacheEntry;
    ///
    /// let entry = CacheEntry::new(Utf8Path::new("/cache"), "traceconv");
    /// assert_eq!(entry.binary(), "/cache/traceconv");
    /// assert_eq!(entry.stamp(), "/cache/traceconv.sha256");
    /// ```
    #[must_use]
    pub fn new(cache_dir: &Utf8Path, file_name: &str) -> Self {
        Self {
            binary: cache_dir.join(file_name),
            stamp: cache_dir.join(format!("{file_name}.sha256")),
            temp: cache_dir.join(format!("{file_name}.tmp")),
        }
    }

    /// Path of the cached binary.
    #[must_use]
    pub fn binary(&self) -> &Utf8Path {
        &self.binary
    }

    /// Path of the digest stamp.
    #[must_use]
    pub fn stamp(&self) -> &Utf8Path {
        &self.stamp
    }

    /// Path the download is written to before verification.
    #[must_use]
    pub fn temp(&self) -> &Utf8Path {
        &self.temp
    }

    /// Whether the binary exists and its stamp records `digest`.
    #[must_use]
    pub fn is_fresh(&self, digest: &Sha256Digest) -> bool {
        if !self.binary.is_file() {
            return false;
        }
        std::fs::read_to_string(&self.stamp)
            .is_ok_and(|recorded| recorded.trim() == digest.as_str())
    }

    fn discard_temp(&self) {
        match std::fs::remove_file(&self.temp) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                warn!("could not remove {}: {e}", self.temp);
            }
            _ => {}
        }
    }
}

/// Return the cached binary for `descriptor`, downloading it on a miss.
///
/// On a miss the artifact is downloaded to the temporary name, verified
/// against the descriptor's size and digest, marked executable on Unix, and
/// renamed into place before the stamp is written.
///
/// # Errors
///
/// Returns [`FetchError::CacheIo`] when the cache cannot be written,
/// [`FetchError::Download`] when the download fails, and
/// [`FetchError::Manifest`] wrapping an integrity mismatch when the bytes do
/// not match. No temporary file survives a failure.
pub fn fetch_cached(
    descriptor: &ArtifactDescriptor,
    cache_dir: &Utf8Path,
    downloader: &dyn ArtefactDownloader,
) -> Result<Utf8PathBuf> {
    std::fs::create_dir_all(cache_dir).map_err(|e| FetchError::cache_io(cache_dir, e))?;
    let entry = CacheEntry::new(cache_dir, descriptor.file_name());

    if entry.is_fresh(descriptor.sha256()) {
        debug!("cache hit for {} at {}", descriptor.arch(), entry.binary());
        return Ok(entry.binary.clone());
    }
    debug!("cache miss for {}", descriptor.arch());

    if let Err(e) = install(descriptor, &entry, downloader) {
        entry.discard_temp();
        return Err(e);
    }
    Ok(entry.binary.clone())
}

fn install(
    descriptor: &ArtifactDescriptor,
    entry: &CacheEntry,
    downloader: &dyn ArtefactDownloader,
) -> Result<()> {
    downloader.download(descriptor.url(), entry.temp.as_std_path())?;

    let file = std::fs::File::open(&entry.temp).map_err(|e| FetchError::cache_io(&entry.temp, e))?;
    descriptor.verify_reader(std::io::BufReader::new(file))?;

    make_executable(&entry.temp)?;
    std::fs::rename(&entry.temp, &entry.binary)
        .map_err(|e| FetchError::cache_io(&entry.binary, e))?;
    std::fs::write(&entry.stamp, descriptor.sha256().as_str())
        .map_err(|e| FetchError::cache_io(&entry.stamp, e))?;
    debug!("cached {} at {}", descriptor.arch(), entry.binary);
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Utf8Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .map_err(|e| FetchError::cache_io(path, e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Utf8Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
