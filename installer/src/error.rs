//! Error types for the prebuilts installer.
//!
//! Variants carry enough context to tell the user what to do next: which
//! artifact failed, which path could not be written, or which host is not
//! covered by the manifest.

use crate::download::DownloadError;
use camino::Utf8PathBuf;
use prebuilts::ManifestError;
use thiserror::Error;

/// Errors that can occur while fetching, verifying, or running a prebuilt.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Manifest lookup, validation, or integrity verification failed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Downloading the artifact failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The cache directory could not be determined.
    #[error("cache directory unavailable: {reason}")]
    CacheDirUnavailable {
        /// Description of why resolution failed.
        reason: String,
    },

    /// A cache file could not be read, written, or renamed.
    #[error("cache I/O failed at {path}: {source}")]
    CacheIo {
        /// The path that was being accessed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration at {path}: {reason}")]
    Config {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// An input file (a `--manifest` document or a file to verify) could not
    /// be read.
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        /// Path of the file.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The prebuilt binary could not be launched.
    #[error("failed to run {program}: {source}")]
    CommandFailed {
        /// The binary that was launched.
        program: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Build a [`FetchError::CacheIo`] for `path`.
    pub(crate) fn cache_io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::CacheIo {
            path: path.into(),
            source,
        }
    }

    /// Whether the host is simply not covered by the manifest.
    #[must_use]
    pub const fn is_unsupported_platform(&self) -> bool {
        match self {
            Self::Manifest(inner) => inner.is_unsupported_platform(),
            _ => false,
        }
    }
}

/// Result type alias using [`FetchError`].
pub type Result<T> = std::result::Result<T, FetchError>;
