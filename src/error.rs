//! Error types for manifest construction, lookup, and verification.
//!
//! Each variant provides a descriptive message identifying the rejected input
//! and the constraint that was violated.

use std::fmt;
use thiserror::Error;

/// Errors arising from manifest records, registry lookups, and integrity
/// checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// No manifest entry matches the host's platform and machine.
    #[error("no prebuilt binary for {platform}/{machine}")]
    UnsupportedPlatform {
        /// The operating-system identifier that was looked up.
        platform: String,
        /// The hardware-architecture identifier that was looked up.
        machine: String,
    },

    /// No manifest entry carries the requested `arch` identifier.
    #[error("unknown arch \"{arch}\"; expected one of: {expected}")]
    UnknownArch {
        /// The rejected identifier.
        arch: String,
        /// Comma-separated list of identifiers in the registry.
        expected: String,
    },

    /// Local bytes disagree with the descriptor's size or digest.
    #[error("integrity check failed for {arch}: {mismatch}")]
    IntegrityMismatch {
        /// The arch of the descriptor that was checked.
        arch: String,
        /// Which property disagreed.
        mismatch: IntegrityMismatch,
    },

    /// A SHA-256 digest is not a valid 64-character lowercase hex string.
    #[error("invalid SHA-256 digest: {reason}")]
    InvalidSha256Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// An arch identifier is empty or contains unsupported characters.
    #[error("invalid arch \"{value}\": {reason}")]
    InvalidArch {
        /// The rejected identifier.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A file name is empty or contains a path separator.
    #[error("invalid file name \"{value}\" for {arch}")]
    InvalidFileName {
        /// The arch of the offending record.
        arch: String,
        /// The rejected file name.
        value: String,
    },

    /// A download URL is not an absolute HTTP(S) URL.
    #[error("invalid url \"{value}\" for {arch}")]
    InvalidUrl {
        /// The arch of the offending record.
        arch: String,
        /// The rejected URL.
        value: String,
    },

    /// A record declares a zero byte length.
    #[error("file size for {arch} must be positive")]
    ZeroFileSize {
        /// The arch of the offending record.
        arch: String,
    },

    /// A host match was declared without any machine identifiers, or machine
    /// identifiers were given without a platform.
    #[error("invalid host match for {arch}: {reason}")]
    InvalidHostMatch {
        /// The arch of the offending record.
        arch: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// Two records share the same `arch` identifier.
    #[error("duplicate arch \"{arch}\" in manifest")]
    DuplicateArch {
        /// The repeated identifier.
        arch: String,
    },

    /// The manifest document could not be parsed.
    #[error("manifest parse error: {reason}")]
    Parse {
        /// Description of the parse failure.
        reason: String,
    },

    /// Reading local bytes for verification failed.
    #[error("failed to read artifact for {arch}: {reason}")]
    Io {
        /// The arch of the descriptor being verified.
        arch: String,
        /// Description of the underlying I/O error.
        reason: String,
    },
}

impl ManifestError {
    /// Whether this error is the integrity failure callers must never ignore.
    #[must_use]
    pub const fn is_integrity_mismatch(&self) -> bool {
        matches!(self, Self::IntegrityMismatch { .. })
    }

    /// Whether the manifest simply has no entry for the host.
    #[must_use]
    pub const fn is_unsupported_platform(&self) -> bool {
        matches!(self, Self::UnsupportedPlatform { .. })
    }
}

/// The property that disagreed during verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityMismatch {
    /// The byte length differs from the manifest.
    Size {
        /// The manifest's `file_size`.
        expected: u64,
        /// The observed byte length.
        actual: u64,
    },
    /// The SHA-256 digest differs from the manifest.
    Digest {
        /// The manifest's digest.
        expected: String,
        /// The digest of the local bytes.
        actual: String,
    },
}

impl fmt::Display for IntegrityMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Size { expected, actual } => {
                write!(f, "size mismatch (expected {expected} bytes, got {actual})")
            }
            Self::Digest { expected, actual } => {
                write!(f, "checksum mismatch (expected {expected}, got {actual})")
            }
        }
    }
}

/// Result type alias using [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;
