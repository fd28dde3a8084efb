//! Per-artifact manifest records.
//!
//! A [`DescriptorRecord`] is the raw shape of one manifest entry, exactly as a
//! release tool writes it. Converting it into an [`ArtifactDescriptor`] runs
//! every field validation, so a descriptor in hand is always well formed.

use super::arch::ArchId;
use super::sha256_digest::Sha256Digest;
use super::verification;
use crate::error::{ManifestError, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// The raw, unvalidated form of a manifest entry.
///
/// `platform` and `machine` are independent options here because that is how
/// release manifests spell them; [`ArtifactDescriptor`] folds them into a
/// single [`HostMatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DescriptorRecord {
    /// Arch identifier, unique within a manifest.
    pub arch: String,
    /// Local binary name after download.
    pub file_name: String,
    /// Expected byte length.
    pub file_size: u64,
    /// Download location.
    pub url: String,
    /// Lowercase hex SHA-256 of the binary.
    pub sha256: String,
    /// Operating-system identifier matched against the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Hardware-architecture identifiers matched against the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine: Option<Vec<String>>,
}

/// The host axes an artifact can be selected by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostMatch {
    platform: String,
    machines: Vec<String>,
}

impl HostMatch {
    /// The operating-system identifier, e.g. `darwin`.
    #[must_use]
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// The hardware-architecture identifiers, never empty.
    #[must_use]
    pub fn machines(&self) -> &[String] {
        &self.machines
    }

    /// Whether the host identified by `platform` and `machine` is covered.
    ///
    /// Comparison is case-sensitive.
    #[must_use]
    pub fn matches(&self, platform: &str, machine: &str) -> bool {
        self.platform == platform && self.machines.iter().any(|m| m == machine)
    }
}

/// A validated description of one downloadable prebuilt binary.
///
/// # Examples
///
/// ```
/// use prebuilts::manifest::descriptor::{ArtifactDescriptor, DescriptorRecord};
/// use prebuilts::manifest::sha256_digest::Sha256Digest;
///
/// let record = DescriptorRecord {
///     arch: "linux-amd64".to_owned(),
///     file_name: "traceconv".to_owned(),
///     file_size: 3,
///     url: "https://example.com/linux-amd64/traceconv".to_owned(),
///     sha256: Sha256Digest::of_bytes(b"abc").into_inner(),
///     platform: Some("linux".to_owned()),
///     machine: Some(vec!["x86_64".to_owned()]),
/// };
/// let descriptor = ArtifactDescriptor::try_from(record).expect("valid record");
/// assert!(descriptor.matches(b"abc"));
/// assert!(!descriptor.matches(b"abd"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DescriptorRecord", into = "DescriptorRecord")]
pub struct ArtifactDescriptor {
    arch: ArchId,
    file_name: String,
    file_size: u64,
    url: String,
    sha256: Sha256Digest,
    host: Option<HostMatch>,
}

impl ArtifactDescriptor {
    /// The arch identifier.
    #[must_use]
    pub const fn arch(&self) -> &ArchId {
        &self.arch
    }

    /// The binary's local file name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The expected byte length, always positive.
    #[must_use]
    pub const fn file_size(&self) -> u64 {
        self.file_size
    }

    /// The download URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The expected content digest.
    #[must_use]
    pub const fn sha256(&self) -> &Sha256Digest {
        &self.sha256
    }

    /// The host axes, or `None` for entries that are only selectable by arch.
    #[must_use]
    pub const fn host(&self) -> Option<&HostMatch> {
        self.host.as_ref()
    }

    /// Whether this entry serves the given host. Entries without a host
    /// match never do.
    #[must_use]
    pub fn serves(&self, platform: &str, machine: &str) -> bool {
        self.host
            .as_ref()
            .is_some_and(|host| host.matches(platform, machine))
    }

    /// Check `bytes` against the recorded size and digest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::IntegrityMismatch`] when either the length or
    /// the SHA-256 digest disagrees with the manifest.
    pub fn verify(&self, bytes: &[u8]) -> Result<()> {
        verification::verify_bytes(self, bytes)
    }

    /// Stream `reader` through the digest and check it against the manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::IntegrityMismatch`] on a size or digest
    /// mismatch and [`ManifestError::Io`] when reading fails.
    pub fn verify_reader<R: Read>(&self, reader: R) -> Result<()> {
        verification::verify_reader(self, reader)
    }

    /// Boolean form of [`Self::verify`].
    #[must_use]
    pub fn matches(&self, bytes: &[u8]) -> bool {
        self.verify(bytes).is_ok()
    }
}

impl TryFrom<DescriptorRecord> for ArtifactDescriptor {
    type Error = ManifestError;

    fn try_from(record: DescriptorRecord) -> Result<Self> {
        let arch = ArchId::try_from(record.arch)?;

        if record.file_name.is_empty() || record.file_name.contains(['/', '\\']) {
            return Err(ManifestError::InvalidFileName {
                arch: arch.into(),
                value: record.file_name,
            });
        }
        if record.file_size == 0 {
            return Err(ManifestError::ZeroFileSize { arch: arch.into() });
        }
        if !(record.url.starts_with("https://") || record.url.starts_with("http://")) {
            return Err(ManifestError::InvalidUrl {
                arch: arch.into(),
                value: record.url,
            });
        }
        let sha256 = Sha256Digest::try_from(record.sha256)?;
        let host = host_match(&arch, record.platform, record.machine)?;

        Ok(Self {
            arch,
            file_name: record.file_name,
            file_size: record.file_size,
            url: record.url,
            sha256,
            host,
        })
    }
}

impl From<ArtifactDescriptor> for DescriptorRecord {
    fn from(descriptor: ArtifactDescriptor) -> Self {
        let (platform, machine) = match descriptor.host {
            Some(host) => (Some(host.platform), Some(host.machines)),
            None => (None, None),
        };
        Self {
            arch: descriptor.arch.into(),
            file_name: descriptor.file_name,
            file_size: descriptor.file_size,
            url: descriptor.url,
            sha256: descriptor.sha256.into_inner(),
            platform,
            machine,
        }
    }
}

/// Fold the optional platform and machine fields into a [`HostMatch`].
fn host_match(
    arch: &ArchId,
    platform: Option<String>,
    machine: Option<Vec<String>>,
) -> Result<Option<HostMatch>> {
    let invalid = |reason: &str| ManifestError::InvalidHostMatch {
        arch: arch.to_string(),
        reason: reason.to_owned(),
    };
    match (platform, machine) {
        (None, None) => Ok(None),
        (None, Some(_)) => Err(invalid("machine identifiers given without a platform")),
        (Some(_), None) => Err(invalid("platform given without machine identifiers")),
        (Some(platform), Some(machines)) => {
            if platform.is_empty() {
                return Err(invalid("platform is empty"));
            }
            if machines.is_empty() {
                return Err(invalid("machine set is empty"));
            }
            if machines.iter().any(String::is_empty) {
                return Err(invalid("machine identifier is empty"));
            }
            Ok(Some(HostMatch { platform, machines }))
        }
    }
}
