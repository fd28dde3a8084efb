//! The immutable, ordered artifact registry.
//!
//! A registry holds every descriptor for one release of one tool. It is built
//! once, checked against the manifest invariants, and never mutated; lookups
//! borrow from it and have no side effects, so a shared registry can be used
//! from any number of threads.

use super::arch::ArchId;
use super::descriptor::{ArtifactDescriptor, DescriptorRecord};
use super::host::HostIdentity;
use super::parser;
use crate::error::{ManifestError, Result};
use log::trace;
use std::collections::HashSet;

/// How a caller picks an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Match the host's platform and machine identifiers.
    Host(HostIdentity),
    /// Pick the entry with this arch identifier, bypassing host matching.
    Arch(ArchId),
}

impl Selection {
    /// Select by the identity of the running host.
    #[must_use]
    pub fn current_host() -> Self {
        Self::Host(HostIdentity::current())
    }
}

/// An ordered, validated collection of artifact descriptors for one release.
///
/// # Examples
///
/// ```
/// use prebuilts::manifest::traceconv;
///
/// let registry = traceconv::registry().expect("embedded manifest is valid");
/// let mac = registry.resolve("darwin", "x86_64").expect("supported host");
/// assert_eq!(mac.arch().as_str(), "mac-amd64");
/// assert!(registry.resolve("plan9", "x86_64").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRegistry {
    tool: String,
    version: String,
    entries: Vec<ArtifactDescriptor>,
}

impl ArtifactRegistry {
    /// Build a registry, enforcing arch uniqueness.
    ///
    /// Per-entry invariants are already guaranteed by [`ArtifactDescriptor`].
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::DuplicateArch`] if two entries share an arch.
    pub fn new(
        tool: impl Into<String>,
        version: impl Into<String>,
        entries: Vec<ArtifactDescriptor>,
    ) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.arch()) {
                return Err(ManifestError::DuplicateArch {
                    arch: entry.arch().to_string(),
                });
            }
        }
        Ok(Self {
            tool: tool.into(),
            version: version.into(),
            entries,
        })
    }

    /// Build a registry from raw records, validating each one.
    ///
    /// # Errors
    ///
    /// Returns the first field validation failure, or
    /// [`ManifestError::DuplicateArch`].
    pub fn from_records(
        tool: impl Into<String>,
        version: impl Into<String>,
        records: Vec<DescriptorRecord>,
    ) -> Result<Self> {
        let entries = records
            .into_iter()
            .map(ArtifactDescriptor::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(tool, version, entries)
    }

    /// Parse a JSON array of manifest records.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] for malformed JSON or invalid fields
    /// and [`ManifestError::DuplicateArch`] for repeated identifiers.
    pub fn from_json(
        tool: impl Into<String>,
        version: impl Into<String>,
        json: &str,
    ) -> Result<Self> {
        Self::new(tool, version, parser::parse_descriptors(json)?)
    }

    /// The name of the tool the release ships, e.g. `traceconv`.
    #[must_use]
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// The release version, e.g. `v32.1`.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = &ArtifactDescriptor> {
        self.entries.iter()
    }

    /// Look up an entry by arch identifier.
    #[must_use]
    pub fn get(&self, arch: &str) -> Option<&ArtifactDescriptor> {
        self.entries.iter().find(|entry| entry.arch().as_str() == arch)
    }

    /// Return the first entry, in manifest order, serving `platform_id` and
    /// `machine_id`. Matching is case-sensitive, and entries without a host
    /// match are never returned.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnsupportedPlatform`] if no entry matches.
    pub fn resolve(&self, platform_id: &str, machine_id: &str) -> Result<&ArtifactDescriptor> {
        let found = self
            .entries
            .iter()
            .find(|entry| entry.serves(platform_id, machine_id));
        match found {
            Some(entry) => {
                trace!("resolve: {platform_id}/{machine_id} -> {}", entry.arch());
                Ok(entry)
            }
            None => Err(ManifestError::UnsupportedPlatform {
                platform: platform_id.to_owned(),
                machine: machine_id.to_owned(),
            }),
        }
    }

    /// Return the entry with the given arch identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnknownArch`] if no entry carries `arch`.
    pub fn resolve_arch(&self, arch: &str) -> Result<&ArtifactDescriptor> {
        self.get(arch).ok_or_else(|| ManifestError::UnknownArch {
            arch: arch.to_owned(),
            expected: self.arch_list(),
        })
    }

    /// Apply a [`Selection`].
    ///
    /// # Errors
    ///
    /// Propagates the error of [`Self::resolve`] or [`Self::resolve_arch`].
    pub fn select(&self, selection: &Selection) -> Result<&ArtifactDescriptor> {
        match selection {
            Selection::Host(host) => self.resolve(host.platform(), host.machine()),
            Selection::Arch(arch) => self.resolve_arch(arch.as_str()),
        }
    }

    /// Check `local_bytes` against `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::IntegrityMismatch`] when the size or digest
    /// disagrees.
    pub fn verify(&self, descriptor: &ArtifactDescriptor, local_bytes: &[u8]) -> Result<()> {
        descriptor.verify(local_bytes)
    }

    fn arch_list(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.arch().as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<'a> IntoIterator for &'a ArtifactRegistry {
    type Item = &'a ArtifactDescriptor;
    type IntoIter = std::slice::Iter<'a, ArtifactDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
