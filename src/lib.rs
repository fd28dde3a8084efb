//! Validated manifest registry for prebuilt trace-conversion binaries.
//!
//! A release ships one binary per operating system and CPU architecture. This
//! crate models the release manifest as an immutable [`ArtifactRegistry`] of
//! [`ArtifactDescriptor`] records, answers "which binary runs here?" through
//! [`ArtifactRegistry::resolve`], and checks downloaded bytes against the
//! recorded size and SHA-256 digest with [`ArtifactDescriptor::verify`].
//!
//! The embedded `traceconv` release table is available through
//! [`manifest::traceconv::registry`]:
//!
//! ```
//! use prebuilts::manifest::traceconv;
//!
//! let registry = traceconv::registry().expect("embedded manifest is valid");
//! let descriptor = registry.resolve("linux", "aarch64").expect("supported host");
//! assert_eq!(descriptor.arch().as_str(), "linux-arm64");
//! ```

pub mod error;
pub mod manifest;

pub use error::{IntegrityMismatch, ManifestError};
pub use manifest::descriptor::{ArtifactDescriptor, HostMatch};
pub use manifest::host::HostIdentity;
pub use manifest::registry::{ArtifactRegistry, Selection};
