//! Artifact manifest domain model, lookup, and verification.
//!
//! # Sub-modules
//!
//! - [`arch`] - Arch identifier newtype (`ArchId`).
//! - [`descriptor`] - Per-artifact records (`ArtifactDescriptor`, `HostMatch`).
//! - [`host`] - Host platform and machine detection (`HostIdentity`).
//! - [`parser`] - JSON manifest deserialization.
//! - [`registry`] - The immutable, ordered registry and its lookups.
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).
//! - [`traceconv`] - The embedded `traceconv` release table.
//! - [`verification`] - Size and digest checks over bytes and readers.

pub mod arch;
pub mod descriptor;
pub mod host;
pub mod parser;
pub mod registry;
pub mod sha256_digest;
pub mod traceconv;
pub mod verification;
