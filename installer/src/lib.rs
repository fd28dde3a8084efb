//! Prebuilts installer library.
//!
//! This crate downloads the prebuilt binary a manifest selects for the host,
//! verifies it against the recorded size and SHA-256 digest, caches it per
//! user, and runs it. It is used by the `prebuilts` CLI binary and can be
//! consumed programmatically by tools that need the binary on disk.
//!
//! # Modules
//!
//! - [`cache`] - Content-addressed binary cache with digest stamps
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - `prebuilts.toml` configuration loading
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`download`] - HTTP download abstraction
//! - [`error`] - Error types for fetching and running prebuilts
//! - [`fetch`] - Selection, download, and caching in one step
//! - [`list_output`] - Output formatting for manifest listings
//! - [`output`] - Progress output helpers
//! - [`run`] - Launching the cached binary

pub mod cache;
pub mod cli;
pub mod config;
pub mod dirs;
pub mod download;
pub mod error;
pub mod fetch;
pub mod list_output;
pub mod output;
pub mod run;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
