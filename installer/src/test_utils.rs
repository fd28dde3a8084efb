//! Shared test utilities for the installer crate.
//!
//! Available to unit tests and, through the `test-support` feature, to the
//! behaviour tests under `tests/`.

use crate::download::{ArtefactDownloader, DownloadError};
use prebuilts::ArtifactRegistry;
use prebuilts::manifest::descriptor::DescriptorRecord;
use prebuilts::manifest::sha256_digest::Sha256Digest;
use std::cell::RefCell;
use std::path::Path;

/// Payload served by [`StubDownloader::serving`] in most tests.
pub const PAYLOAD: &[u8] = b"#!/bin/sh\necho traceconv\n";

/// Build a manifest record whose size and digest describe `payload`.
///
/// `host` is the `(platform, machines)` pair, or `None` for an entry that is
/// only reachable by arch.
pub fn payload_record(
    arch: &str,
    payload: &[u8],
    host: Option<(&str, &[&str])>,
) -> DescriptorRecord {
    DescriptorRecord {
        arch: arch.to_owned(),
        file_name: "traceconv".to_owned(),
        file_size: payload.len() as u64,
        url: format!("https://artifacts.example.test/v1/{arch}/traceconv"),
        sha256: Sha256Digest::of_bytes(payload).into_inner(),
        platform: host.map(|(platform, _)| platform.to_owned()),
        machine: host.map(|(_, machines)| machines.iter().map(|m| (*m).to_owned()).collect()),
    }
}

/// A two-entry registry describing `payload`: `linux-amd64` serves
/// `linux/x86_64` and `android-arm64` has no host match.
///
/// # Panics
///
/// Panics if the records fail validation, which would be a bug in the helper.
pub fn payload_registry(payload: &[u8]) -> ArtifactRegistry {
    ArtifactRegistry::from_records(
        "traceconv",
        "v1",
        vec![
            payload_record("linux-amd64", payload, Some(("linux", &["x86_64"][..]))),
            payload_record("android-arm64", payload, None),
        ],
    )
    .expect("test manifest is valid")
}

/// An [`ArtefactDownloader`] that serves fixed bytes and records each URL.
#[derive(Debug)]
pub struct StubDownloader {
    response: Option<Vec<u8>>,
    calls: RefCell<Vec<String>>,
}

impl StubDownloader {
    /// Serve `payload` for every request.
    pub fn serving(payload: &[u8]) -> Self {
        Self {
            response: Some(payload.to_vec()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Answer every request with [`DownloadError::NotFound`].
    pub fn not_found() -> Self {
        Self {
            response: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// URLs requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ArtefactDownloader for StubDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        self.calls.borrow_mut().push(url.to_owned());
        match &self.response {
            Some(bytes) => std::fs::write(dest, bytes).map_err(DownloadError::Io),
            None => Err(DownloadError::NotFound {
                url: url.to_owned(),
            }),
        }
    }
}
