//! Size and digest checks for downloaded artifacts.
//!
//! The length is compared before hashing: it is free to obtain and rejects
//! truncated downloads without touching the digest.

use super::descriptor::ArtifactDescriptor;
use super::sha256_digest::Sha256Digest;
use crate::error::{IntegrityMismatch, ManifestError, Result};
use log::debug;
use sha2::{Digest, Sha256};
use std::io::{ErrorKind, Read};

const READ_CHUNK: usize = 8192;

/// Verify an in-memory buffer against `descriptor`.
pub(crate) fn verify_bytes(descriptor: &ArtifactDescriptor, bytes: &[u8]) -> Result<()> {
    check_size(descriptor, bytes.len() as u64)?;
    check_digest(descriptor, &Sha256Digest::of_bytes(bytes))
}

/// Stream `reader` through SHA-256 and verify it against `descriptor`.
pub(crate) fn verify_reader<R: Read>(descriptor: &ArtifactDescriptor, mut reader: R) -> Result<()> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; READ_CHUNK];
    let mut total: u64 = 0;
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(ManifestError::Io {
                    arch: descriptor.arch().to_string(),
                    reason: e.to_string(),
                });
            }
        };
        let chunk = buffer.get(..bytes_read).unwrap_or_default();
        hasher.update(chunk);
        total += bytes_read as u64;
    }
    check_size(descriptor, total)?;
    check_digest(descriptor, &Sha256Digest::from_hasher(hasher))
}

fn check_size(descriptor: &ArtifactDescriptor, actual: u64) -> Result<()> {
    if actual == descriptor.file_size() {
        return Ok(());
    }
    debug!(
        "{}: size {actual} differs from manifest size {}",
        descriptor.arch(),
        descriptor.file_size()
    );
    Err(ManifestError::IntegrityMismatch {
        arch: descriptor.arch().to_string(),
        mismatch: IntegrityMismatch::Size {
            expected: descriptor.file_size(),
            actual,
        },
    })
}

fn check_digest(descriptor: &ArtifactDescriptor, actual: &Sha256Digest) -> Result<()> {
    if actual == descriptor.sha256() {
        return Ok(());
    }
    debug!("{}: digest {actual} differs from manifest", descriptor.arch());
    Err(ManifestError::IntegrityMismatch {
        arch: descriptor.arch().to_string(),
        mismatch: IntegrityMismatch::Digest {
            expected: descriptor.sha256().to_string(),
            actual: actual.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::descriptor::DescriptorRecord;
    use rstest::{fixture, rstest};
    use std::io::{self, Cursor};

    const CONTENT: &[u8] = b"prebuilt binary payload";

    #[fixture]
    fn descriptor() -> ArtifactDescriptor {
        ArtifactDescriptor::try_from(DescriptorRecord {
            arch: "linux-amd64".to_owned(),
            file_name: "traceconv".to_owned(),
            file_size: CONTENT.len() as u64,
            url: "https://example.com/linux-amd64/traceconv".to_owned(),
            sha256: Sha256Digest::of_bytes(CONTENT).into_inner(),
            platform: Some("linux".to_owned()),
            machine: Some(vec!["x86_64".to_owned()]),
        })
        .expect("valid descriptor")
    }

    #[rstest]
    fn matching_bytes_verify(descriptor: ArtifactDescriptor) {
        assert!(verify_bytes(&descriptor, CONTENT).is_ok());
        assert!(verify_reader(&descriptor, Cursor::new(CONTENT)).is_ok());
    }

    #[rstest]
    fn single_flipped_byte_is_a_digest_mismatch(descriptor: ArtifactDescriptor) {
        let mut tampered = CONTENT.to_vec();
        if let Some(first) = tampered.first_mut() {
            *first ^= 0x01;
        }
        let err = verify_bytes(&descriptor, &tampered).expect_err("tampered bytes");
        assert!(
            matches!(
                err,
                ManifestError::IntegrityMismatch {
                    mismatch: IntegrityMismatch::Digest { .. },
                    ..
                }
            ),
            "{err}"
        );
    }

    #[rstest]
    fn truncated_bytes_are_a_size_mismatch(descriptor: ArtifactDescriptor) {
        let truncated = CONTENT.get(1..).expect("non-empty content");
        let err = verify_reader(&descriptor, Cursor::new(truncated)).expect_err("truncated");
        assert_eq!(
            err,
            ManifestError::IntegrityMismatch {
                arch: "linux-amd64".to_owned(),
                mismatch: IntegrityMismatch::Size {
                    expected: CONTENT.len() as u64,
                    actual: CONTENT.len() as u64 - 1,
                },
            }
        );
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[rstest]
    fn read_failures_surface_as_io_errors(descriptor: ArtifactDescriptor) {
        let err = verify_reader(&descriptor, FailingReader).expect_err("read failure");
        assert!(
            matches!(err, ManifestError::Io { ref reason, .. } if reason.contains("disk on fire")),
            "{err}"
        );
    }

    #[rstest]
    fn streaming_spans_multiple_chunks() {
        let big = vec![7u8; READ_CHUNK * 3 + 11];
        let descriptor = ArtifactDescriptor::try_from(DescriptorRecord {
            arch: "android-arm".to_owned(),
            file_name: "traceconv".to_owned(),
            file_size: big.len() as u64,
            url: "https://example.com/android-arm/traceconv".to_owned(),
            sha256: Sha256Digest::of_bytes(&big).into_inner(),
            platform: None,
            machine: None,
        })
        .expect("valid descriptor");
        assert!(verify_reader(&descriptor, Cursor::new(&big)).is_ok());
    }
}
