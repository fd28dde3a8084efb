//! The embedded `traceconv` release manifest.
//!
//! The table below is the `v32.1` release, rolled from the project's
//! artifact bucket. The android entries carry no platform or machine: they
//! are never picked by host matching and must be requested by arch.

use super::descriptor::DescriptorRecord;
use super::registry::ArtifactRegistry;
use crate::error::Result;
use std::sync::OnceLock;

/// The tool every entry in this manifest ships.
pub const TOOL: &str = "traceconv";

/// The release the table was rolled from.
pub const VERSION: &str = "v32.1";

const BASE_URL: &str = "https://commondatastorage.googleapis.com/perfetto-luci-artifacts";

/// One row of the literal table.
struct Row {
    arch: &'static str,
    file_name: &'static str,
    file_size: u64,
    sha256: &'static str,
    host: Option<(&'static str, &'static [&'static str])>,
}

const ROWS: &[Row] = &[
    Row {
        arch: "mac-amd64",
        file_name: "traceconv",
        file_size: 7_805_800,
        sha256: "0ea0a025cedab2b6cfe605f127daa2a12c98f051f9314c9ab8a59c55306b36c2",
        host: Some(("darwin", &["x86_64"])),
    },
    Row {
        arch: "mac-arm64",
        file_name: "traceconv",
        file_size: 6_587_480,
        sha256: "85bb771be931fe90c9da122f412efb884ff8bd2bd2eaa3f083c2c6ea5dd9205a",
        host: Some(("darwin", &["arm64"])),
    },
    Row {
        arch: "linux-amd64",
        file_name: "traceconv",
        file_size: 8_100_352,
        sha256: "c201fe1c30a00c0e7a1eac169ab91f05d6468a485b0791db3c439888e9334fde",
        host: Some(("linux", &["x86_64"])),
    },
    Row {
        arch: "linux-arm",
        file_name: "traceconv",
        file_size: 6_674_592,
        sha256: "5a0bc650e39a289b2051a55ac3e7e2c05cb56f053e2b8dc31bb183e75892be28",
        host: Some(("linux", &["armv6l", "armv7l", "armv8l"])),
    },
    Row {
        arch: "linux-arm64",
        file_name: "traceconv",
        file_size: 7_554_976,
        sha256: "f2a3d4c3a7e6af760a4a03fe70e6c32479260bd6487f4b89d49412231c42e197",
        host: Some(("linux", &["aarch64"])),
    },
    Row {
        arch: "android-arm",
        file_name: "traceconv",
        file_size: 5_355_916,
        sha256: "58101b41d4930abfebef729d2657252ca6f2c3cff4ebcb838165d606808ff0ad",
        host: None,
    },
    Row {
        arch: "android-arm64",
        file_name: "traceconv",
        file_size: 6_773_264,
        sha256: "a7fc9fb02e94c92821d36cd0fb90bff75cbe32688e5f2678426b796a5f86ba53",
        host: None,
    },
    Row {
        arch: "android-x86",
        file_name: "traceconv",
        file_size: 7_670_116,
        sha256: "1a64a26516b5a0db710532b4a6f495d4f83153df56b2847093d1b6d17e749b6b",
        host: None,
    },
    Row {
        arch: "android-x64",
        file_name: "traceconv",
        file_size: 7_916_104,
        sha256: "9badc970a3573a038977a7fef59b4d57797ef57e2e4e2d5f23804a0bfcdf1585",
        host: None,
    },
    Row {
        arch: "windows-amd64",
        file_name: "traceconv.exe",
        file_size: 7_217_664,
        sha256: "d2b9c3ca448c9815c2393716758e85d4d2c8033ce0531b4551703a2b7e3d43a0",
        host: Some(("win32", &["amd64"])),
    },
];

impl Row {
    fn record(&self) -> DescriptorRecord {
        DescriptorRecord {
            arch: self.arch.to_owned(),
            file_name: self.file_name.to_owned(),
            file_size: self.file_size,
            url: format!("{BASE_URL}/{VERSION}/{}/{}", self.arch, self.file_name),
            sha256: self.sha256.to_owned(),
            platform: self.host.map(|(platform, _)| platform.to_owned()),
            machine: self
                .host
                .map(|(_, machines)| machines.iter().map(|m| (*m).to_owned()).collect()),
        }
    }
}

/// Build a fresh registry from the literal table.
///
/// # Errors
///
/// Returns a validation error if the table violates a manifest invariant.
pub fn build() -> Result<ArtifactRegistry> {
    ArtifactRegistry::from_records(TOOL, VERSION, ROWS.iter().map(Row::record).collect())
}

/// The process-wide `traceconv` registry, built on first use.
///
/// # Errors
///
/// Returns the validation error from [`build`] on every call if the table is
/// invalid.
pub fn registry() -> Result<&'static ArtifactRegistry> {
    static REGISTRY: OnceLock<Result<ArtifactRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(build).as_ref().map_err(Clone::clone)
}
