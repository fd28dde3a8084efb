//! Host platform and machine identification.
//!
//! Release manifests name hosts the way a Python interpreter reports them:
//! `sys.platform` for the operating system (`darwin`, `linux`, `win32`) and a
//! lowercased `platform.machine()` for the CPU (`x86_64`, `arm64`, `aarch64`,
//! `amd64`, `armv7l`). Rust's target constants use different spellings, so
//! [`HostIdentity::current`] translates them.

use serde::Serialize;
use std::env::consts;
use std::fmt;

/// The operating-system and hardware-architecture identifiers of a host.
///
/// # Examples
///
/// ```
/// use prebuilts::manifest::host::HostIdentity;
///
/// let host = HostIdentity::new("Darwin", "X86_64");
/// assert_eq!(host.platform(), "darwin");
/// assert_eq!(host.machine(), "x86_64");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HostIdentity {
    platform: String,
    machine: String,
}

impl HostIdentity {
    /// Build an identity from explicit values, lowercasing both.
    #[must_use]
    pub fn new(platform: impl AsRef<str>, machine: impl AsRef<str>) -> Self {
        Self {
            platform: platform.as_ref().to_ascii_lowercase(),
            machine: machine.as_ref().to_ascii_lowercase(),
        }
    }

    /// Identify the host this binary was compiled for.
    #[must_use]
    pub fn current() -> Self {
        Self::from_target(consts::OS, consts::ARCH)
    }

    /// Translate Rust `target_os` / `target_arch` names into manifest
    /// conventions.
    ///
    /// # Examples
    ///
    /// ```
    /// use prebuilts::manifest::host::HostIdentity;
    ///
    /// let host = HostIdentity::from_target("macos", "aarch64");
    /// assert_eq!(host.platform(), "darwin");
    /// assert_eq!(host.machine(), "arm64");
    /// ```
    #[must_use]
    pub fn from_target(os: &str, arch: &str) -> Self {
        Self::new(platform_for_os(os), machine_for_arch(os, arch))
    }

    /// The operating-system identifier.
    #[must_use]
    pub fn platform(&self) -> &str {
        &self.platform
    }

    /// The hardware-architecture identifier.
    #[must_use]
    pub fn machine(&self) -> &str {
        &self.machine
    }
}

impl fmt::Display for HostIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.platform, self.machine)
    }
}

fn platform_for_os(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

fn machine_for_arch<'a>(os: &str, arch: &'a str) -> &'a str {
    match (os, arch) {
        ("windows", "x86_64") => "amd64",
        ("windows" | "macos", "aarch64") => "arm64",
        (_, "arm") => "armv7l",
        (_, "x86") => "i686",
        (_, other) => other,
    }
}
