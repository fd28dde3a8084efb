//! Arch identifier newtype.
//!
//! An arch identifier names one platform/architecture combination within a
//! release, for example `linux-amd64` or `android-arm64`. Identifiers are
//! lowercase ASCII letters, digits, and `-`.

use crate::error::{ManifestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated arch identifier.
///
/// # Examples
///
/// ```
/// use prebuilts::manifest::arch::ArchId;
///
/// let arch = ArchId::try_from("mac-arm64").expect("valid arch");
/// assert_eq!(arch.os(), "mac");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArchId(String);

impl ArchId {
    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the operating-system prefix (the part before the first `-`).
    #[must_use]
    pub fn os(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }
}

impl TryFrom<&str> for ArchId {
    type Error = ManifestError;

    fn try_from(value: &str) -> Result<Self> {
        validate_arch(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for ArchId {
    type Error = ManifestError;

    fn try_from(value: String) -> Result<Self> {
        validate_arch(&value)?;
        Ok(Self(value))
    }
}

impl From<ArchId> for String {
    fn from(value: ArchId) -> Self {
        value.0
    }
}

impl AsRef<str> for ArchId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

fn validate_arch(value: &str) -> Result<()> {
    let reject = |reason: &str| ManifestError::InvalidArch {
        value: value.to_owned(),
        reason: reason.to_owned(),
    };
    if value.is_empty() {
        return Err(reject("identifier is empty"));
    }
    if value.starts_with('-') || value.ends_with('-') {
        return Err(reject("identifier must not start or end with '-'"));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(reject("expected lowercase letters, digits, and '-'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("linux-amd64", "linux")]
    #[case("android-x64", "android")]
    #[case("windows-amd64", "windows")]
    fn accepts_manifest_identifiers(#[case] value: &str, #[case] os: &str) {
        let arch = ArchId::try_from(value).expect("valid arch");
        assert_eq!(arch.as_str(), value);
        assert_eq!(arch.os(), os);
    }

    #[rstest]
    #[case::empty("")]
    #[case::uppercase("Linux-amd64")]
    #[case::underscore("linux_amd64")]
    #[case::leading_dash("-linux")]
    #[case::trailing_dash("linux-")]
    #[case::slash("linux/amd64")]
    fn rejects_malformed_identifiers(#[case] value: &str) {
        let err = ArchId::try_from(value).expect_err("arch should be rejected");
        assert!(matches!(err, ManifestError::InvalidArch { .. }), "{err}");
    }
}
