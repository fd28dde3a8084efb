//! Manifest JSON deserialization.
//!
//! A manifest document is a JSON array of records shaped like
//! [`DescriptorRecord`](super::descriptor::DescriptorRecord). All field
//! validation runs during deserialization, so malformed entries are rejected
//! at parse time with the validation message embedded in the error.

use super::descriptor::ArtifactDescriptor;
use crate::error::{ManifestError, Result};

/// Parse a JSON array into validated descriptors, preserving order.
///
/// # Errors
///
/// Returns [`ManifestError::Parse`] if the JSON is malformed or any record
/// fails validation.
///
/// # Examples
///
/// ```
/// use prebuilts::manifest::parser::parse_descriptors;
///
/// let json = concat!(
///     r#"[{"arch":"android-arm","file_name":"traceconv","file_size":1,"#,
///     r#""url":"https://example.com/android-arm/traceconv","#,
///     r#""sha256":"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"}]"#,
/// );
/// let descriptors = parse_descriptors(json).expect("valid manifest");
/// assert!(descriptors[0].host().is_none());
/// ```
pub fn parse_descriptors(json: &str) -> Result<Vec<ArtifactDescriptor>> {
    serde_json::from_str(json).map_err(|e| ManifestError::Parse {
        reason: e.to_string(),
    })
}
