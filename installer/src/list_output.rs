//! Output formatting for manifest listings.
//!
//! This module formats registry entries for human-readable or JSON output.
//! JSON uses the same record shape as `--manifest` input, so a listing can be
//! saved and fed back in.

use prebuilts::manifest::descriptor::DescriptorRecord;
use prebuilts::{ArtifactDescriptor, ArtifactRegistry, HostMatch};
use serde::Serialize;

/// Format every entry of `registry` for human-readable output.
///
/// # Examples
///
/// ```
/// use prebuilts::manifest::traceconv;
/// use prebuilts_installer::list_output::format_human;
///
/// let registry = traceconv::registry().expect("embedded manifest is valid");
/// let output = format_human(registry);
/// assert!(output.starts_with("traceconv v32.1"));
/// assert!(output.contains("linux-arm64"));
/// ```
#[must_use]
pub fn format_human(registry: &ArtifactRegistry) -> String {
    if registry.is_empty() {
        return format!(
            "{} {}: no artifacts in manifest.",
            registry.tool(),
            registry.version()
        );
    }

    let plural = if registry.len() == 1 { "artifact" } else { "artifacts" };
    let mut output = format!(
        "{} {} ({} {plural}):\n\n",
        registry.tool(),
        registry.version(),
        registry.len()
    );
    for descriptor in registry {
        output.push_str(&format!(
            "  {:<16} {:>10} bytes  {}\n",
            descriptor.arch(),
            descriptor.file_size(),
            host_label(descriptor.host())
        ));
    }
    output
}

/// Format one descriptor as labelled lines.
///
/// # Examples
///
/// ```
/// use prebuilts::manifest::traceconv;
/// use prebuilts_installer::list_output::format_descriptor;
///
/// let registry = traceconv::registry().expect("embedded manifest is valid");
/// let descriptor = registry.resolve("darwin", "arm64").expect("supported host");
/// assert!(format_descriptor(descriptor).contains("arch:      mac-arm64"));
/// ```
#[must_use]
pub fn format_descriptor(descriptor: &ArtifactDescriptor) -> String {
    format!(
        concat!(
            "arch:      {}\n",
            "file name: {}\n",
            "size:      {} bytes\n",
            "sha256:    {}\n",
            "url:       {}\n",
            "host:      {}"
        ),
        descriptor.arch(),
        descriptor.file_name(),
        descriptor.file_size(),
        descriptor.sha256(),
        descriptor.url(),
        host_label(descriptor.host())
    )
}

/// Format every entry of `registry` as JSON.
#[must_use]
pub fn format_json(registry: &ArtifactRegistry) -> String {
    let json_data = ManifestJson {
        tool: registry.tool(),
        version: registry.version(),
        artifacts: registry.iter().cloned().map(DescriptorRecord::from).collect(),
    };
    serde_json::to_string_pretty(&json_data).unwrap_or_else(|_| "{}".to_owned())
}

/// Format one descriptor as a JSON manifest record.
#[must_use]
pub fn format_descriptor_json(descriptor: &ArtifactDescriptor) -> String {
    let record = DescriptorRecord::from(descriptor.clone());
    serde_json::to_string_pretty(&record).unwrap_or_else(|_| "{}".to_owned())
}

/// JSON-serializable listing of a registry.
#[derive(Debug, Serialize)]
struct ManifestJson<'a> {
    tool: &'a str,
    version: &'a str,
    artifacts: Vec<DescriptorRecord>,
}

fn host_label(host: Option<&HostMatch>) -> String {
    host.map_or_else(
        || "(select with --arch)".to_owned(),
        |host| format!("{}/{}", host.platform(), host.machines().join(",")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use prebuilts::manifest::traceconv;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> &'static ArtifactRegistry {
        traceconv::registry().expect("embedded manifest is valid")
    }

    #[rstest]
    fn human_listing_has_one_line_per_entry(registry: &'static ArtifactRegistry) {
        let output = format_human(registry);
        assert!(output.starts_with("traceconv v32.1 (10 artifacts):"));
        let rows = output.lines().filter(|line| line.starts_with("  ")).count();
        assert_eq!(rows, 10);
    }

    #[rstest]
    fn human_listing_shows_host_axes(registry: &'static ArtifactRegistry) {
        let output = format_human(registry);
        assert!(output.contains("linux/armv6l,armv7l,armv8l"));
        assert!(output.contains("win32/amd64"));
    }

    #[rstest]
    fn hostless_entries_point_at_arch_selection(registry: &'static ArtifactRegistry) {
        let output = format_human(registry);
        let android = output
            .lines()
            .find(|line| line.contains("android-arm64"))
            .expect("android row");
        assert!(android.ends_with("(select with --arch)"), "{android}");
    }

    #[test]
    fn empty_registry_says_so() {
        let registry = ArtifactRegistry::new("traceconv", "v0", Vec::new()).expect("empty");
        assert_eq!(format_human(&registry), "traceconv v0: no artifacts in manifest.");
    }

    #[rstest]
    fn json_listing_round_trips_through_the_parser(registry: &'static ArtifactRegistry) {
        let json = format_json(registry);
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        assert_eq!(value["tool"], "traceconv");
        assert_eq!(value["version"], "v32.1");

        let artifacts = value["artifacts"].to_string();
        let reparsed = ArtifactRegistry::from_json("traceconv", "v32.1", &artifacts)
            .expect("listing is a valid manifest");
        assert_eq!(&reparsed, registry);
    }

    #[rstest]
    fn descriptor_json_omits_absent_host_fields(registry: &'static ArtifactRegistry) {
        let android = registry.get("android-arm").expect("android entry");
        let json = format_descriptor_json(android);
        assert!(!json.contains("platform"));
        assert!(json.contains("\"arch\": \"android-arm\""));
    }
}
