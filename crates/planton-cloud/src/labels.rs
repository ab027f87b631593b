//! Standard tags and labels stamped on provisioned resources

use planton_core::Manifest;
use planton_registry::CloudResourceKind;
use std::collections::BTreeMap;

pub const RESOURCE_TAG: &str = "planton.org/resource";
pub const ORGANIZATION_TAG: &str = "planton.org/organization";
pub const ENVIRONMENT_TAG: &str = "planton.org/environment";
pub const RESOURCE_KIND_TAG: &str = "planton.org/resource-kind";
pub const RESOURCE_ID_TAG: &str = "planton.org/resource-id";

/// AWS tags for a manifest; empty metadata values are left out
pub fn aws_tags(manifest: &Manifest, kind: CloudResourceKind) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    tags.insert(RESOURCE_TAG.to_string(), "true".to_string());
    tags.insert(RESOURCE_KIND_TAG.to_string(), kind.as_str().to_string());

    let metadata = &manifest.metadata;
    for (key, value) in [
        (ORGANIZATION_TAG, &metadata.org),
        (ENVIRONMENT_TAG, &metadata.env),
        (RESOURCE_ID_TAG, &metadata.id),
    ] {
        if !value.is_empty() {
            tags.insert(key.to_string(), value.clone());
        }
    }
    tags
}

/// GCP labels: the same set, with keys and values lowercased and
/// `.`/`/` replaced since GCP only allows `[a-z0-9_-]`
pub fn gcp_labels(manifest: &Manifest, kind: CloudResourceKind) -> BTreeMap<String, String> {
    aws_tags(manifest, kind)
        .into_iter()
        .map(|(key, value)| (gcp_label_value(&key), gcp_label_value(&value)))
        .collect()
}

fn gcp_label_value(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | '-' => c,
            'A'..='Z' => c.to_ascii_lowercase(),
            _ => '-',
        })
        .take(63)
        .collect()
}
