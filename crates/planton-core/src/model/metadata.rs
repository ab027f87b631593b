use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resource metadata shared by every kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Resource name
    #[serde(default)]
    pub name: String,

    /// Resource ID (`<id-prefix>-<suffix>`), assigned by the control plane
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Owning organization
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub org: String,

    /// Target environment
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub env: String,

    /// Free-form labels; also carries the Pulumi backend labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl Metadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The ID when present, otherwise the name
    pub fn id_or_name(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }
}
