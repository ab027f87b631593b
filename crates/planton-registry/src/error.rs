//! Registry errors

use crate::kind::CloudResourceKind;

/// Kind registry lookup failures
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no matching kind found for id prefix '{0}'")]
    NoMatchingIdPrefix(String),

    #[error("no matching kind found for kind name '{0}'")]
    NoMatchingKindName(String),

    #[error("unsupported cloud resource kind: {0:?}")]
    UnsupportedKind(CloudResourceKind),

    #[error("{0} is not a Kubernetes kind")]
    NotKubernetesKind(CloudResourceKind),

    #[error("manifest has no 'kind' field")]
    MissingKind,

    #[error("failed to parse manifest YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{}", unsupported_manifest_kind_message(.kind, .suggestions))]
    UnsupportedManifestKind {
        kind: String,
        suggestions: Vec<&'static str>,
    },
}

fn unsupported_manifest_kind_message(kind: &str, suggestions: &[&'static str]) -> String {
    let mut msg = format!("unsupported cloud resource kind '{}'\n\n", kind);
    msg.push_str("Check the manifest 'kind' field for typos:\n");
    msg.push_str("  - extra characters (e.g. 'AwsEksClusters')\n");
    msg.push_str("  - misspelled words (e.g. 'AwsEksClster')\n");
    msg.push_str("Case, '-' and '_' are ignored when matching.\n");
    if !suggestions.is_empty() {
        msg.push_str("\nDid you mean:\n");
        for name in suggestions {
            msg.push_str(&format!("  - {}\n", name));
        }
    }
    msg
}

pub type Result<T> = std::result::Result<T, RegistryError>;
