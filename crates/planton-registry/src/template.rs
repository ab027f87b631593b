//! Manifest templates and kind extraction from raw YAML

use crate::error::{RegistryError, Result};
use crate::kind::CloudResourceKind;
use crate::lookup::{api_version, kind_by_kind_name, meta};
use planton_core::{Manifest, Metadata};
use serde::Deserialize;
use tracing::warn;

/// Zero-value manifest for `kind`
///
/// Each call returns an independent value with `apiVersion` and `kind`
/// filled in and an empty `metadata` and `spec`.
pub fn new_instance(kind: CloudResourceKind) -> Result<Manifest> {
    let meta = meta(kind)?;
    Ok(Manifest {
        api_version: api_version(kind)?,
        kind: meta.name.to_string(),
        metadata: Metadata::default(),
        spec: serde_json::Value::Object(Default::default()),
        status: None,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KindHeader {
    #[serde(default)]
    api_version: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    metadata: Option<HeaderMetadata>,
}

#[derive(Deserialize)]
struct HeaderMetadata {
    #[serde(default)]
    name: Option<String>,
}

impl KindHeader {
    fn name(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .unwrap_or("")
    }

    /// The expected apiVersion when the manifest declares a different one
    fn api_version_mismatch(&self, kind: CloudResourceKind) -> Option<String> {
        let declared = self.api_version.as_deref().map(str::trim)?;
        let expected = api_version(kind).ok()?;
        (!declared.is_empty() && declared != expected).then_some(expected)
    }
}

/// Read only the header of a manifest and resolve its `kind` by exact name
///
/// A declared `apiVersion` that does not belong to the kind is logged, not
/// rejected.
pub fn extract_kind_from_yaml(bytes: &[u8]) -> Result<CloudResourceKind> {
    let header: KindHeader = serde_yaml::from_slice(bytes)?;
    let kind = match header.kind.as_deref().map(str::trim) {
        Some(kind) if !kind.is_empty() => kind_by_kind_name(kind)?,
        _ => return Err(RegistryError::MissingKind),
    };

    if let Some(expected) = header.api_version_mismatch(kind) {
        warn!(
            name = header.name(),
            kind = %kind,
            api_version = header.api_version.as_deref().unwrap_or_default(),
            expected = %expected,
            "Manifest apiVersion does not match its kind"
        );
    }
    Ok(kind)
}
