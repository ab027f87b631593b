use super::Metadata;
use crate::error::{ManifestError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A cloud resource manifest
///
/// `spec` stays untyped here; IaC modules convert it into their own spec
/// types with [`Manifest::spec_as`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub api_version: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub spec: serde_json::Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
}

impl Manifest {
    /// Deserialize the spec into a kind-specific type
    pub fn spec_as<T: DeserializeOwned>(&self) -> Result<T> {
        let spec = if self.spec.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            self.spec.clone()
        };
        serde_json::from_value(spec).map_err(|source| ManifestError::InvalidSpec {
            kind: self.kind.clone(),
            source,
        })
    }

    /// Look up a metadata label
    pub fn label(&self, key: &str) -> Option<&str> {
        self.metadata.labels.get(key).map(String::as_str)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct TableSpec {
        table_name: String,
        #[serde(default)]
        point_in_time_recovery_enabled: bool,
    }

    #[test]
    fn test_spec_as_typed() {
        let manifest = Manifest {
            kind: "AwsDynamodb".to_string(),
            spec: serde_json::json!({ "tableName": "orders" }),
            ..Default::default()
        };

        let spec: TableSpec = manifest.spec_as().unwrap();
        assert_eq!(spec.table_name, "orders");
        assert!(!spec.point_in_time_recovery_enabled);
    }

    #[test]
    fn test_spec_as_reports_kind() {
        let manifest = Manifest {
            kind: "AwsDynamodb".to_string(),
            spec: serde_json::json!({ "tableName": 42 }),
            ..Default::default()
        };

        let err = manifest.spec_as::<TableSpec>().unwrap_err();
        assert!(matches!(err, ManifestError::InvalidSpec { ref kind, .. } if kind == "AwsDynamodb"));
    }

    #[test]
    fn test_null_spec_serializes_without_spec_key() {
        let manifest = Manifest {
            api_version: "aws.project-planton.org/v1".to_string(),
            kind: "AwsVpc".to_string(),
            ..Default::default()
        };

        let yaml = manifest.to_yaml().unwrap();
        assert!(yaml.contains("apiVersion: aws.project-planton.org/v1"));
        assert!(!yaml.contains("spec:"));
        assert!(!yaml.contains("status:"));
    }
}
