//! Typed `AwsDynamodb` spec

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeType {
    #[default]
    #[serde(alias = "ATTRIBUTE_TYPE_UNSPECIFIED")]
    Unspecified,
    String,
    Number,
    Binary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyType {
    #[default]
    #[serde(alias = "KEY_TYPE_UNSPECIFIED")]
    Unspecified,
    Hash,
    Range,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingMode {
    #[default]
    #[serde(alias = "BILLING_MODE_UNSPECIFIED")]
    Unspecified,
    Provisioned,
    PayPerRequest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectionType {
    #[default]
    #[serde(alias = "PROJECTION_TYPE_UNSPECIFIED")]
    Unspecified,
    All,
    KeysOnly,
    Include,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamViewType {
    #[default]
    #[serde(alias = "STREAM_VIEW_TYPE_UNSPECIFIED")]
    Unspecified,
    NewImage,
    OldImage,
    NewAndOldImages,
    #[serde(alias = "STREAM_KEYS_ONLY")]
    KeysOnly,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SseType {
    #[default]
    #[serde(rename = "UNSPECIFIED", alias = "SSE_TYPE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "AES256")]
    Aes256,
    #[serde(rename = "KMS")]
    Kms,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableClass {
    #[default]
    #[serde(alias = "TABLE_CLASS_UNSPECIFIED")]
    Unspecified,
    Standard,
    StandardInfrequentAccess,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeDefinition {
    pub attribute_name: String,
    pub attribute_type: AttributeType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeySchemaElement {
    pub attribute_name: String,
    pub key_type: KeyType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProvisionedThroughput {
    pub read_capacity_units: u32,
    pub write_capacity_units: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Projection {
    pub projection_type: ProjectionType,
    pub non_key_attributes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalSecondaryIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
    pub provisioned_throughput: Option<ProvisionedThroughput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalSecondaryIndex {
    pub index_name: String,
    pub key_schema: Vec<KeySchemaElement>,
    pub projection: Projection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamSpecification {
    pub stream_enabled: bool,
    pub stream_view_type: StreamViewType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TtlSpecification {
    pub ttl_enabled: bool,
    pub attribute_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SseSpecification {
    pub enabled: bool,
    pub sse_type: SseType,
    pub kms_master_key_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoScaleCapacity {
    pub min_capacity: u32,
    pub max_capacity: u32,
    /// Target utilization percentage, in (0, 100]
    pub target_utilization: f64,
}

impl Default for AutoScaleCapacity {
    fn default() -> Self {
        Self {
            min_capacity: 5,
            max_capacity: 20,
            target_utilization: 50.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoScale {
    pub is_enabled: bool,
    pub read_capacity: Option<AutoScaleCapacity>,
    pub write_capacity: Option<AutoScaleCapacity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsDynamodbSpec {
    pub table_name: String,
    pub attribute_definitions: Vec<AttributeDefinition>,
    pub key_schema: Vec<KeySchemaElement>,
    pub billing_mode: BillingMode,
    pub provisioned_throughput: Option<ProvisionedThroughput>,
    pub global_secondary_indexes: Vec<GlobalSecondaryIndex>,
    pub local_secondary_indexes: Vec<LocalSecondaryIndex>,
    pub stream_specification: Option<StreamSpecification>,
    pub ttl_specification: Option<TtlSpecification>,
    pub sse_specification: Option<SseSpecification>,
    pub point_in_time_recovery_enabled: bool,
    pub table_class: TableClass,
    pub deletion_protection_enabled: bool,
    pub auto_scale: Option<AutoScale>,
    pub tags: BTreeMap<String, String>,
}

impl AwsDynamodbSpec {
    /// Autoscaling applies only to enabled, provisioned tables
    pub fn autoscaling_enabled(&self) -> bool {
        self.billing_mode == BillingMode::Provisioned
            && self.auto_scale.as_ref().is_some_and(|a| a.is_enabled)
    }

    pub fn streams_enabled(&self) -> bool {
        self.stream_specification
            .as_ref()
            .is_some_and(|s| s.stream_enabled)
    }

    pub fn kms_key_id(&self) -> Option<&str> {
        self.sse_specification
            .as_ref()
            .filter(|s| s.enabled && s.sse_type == SseType::Kms)
            .map(|s| s.kms_master_key_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_enums() {
        let spec: AwsDynamodbSpec = serde_json::from_value(serde_json::json!({
            "tableName": "orders",
            "billingMode": "PAY_PER_REQUEST",
            "attributeDefinitions": [{ "attributeName": "pk", "attributeType": "STRING" }],
            "keySchema": [{ "attributeName": "pk", "keyType": "HASH" }],
            "streamSpecification": { "streamEnabled": true, "streamViewType": "STREAM_KEYS_ONLY" },
            "sseSpecification": { "enabled": true, "sseType": "KMS", "kmsMasterKeyId": "arn:key" },
            "tableClass": "STANDARD_INFREQUENT_ACCESS"
        }))
        .unwrap();

        assert_eq!(spec.billing_mode, BillingMode::PayPerRequest);
        assert_eq!(spec.attribute_definitions[0].attribute_type, AttributeType::String);
        assert_eq!(
            spec.stream_specification.as_ref().unwrap().stream_view_type,
            StreamViewType::KeysOnly
        );
        assert_eq!(spec.table_class, TableClass::StandardInfrequentAccess);
        assert_eq!(spec.kms_key_id(), Some("arn:key"));
        assert!(spec.streams_enabled());
        assert!(!spec.autoscaling_enabled());
    }

    #[test]
    fn test_autoscale_capacity_defaults() {
        let capacity: AutoScaleCapacity = serde_json::from_str("{}").unwrap();
        assert_eq!(capacity, AutoScaleCapacity::default());
        assert_eq!(capacity.min_capacity, 5);
        assert_eq!(capacity.max_capacity, 20);
        assert_eq!(capacity.target_utilization, 50.0);
    }
}
