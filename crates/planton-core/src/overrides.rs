//! `--set key=value` overrides
//!
//! Keys are dotted paths into the manifest document. Under
//! `metadata.labels` and `metadata.annotations` the remainder of the path is
//! taken as a single key, since label keys routinely contain dots.
//! Numeric segments index into existing arrays.

use crate::error::{ManifestError, Result};
use serde_json::{Map, Value};
use tracing::debug;

/// Split `key=value` at the first `=`
pub fn parse_override(expr: &str) -> Result<(String, String)> {
    let (key, value) = expr
        .split_once('=')
        .ok_or_else(|| ManifestError::InvalidOverride {
            expr: expr.to_string(),
            reason: "expected key=value".to_string(),
        })?;

    let key = key.trim();
    if key.is_empty() {
        return Err(ManifestError::InvalidOverride {
            expr: expr.to_string(),
            reason: "key is empty".to_string(),
        });
    }

    Ok((key.to_string(), value.to_string()))
}

/// Apply each override in order
pub fn apply_overrides(document: &mut Value, overrides: &[String]) -> Result<()> {
    for expr in overrides {
        let (key, raw) = parse_override(expr)?;
        let value = parse_scalar(&raw);
        debug!(key = %key, "Applying override");
        set_path(document, &key, value).map_err(|reason| ManifestError::InvalidOverride {
            expr: expr.clone(),
            reason,
        })?;
    }
    Ok(())
}

/// Parse an override value as a YAML scalar so `true`, `5` and `1.5` keep their types
fn parse_scalar(raw: &str) -> Value {
    match serde_yaml::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::String(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

fn split_path(key: &str) -> Vec<String> {
    for map_key in ["metadata.labels.", "metadata.annotations."] {
        if let Some(rest) = key.strip_prefix(map_key) {
            let mut segments: Vec<String> = map_key
                .trim_end_matches('.')
                .split('.')
                .map(str::to_string)
                .collect();
            segments.push(rest.to_string());
            return segments;
        }
    }
    key.split('.').map(str::to_string).collect()
}

fn set_path(document: &mut Value, key: &str, value: Value) -> std::result::Result<(), String> {
    let segments = split_path(key);
    if segments.iter().any(String::is_empty) {
        return Err("path contains an empty segment".to_string());
    }

    let mut current = document;
    let last = segments.len() - 1;

    for (i, segment) in segments.iter().enumerate() {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }

        match current {
            Value::Array(items) => {
                let index: usize = segment
                    .parse()
                    .map_err(|_| format!("'{}' is not an array index", segment))?;
                let len = items.len();
                let slot = items
                    .get_mut(index)
                    .ok_or_else(|| format!("index {} out of bounds (len {})", index, len))?;
                if i == last {
                    *slot = value;
                    return Ok(());
                }
                current = slot;
            }
            Value::Object(map) => {
                if i == last {
                    map.insert(segment.clone(), value);
                    return Ok(());
                }
                current = map.entry(segment.clone()).or_insert(Value::Null);
            }
            _ => {
                return Err(format!("cannot descend into scalar at '{}'", segment));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_override() {
        let (key, value) = parse_override("spec.tableName=orders").unwrap();
        assert_eq!(key, "spec.tableName");
        assert_eq!(value, "orders");

        let (_, value) = parse_override("metadata.annotations.note=a=b").unwrap();
        assert_eq!(value, "a=b");
    }

    #[test]
    fn test_parse_override_rejects_missing_equals() {
        assert!(parse_override("spec.tableName").is_err());
        assert!(parse_override("=value").is_err());
    }

    #[test]
    fn test_apply_overrides_typed_scalars() {
        let mut doc = json!({ "spec": { "tableName": "a" } });
        let overrides = vec![
            "spec.tableName=orders".to_string(),
            "spec.pointInTimeRecoveryEnabled=true".to_string(),
            "spec.provisionedThroughput.readCapacityUnits=5".to_string(),
        ];
        apply_overrides(&mut doc, &overrides).unwrap();

        assert_eq!(doc["spec"]["tableName"], "orders");
        assert_eq!(doc["spec"]["pointInTimeRecoveryEnabled"], true);
        assert_eq!(doc["spec"]["provisionedThroughput"]["readCapacityUnits"], 5);
    }

    #[test]
    fn test_apply_overrides_label_key_with_dots() {
        let mut doc = json!({ "metadata": { "name": "x" } });
        let overrides = vec!["metadata.labels.pulumi.project-planton.org/stack.fqdn=o/p/s".to_string()];
        apply_overrides(&mut doc, &overrides).unwrap();

        assert_eq!(
            doc["metadata"]["labels"]["pulumi.project-planton.org/stack.fqdn"],
            "o/p/s"
        );
    }

    #[test]
    fn test_apply_overrides_array_index() {
        let mut doc = json!({ "spec": { "keySchema": [{ "attributeName": "pk" }] } });
        apply_overrides(&mut doc, &["spec.keySchema.0.attributeName=id".to_string()]).unwrap();
        assert_eq!(doc["spec"]["keySchema"][0]["attributeName"], "id");

        let err = apply_overrides(&mut doc, &["spec.keySchema.3.attributeName=id".to_string()]);
        assert!(matches!(err, Err(ManifestError::InvalidOverride { .. })));
    }

    #[test]
    fn test_apply_overrides_into_scalar_fails() {
        let mut doc = json!({ "spec": { "tableName": "orders" } });
        let err = apply_overrides(&mut doc, &["spec.tableName.inner=x".to_string()]);
        assert!(matches!(err, Err(ManifestError::InvalidOverride { .. })));
    }
}
