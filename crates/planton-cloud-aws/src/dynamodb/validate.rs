//! Cross-field rules checked before any resource is registered

use super::convert;
use super::spec::{
    AutoScaleCapacity, AwsDynamodbSpec, BillingMode, KeySchemaElement, KeyType, Projection,
    ProjectionType, SseType, StreamViewType,
};
use crate::error::{Result, invalid};
use std::collections::HashSet;

/// Validate a DynamoDB spec; the first violated rule wins
pub fn validate_spec(spec: &AwsDynamodbSpec) -> Result<()> {
    let attributes = validate_attribute_definitions(spec)?;
    validate_table_key_schema(&spec.key_schema, &attributes)?;
    validate_billing_mode(spec)?;
    validate_indexes(spec, &attributes)?;
    validate_streams(spec)?;
    validate_ttl(spec)?;
    validate_sse(spec)?;
    validate_auto_scale(spec)
}

fn validate_attribute_definitions(spec: &AwsDynamodbSpec) -> Result<HashSet<&str>> {
    if spec.attribute_definitions.is_empty() {
        return invalid(
            "attribute_definitions",
            "at least one attribute definition is required",
        );
    }

    let mut names = HashSet::new();
    for (i, attr) in spec.attribute_definitions.iter().enumerate() {
        let field = format!("attribute_definitions[{}].attribute_name", i);
        if attr.attribute_name.is_empty() {
            return invalid(field, "attribute_name must not be empty");
        }
        if !names.insert(attr.attribute_name.as_str()) {
            return invalid(
                field,
                format!("duplicate attribute definition {:?}", attr.attribute_name),
            );
        }
    }
    Ok(names)
}

/// Returns the HASH and optional RANGE attribute names
fn split_key_schema<'a>(
    field: &str,
    schema: &'a [KeySchemaElement],
    attributes: &HashSet<&str>,
) -> Result<(Option<&'a str>, Option<&'a str>)> {
    let mut hash = None;
    let mut range = None;

    for (i, element) in schema.iter().enumerate() {
        let slot = match element.key_type {
            KeyType::Hash => &mut hash,
            KeyType::Range => &mut range,
            KeyType::Unspecified => {
                return invalid(
                    format!("{}[{}].key_type", field, i),
                    "key_type must be HASH or RANGE",
                );
            }
        };
        if slot.is_some() {
            return invalid(
                field,
                format!(
                    "{} must contain at most one {} key",
                    field,
                    convert::key_type(element.key_type)?
                ),
            );
        }
        if !attributes.contains(element.attribute_name.as_str()) {
            return invalid(
                format!("{}[{}].attribute_name", field, i),
                format!(
                    "key attribute {:?} is not defined in attribute_definitions",
                    element.attribute_name
                ),
            );
        }
        *slot = Some(element.attribute_name.as_str());
    }
    Ok((hash, range))
}

fn validate_table_key_schema(schema: &[KeySchemaElement], attributes: &HashSet<&str>) -> Result<()> {
    if schema.is_empty() {
        return invalid("key_schema", "key_schema must not be empty");
    }
    let (hash, _) = split_key_schema("key_schema", schema, attributes)?;
    if hash.is_none() {
        return invalid("key_schema", "key_schema must contain exactly one HASH key");
    }
    Ok(())
}

fn validate_billing_mode(spec: &AwsDynamodbSpec) -> Result<()> {
    match spec.billing_mode {
        BillingMode::Provisioned => {
            if spec.provisioned_throughput.is_none() {
                return invalid(
                    "provisioned_throughput",
                    "provisioned_throughput must be set when billing_mode is PROVISIONED",
                );
            }
            for (i, gsi) in spec.global_secondary_indexes.iter().enumerate() {
                if gsi.provisioned_throughput.is_none() {
                    return invalid(
                        format!("global_secondary_indexes[{}].provisioned_throughput", i),
                        format!(
                            "global_secondary_indexes[{}].provisioned_throughput must be set when billing_mode is PROVISIONED",
                            i
                        ),
                    );
                }
            }
        }
        BillingMode::PayPerRequest => {
            if spec.provisioned_throughput.is_some() {
                return invalid(
                    "provisioned_throughput",
                    "provisioned_throughput must be unset when billing_mode is PAY_PER_REQUEST",
                );
            }
            for (i, gsi) in spec.global_secondary_indexes.iter().enumerate() {
                if gsi.provisioned_throughput.is_some() {
                    return invalid(
                        format!("global_secondary_indexes[{}].provisioned_throughput", i),
                        format!(
                            "global_secondary_indexes[{}].provisioned_throughput must be unset when billing_mode is PAY_PER_REQUEST",
                            i
                        ),
                    );
                }
            }
        }
        BillingMode::Unspecified => {
            return invalid(
                "billing_mode",
                "billing_mode must be either PROVISIONED or PAY_PER_REQUEST",
            );
        }
    }
    Ok(())
}

fn validate_projection(field: &str, projection: &Projection) -> Result<()> {
    let has_attributes = !projection.non_key_attributes.is_empty();
    match projection.projection_type {
        ProjectionType::Include if !has_attributes => invalid(
            format!("{}.non_key_attributes", field),
            "non_key_attributes must be provided when projection_type is INCLUDE",
        ),
        ProjectionType::All | ProjectionType::KeysOnly if has_attributes => invalid(
            format!("{}.non_key_attributes", field),
            "non_key_attributes must be empty unless projection_type is INCLUDE",
        ),
        ProjectionType::Unspecified => invalid(
            format!("{}.projection_type", field),
            "projection_type must be ALL, KEYS_ONLY or INCLUDE",
        ),
        _ => Ok(()),
    }
}

fn validate_indexes(spec: &AwsDynamodbSpec, attributes: &HashSet<&str>) -> Result<()> {
    for (i, lsi) in spec.local_secondary_indexes.iter().enumerate() {
        let field = format!("local_secondary_indexes[{}]", i);
        if lsi.index_name.is_empty() {
            return invalid(format!("{}.index_name", field), "index_name must not be empty");
        }
        let key_field = format!("{}.key_schema", field);
        let (_, range) = split_key_schema(&key_field, &lsi.key_schema, attributes)?;
        if range.is_none() {
            return invalid(
                key_field,
                format!("local secondary index {:?} must declare a RANGE key", lsi.index_name),
            );
        }
        validate_projection(&format!("{}.projection", field), &lsi.projection)?;
    }

    for (i, gsi) in spec.global_secondary_indexes.iter().enumerate() {
        let field = format!("global_secondary_indexes[{}]", i);
        if gsi.index_name.is_empty() {
            return invalid(format!("{}.index_name", field), "index_name must not be empty");
        }
        let key_field = format!("{}.key_schema", field);
        let (hash, _) = split_key_schema(&key_field, &gsi.key_schema, attributes)?;
        if hash.is_none() {
            return invalid(
                key_field,
                format!(
                    "global secondary index {:?} must have exactly one HASH key",
                    gsi.index_name
                ),
            );
        }
        validate_projection(&format!("{}.projection", field), &gsi.projection)?;
    }
    Ok(())
}

fn validate_streams(spec: &AwsDynamodbSpec) -> Result<()> {
    let Some(stream) = &spec.stream_specification else {
        return Ok(());
    };
    let has_view_type = stream.stream_view_type != StreamViewType::Unspecified;
    if stream.stream_enabled && !has_view_type {
        return invalid(
            "stream_specification.stream_view_type",
            "stream_specification.stream_view_type must be specified when streams are enabled",
        );
    }
    if !stream.stream_enabled && has_view_type {
        return invalid(
            "stream_specification.stream_view_type",
            "stream_specification.stream_view_type must be unset when streams are disabled",
        );
    }
    Ok(())
}

fn validate_ttl(spec: &AwsDynamodbSpec) -> Result<()> {
    let Some(ttl) = &spec.ttl_specification else {
        return Ok(());
    };
    if ttl.ttl_enabled && ttl.attribute_name.is_empty() {
        return invalid(
            "ttl_specification.attribute_name",
            "ttl_specification.attribute_name must be provided when TTL is enabled",
        );
    }
    if !ttl.ttl_enabled && !ttl.attribute_name.is_empty() {
        return invalid(
            "ttl_specification.attribute_name",
            "ttl_specification.attribute_name must be unset when TTL is disabled",
        );
    }
    Ok(())
}

fn validate_sse(spec: &AwsDynamodbSpec) -> Result<()> {
    let Some(sse) = &spec.sse_specification else {
        return Ok(());
    };

    if !sse.enabled {
        if sse.sse_type != SseType::Unspecified || !sse.kms_master_key_id.is_empty() {
            return invalid(
                "sse_specification",
                "sse_type and kms_master_key_id must be unset when SSE is disabled",
            );
        }
        return Ok(());
    }

    match sse.sse_type {
        SseType::Unspecified => invalid(
            "sse_specification.sse_type",
            "sse_type must be specified when SSE is enabled",
        ),
        SseType::Kms if sse.kms_master_key_id.is_empty() => invalid(
            "sse_specification.kms_master_key_id",
            "kms_master_key_id must be provided when sse_type is KMS",
        ),
        SseType::Aes256 if !sse.kms_master_key_id.is_empty() => invalid(
            "sse_specification.kms_master_key_id",
            "kms_master_key_id must be empty when sse_type is AES256",
        ),
        _ => Ok(()),
    }
}

fn validate_capacity(field: &str, capacity: &AutoScaleCapacity) -> Result<()> {
    if capacity.min_capacity > capacity.max_capacity {
        return invalid(
            field,
            format!(
                "min_capacity ({}) must not exceed max_capacity ({})",
                capacity.min_capacity, capacity.max_capacity
            ),
        );
    }
    if !(capacity.target_utilization > 0.0 && capacity.target_utilization <= 100.0) {
        return invalid(
            format!("{}.target_utilization", field),
            "target_utilization must be greater than 0 and at most 100",
        );
    }
    Ok(())
}

fn validate_auto_scale(spec: &AwsDynamodbSpec) -> Result<()> {
    let Some(auto_scale) = spec.auto_scale.as_ref().filter(|a| a.is_enabled) else {
        return Ok(());
    };
    if let Some(read) = &auto_scale.read_capacity {
        validate_capacity("auto_scale.read_capacity", read)?;
    }
    if let Some(write) = &auto_scale.write_capacity {
        validate_capacity("auto_scale.write_capacity", write)?;
    }
    Ok(())
}
