use super::convert;
use super::spec::{AwsDynamodbSpec, BillingMode, KeySchemaElement, KeyType, Projection};
use crate::locals::Locals;
use planton_cloud::{Program, Result};
use serde_json::{Map, Value, json};

/// Logical name of the table resource
pub const TABLE: &str = "table";

fn key_names(schema: &[KeySchemaElement]) -> (Option<&str>, Option<&str>) {
    let find = |key_type| {
        schema
            .iter()
            .find(|k| k.key_type == key_type)
            .map(|k| k.attribute_name.as_str())
    };
    (find(KeyType::Hash), find(KeyType::Range))
}

fn projection_args(args: &mut Map<String, Value>, projection: &Projection) -> Result<()> {
    args.insert(
        "projectionType".to_string(),
        json!(convert::projection_type(projection.projection_type)?),
    );
    if !projection.non_key_attributes.is_empty() {
        args.insert(
            "nonKeyAttributes".to_string(),
            json!(projection.non_key_attributes),
        );
    }
    Ok(())
}

fn global_secondary_indexes(spec: &AwsDynamodbSpec) -> Result<Vec<Value>> {
    let provisioned = spec.billing_mode == BillingMode::Provisioned;
    spec.global_secondary_indexes
        .iter()
        .map(|gsi| {
            let (hash, range) = key_names(&gsi.key_schema);
            let mut args = Map::new();
            args.insert("name".to_string(), json!(gsi.index_name));
            args.insert("hashKey".to_string(), json!(hash));
            if let Some(range) = range {
                args.insert("rangeKey".to_string(), json!(range));
            }
            projection_args(&mut args, &gsi.projection)?;
            if let (true, Some(throughput)) = (provisioned, &gsi.provisioned_throughput) {
                args.insert(
                    "readCapacity".to_string(),
                    json!(throughput.read_capacity_units),
                );
                args.insert(
                    "writeCapacity".to_string(),
                    json!(throughput.write_capacity_units),
                );
            }
            Ok(Value::Object(args))
        })
        .collect()
}

fn local_secondary_indexes(spec: &AwsDynamodbSpec) -> Result<Vec<Value>> {
    spec.local_secondary_indexes
        .iter()
        .map(|lsi| {
            let (_, range) = key_names(&lsi.key_schema);
            let mut args = Map::new();
            args.insert("name".to_string(), json!(lsi.index_name));
            args.insert("rangeKey".to_string(), json!(range));
            projection_args(&mut args, &lsi.projection)?;
            Ok(Value::Object(args))
        })
        .collect()
}

/// Register the `aws:dynamodb:Table` resource
pub fn register_table(program: &mut Program, locals: &Locals, spec: &AwsDynamodbSpec) -> Result<String> {
    let attributes = spec
        .attribute_definitions
        .iter()
        .map(|attr| {
            Ok(json!({
                "name": attr.attribute_name,
                "type": convert::attribute_type(attr.attribute_type)?,
            }))
        })
        .collect::<Result<Vec<_>>>()?;
    let (hash_key, range_key) = key_names(&spec.key_schema);

    let mut table = locals
        .resource("aws:dynamodb:Table")
        .property("name", spec.table_name.clone())
        .property("attributes", attributes)
        .optional("hashKey", hash_key)
        .optional("rangeKey", range_key)
        .property("billingMode", convert::billing_mode(spec.billing_mode)?)
        .property(
            "pointInTimeRecovery",
            json!({ "enabled": spec.point_in_time_recovery_enabled }),
        )
        .property("deletionProtectionEnabled", spec.deletion_protection_enabled)
        .optional("tableClass", convert::table_class(spec.table_class))
        .property("tags", locals.tags_with(&spec.tags));

    if let (BillingMode::Provisioned, Some(throughput)) =
        (spec.billing_mode, &spec.provisioned_throughput)
    {
        table = table
            .property("readCapacity", throughput.read_capacity_units)
            .property("writeCapacity", throughput.write_capacity_units);
    }

    let gsis = global_secondary_indexes(spec)?;
    if !gsis.is_empty() {
        table = table.property("globalSecondaryIndexes", gsis);
    }
    let lsis = local_secondary_indexes(spec)?;
    if !lsis.is_empty() {
        table = table.property("localSecondaryIndexes", lsis);
    }

    if let Some(ttl) = spec.ttl_specification.as_ref().filter(|t| t.ttl_enabled) {
        table = table.property(
            "ttl",
            json!({ "enabled": true, "attributeName": ttl.attribute_name }),
        );
    }

    if let Some(stream) = spec.stream_specification.as_ref().filter(|s| s.stream_enabled) {
        table = table
            .property("streamEnabled", true)
            .property(
                "streamViewType",
                convert::stream_view_type(stream.stream_view_type)?,
            );
    }

    if let Some(sse) = spec.sse_specification.as_ref().filter(|s| s.enabled) {
        tracing::debug!(
            sse_type = convert::sse_type(sse.sse_type)?,
            "Server-side encryption enabled"
        );
        let mut encryption = json!({ "enabled": true });
        if let Some(key_id) = spec.kms_key_id() {
            encryption["kmsKeyArn"] = json!(key_id);
        }
        table = table.property("serverSideEncryption", encryption);
    }

    program.register(TABLE, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamodb::spec::{
        AttributeDefinition, AttributeType, GlobalSecondaryIndex, ProjectionType,
        ProvisionedThroughput, SseSpecification, SseType,
    };
    use planton_core::{Manifest, Metadata};
    use planton_registry::CloudResourceKind;
    use planton_stackinput::StackInput;

    fn spec() -> AwsDynamodbSpec {
        AwsDynamodbSpec {
            table_name: "orders".to_string(),
            attribute_definitions: vec![
                AttributeDefinition {
                    attribute_name: "pk".to_string(),
                    attribute_type: AttributeType::String,
                },
                AttributeDefinition {
                    attribute_name: "total".to_string(),
                    attribute_type: AttributeType::Number,
                },
            ],
            key_schema: vec![KeySchemaElement {
                attribute_name: "pk".to_string(),
                key_type: KeyType::Hash,
            }],
            billing_mode: BillingMode::Provisioned,
            provisioned_throughput: Some(ProvisionedThroughput {
                read_capacity_units: 10,
                write_capacity_units: 4,
            }),
            global_secondary_indexes: vec![GlobalSecondaryIndex {
                index_name: "by_total".to_string(),
                key_schema: vec![KeySchemaElement {
                    attribute_name: "total".to_string(),
                    key_type: KeyType::Hash,
                }],
                projection: Projection {
                    projection_type: ProjectionType::Include,
                    non_key_attributes: vec!["pk".to_string()],
                },
                provisioned_throughput: Some(ProvisionedThroughput {
                    read_capacity_units: 2,
                    write_capacity_units: 1,
                }),
            }],
            sse_specification: Some(SseSpecification {
                enabled: true,
                sse_type: SseType::Kms,
                kms_master_key_id: "arn:aws:kms:key".to_string(),
            }),
            ..Default::default()
        }
    }

    fn register(spec: &AwsDynamodbSpec) -> Program {
        let mut program = Program::new("orders");
        let input = StackInput::new(Manifest {
            metadata: Metadata::named("orders"),
            ..Default::default()
        });
        let locals = Locals::new(&mut program, &input, CloudResourceKind::AwsDynamodb).unwrap();
        register_table(&mut program, &locals, spec).unwrap();
        program
    }

    #[test]
    fn test_table_properties() {
        let program = register(&spec());
        let table = program.resource(TABLE).unwrap();

        assert_eq!(table.type_token, "aws:dynamodb:Table");
        assert_eq!(table.get("billingMode"), Some(&json!("PROVISIONED")));
        assert_eq!(table.get("hashKey"), Some(&json!("pk")));
        assert!(table.get("rangeKey").is_none());
        assert_eq!(table.get("readCapacity"), Some(&json!(10)));
        assert_eq!(
            table.get("attributes"),
            Some(&json!([
                { "name": "pk", "type": "S" },
                { "name": "total", "type": "N" }
            ]))
        );
        assert_eq!(
            table.get("globalSecondaryIndexes"),
            Some(&json!([{
                "name": "by_total",
                "hashKey": "total",
                "projectionType": "INCLUDE",
                "nonKeyAttributes": ["pk"],
                "readCapacity": 2,
                "writeCapacity": 1
            }]))
        );
        assert_eq!(
            table.get("serverSideEncryption"),
            Some(&json!({ "enabled": true, "kmsKeyArn": "arn:aws:kms:key" }))
        );
        assert!(table.get("streamEnabled").is_none());
        assert!(table.get("ttl").is_none());
    }

    #[test]
    fn test_pay_per_request_has_no_capacity() {
        let mut spec = spec();
        spec.billing_mode = BillingMode::PayPerRequest;
        let program = register(&spec);
        let table = program.resource(TABLE).unwrap();
        assert!(table.get("readCapacity").is_none());
        assert!(
            table.get("globalSecondaryIndexes").unwrap()[0]
                .get("readCapacity")
                .is_none()
        );
    }
}
