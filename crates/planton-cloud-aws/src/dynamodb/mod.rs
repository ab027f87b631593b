//! `AwsDynamodb`: a DynamoDB table with optional indexes, streams, TTL,
//! encryption and provisioned-capacity autoscaling

pub mod autoscale;
pub mod convert;
pub mod spec;
pub mod table;
pub mod validate;

pub use spec::AwsDynamodbSpec;

use crate::locals::Locals;
use planton_cloud::{Program, ResourceModule, Result, output_ref};
use planton_registry::CloudResourceKind;
use planton_stackinput::StackInput;
use serde_json::json;
use table::TABLE;

pub const OUTPUT_KEYS: &[&str] = &[
    "TableArn",
    "TableName",
    "TableId",
    "Stream",
    "KmsKeyArn",
    "GlobalSecondaryIndexNames",
    "LocalSecondaryIndexNames",
    "AutoscalingReadPolicyArn",
    "AutoscalingWritePolicyArn",
    "AutoscalingIndexReadPolicyArnList",
    "AutoscalingIndexWritePolicyArnList",
];

#[derive(Debug, Default)]
pub struct DynamodbModule;

impl ResourceModule for DynamodbModule {
    fn kind(&self) -> CloudResourceKind {
        CloudResourceKind::AwsDynamodb
    }

    fn validate(&self, input: &StackInput) -> Result<()> {
        let spec: AwsDynamodbSpec = input.target.spec_as()?;
        validate::validate_spec(&spec)?;
        Ok(())
    }

    fn program(&self, input: &StackInput) -> Result<Program> {
        let spec: AwsDynamodbSpec = input.target.spec_as()?;
        let mut program = Program::for_manifest(&input.target);
        let locals = Locals::new(&mut program, input, self.kind())?;

        let table = table::register_table(&mut program, &locals, &spec)?;

        program.export("TableArn", output_ref(&table, "arn"));
        program.export("TableName", output_ref(&table, "name"));
        program.export("TableId", output_ref(&table, "id"));
        program.export(
            "GlobalSecondaryIndexNames",
            spec.global_secondary_indexes
                .iter()
                .map(|i| i.index_name.clone())
                .collect::<Vec<_>>(),
        );
        program.export(
            "LocalSecondaryIndexNames",
            spec.local_secondary_indexes
                .iter()
                .map(|i| i.index_name.clone())
                .collect::<Vec<_>>(),
        );
        if spec.streams_enabled() {
            program.export(
                "Stream",
                json!({
                    "StreamArn": output_ref(TABLE, "streamArn"),
                    "StreamLabel": output_ref(TABLE, "streamLabel"),
                }),
            );
        }
        if let Some(key_id) = spec.kms_key_id() {
            program.export("KmsKeyArn", key_id);
        }

        if let Some((read, write)) = autoscale::register_auto_scaling(&mut program, &locals, &spec)? {
            program.export("AutoscalingReadPolicyArn", read.table_policy_arn);
            program.export("AutoscalingWritePolicyArn", write.table_policy_arn);
            program.export("AutoscalingIndexReadPolicyArnList", read.index_policy_arns);
            program.export("AutoscalingIndexWritePolicyArnList", write.index_policy_arns);
        }

        Ok(program)
    }

    fn output_keys(&self) -> &'static [&'static str] {
        OUTPUT_KEYS
    }
}
