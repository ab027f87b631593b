//! Application Auto Scaling for provisioned tables
//!
//! One target/policy pair per dimension:
//!
//! ```text
//! table  ─┬─ readTarget  ── readPolicy
//!         │    └─ readTargetIndex-<gsi> ── readPolicyIndex-<gsi>
//!         └─ writeTarget ── writePolicy
//!              └─ writeTargetIndex-<gsi> ── writePolicyIndex-<gsi>
//! ```

use super::spec::{AutoScaleCapacity, AwsDynamodbSpec};
use super::table::TABLE;
use crate::locals::Locals;
use planton_cloud::{Program, Result, output_ref};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    Read,
    Write,
}

impl Dimension {
    fn prefix(self) -> &'static str {
        match self {
            Dimension::Read => "read",
            Dimension::Write => "write",
        }
    }

    fn units(self) -> &'static str {
        match self {
            Dimension::Read => "ReadCapacityUnits",
            Dimension::Write => "WriteCapacityUnits",
        }
    }

    fn metric(self) -> &'static str {
        match self {
            Dimension::Read => "DynamoDBReadCapacityUtilization",
            Dimension::Write => "DynamoDBWriteCapacityUtilization",
        }
    }
}

/// Policy ARN references produced for one dimension
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalingPolicies {
    pub table_policy_arn: String,
    pub index_policy_arns: Vec<String>,
}

/// Register scaling targets and policies when autoscaling applies
///
/// Returns `None` for on-demand tables or when autoscaling is off.
pub fn register_auto_scaling(
    program: &mut Program,
    locals: &Locals,
    spec: &AwsDynamodbSpec,
) -> Result<Option<(ScalingPolicies, ScalingPolicies)>> {
    let Some(auto_scale) = spec.auto_scale.as_ref().filter(|_| spec.autoscaling_enabled()) else {
        return Ok(None);
    };

    let read = auto_scale.read_capacity.unwrap_or_default();
    let write = auto_scale.write_capacity.unwrap_or_default();

    Ok(Some((
        register_dimension(program, locals, spec, Dimension::Read, &read)?,
        register_dimension(program, locals, spec, Dimension::Write, &write)?,
    )))
}

fn register_dimension(
    program: &mut Program,
    locals: &Locals,
    spec: &AwsDynamodbSpec,
    dimension: Dimension,
    capacity: &AutoScaleCapacity,
) -> Result<ScalingPolicies> {
    let prefix = dimension.prefix();
    let table_policy_arn = register_pair(
        program,
        locals,
        &format!("{}Target", prefix),
        &format!("{}Policy", prefix),
        TABLE,
        &format!("table/{}", spec.table_name),
        &format!("dynamodb:table:{}", dimension.units()),
        dimension,
        capacity,
    )?;

    let mut index_policy_arns = Vec::new();
    for gsi in &spec.global_secondary_indexes {
        let policy = register_pair(
            program,
            locals,
            &format!("{}TargetIndex-{}", prefix, gsi.index_name),
            &format!("{}PolicyIndex-{}", prefix, gsi.index_name),
            &format!("{}Target", prefix),
            &format!("table/{}/index/{}", spec.table_name, gsi.index_name),
            &format!("dynamodb:index:{}", dimension.units()),
            dimension,
            capacity,
        )?;
        index_policy_arns.push(policy);
    }

    Ok(ScalingPolicies {
        table_policy_arn,
        index_policy_arns,
    })
}

/// Register one target plus its target-tracking policy, returning the
/// policy ARN reference
#[allow(clippy::too_many_arguments)]
fn register_pair(
    program: &mut Program,
    locals: &Locals,
    target_name: &str,
    policy_name: &str,
    parent: &str,
    resource_id: &str,
    scalable_dimension: &str,
    dimension: Dimension,
    capacity: &AutoScaleCapacity,
) -> Result<String> {
    let target = locals
        .resource("aws:appautoscaling:Target")
        .property("maxCapacity", capacity.max_capacity)
        .property("minCapacity", capacity.min_capacity)
        .property("resourceId", resource_id)
        .property("scalableDimension", scalable_dimension)
        .property("serviceNamespace", "dynamodb")
        .property("tags", locals.tags())
        .parent(parent)
        .depends_on(TABLE);
    let target = program.register(target_name, target)?;

    let policy = locals
        .resource("aws:appautoscaling:Policy")
        .property("name", format!("{}:{}", dimension.metric(), resource_id))
        .property("policyType", "TargetTrackingScaling")
        .property("resourceId", output_ref(&target, "resourceId"))
        .property("scalableDimension", output_ref(&target, "scalableDimension"))
        .property("serviceNamespace", output_ref(&target, "serviceNamespace"))
        .property(
            "targetTrackingScalingPolicyConfiguration",
            json!({
                "predefinedMetricSpecification": {
                    "predefinedMetricType": dimension.metric(),
                },
                "targetValue": capacity.target_utilization,
            }),
        )
        .parent(&target)
        .depends_on(&target);
    let policy = program.register(policy_name, policy)?;

    Ok(output_ref(&policy, "arn"))
}
