//! `AwsRdsCluster`: an Aurora (or Multi-AZ DB) cluster with its own
//! security group and optional subnet/parameter groups

use crate::error::{Result as ModuleResult, invalid};
use crate::locals::Locals;
use planton_cloud::{Program, ResourceModule, Result, output_ref, resource_ref, secret};
use planton_registry::CloudResourceKind;
use planton_stackinput::StackInput;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

pub const OUTPUT_KEYS: &[&str] = &[
    "RdsClusterEndpoint",
    "RdsClusterReaderEndpoint",
    "RdsClusterId",
    "RdsClusterArn",
    "RdsSecurityGroupId",
    "RdsSubnetGroup",
    "RdsClusterParameterGroup",
];

const SECURITY_GROUP: &str = "securityGroup";
const SUBNET_GROUP: &str = "subnetGroup";
const PARAMETER_GROUP: &str = "clusterParameterGroup";
const CLUSTER: &str = "cluster";

const DEFAULT_BACKUP_RETENTION_DAYS: u32 = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScalingConfiguration {
    pub auto_pause: bool,
    pub max_capacity: u32,
    pub min_capacity: u32,
    pub seconds_until_auto_pause: u32,
    pub timeout_action: String,
}

impl ScalingConfiguration {
    /// Zero values fall back to 16 / 2 / 300s / `RollbackCapacityChange`
    fn to_value(&self) -> Value {
        let or = |value: u32, default: u32| if value > 0 { value } else { default };
        json!({
            "autoPause": self.auto_pause,
            "maxCapacity": or(self.max_capacity, 16),
            "minCapacity": or(self.min_capacity, 2),
            "secondsUntilAutoPause": or(self.seconds_until_auto_pause, 300),
            "timeoutAction": if self.timeout_action.is_empty() {
                "RollbackCapacityChange"
            } else {
                self.timeout_action.as_str()
            },
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerlessV2Scaling {
    pub min_capacity: f64,
    pub max_capacity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterParameter {
    pub name: String,
    pub value: String,
    /// `immediate` or `pending-reboot`
    pub apply_method: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsRdsClusterSpec {
    pub engine: String,
    pub engine_version: String,
    /// `provisioned`, `serverless`, ...
    pub engine_mode: String,
    pub database_name: String,
    pub database_port: u32,
    pub master_user: String,
    pub master_password: String,
    pub manage_master_user_password: bool,
    pub master_user_secret_kms_key_id: String,
    pub iam_database_authentication_enabled: bool,
    pub maintenance_window: String,
    pub backup_window: String,
    pub retention_period: u32,
    pub enabled_cloudwatch_logs_exports: Vec<String>,
    pub deletion_protection: bool,
    pub allow_major_version_upgrade: bool,
    pub skip_final_snapshot: bool,
    pub storage_encrypted: bool,
    pub storage_kms_key_arn: String,
    pub scaling_configuration: Option<ScalingConfiguration>,
    #[serde(alias = "serverlessV2ScalingConfiguration")]
    pub serverlessv2_scaling_configuration: Option<ServerlessV2Scaling>,
    pub vpc_id: String,
    pub subnet_ids: Vec<String>,
    pub db_subnet_group_name: String,
    /// Security groups attached to the cluster as-is
    pub associate_security_group_ids: Vec<String>,
    /// Security groups allowed to reach the database port
    pub security_group_ids: Vec<String>,
    pub allowed_cidr_blocks: Vec<String>,
    pub cluster_parameter_group_name: String,
    pub cluster_parameter_group_family: String,
    pub parameters: Vec<ClusterParameter>,
    pub snapshot_identifier: String,
    pub tags: BTreeMap<String, String>,
}

impl AwsRdsClusterSpec {
    pub fn is_serverless(&self) -> bool {
        self.engine_mode == "serverless"
    }

    /// Explicit port, else the engine family default
    pub fn port(&self) -> u32 {
        if self.database_port > 0 {
            self.database_port
        } else if self.engine.contains("postgres") {
            5432
        } else {
            3306
        }
    }

    pub fn creates_subnet_group(&self) -> bool {
        self.db_subnet_group_name.is_empty() && !self.subnet_ids.is_empty()
    }

    pub fn creates_parameter_group(&self) -> bool {
        self.cluster_parameter_group_name.is_empty() && !self.parameters.is_empty()
    }
}

pub fn validate_spec(spec: &AwsRdsClusterSpec) -> ModuleResult<()> {
    if spec.engine.trim().is_empty() {
        return invalid("engine", "engine is required");
    }

    match (spec.manage_master_user_password, spec.master_password.is_empty()) {
        (true, false) => {
            return invalid(
                "master_password",
                "master_password must be unset when manage_master_user_password is true",
            );
        }
        (false, true) => {
            return invalid(
                "master_password",
                "either master_password or manage_master_user_password must be set",
            );
        }
        _ => {}
    }

    if spec.storage_encrypted && !spec.is_serverless() && spec.storage_kms_key_arn.is_empty() {
        return invalid(
            "storage_kms_key_arn",
            "storage_kms_key_arn is required when storage_encrypted is true",
        );
    }

    if spec.db_subnet_group_name.is_empty()
        && !spec.subnet_ids.is_empty()
        && spec.subnet_ids.len() < 2
    {
        return invalid(
            "subnet_ids",
            "at least two subnet_ids are required when db_subnet_group_name is not set",
        );
    }

    if spec.creates_parameter_group() && spec.cluster_parameter_group_family.is_empty() {
        return invalid(
            "cluster_parameter_group_family",
            "cluster_parameter_group_family is required when parameters are set",
        );
    }
    for (i, parameter) in spec.parameters.iter().enumerate() {
        if parameter.name.is_empty() {
            return invalid(format!("parameters[{}].name", i), "parameter name must not be empty");
        }
    }

    if let Some(v2) = &spec.serverlessv2_scaling_configuration {
        if v2.min_capacity > v2.max_capacity {
            return invalid(
                "serverlessv2_scaling_configuration",
                format!(
                    "min_capacity ({}) must not exceed max_capacity ({})",
                    v2.min_capacity, v2.max_capacity
                ),
            );
        }
    }

    Ok(())
}

fn register_security_group(
    program: &mut Program,
    locals: &Locals,
    spec: &AwsRdsClusterSpec,
    identifier: &str,
) -> Result<String> {
    let port = spec.port();
    let mut ingress = Vec::new();
    if !spec.security_group_ids.is_empty() {
        ingress.push(json!({
            "protocol": "tcp",
            "fromPort": port,
            "toPort": port,
            "securityGroups": spec.security_group_ids,
            "description": "database access from security groups",
        }));
    }
    if !spec.allowed_cidr_blocks.is_empty() {
        ingress.push(json!({
            "protocol": "tcp",
            "fromPort": port,
            "toPort": port,
            "cidrBlocks": spec.allowed_cidr_blocks,
            "description": "database access from CIDR blocks",
        }));
    }

    let security_group = locals
        .resource("aws:ec2:SecurityGroup")
        .property("name", format!("{}-sg", identifier))
        .property("description", format!("Security group for RDS cluster {}", identifier))
        .non_empty("vpcId", &spec.vpc_id)
        .property("ingress", ingress)
        .property(
            "egress",
            json!([{
                "protocol": "-1",
                "fromPort": 0,
                "toPort": 0,
                "cidrBlocks": ["0.0.0.0/0"],
            }]),
        )
        .property("tags", locals.tags_with(&spec.tags));
    program.register(SECURITY_GROUP, security_group)
}

fn register_cluster(
    program: &mut Program,
    locals: &Locals,
    spec: &AwsRdsClusterSpec,
    identifier: &str,
    subnet_group: Option<String>,
    parameter_group: Option<String>,
) -> Result<String> {
    let mut security_groups: Vec<String> = spec.associate_security_group_ids.clone();
    security_groups.push(output_ref(SECURITY_GROUP, "id"));

    let retention = if spec.retention_period > 0 {
        spec.retention_period
    } else {
        DEFAULT_BACKUP_RETENTION_DAYS
    };

    let mut cluster = locals
        .resource("aws:rds:Cluster")
        .property("clusterIdentifier", identifier)
        .property("engine", spec.engine.clone())
        .non_empty("engineVersion", &spec.engine_version)
        .non_empty("engineMode", &spec.engine_mode)
        .non_empty("databaseName", &spec.database_name)
        .property("port", spec.port())
        .non_empty("masterUsername", &spec.master_user)
        .property(
            "iamDatabaseAuthenticationEnabled",
            spec.iam_database_authentication_enabled,
        )
        .non_empty("preferredMaintenanceWindow", &spec.maintenance_window)
        .non_empty("preferredBackupWindow", &spec.backup_window)
        .property("backupRetentionPeriod", retention)
        .property("deletionProtection", spec.deletion_protection)
        .property("allowMajorVersionUpgrade", spec.allow_major_version_upgrade)
        .property("skipFinalSnapshot", spec.skip_final_snapshot)
        .property("vpcSecurityGroupIds", security_groups)
        .property("networkType", "IPV4")
        .property("copyTagsToSnapshot", false)
        .property("applyImmediately", true)
        .optional("dbSubnetGroupName", subnet_group)
        .optional("dbClusterParameterGroupName", parameter_group)
        .non_empty("snapshotIdentifier", &spec.snapshot_identifier)
        .property("tags", locals.tags_with(&spec.tags));

    cluster = if spec.manage_master_user_password {
        cluster
            .property("manageMasterUserPassword", true)
            .non_empty("masterUserSecretKmsKeyId", &spec.master_user_secret_kms_key_id)
    } else {
        cluster.property("masterPassword", secret(spec.master_password.clone()))
    };

    if !spec.skip_final_snapshot {
        cluster = cluster.property(
            "finalSnapshotIdentifier",
            format!("{}-final-snapshot", identifier),
        );
    }
    if !spec.enabled_cloudwatch_logs_exports.is_empty() {
        cluster = cluster.property(
            "enabledCloudwatchLogsExports",
            spec.enabled_cloudwatch_logs_exports.clone(),
        );
    }

    // serverless v1 always encrypts and rejects the flag
    if !spec.is_serverless() {
        cluster = cluster
            .property("storageEncrypted", spec.storage_encrypted)
            .non_empty("kmsKeyId", &spec.storage_kms_key_arn);
    }

    if let Some(scaling) = &spec.scaling_configuration {
        cluster = cluster.property("scalingConfiguration", scaling.to_value());
    }
    if let Some(v2) = &spec.serverlessv2_scaling_configuration {
        cluster = cluster.property(
            "serverlessv2ScalingConfiguration",
            json!({ "minCapacity": v2.min_capacity, "maxCapacity": v2.max_capacity }),
        );
    }

    program.register(CLUSTER, cluster.depends_on(SECURITY_GROUP))
}

#[derive(Debug, Default)]
pub struct RdsClusterModule;

impl ResourceModule for RdsClusterModule {
    fn kind(&self) -> CloudResourceKind {
        CloudResourceKind::AwsRdsCluster
    }

    fn validate(&self, input: &StackInput) -> Result<()> {
        let spec: AwsRdsClusterSpec = input.target.spec_as()?;
        validate_spec(&spec)?;
        Ok(())
    }

    fn program(&self, input: &StackInput) -> Result<Program> {
        let spec: AwsRdsClusterSpec = input.target.spec_as()?;
        let identifier = input.target.metadata.id_or_name().to_string();
        let mut program = Program::for_manifest(&input.target);
        let locals = Locals::new(&mut program, input, self.kind())?;

        let security_group = register_security_group(&mut program, &locals, &spec, &identifier)?;

        let subnet_group = if spec.creates_subnet_group() {
            let group = locals
                .resource("aws:rds:SubnetGroup")
                .property("name", format!("{}-subnet-group", identifier))
                .property("subnetIds", spec.subnet_ids.clone())
                .property("tags", locals.tags_with(&spec.tags));
            let group = program.register(SUBNET_GROUP, group)?;
            Some(output_ref(&group, "name"))
        } else {
            (!spec.db_subnet_group_name.is_empty()).then(|| spec.db_subnet_group_name.clone())
        };

        let parameter_group = if spec.creates_parameter_group() {
            let parameters: Vec<Value> = spec
                .parameters
                .iter()
                .map(|p| {
                    let mut parameter = json!({ "name": p.name, "value": p.value });
                    if !p.apply_method.is_empty() {
                        parameter["applyMethod"] = json!(p.apply_method);
                    }
                    parameter
                })
                .collect();
            let group = locals
                .resource("aws:rds:ClusterParameterGroup")
                .property("name", format!("{}-cluster-params", identifier))
                .property("family", spec.cluster_parameter_group_family.clone())
                .property("parameters", parameters)
                .property("tags", locals.tags_with(&spec.tags));
            let group = program.register(PARAMETER_GROUP, group)?;
            Some(output_ref(&group, "name"))
        } else {
            (!spec.cluster_parameter_group_name.is_empty())
                .then(|| spec.cluster_parameter_group_name.clone())
        };

        let cluster = register_cluster(
            &mut program,
            &locals,
            &spec,
            &identifier,
            subnet_group.clone(),
            parameter_group.clone(),
        )?;

        program.export("RdsClusterEndpoint", output_ref(&cluster, "endpoint"));
        program.export("RdsClusterReaderEndpoint", output_ref(&cluster, "readerEndpoint"));
        program.export("RdsClusterId", output_ref(&cluster, "clusterIdentifier"));
        program.export("RdsClusterArn", output_ref(&cluster, "arn"));
        program.export("RdsSecurityGroupId", output_ref(&security_group, "id"));
        if let Some(group) = subnet_group {
            program.export("RdsSubnetGroup", group);
        }
        if let Some(group) = parameter_group {
            program.export("RdsClusterParameterGroup", group);
        }
        tracing::debug!(cluster = %resource_ref(&cluster), identifier = %identifier, "RDS cluster program built");

        Ok(program)
    }

    fn output_keys(&self) -> &'static [&'static str] {
        OUTPUT_KEYS
    }
}
