//! `AwsEcsCluster`: a Fargate ECS cluster

use crate::error::{Result as ModuleResult, invalid};
use crate::locals::Locals;
use planton_cloud::{Program, ResourceModule, Result, output_ref};
use planton_registry::CloudResourceKind;
use planton_stackinput::StackInput;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashSet};

pub const OUTPUT_KEYS: &[&str] = &["ClusterName", "ClusterArn", "ClusterCapacityProviders"];

const CLUSTER: &str = "cluster";
const CAPACITY_PROVIDERS: &str = "capacityProviders";

const VALID_CAPACITY_PROVIDERS: &[&str] = &["FARGATE", "FARGATE_SPOT"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecLogging {
    #[default]
    Default,
    None,
    Override,
}

impl ExecLogging {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecLogging::Default => "DEFAULT",
            ExecLogging::None => "NONE",
            ExecLogging::Override => "OVERRIDE",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapacityProviderStrategy {
    pub capacity_provider: String,
    pub base: i32,
    pub weight: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecLogConfiguration {
    pub cloud_watch_log_group_name: String,
    pub cloud_watch_encryption_enabled: bool,
    pub s3_bucket_name: String,
    pub s3_key_prefix: String,
    pub s3_encryption_enabled: bool,
}

impl ExecLogConfiguration {
    fn to_value(&self) -> Value {
        let mut config = Map::new();
        if !self.cloud_watch_log_group_name.is_empty() {
            config.insert(
                "cloudWatchLogGroupName".to_string(),
                json!(self.cloud_watch_log_group_name),
            );
            config.insert(
                "cloudWatchEncryptionEnabled".to_string(),
                json!(self.cloud_watch_encryption_enabled),
            );
        }
        if !self.s3_bucket_name.is_empty() {
            config.insert("s3BucketName".to_string(), json!(self.s3_bucket_name));
            config.insert("s3EncryptionEnabled".to_string(), json!(self.s3_encryption_enabled));
            if !self.s3_key_prefix.is_empty() {
                config.insert("s3KeyPrefix".to_string(), json!(self.s3_key_prefix));
            }
        }
        Value::Object(config)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExecuteCommandConfiguration {
    pub logging: ExecLogging,
    pub log_configuration: Option<ExecLogConfiguration>,
    pub kms_key_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsEcsClusterSpec {
    pub enable_container_insights: bool,
    pub capacity_providers: Vec<String>,
    pub default_capacity_provider_strategy: Vec<CapacityProviderStrategy>,
    pub execute_command_configuration: Option<ExecuteCommandConfiguration>,
    pub tags: BTreeMap<String, String>,
}

pub fn validate_spec(spec: &AwsEcsClusterSpec) -> ModuleResult<()> {
    let mut seen = HashSet::new();
    for (i, provider) in spec.capacity_providers.iter().enumerate() {
        let field = format!("capacity_providers[{}]", i);
        if !VALID_CAPACITY_PROVIDERS.contains(&provider.as_str()) {
            return invalid(
                field,
                format!("capacity provider {:?} must be FARGATE or FARGATE_SPOT", provider),
            );
        }
        if !seen.insert(provider.as_str()) {
            return invalid(field, format!("duplicate capacity provider {:?}", provider));
        }
    }

    for (i, strategy) in spec.default_capacity_provider_strategy.iter().enumerate() {
        let field = format!("default_capacity_provider_strategy[{}]", i);
        if !VALID_CAPACITY_PROVIDERS.contains(&strategy.capacity_provider.as_str()) {
            return invalid(
                field,
                format!(
                    "capacity provider {:?} must be FARGATE or FARGATE_SPOT",
                    strategy.capacity_provider
                ),
            );
        }
        if strategy.base < 0 {
            return invalid(field, "base must be greater than or equal to 0");
        }
        if strategy.weight < 1 {
            return invalid(field, "weight must be at least 1");
        }
    }

    if let Some(exec) = &spec.execute_command_configuration {
        if exec.logging == ExecLogging::Override && exec.log_configuration.is_none() {
            return invalid(
                "execute_command_configuration.log_configuration",
                "log_configuration is required when logging is OVERRIDE",
            );
        }
    }

    Ok(())
}

fn execute_command_configuration(exec: &ExecuteCommandConfiguration) -> Value {
    let mut config = Map::new();
    config.insert("logging".to_string(), json!(exec.logging.as_str()));
    if !exec.kms_key_id.is_empty() {
        config.insert("kmsKeyId".to_string(), json!(exec.kms_key_id));
    }
    if let (ExecLogging::Override, Some(log)) = (exec.logging, &exec.log_configuration) {
        config.insert("logConfiguration".to_string(), log.to_value());
    }
    Value::Object(config)
}

#[derive(Debug, Default)]
pub struct EcsClusterModule;

impl ResourceModule for EcsClusterModule {
    fn kind(&self) -> CloudResourceKind {
        CloudResourceKind::AwsEcsCluster
    }

    fn validate(&self, input: &StackInput) -> Result<()> {
        let spec: AwsEcsClusterSpec = input.target.spec_as()?;
        validate_spec(&spec)?;
        Ok(())
    }

    fn program(&self, input: &StackInput) -> Result<Program> {
        let spec: AwsEcsClusterSpec = input.target.spec_as()?;
        let mut program = Program::for_manifest(&input.target);
        let locals = Locals::new(&mut program, input, self.kind())?;

        let insights = if spec.enable_container_insights {
            "enabled"
        } else {
            "disabled"
        };
        let mut cluster = locals
            .resource("aws:ecs:Cluster")
            .property("name", locals.name.clone())
            .property("settings", json!([{ "name": "containerInsights", "value": insights }]))
            .property("tags", locals.tags_with(&spec.tags));
        if let Some(exec) = &spec.execute_command_configuration {
            cluster = cluster.property(
                "configuration",
                json!({ "executeCommandConfiguration": execute_command_configuration(exec) }),
            );
        }
        let cluster = program.register(CLUSTER, cluster)?;

        if !spec.capacity_providers.is_empty() {
            let strategy: Vec<Value> = spec
                .default_capacity_provider_strategy
                .iter()
                .map(|s| {
                    json!({
                        "capacityProvider": s.capacity_provider,
                        "base": s.base,
                        "weight": s.weight,
                    })
                })
                .collect();
            let providers = locals
                .resource("aws:ecs:ClusterCapacityProviders")
                .property("clusterName", output_ref(&cluster, "name"))
                .property("capacityProviders", spec.capacity_providers.clone())
                .property("defaultCapacityProviderStrategies", strategy)
                .parent(&cluster);
            program.register(CAPACITY_PROVIDERS, providers)?;
        }

        program.export("ClusterName", output_ref(&cluster, "name"));
        program.export("ClusterArn", output_ref(&cluster, "arn"));
        program.export("ClusterCapacityProviders", spec.capacity_providers.clone());

        Ok(program)
    }

    fn output_keys(&self) -> &'static [&'static str] {
        OUTPUT_KEYS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AwsModuleError;
    use planton_core::{Manifest, Metadata};

    fn reason(result: ModuleResult<()>) -> String {
        match result {
            Err(AwsModuleError::Validation(e)) => e.reason,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn strategy(provider: &str, base: i32, weight: i32) -> CapacityProviderStrategy {
        CapacityProviderStrategy {
            capacity_provider: provider.to_string(),
            base,
            weight,
        }
    }

    #[test]
    fn test_capacity_provider_rules() {
        let mut spec = AwsEcsClusterSpec {
            capacity_providers: vec!["FARGATE".to_string(), "FARGATE_SPOT".to_string()],
            default_capacity_provider_strategy: vec![strategy("FARGATE", 1, 1)],
            ..Default::default()
        };
        assert!(validate_spec(&spec).is_ok());

        spec.capacity_providers.push("FARGATE".to_string());
        assert_eq!(
            reason(validate_spec(&spec)),
            "duplicate capacity provider \"FARGATE\""
        );

        spec.capacity_providers = vec!["EC2".to_string()];
        assert_eq!(
            reason(validate_spec(&spec)),
            "capacity provider \"EC2\" must be FARGATE or FARGATE_SPOT"
        );

        spec.capacity_providers.clear();
        spec.default_capacity_provider_strategy = vec![strategy("FARGATE", -1, 1)];
        assert_eq!(
            reason(validate_spec(&spec)),
            "base must be greater than or equal to 0"
        );
        spec.default_capacity_provider_strategy = vec![strategy("FARGATE_SPOT", 0, 0)];
        assert_eq!(reason(validate_spec(&spec)), "weight must be at least 1");
    }

    #[test]
    fn test_override_requires_log_configuration() {
        let spec: AwsEcsClusterSpec = serde_json::from_value(json!({
            "executeCommandConfiguration": { "logging": "OVERRIDE" }
        }))
        .unwrap();
        assert_eq!(
            reason(validate_spec(&spec)),
            "log_configuration is required when logging is OVERRIDE"
        );
    }

    #[test]
    fn test_program() {
        let spec = json!({
            "enableContainerInsights": true,
            "capacityProviders": ["FARGATE", "FARGATE_SPOT"],
            "defaultCapacityProviderStrategy": [
                { "capacityProvider": "FARGATE", "base": 1, "weight": 1 },
                { "capacityProvider": "FARGATE_SPOT", "weight": 4 }
            ],
            "executeCommandConfiguration": {
                "logging": "OVERRIDE",
                "kmsKeyId": "arn:aws:kms:key",
                "logConfiguration": {
                    "s3BucketName": "audit",
                    "s3KeyPrefix": "exec/",
                    "s3EncryptionEnabled": true
                }
            }
        });
        let input = StackInput::new(Manifest {
            kind: "AwsEcsCluster".to_string(),
            metadata: Metadata::named("apps"),
            spec,
            ..Default::default()
        });
        let program = EcsClusterModule.render(&input).unwrap();

        let cluster = program.resource(CLUSTER).unwrap();
        assert_eq!(cluster.get("name"), Some(&json!("apps")));
        assert_eq!(
            cluster.get("settings"),
            Some(&json!([{ "name": "containerInsights", "value": "enabled" }]))
        );
        assert_eq!(
            cluster.get("configuration"),
            Some(&json!({
                "executeCommandConfiguration": {
                    "logging": "OVERRIDE",
                    "kmsKeyId": "arn:aws:kms:key",
                    "logConfiguration": {
                        "s3BucketName": "audit",
                        "s3EncryptionEnabled": true,
                        "s3KeyPrefix": "exec/"
                    }
                }
            }))
        );

        let providers = program.resource(CAPACITY_PROVIDERS).unwrap();
        assert_eq!(providers.get("clusterName"), Some(&json!("${cluster.name}")));
        assert_eq!(
            providers.get("defaultCapacityProviderStrategies").unwrap()[1],
            json!({ "capacityProvider": "FARGATE_SPOT", "base": 0, "weight": 4 })
        );
        assert_eq!(
            program.output("ClusterCapacityProviders"),
            Some(&json!(["FARGATE", "FARGATE_SPOT"]))
        );
    }

    #[test]
    fn test_no_capacity_providers_resource_when_unset() {
        let input = StackInput::new(Manifest {
            kind: "AwsEcsCluster".to_string(),
            metadata: Metadata::named("apps"),
            spec: json!({}),
            ..Default::default()
        });
        let program = EcsClusterModule.render(&input).unwrap();
        assert!(program.resource(CAPACITY_PROVIDERS).is_none());
        assert_eq!(
            program.resource(CLUSTER).unwrap().get("settings").unwrap()[0]["value"],
            json!("disabled")
        );
    }
}
