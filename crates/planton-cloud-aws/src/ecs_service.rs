//! `AwsEcsService`: a single-container Fargate service, optionally routed
//! through an existing Application Load Balancer
//!
//! With the ALB enabled and a container port set, the program looks up the
//! VPC of the first subnet, the load balancer and its listener, then adds a
//! target group and a listener rule:
//!
//! ```text
//! getSubnet ─► targetGroup ◄── listenerRule ◄── getListener ◄── getLoadBalancer
//!                   ▲
//! taskDefinition ─► service
//! ```

use crate::error::{AwsModuleError, Result as ModuleResult, invalid};
use crate::locals::Locals;
use planton_cloud::{Program, ResourceModule, Result, ValidationError, output_ref};
use planton_registry::CloudResourceKind;
use planton_stackinput::StackInput;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

pub const OUTPUT_KEYS: &[&str] = &[
    "AwsEcsServiceName",
    "EcsClusterName",
    "LoadBalancerDnsName",
    "ServiceUrl",
    "ServiceDiscoveryName",
];

const DEFAULT_LISTENER_PRIORITY: i32 = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerImage {
    pub repo: String,
    pub tag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContainerEnv {
    pub variables: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Container {
    pub image: ContainerImage,
    pub env: ContainerEnv,
    pub port: u16,
    pub replicas: u32,
    /// Fargate CPU units (256, 512, 1024, ...)
    pub cpu: u32,
    /// MiB
    pub memory: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Network {
    pub subnets: Vec<String>,
    pub security_groups: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Iam {
    pub task_execution_role_arn: String,
    pub task_role_arn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Alb {
    pub enabled: bool,
    pub arn: String,
    /// `path` or `hostname`
    pub routing_type: String,
    pub path: String,
    pub hostname: String,
    pub listener_port: u16,
    pub listener_priority: Option<i32>,
}

impl Alb {
    fn routes_by(&self, routing_type: &str) -> bool {
        self.routing_type.eq_ignore_ascii_case(routing_type)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsEcsServiceSpec {
    pub cluster_arn: String,
    pub container: Container,
    pub network: Network,
    pub iam: Option<Iam>,
    pub alb: Alb,
}

impl AwsEcsServiceSpec {
    /// ALB wiring needs both the flag and a port to forward to
    pub fn uses_alb(&self) -> bool {
        self.alb.enabled && self.container.port != 0
    }
}

pub fn validate_spec(spec: &AwsEcsServiceSpec) -> ModuleResult<()> {
    if spec.cluster_arn.is_empty() {
        return invalid("cluster_arn", "cluster_arn is required");
    }
    if spec.container.image.repo.is_empty() {
        return invalid("container.image.repo", "container image repo is required");
    }

    if spec.uses_alb() {
        if spec.network.subnets.is_empty() {
            return invalid(
                "network.subnets",
                "at least one subnet is required for ALB usage",
            );
        }
        if spec.alb.arn.is_empty() {
            return invalid("alb.arn", "alb.arn is required when alb.enabled = true");
        }
        if spec.alb.routes_by("path") && spec.alb.path.is_empty() {
            return invalid("alb.path", "alb.path must be set if routingType is 'path'");
        }
        if spec.alb.routes_by("hostname") && spec.alb.hostname.is_empty() {
            return invalid(
                "alb.hostname",
                "alb.hostname must be set if routingType is 'hostname'",
            );
        }
    }

    Ok(())
}

/// The `containerDefinitions` JSON document for the task definition
pub fn container_definitions(name: &str, container: &Container) -> ModuleResult<String> {
    let environment: Vec<Value> = container
        .env
        .variables
        .iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();

    let mut definition = json!({
        "name": name,
        "image": format!("{}:{}", container.image.repo, container.image.tag),
        "essential": true,
        "environment": environment,
    });
    if container.port != 0 {
        definition["portMappings"] = json!([{ "containerPort": container.port }]);
    }

    serde_json::to_string(&[definition])
        .map_err(|e| AwsModuleError::conversion("Container", "containerDefinitions", e.to_string()))
}

/// Target group, lookups and listener rule; returns the target group name
/// and the load balancer DNS name reference
fn register_alb(
    program: &mut Program,
    locals: &Locals,
    spec: &AwsEcsServiceSpec,
    name: &str,
) -> Result<(String, String)> {
    let subnet = spec.network.subnets.first().ok_or_else(|| {
        ValidationError::new("network.subnets", "at least one subnet is required for ALB usage")
    })?;
    let vpc_id = program.invoke(
        "subnetVpcId",
        locals
            .invoke("aws:ec2:getSubnet")
            .argument("id", subnet.clone())
            .returning("vpcId"),
    )?;

    let target_group = locals
        .resource("aws:lb:TargetGroup")
        .property("port", spec.container.port)
        .property("protocol", "HTTP")
        .property("targetType", "ip")
        .property("vpcId", vpc_id)
        .property("healthCheck", json!({ "path": "/" }))
        .property("tags", locals.tags());
    let target_group = program.register(format!("{}-tg", name), target_group)?;

    program.invoke(
        "loadBalancer",
        locals
            .invoke("aws:lb:getLoadBalancer")
            .argument("arn", spec.alb.arn.clone()),
    )?;
    program.invoke(
        "listener",
        locals
            .invoke("aws:lb:getListener")
            .argument("loadBalancerArn", output_ref("loadBalancer", "arn"))
            .argument("port", spec.alb.listener_port),
    )?;

    let condition = if spec.alb.routes_by("path") {
        Some(json!({ "pathPattern": { "values": [spec.alb.path] } }))
    } else if spec.alb.routes_by("hostname") {
        Some(json!({ "hostHeader": { "values": [spec.alb.hostname] } }))
    } else {
        None
    };

    if let Some(condition) = condition {
        let rule = locals
            .resource("aws:lb:ListenerRule")
            .property("listenerArn", output_ref("listener", "arn"))
            .property(
                "actions",
                json!([{
                    "type": "forward",
                    "targetGroupArn": output_ref(&target_group, "arn"),
                }]),
            )
            .property("conditions", json!([condition]))
            .property(
                "priority",
                spec.alb
                    .listener_priority
                    .unwrap_or(DEFAULT_LISTENER_PRIORITY),
            )
            .property("tags", locals.tags());
        program.register(format!("{}-rule", name), rule)?;
    } else {
        tracing::debug!(routing_type = %spec.alb.routing_type, "No listener rule for routing type");
    }

    Ok((target_group, output_ref("loadBalancer", "dnsName")))
}

#[derive(Debug, Default)]
pub struct EcsServiceModule;

impl ResourceModule for EcsServiceModule {
    fn kind(&self) -> CloudResourceKind {
        CloudResourceKind::AwsEcsService
    }

    fn validate(&self, input: &StackInput) -> Result<()> {
        let spec: AwsEcsServiceSpec = input.target.spec_as()?;
        validate_spec(&spec)?;
        Ok(())
    }

    fn program(&self, input: &StackInput) -> Result<Program> {
        let spec: AwsEcsServiceSpec = input.target.spec_as()?;
        let mut program = Program::for_manifest(&input.target);
        let locals = Locals::new(&mut program, input, self.kind())?;
        let name = locals.name.clone();

        let mut task_definition = locals
            .resource("aws:ecs:TaskDefinition")
            .property("family", name.clone())
            .property("requiresCompatibilities", json!(["FARGATE"]))
            .property("cpu", spec.container.cpu.to_string())
            .property("memory", spec.container.memory.to_string())
            .property("networkMode", "awsvpc")
            .property(
                "containerDefinitions",
                container_definitions(&name, &spec.container)?,
            )
            .property("tags", locals.tags());
        if let Some(iam) = &spec.iam {
            task_definition = task_definition
                .non_empty("executionRoleArn", &iam.task_execution_role_arn)
                .non_empty("taskRoleArn", &iam.task_role_arn);
        }
        let task_definition = program.register(format!("{}-taskdef", name), task_definition)?;

        let mut service = locals
            .resource("aws:ecs:Service")
            .property("name", name.clone())
            .property("cluster", spec.cluster_arn.clone())
            .property("launchType", "FARGATE")
            .property("desiredCount", spec.container.replicas)
            .property("taskDefinition", output_ref(&task_definition, "arn"))
            .property(
                "networkConfiguration",
                json!({
                    "subnets": spec.network.subnets,
                    "securityGroups": spec.network.security_groups,
                }),
            )
            .property("tags", locals.tags());

        let mut load_balancer_dns = String::new();
        if spec.uses_alb() {
            let (target_group, dns_name) = register_alb(&mut program, &locals, &spec, &name)?;
            service = service
                .property(
                    "loadBalancers",
                    json!([{
                        "targetGroupArn": output_ref(&target_group, "arn"),
                        "containerName": name,
                        "containerPort": spec.container.port,
                    }]),
                )
                .depends_on(&target_group);
            load_balancer_dns = dns_name;
        }
        let service = program.register(format!("{}-service", name), service)?;

        let service_url = if spec.uses_alb() && spec.alb.routes_by("hostname") {
            format!("http://{}", spec.alb.hostname)
        } else {
            String::new()
        };

        program.export("AwsEcsServiceName", output_ref(&service, "name"));
        program.export("EcsClusterName", spec.cluster_arn.clone());
        program.export("LoadBalancerDnsName", load_balancer_dns);
        program.export("ServiceUrl", service_url);
        program.export("ServiceDiscoveryName", "");

        Ok(program)
    }

    fn output_keys(&self) -> &'static [&'static str] {
        OUTPUT_KEYS
    }
}
