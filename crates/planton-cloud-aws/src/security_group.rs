//! `AwsSecurityGroup`: a VPC security group with inline rules

use crate::error::{Result as ModuleResult, invalid};
use crate::locals::Locals;
use planton_cloud::{Program, ResourceModule, Result, output_ref};
use planton_registry::CloudResourceKind;
use planton_stackinput::StackInput;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

pub const OUTPUT_KEYS: &[&str] = &["SecurityGroupId"];

const SECURITY_GROUP: &str = "securityGroup";

const NAMED_PROTOCOLS: &[&str] = &["-1", "tcp", "udp", "icmp", "icmpv6"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecurityGroupRule {
    /// `-1` (all), `tcp`, `udp`, `icmp`, `icmpv6` or an IP protocol number
    pub protocol: String,
    pub from_port: i32,
    pub to_port: i32,
    pub ipv4_cidrs: Vec<String>,
    pub ipv6_cidrs: Vec<String>,
    pub source_security_group_ids: Vec<String>,
    pub destination_security_group_ids: Vec<String>,
    pub self_reference: bool,
    pub description: String,
}

impl SecurityGroupRule {
    /// Peer security groups, whichever direction the rule is for
    fn peer_groups(&self) -> Vec<String> {
        self.source_security_group_ids
            .iter()
            .chain(&self.destination_security_group_ids)
            .cloned()
            .collect()
    }

    fn has_peer(&self) -> bool {
        !self.ipv4_cidrs.is_empty()
            || !self.ipv6_cidrs.is_empty()
            || !self.source_security_group_ids.is_empty()
            || !self.destination_security_group_ids.is_empty()
            || self.self_reference
    }

    fn to_value(&self) -> Value {
        let mut rule = Map::new();
        rule.insert("protocol".to_string(), json!(self.protocol));
        rule.insert("fromPort".to_string(), json!(self.from_port));
        rule.insert("toPort".to_string(), json!(self.to_port));
        if !self.ipv4_cidrs.is_empty() {
            rule.insert("cidrBlocks".to_string(), json!(self.ipv4_cidrs));
        }
        if !self.ipv6_cidrs.is_empty() {
            rule.insert("ipv6CidrBlocks".to_string(), json!(self.ipv6_cidrs));
        }
        let peers = self.peer_groups();
        if !peers.is_empty() {
            rule.insert("securityGroups".to_string(), json!(peers));
        }
        if self.self_reference {
            rule.insert("self".to_string(), json!(true));
        }
        if !self.description.is_empty() {
            rule.insert("description".to_string(), json!(self.description));
        }
        Value::Object(rule)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsSecurityGroupSpec {
    pub vpc_id: String,
    pub description: String,
    pub ingress: Vec<SecurityGroupRule>,
    pub egress: Vec<SecurityGroupRule>,
    pub tags: BTreeMap<String, String>,
}

fn validate_protocol(field: &str, protocol: &str) -> ModuleResult<()> {
    let lowered = protocol.to_ascii_lowercase();
    if NAMED_PROTOCOLS.contains(&lowered.as_str()) || lowered.parse::<u8>().is_ok() {
        return Ok(());
    }
    invalid(
        format!("{}.protocol", field),
        format!(
            "protocol {:?} must be -1, tcp, udp, icmp, icmpv6 or a protocol number",
            protocol
        ),
    )
}

/// `icmp`, `icmpv6` or their protocol numbers 1 and 58
fn is_icmp(protocol: &str) -> bool {
    matches!(
        protocol.to_ascii_lowercase().as_str(),
        "icmp" | "icmpv6" | "1" | "58"
    )
}

fn validate_rule(field: &str, rule: &SecurityGroupRule) -> ModuleResult<()> {
    validate_protocol(field, &rule.protocol)?;

    if rule.protocol == "-1" {
        if rule.from_port != 0 || rule.to_port != 0 {
            return invalid(
                field,
                "from_port and to_port must be 0 when protocol is -1",
            );
        }
    } else {
        // For ICMP the ports carry type and code, where -1 means all
        let min_port = if is_icmp(&rule.protocol) { -1 } else { 0 };
        for (name, port) in [("from_port", rule.from_port), ("to_port", rule.to_port)] {
            if !(min_port..=65535).contains(&port) {
                return invalid(
                    format!("{}.{}", field, name),
                    format!("{} ({}) must be within {}..=65535", name, port, min_port),
                );
            }
        }
        if !is_icmp(&rule.protocol) && rule.from_port > rule.to_port {
            return invalid(
                field,
                format!(
                    "from_port ({}) must not exceed to_port ({})",
                    rule.from_port, rule.to_port
                ),
            );
        }
    }

    if !rule.has_peer() {
        return invalid(
            field,
            "rule must specify at least one CIDR, security group or self_reference",
        );
    }
    Ok(())
}

pub fn validate_spec(spec: &AwsSecurityGroupSpec) -> ModuleResult<()> {
    if spec.vpc_id.trim().is_empty() {
        return invalid("vpc_id", "vpc_id is required");
    }
    for (i, rule) in spec.ingress.iter().enumerate() {
        validate_rule(&format!("ingress[{}]", i), rule)?;
    }
    for (i, rule) in spec.egress.iter().enumerate() {
        validate_rule(&format!("egress[{}]", i), rule)?;
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct SecurityGroupModule;

impl ResourceModule for SecurityGroupModule {
    fn kind(&self) -> CloudResourceKind {
        CloudResourceKind::AwsSecurityGroup
    }

    fn validate(&self, input: &StackInput) -> Result<()> {
        let spec: AwsSecurityGroupSpec = input.target.spec_as()?;
        validate_spec(&spec)?;
        Ok(())
    }

    fn program(&self, input: &StackInput) -> Result<Program> {
        let spec: AwsSecurityGroupSpec = input.target.spec_as()?;
        let mut program = Program::for_manifest(&input.target);
        let locals = Locals::new(&mut program, input, self.kind())?;

        let description = if spec.description.is_empty() {
            format!("Security group {}", locals.name)
        } else {
            spec.description.clone()
        };
        let security_group = locals
            .resource("aws:ec2:SecurityGroup")
            .property("name", locals.name.clone())
            .property("description", description)
            .property("vpcId", spec.vpc_id.clone())
            .property(
                "ingress",
                spec.ingress.iter().map(SecurityGroupRule::to_value).collect::<Vec<_>>(),
            )
            .property(
                "egress",
                spec.egress.iter().map(SecurityGroupRule::to_value).collect::<Vec<_>>(),
            )
            .property("tags", locals.tags_with(&spec.tags));
        let security_group = program.register(SECURITY_GROUP, security_group)?;

        program.export("SecurityGroupId", output_ref(&security_group, "id"));
        Ok(program)
    }

    fn output_keys(&self) -> &'static [&'static str] {
        OUTPUT_KEYS
    }
}
