//! `GcpDnsZone`: a public Cloud DNS managed zone, its record sets and the
//! service accounts allowed to manage it

use crate::error::{Result as ModuleResult, invalid};
use crate::locals::Locals;
use planton_cloud::{Program, ResourceModule, Result, output_ref};
use planton_registry::CloudResourceKind;
use planton_stackinput::StackInput;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const OUTPUT_KEYS: &[&str] = &["ZoneId", "ZoneName", "Nameservers"];

const ZONE: &str = "zone";
const DNS_ADMIN_ROLE: &str = "roles/dns.admin";
const DEFAULT_TTL_SECONDS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Ns,
    Srv,
    Txt,
    Caa,
    Ptr,
}

impl DnsRecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            DnsRecordType::A => "A",
            DnsRecordType::Aaaa => "AAAA",
            DnsRecordType::Cname => "CNAME",
            DnsRecordType::Mx => "MX",
            DnsRecordType::Ns => "NS",
            DnsRecordType::Srv => "SRV",
            DnsRecordType::Txt => "TXT",
            DnsRecordType::Caa => "CAA",
            DnsRecordType::Ptr => "PTR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    pub record_type: DnsRecordType,
    /// Fully qualified, with the trailing dot
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
    /// 0 means the default of 60 seconds
    #[serde(default)]
    pub ttl_seconds: u32,
}

impl DnsRecord {
    pub fn ttl(&self) -> u32 {
        if self.ttl_seconds > 0 {
            self.ttl_seconds
        } else {
            DEFAULT_TTL_SECONDS
        }
    }

    /// Logical resource name, e.g. `a-www-example-com`
    fn resource_name(&self) -> String {
        format!(
            "{}-{}",
            self.record_type.as_str().to_ascii_lowercase(),
            self.name.trim_end_matches('.').replace('.', "-")
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcpDnsZoneSpec {
    pub project_id: String,
    pub iam_service_accounts: Vec<String>,
    pub records: Vec<DnsRecord>,
}

/// `example.com` becomes the managed zone `example-com`
pub fn managed_zone_name(domain: &str) -> String {
    domain.replace('.', "-")
}

pub fn validate_spec(spec: &GcpDnsZoneSpec) -> ModuleResult<()> {
    if spec.project_id.trim().is_empty() {
        return invalid("project_id", "project_id is required");
    }

    let mut seen = HashSet::new();
    let mut resource_names: HashMap<String, &str> = HashMap::new();
    for (i, record) in spec.records.iter().enumerate() {
        let field = format!("records[{}]", i);
        if !record.name.ends_with('.') {
            return invalid(
                format!("{}.name", field),
                format!("record name {:?} must be fully qualified with a trailing dot", record.name),
            );
        }
        if record.values.is_empty() {
            return invalid(
                format!("{}.values", field),
                format!("record {:?} must have at least one value", record.name),
            );
        }
        if !seen.insert((record.record_type, record.name.as_str())) {
            return invalid(
                field,
                format!(
                    "duplicate {} record {:?}",
                    record.record_type.as_str(),
                    record.name
                ),
            );
        }
        if let Some(other) = resource_names.insert(record.resource_name(), &record.name) {
            return invalid(
                field,
                format!(
                    "{} records {:?} and {:?} map to the same resource name {:?}",
                    record.record_type.as_str(),
                    other,
                    record.name,
                    record.resource_name()
                ),
            );
        }
    }

    for (i, account) in spec.iam_service_accounts.iter().enumerate() {
        if !account.contains('@') {
            return invalid(
                format!("iam_service_accounts[{}]", i),
                format!("{:?} is not a service account email", account),
            );
        }
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct DnsZoneModule;

impl ResourceModule for DnsZoneModule {
    fn kind(&self) -> CloudResourceKind {
        CloudResourceKind::GcpDnsZone
    }

    fn validate(&self, input: &StackInput) -> Result<()> {
        let spec: GcpDnsZoneSpec = input.target.spec_as()?;
        validate_spec(&spec)?;
        Ok(())
    }

    fn program(&self, input: &StackInput) -> Result<Program> {
        let spec: GcpDnsZoneSpec = input.target.spec_as()?;
        let mut program = Program::for_manifest(&input.target);
        let locals = Locals::new(&mut program, input, self.kind(), &spec.project_id)?;

        let zone = locals
            .resource("gcp:dns:ManagedZone")
            .property("name", managed_zone_name(&locals.name))
            .property("dnsName", format!("{}.", locals.name))
            .property("project", spec.project_id.clone())
            .property("description", format!("Managed zone for {}", locals.name))
            .property("labels", locals.labels());
        let zone = program.register(ZONE, zone)?;

        for record in &spec.records {
            let record_set = locals
                .resource("gcp:dns:RecordSet")
                .property("managedZone", output_ref(&zone, "name"))
                .property("name", record.name.clone())
                .property("type", record.record_type.as_str())
                .property("ttl", record.ttl())
                .property("rrdatas", record.values.clone())
                .property("project", spec.project_id.clone())
                .parent(&zone);
            program.register(record.resource_name(), record_set)?;
        }

        for (i, account) in spec.iam_service_accounts.iter().enumerate() {
            let binding = locals
                .resource("gcp:projects:IAMMember")
                .property("project", spec.project_id.clone())
                .property("role", DNS_ADMIN_ROLE)
                .property("member", format!("serviceAccount:{}", account))
                .parent(&zone);
            program.register(format!("dns-admin-{}", i), binding)?;
        }

        program.export("ZoneId", output_ref(&zone, "id"));
        program.export("ZoneName", output_ref(&zone, "name"));
        program.export("Nameservers", output_ref(&zone, "nameServers"));
        Ok(program)
    }

    fn output_keys(&self) -> &'static [&'static str] {
        OUTPUT_KEYS
    }
}
