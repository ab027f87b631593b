//! `GcpGkeCluster`: a private, zonal GKE cluster in its own VPC
//!
//! ```text
//! project services ─► vpc ─┬─ sub-network (pods / services ranges)
//!                          ├─ firewall (webhooks from the control plane)
//!                          └─ router ─┬─ router-nat-ip
//!                                     └─ nat-router
//! cluster (private nodes, workload identity, STABLE channel)
//! ```

use crate::error::{Result as ModuleResult, invalid};
use crate::locals::Locals;
use planton_cloud::{Program, ResourceModule, Result, output_ref};
use planton_registry::CloudResourceKind;
use planton_stackinput::StackInput;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const OUTPUT_KEYS: &[&str] = &[
    "NetworkSelfLink",
    "SubNetworkSelfLink",
    "GkeWebhooksFirewallSelfLink",
    "RouterSelfLink",
    "ExternalNatIp",
    "RouterNatName",
    "ClusterEndpoint",
    "ClusterCaData",
];

pub const RELEASE_CHANNEL: &str = "STABLE";

pub const CLUSTER_PROJECT_APIS: &[&str] = &[
    "compute.googleapis.com",
    "container.googleapis.com",
    "secretmanager.googleapis.com",
    "dns.googleapis.com",
];

/// Primary range; the secondary ranges below sit outside it
pub const SUB_NETWORK_CIDR: &str = "10.0.0.0/14";
pub const POD_SECONDARY_IP_RANGE: &str = "10.4.0.0/16";
pub const SERVICE_SECONDARY_IP_RANGE: &str = "10.5.0.0/16";
pub const POD_SECONDARY_RANGE_NAME: &str = "gke-pods";
pub const SERVICE_SECONDARY_RANGE_NAME: &str = "gke-services";

/// Control plane range; also the source of admission webhook calls
pub const API_SERVER_IP_CIDR: &str = "172.16.0.0/28";
pub const WEBHOOK_PORTS: &[&str] = &["8443", "15017"];

const NETWORK: &str = "vpc";
const SUB_NETWORK: &str = "sub-network";
const FIREWALL: &str = "firewall";
const ROUTER: &str = "router";
const ROUTER_NAT_IP: &str = "router-nat-ip";
const ROUTER_NAT: &str = "nat-router";
const CLUSTER: &str = "cluster";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClusterAutoscalingConfig {
    pub is_enabled: bool,
    pub cpu_min_cores: u32,
    pub cpu_max_cores: u32,
    pub memory_min_gb: u32,
    pub memory_max_gb: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcpGkeClusterSpec {
    pub cluster_project_id: String,
    pub region: String,
    pub zone: String,
    pub cluster_autoscaling_config: Option<ClusterAutoscalingConfig>,
    pub is_workload_logs_enabled: bool,
}

impl GcpGkeClusterSpec {
    fn autoscaling(&self) -> Option<&ClusterAutoscalingConfig> {
        self.cluster_autoscaling_config
            .as_ref()
            .filter(|config| config.is_enabled)
    }

    pub fn logging_components(&self) -> Vec<&'static str> {
        if self.is_workload_logs_enabled {
            vec!["SYSTEM_COMPONENTS", "WORKLOADS"]
        } else {
            vec!["SYSTEM_COMPONENTS"]
        }
    }
}

pub fn validate_spec(spec: &GcpGkeClusterSpec) -> ModuleResult<()> {
    for (field, value) in [
        ("cluster_project_id", &spec.cluster_project_id),
        ("region", &spec.region),
        ("zone", &spec.zone),
    ] {
        if value.trim().is_empty() {
            return invalid(field, format!("{} is required", field));
        }
    }

    if !spec.zone.starts_with(&format!("{}-", spec.region)) {
        return invalid(
            "zone",
            format!("zone {:?} must be in region {:?}", spec.zone, spec.region),
        );
    }

    if let Some(config) = spec.autoscaling() {
        if config.cpu_min_cores > config.cpu_max_cores {
            return invalid(
                "cluster_autoscaling_config.cpu_min_cores",
                format!(
                    "cpu_min_cores ({}) must not exceed cpu_max_cores ({})",
                    config.cpu_min_cores, config.cpu_max_cores
                ),
            );
        }
        if config.memory_min_gb > config.memory_max_gb {
            return invalid(
                "cluster_autoscaling_config.memory_min_gb",
                format!(
                    "memory_min_gb ({}) must not exceed memory_max_gb ({})",
                    config.memory_min_gb, config.memory_max_gb
                ),
            );
        }
    }
    Ok(())
}

fn cluster_autoscaling(spec: &GcpGkeClusterSpec) -> Value {
    match spec.autoscaling() {
        Some(config) => json!({
            "enabled": true,
            "autoscalingProfile": "OPTIMIZE_UTILIZATION",
            "resourceLimits": [
                {
                    "resourceType": "cpu",
                    "minimum": config.cpu_min_cores,
                    "maximum": config.cpu_max_cores,
                },
                {
                    "resourceType": "memory",
                    "minimum": config.memory_min_gb,
                    "maximum": config.memory_max_gb,
                },
            ],
        }),
        None => json!({ "enabled": false }),
    }
}

/// Network, subnetwork, firewall, router and NAT
fn register_network(
    program: &mut Program,
    locals: &Locals,
    spec: &GcpGkeClusterSpec,
    services: &[String],
) -> Result<()> {
    let project = spec.cluster_project_id.as_str();
    let name = locals.name.as_str();

    let mut network = locals
        .resource("gcp:compute:Network")
        .property("project", project)
        .property("autoCreateSubnetworks", false);
    for service in services {
        network = network.depends_on(service);
    }
    let network = program.register(NETWORK, network)?;
    program.export("NetworkSelfLink", output_ref(&network, "selfLink"));

    let sub_network = locals
        .resource("gcp:compute:Subnetwork")
        .property("name", name)
        .property("project", project)
        .property("network", output_ref(&network, "id"))
        .property("region", spec.region.clone())
        .property("ipCidrRange", SUB_NETWORK_CIDR)
        .property("privateIpGoogleAccess", true)
        .property(
            "secondaryIpRanges",
            json!([
                { "rangeName": POD_SECONDARY_RANGE_NAME, "ipCidrRange": POD_SECONDARY_IP_RANGE },
                { "rangeName": SERVICE_SECONDARY_RANGE_NAME, "ipCidrRange": SERVICE_SECONDARY_IP_RANGE },
            ]),
        )
        .parent(&network);
    let sub_network = program.register(SUB_NETWORK, sub_network)?;
    program.export("SubNetworkSelfLink", output_ref(&sub_network, "selfLink"));

    let firewall = locals
        .resource("gcp:compute:Firewall")
        .property("name", format!("{}-gke-webhook", name))
        .property("project", project)
        .property("network", output_ref(&network, "name"))
        .property("sourceRanges", json!([API_SERVER_IP_CIDR]))
        .property("allows", json!([{ "protocol": "tcp", "ports": WEBHOOK_PORTS }]))
        .property("targetTags", json!([name]))
        .parent(&network);
    let firewall = program.register(FIREWALL, firewall)?;
    program.export("GkeWebhooksFirewallSelfLink", output_ref(&firewall, "selfLink"));

    let router = locals
        .resource("gcp:compute:Router")
        .property("name", name)
        .property("network", output_ref(&network, "selfLink"))
        .property("region", spec.region.clone())
        .property("project", project)
        .parent(&network);
    let router = program.register(ROUTER, router)?;
    program.export("RouterSelfLink", output_ref(&router, "selfLink"));

    let nat_ip = locals
        .resource("gcp:compute:Address")
        .property("name", format!("{}-router-nat", name))
        .property("project", project)
        .property("region", output_ref(&router, "region"))
        .property("addressType", "EXTERNAL")
        .property("labels", locals.labels())
        .parent(&router);
    let nat_ip = program.register(ROUTER_NAT_IP, nat_ip)?;
    program.export("ExternalNatIp", output_ref(&nat_ip, "address"));

    let nat = locals
        .resource("gcp:compute:RouterNat")
        .property("name", name)
        .property("router", output_ref(&router, "name"))
        .property("region", output_ref(&router, "region"))
        .property("project", project)
        .property("natIpAllocateOption", "MANUAL_ONLY")
        .property("natIps", json!([output_ref(&nat_ip, "selfLink")]))
        .property("sourceSubnetworkIpRangesToNat", "ALL_SUBNETWORKS_ALL_IP_RANGES")
        .parent(&router);
    let nat = program.register(ROUTER_NAT, nat)?;
    program.export("RouterNatName", output_ref(&nat, "name"));

    Ok(())
}

fn register_cluster(program: &mut Program, locals: &Locals, spec: &GcpGkeClusterSpec) -> Result<String> {
    let project = spec.cluster_project_id.as_str();
    let cluster = locals
        .resource("gcp:container:Cluster")
        .property("name", locals.name.clone())
        .property("project", project)
        .property("location", spec.zone.clone())
        .property("network", output_ref(NETWORK, "selfLink"))
        .property("subnetwork", output_ref(SUB_NETWORK, "selfLink"))
        .property("removeDefaultNodePool", true)
        .property("deletionProtection", false)
        // the cluster never becomes ready with zero initial nodes
        .property("initialNodeCount", 1)
        .property(
            "workloadIdentityConfig",
            json!({ "workloadPool": format!("{}.svc.id.goog", project) }),
        )
        .property("releaseChannel", json!({ "channel": RELEASE_CHANNEL }))
        .property("verticalPodAutoscaling", json!({ "enabled": true }))
        .property(
            "addonsConfig",
            json!({
                "horizontalPodAutoscaling": { "disabled": false },
                "httpLoadBalancing": { "disabled": true },
                "istioConfig": { "disabled": true },
                "networkPolicyConfig": { "disabled": true },
            }),
        )
        .property(
            "privateClusterConfig",
            json!({
                "enablePrivateEndpoint": false,
                "enablePrivateNodes": true,
                "masterIpv4CidrBlock": API_SERVER_IP_CIDR,
            }),
        )
        .property(
            "ipAllocationPolicy",
            json!({
                "clusterSecondaryRangeName": POD_SECONDARY_RANGE_NAME,
                "servicesSecondaryRangeName": SERVICE_SECONDARY_RANGE_NAME,
            }),
        )
        .property(
            "masterAuthorizedNetworksConfig",
            json!({
                "cidrBlocks": [{
                    "cidrBlock": "0.0.0.0/0",
                    "displayName": "kubectl-from-anywhere",
                }],
            }),
        )
        .property("clusterAutoscaling", cluster_autoscaling(spec))
        .property(
            "loggingConfig",
            json!({ "enableComponents": spec.logging_components() }),
        )
        .property("resourceLabels", locals.labels())
        .depends_on(ROUTER_NAT);
    program.register(CLUSTER, cluster)
}

#[derive(Debug, Default)]
pub struct GkeClusterModule;

impl ResourceModule for GkeClusterModule {
    fn kind(&self) -> CloudResourceKind {
        CloudResourceKind::GcpGkeCluster
    }

    fn validate(&self, input: &StackInput) -> Result<()> {
        let spec: GcpGkeClusterSpec = input.target.spec_as()?;
        validate_spec(&spec)?;
        Ok(())
    }

    fn program(&self, input: &StackInput) -> Result<Program> {
        let spec: GcpGkeClusterSpec = input.target.spec_as()?;
        let mut program = Program::for_manifest(&input.target);
        let locals = Locals::new(&mut program, input, self.kind(), &spec.cluster_project_id)?;

        let mut services = Vec::with_capacity(CLUSTER_PROJECT_APIS.len());
        for api in CLUSTER_PROJECT_APIS {
            let service = locals
                .resource("gcp:projects:Service")
                .property("project", spec.cluster_project_id.clone())
                .property("service", *api)
                .property("disableDependentServices", true);
            services.push(program.register(format!("container-cluster-{}", api), service)?);
        }

        register_network(&mut program, &locals, &spec, &services)?;
        let cluster = register_cluster(&mut program, &locals, &spec)?;

        program.export("ClusterEndpoint", output_ref(&cluster, "endpoint"));
        program.export(
            "ClusterCaData",
            output_ref(&cluster, "masterAuth.clusterCaCertificate"),
        );
        Ok(program)
    }

    fn output_keys(&self) -> &'static [&'static str] {
        OUTPUT_KEYS
    }
}
