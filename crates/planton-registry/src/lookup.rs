//! Kind lookups over the static metadata table

use crate::error::{RegistryError, Result};
use crate::kind::{CloudResourceKind, CloudResourceKindMeta, KIND_TABLE};
use crate::provider::{CloudResourceProvider, KubernetesResourceType};
use tracing::debug;

/// Short names accepted in addition to the kind names
///
/// Keys are already normalized. Checked in order before the name table.
pub const KIND_ALIASES: &[(&str, CloudResourceKind)] = &[
    ("ddb", CloudResourceKind::AwsDynamodb),
    ("dynamodb", CloudResourceKind::AwsDynamodb),
    ("rds", CloudResourceKind::AwsRdsCluster),
    ("ecs", CloudResourceKind::AwsEcsCluster),
    ("ecsservice", CloudResourceKind::AwsEcsService),
    ("eks", CloudResourceKind::AwsEksCluster),
    ("s3", CloudResourceKind::AwsS3Bucket),
    ("vpc", CloudResourceKind::AwsVpc),
    ("securitygroup", CloudResourceKind::AwsSecurityGroup),
    ("route53", CloudResourceKind::AwsRoute53Zone),
    ("aks", CloudResourceKind::AzureAksCluster),
    ("gke", CloudResourceKind::GcpGkeCluster),
    ("gcs", CloudResourceKind::GcpGcsBucket),
    ("cloudrun", CloudResourceKind::GcpCloudRun),
    ("cloudsql", CloudResourceKind::GcpCloudSql),
    ("dnszone", CloudResourceKind::GcpDnsZone),
    ("microservice", CloudResourceKind::MicroserviceKubernetes),
    ("deployment", CloudResourceKind::KubernetesDeployment),
    ("postgres", CloudResourceKind::PostgresKubernetes),
    ("redis", CloudResourceKind::RedisKubernetes),
    ("kafka", CloudResourceKind::KafkaKubernetes),
    ("helm", CloudResourceKind::HelmRelease),
    ("cronjob", CloudResourceKind::CronJobKubernetes),
];

/// Strip `-`, `_` and spaces, then lowercase
pub fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .collect::<String>()
        .to_lowercase()
}

/// Resolve a loosely written kind name
///
/// Accepts PascalCase, kebab-case, snake_case and any capitalization,
/// plus the short names in [`KIND_ALIASES`]. Unknown input resolves to
/// [`CloudResourceKind::Unspecified`].
pub fn kind_from_string(s: &str) -> CloudResourceKind {
    let normalized = normalize(s);
    if normalized.is_empty() {
        return CloudResourceKind::Unspecified;
    }

    if let Some((_, kind)) = KIND_ALIASES.iter().find(|(alias, _)| *alias == normalized) {
        return *kind;
    }

    KIND_TABLE
        .iter()
        .find(|meta| normalize(meta.name) == normalized)
        .map(|meta| meta.kind)
        .unwrap_or_else(|| {
            debug!(input = %s, "No kind matches input");
            CloudResourceKind::Unspecified
        })
}

pub fn kind_by_id_prefix(prefix: &str) -> Result<CloudResourceKind> {
    KIND_TABLE
        .iter()
        .find(|meta| meta.id_prefix == prefix)
        .map(|meta| meta.kind)
        .ok_or_else(|| RegistryError::NoMatchingIdPrefix(prefix.to_string()))
}

/// Exact, case-sensitive match on the kind name
pub fn kind_by_kind_name(name: &str) -> Result<CloudResourceKind> {
    KIND_TABLE
        .iter()
        .find(|meta| meta.name == name)
        .map(|meta| meta.kind)
        .ok_or_else(|| RegistryError::NoMatchingKindName(name.to_string()))
}

pub fn meta(kind: CloudResourceKind) -> Result<&'static CloudResourceKindMeta> {
    KIND_TABLE
        .iter()
        .find(|meta| meta.kind == kind)
        .ok_or(RegistryError::UnsupportedKind(kind))
}

pub fn provider(kind: CloudResourceKind) -> Result<CloudResourceProvider> {
    Ok(meta(kind)?.provider)
}

pub fn kubernetes_resource_type(kind: CloudResourceKind) -> Result<KubernetesResourceType> {
    meta(kind)?
        .kubernetes_category
        .ok_or(RegistryError::NotKubernetesKind(kind))
}

/// `<provider>.project-planton.org/<version>`
pub fn api_version(kind: CloudResourceKind) -> Result<String> {
    let meta = meta(kind)?;
    Ok(format!("{}/{}", meta.provider.api_group(), meta.version))
}

pub fn all_kinds() -> impl Iterator<Item = CloudResourceKind> {
    KIND_TABLE.iter().map(|meta| meta.kind)
}

pub fn kinds_for_provider(
    provider: CloudResourceProvider,
) -> impl Iterator<Item = &'static CloudResourceKindMeta> {
    KIND_TABLE.iter().filter(move |meta| meta.provider == provider)
}
