//! The `CloudResourceKind` enum and its metadata table
//!
//! Both are generated from one declaration list so a kind cannot exist
//! without its metadata row. Numeric ranges are partitioned by provider
//! family:
//!
//! ```text
//!   1 -  49  test / dev
//!  50 - 199  SaaS
//! 200 - 399  AWS
//! 400 - 599  Azure
//! 600 - 799  GCP
//! 800 - 999  Kubernetes
//! ```

use crate::provider::{CloudResourceProvider, KubernetesResourceType};
use std::fmt;

/// Static metadata describing one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloudResourceKindMeta {
    pub kind: CloudResourceKind,
    /// Prefix of generated resource IDs (`ddb-xxxx`)
    pub id_prefix: &'static str,
    /// Kind name as written in manifests
    pub name: &'static str,
    pub version: &'static str,
    pub provider: CloudResourceProvider,
    /// Only set for Kubernetes kinds
    pub kubernetes_category: Option<KubernetesResourceType>,
}

macro_rules! cloud_resource_kinds {
    (@category) => { None };
    (@category $category:ident) => { Some(KubernetesResourceType::$category) };

    ($(
        $variant:ident = $value:literal,
        $prefix:literal,
        $provider:ident
        $(, $category:ident)?
    );* $(;)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        #[repr(i32)]
        pub enum CloudResourceKind {
            #[default]
            Unspecified = 0,
            $($variant = $value,)*
        }

        impl CloudResourceKind {
            /// Convert a wire value back into a kind
            pub fn from_i32(value: i32) -> Option<Self> {
                match value {
                    0 => Some(Self::Unspecified),
                    $($value => Some(Self::$variant),)*
                    _ => None,
                }
            }

            /// Enum variant name
            pub fn as_str(self) -> &'static str {
                match self {
                    Self::Unspecified => "Unspecified",
                    $(Self::$variant => stringify!($variant),)*
                }
            }
        }

        /// Every kind except `Unspecified`, in declaration order
        pub static KIND_TABLE: &[CloudResourceKindMeta] = &[
            $(CloudResourceKindMeta {
                kind: CloudResourceKind::$variant,
                id_prefix: $prefix,
                name: stringify!($variant),
                version: "v1",
                provider: CloudResourceProvider::$provider,
                kubernetes_category: cloud_resource_kinds!(@category $($category)?),
            },)*
        ];
    };
}

cloud_resource_kinds! {
    // test / dev
    FirstTestCloudApiResource = 1, "tst1", Test;
    SecondTestCloudApiResource = 2, "tst2", Test;
    ThirdTestCloudApiResource = 3, "tst3", Test;

    // SaaS
    ConfluentKafka = 50, "cnfkfk", Confluent;
    MongodbAtlas = 51, "mdbatl", Atlas;
    SnowflakeDatabase = 52, "snfdb", Snowflake;

    // AWS
    AwsAlb = 200, "alb", Aws;
    AwsCertManagerCert = 201, "awscert", Aws;
    AwsCloudFront = 202, "cfront", Aws;
    AwsDynamodb = 203, "ddb", Aws;
    AwsEcrRepo = 204, "ecrrepo", Aws;
    AwsEcsCluster = 205, "ecscl", Aws;
    AwsEcsService = 206, "ecssvc", Aws;
    AwsEksCluster = 207, "eks", Aws;
    AwsIamRole = 208, "iamrole", Aws;
    AwsLambda = 209, "lambda", Aws;
    AwsRdsCluster = 210, "rdscl", Aws;
    AwsRdsInstance = 211, "rdsins", Aws;
    AwsRoute53Zone = 212, "r53z", Aws;
    AwsS3Bucket = 213, "s3b", Aws;
    AwsSecretsManager = 214, "awssm", Aws;
    AwsSecurityGroup = 215, "awssg", Aws;
    AwsStaticWebsite = 216, "awsweb", Aws;
    AwsVpc = 217, "vpc", Aws;

    // Azure
    AzureAksCluster = 400, "aks", Azure;
    AzureKeyVault = 401, "azkv", Azure;

    // GCP
    GcpArtifactRegistryRepo = 600, "garr", Gcp;
    GcpCloudCdn = 601, "gcdn", Gcp;
    GcpCloudFunction = 602, "gcf", Gcp;
    GcpCloudRun = 603, "gcr", Gcp;
    GcpCloudSql = 604, "gsql", Gcp;
    GcpDnsZone = 605, "gdz", Gcp;
    GcpGcsBucket = 606, "gcs", Gcp;
    GcpGkeAddonBundle = 607, "gkeab", Gcp;
    GcpGkeCluster = 608, "gke", Gcp;
    GcpSecretsManager = 609, "gsm", Gcp;
    GcpStaticWebsite = 610, "gweb", Gcp;
    GcpProject = 611, "gproj", Gcp;

    // Kubernetes
    ArgocdKubernetes = 800, "argk8s", Kubernetes, Workload;
    CronJobKubernetes = 801, "cronk8s", Kubernetes, Workload;
    ElasticsearchKubernetes = 802, "elsk8s", Kubernetes, Workload;
    GitlabKubernetes = 803, "glk8s", Kubernetes, Workload;
    GrafanaKubernetes = 804, "grfk8s", Kubernetes, Workload;
    HelmRelease = 805, "helm", Kubernetes, Workload;
    JenkinsKubernetes = 806, "jenk8s", Kubernetes, Workload;
    KafkaKubernetes = 807, "kfk8s", Kubernetes, Workload;
    KeycloakKubernetes = 808, "kck8s", Kubernetes, Workload;
    KubernetesHttpEndpoint = 809, "httpep", Kubernetes, Addon;
    LocustKubernetes = 810, "lock8s", Kubernetes, Workload;
    MicroserviceKubernetes = 811, "msk8s", Kubernetes, Workload;
    MongodbKubernetes = 812, "mdbk8s", Kubernetes, Workload;
    Neo4jKubernetes = 813, "neok8s", Kubernetes, Workload;
    OpenFgaKubernetes = 814, "fgak8s", Kubernetes, Workload;
    PostgresKubernetes = 815, "pgk8s", Kubernetes, Workload;
    PrometheusKubernetes = 816, "promk8s", Kubernetes, Addon;
    RedisKubernetes = 817, "redk8s", Kubernetes, Workload;
    SignozKubernetes = 818, "sigk8s", Kubernetes, Addon;
    SolrKubernetes = 819, "solk8s", Kubernetes, Workload;
    StackJobRunnerKubernetes = 820, "sjrk8s", Kubernetes, Addon;
    TemporalKubernetes = 821, "tprk8s", Kubernetes, Workload;
    NatsKubernetes = 822, "natk8s", Kubernetes, Workload;
    KubernetesDeployment = 823, "k8sdpl", Kubernetes, Workload;
}

impl CloudResourceKind {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Provider for display purposes; `Unspecified` when the kind has no metadata
    pub fn provider_or_unspecified(self) -> CloudResourceProvider {
        crate::lookup::provider(self).unwrap_or_default()
    }

    /// `AwsDynamodb` -> `aws-dynamodb`
    pub fn kebab_name(self) -> String {
        let mut out = String::new();
        for (i, c) in self.as_str().chars().enumerate() {
            if c.is_ascii_uppercase() {
                if i > 0 {
                    out.push('-');
                }
                out.push(c.to_ascii_lowercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Display for CloudResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_values_unique() {
        let mut seen = HashSet::new();
        for meta in KIND_TABLE {
            assert!(seen.insert(meta.kind.as_i32()), "duplicate value for {}", meta.name);
        }
    }

    #[test]
    fn test_id_prefixes_unique() {
        let mut seen = HashSet::new();
        for meta in KIND_TABLE {
            assert!(!meta.id_prefix.is_empty());
            assert!(seen.insert(meta.id_prefix), "duplicate id prefix {}", meta.id_prefix);
        }
    }

    #[test]
    fn test_names_unique_and_match_variants() {
        let mut seen = HashSet::new();
        for meta in KIND_TABLE {
            assert!(seen.insert(meta.name), "duplicate name {}", meta.name);
            assert_eq!(meta.name, meta.kind.as_str());
        }
    }

    #[test]
    fn test_values_in_provider_ranges() {
        for meta in KIND_TABLE {
            let value = meta.kind.as_i32();
            let range = match meta.provider {
                CloudResourceProvider::Test => 1..=49,
                CloudResourceProvider::Atlas
                | CloudResourceProvider::Confluent
                | CloudResourceProvider::Snowflake => 50..=199,
                CloudResourceProvider::Aws => 200..=399,
                CloudResourceProvider::Azure => 400..=599,
                CloudResourceProvider::Gcp => 600..=799,
                CloudResourceProvider::Kubernetes => 800..=999,
                other => panic!("unexpected provider {:?} for {}", other, meta.name),
            };
            assert!(range.contains(&value), "{} = {} out of range", meta.name, value);
        }
    }

    #[test]
    fn test_kubernetes_category_only_for_kubernetes() {
        for meta in KIND_TABLE {
            assert_eq!(
                meta.kubernetes_category.is_some(),
                meta.provider == CloudResourceProvider::Kubernetes,
                "{}",
                meta.name
            );
        }
    }

    #[test]
    fn test_known_values() {
        assert_eq!(CloudResourceKind::AwsDynamodb.as_i32(), 203);
        assert_eq!(CloudResourceKind::AwsEcsCluster.as_i32(), 205);
        assert_eq!(CloudResourceKind::AwsEcsService.as_i32(), 206);
        assert_eq!(CloudResourceKind::AwsRdsCluster.as_i32(), 210);
        assert_eq!(CloudResourceKind::AwsSecurityGroup.as_i32(), 215);
        assert_eq!(CloudResourceKind::GcpDnsZone.as_i32(), 605);
        assert_eq!(CloudResourceKind::GcpGkeCluster.as_i32(), 608);
        assert_eq!(CloudResourceKind::MicroserviceKubernetes.as_i32(), 811);
        assert_eq!(CloudResourceKind::KubernetesDeployment.as_i32(), 823);
        assert_eq!(CloudResourceKind::from_i32(203), Some(CloudResourceKind::AwsDynamodb));
        assert_eq!(CloudResourceKind::from_i32(999), None);
    }

    #[test]
    fn test_kebab_name() {
        assert_eq!(CloudResourceKind::AwsDynamodb.kebab_name(), "aws-dynamodb");
        assert_eq!(CloudResourceKind::GcpGkeCluster.kebab_name(), "gcp-gke-cluster");
        assert_eq!(
            CloudResourceKind::MicroserviceKubernetes.kebab_name(),
            "microservice-kubernetes"
        );
    }
}
