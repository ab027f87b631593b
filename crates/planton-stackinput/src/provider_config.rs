//! Provider credential/config types
//!
//! Field names are camelCase on the wire; snake_case spellings are accepted
//! when reading so hand-written files in either style load.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_AWS_REGION: &str = "us-east-1";

fn default_aws_region() -> String {
    DEFAULT_AWS_REGION.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsProviderConfig {
    #[serde(default, alias = "account_id")]
    pub account_id: String,
    #[serde(default, alias = "access_key_id")]
    pub access_key_id: String,
    #[serde(default, alias = "secret_access_key")]
    pub secret_access_key: String,
    /// Defaults to `us-east-1`
    #[serde(default = "default_aws_region")]
    pub region: String,
    #[serde(default, alias = "session_token", skip_serializing_if = "String::is_empty")]
    pub session_token: String,
}

impl Default for AwsProviderConfig {
    fn default() -> Self {
        Self {
            account_id: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: default_aws_region(),
            session_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpProviderConfig {
    /// Base64 of the service account key JSON
    #[serde(default, alias = "service_account_key_base64")]
    pub service_account_key_base64: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureProviderConfig {
    #[serde(default, alias = "client_id")]
    pub client_id: String,
    #[serde(default, alias = "client_secret")]
    pub client_secret: String,
    #[serde(default, alias = "tenant_id")]
    pub tenant_id: String,
    #[serde(default, alias = "subscription_id")]
    pub subscription_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasProviderConfig {
    #[serde(default, alias = "public_key")]
    pub public_key: String,
    #[serde(default, alias = "private_key")]
    pub private_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auth0ProviderConfig {
    #[serde(default)]
    pub domain: String,
    #[serde(default, alias = "client_id")]
    pub client_id: String,
    #[serde(default, alias = "client_secret")]
    pub client_secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudflareProviderConfig {
    /// `api_token` or `legacy_api_key`
    #[serde(default, alias = "auth_scheme")]
    pub auth_scheme: String,
    #[serde(default, alias = "api_token", skip_serializing_if = "String::is_empty")]
    pub api_token: String,
    #[serde(default, alias = "api_key", skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfluentProviderConfig {
    #[serde(default, alias = "api_key")]
    pub api_key: String,
    #[serde(default, alias = "api_secret")]
    pub api_secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakeProviderConfig {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GkeClusterCredential {
    #[serde(default, alias = "cluster_endpoint")]
    pub cluster_endpoint: String,
    #[serde(default, alias = "cluster_ca_data")]
    pub cluster_ca_data: String,
    #[serde(default, alias = "service_account_key_base64")]
    pub service_account_key_base64: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoksClusterCredential {
    #[serde(default, alias = "kube_config")]
    pub kube_config: String,
}

/// Credentials for a target Kubernetes cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubernetesProviderConfig {
    /// `gcp_gke` or `digital_ocean_doks`
    #[serde(default)]
    pub provider: String,
    #[serde(default, alias = "gcp_gke", skip_serializing_if = "Option::is_none")]
    pub gcp_gke: Option<GkeClusterCredential>,
    #[serde(default, alias = "digital_ocean_doks", skip_serializing_if = "Option::is_none")]
    pub digital_ocean_doks: Option<DoksClusterCredential>,
}

/// Which provider a config file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderConfigKind {
    Aws,
    Gcp,
    Azure,
    Atlas,
    Auth0,
    Cloudflare,
    Confluent,
    Kubernetes,
    Snowflake,
}

impl ProviderConfigKind {
    /// Stack-input emission order
    pub const ALL: [ProviderConfigKind; 9] = [
        Self::Aws,
        Self::Gcp,
        Self::Azure,
        Self::Atlas,
        Self::Auth0,
        Self::Cloudflare,
        Self::Confluent,
        Self::Kubernetes,
        Self::Snowflake,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Gcp => "gcp",
            Self::Azure => "azure",
            Self::Atlas => "atlas",
            Self::Auth0 => "auth0",
            Self::Cloudflare => "cloudflare",
            Self::Confluent => "confluent",
            Self::Kubernetes => "kubernetes",
            Self::Snowflake => "snowflake",
        }
    }

    /// Key under which the config lands in the stack input
    pub fn stack_input_key(self) -> &'static str {
        match self {
            Self::Aws => "awsProviderConfig",
            Self::Gcp => "gcpProviderConfig",
            Self::Azure => "azureProviderConfig",
            Self::Atlas => "atlasProviderConfig",
            Self::Auth0 => "auth0ProviderConfig",
            Self::Cloudflare => "cloudflareProviderConfig",
            Self::Confluent => "confluentProviderConfig",
            Self::Kubernetes => "kubernetesProviderConfig",
            Self::Snowflake => "snowflakeProviderConfig",
        }
    }

    /// `aws-provider-config.yaml`
    pub fn file_name(self) -> String {
        format!("{}-provider-config.yaml", self.as_str())
    }
}

impl fmt::Display for ProviderConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
