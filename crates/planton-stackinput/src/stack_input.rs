use crate::error::{Result, StackInputError};
use crate::provider_config::{
    AtlasProviderConfig, Auth0ProviderConfig, AwsProviderConfig, AzureProviderConfig,
    CloudflareProviderConfig, ConfluentProviderConfig, GcpProviderConfig,
    KubernetesProviderConfig, SnowflakeProviderConfig,
};
use planton_core::Manifest;
use serde::{Deserialize, Serialize};

/// Environment variable carrying the stack input into a running program
pub const STACK_INPUT_ENV: &str = "STACK_INPUT_YAML";

/// Typed view of a stack input document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackInput {
    pub target: Manifest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_provider_config: Option<AwsProviderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp_provider_config: Option<GcpProviderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure_provider_config: Option<AzureProviderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atlas_provider_config: Option<AtlasProviderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth0_provider_config: Option<Auth0ProviderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudflare_provider_config: Option<CloudflareProviderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confluent_provider_config: Option<ConfluentProviderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_provider_config: Option<KubernetesProviderConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snowflake_provider_config: Option<SnowflakeProviderConfig>,
}

impl StackInput {
    pub fn new(target: Manifest) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    pub fn with_aws(mut self, config: AwsProviderConfig) -> Self {
        self.aws_provider_config = Some(config);
        self
    }

    pub fn with_gcp(mut self, config: GcpProviderConfig) -> Self {
        self.gcp_provider_config = Some(config);
        self
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read the stack input from `STACK_INPUT_YAML`
    pub fn from_env() -> Result<Self> {
        let content = std::env::var(STACK_INPUT_ENV)
            .map_err(|_| StackInputError::MissingEnvVar(STACK_INPUT_ENV.to_string()))?;
        Self::from_yaml(&content)
    }

    pub fn require_aws(&self) -> Result<&AwsProviderConfig> {
        self.aws_provider_config
            .as_ref()
            .ok_or(StackInputError::MissingProviderConfig("awsProviderConfig"))
    }

    pub fn require_gcp(&self) -> Result<&GcpProviderConfig> {
        self.gcp_provider_config
            .as_ref()
            .ok_or(StackInputError::MissingProviderConfig("gcpProviderConfig"))
    }

    pub fn require_azure(&self) -> Result<&AzureProviderConfig> {
        self.azure_provider_config
            .as_ref()
            .ok_or(StackInputError::MissingProviderConfig("azureProviderConfig"))
    }

    pub fn require_kubernetes(&self) -> Result<&KubernetesProviderConfig> {
        self.kubernetes_provider_config
            .as_ref()
            .ok_or(StackInputError::MissingProviderConfig("kubernetesProviderConfig"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const STACK_INPUT: &str = r#"
target:
  apiVersion: aws.project-planton.org/v1
  kind: AwsSecurityGroup
  metadata:
    name: web
  spec:
    vpcId: vpc-123
awsProviderConfig:
  accountId: "123456789012"
  accessKeyId: AKIA
  secretAccessKey: secret
"#;

    #[test]
    fn test_from_yaml() {
        let input = StackInput::from_yaml(STACK_INPUT).unwrap();
        assert_eq!(input.target.kind, "AwsSecurityGroup");
        assert_eq!(input.target.spec["vpcId"], "vpc-123");

        let aws = input.require_aws().unwrap();
        assert_eq!(aws.account_id, "123456789012");
        assert_eq!(aws.region, "us-east-1");

        assert!(matches!(
            input.require_gcp(),
            Err(StackInputError::MissingProviderConfig("gcpProviderConfig"))
        ));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        temp_env::with_var(STACK_INPUT_ENV, Some(STACK_INPUT), || {
            let input = StackInput::from_env().unwrap();
            assert_eq!(input.target.metadata.name, "web");
        });

        temp_env::with_var_unset(STACK_INPUT_ENV, || {
            assert!(matches!(
                StackInput::from_env(),
                Err(StackInputError::MissingEnvVar(_))
            ));
        });
    }
}
