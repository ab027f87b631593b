//! Provider configs sourced from the process environment
//!
//! ```text
//! AWS_ACCESS_KEY_ID + AWS_SECRET_ACCESS_KEY   -> awsProviderConfig
//! GOOGLE_APPLICATION_CREDENTIALS (key file)   -> gcpProviderConfig
//! GOOGLE_CREDENTIALS (inline JSON)            -> gcpProviderConfig
//! ARM_CLIENT_ID/SECRET/TENANT_ID/SUBSCRIPTION -> azureProviderConfig
//! ```

use crate::error::{Result, StackInputError};
use crate::options::StackInputProviderConfigOptions;
use crate::provider_config::{
    AtlasProviderConfig, Auth0ProviderConfig, AwsProviderConfig, AzureProviderConfig,
    CloudflareProviderConfig, ConfluentProviderConfig, DEFAULT_AWS_REGION, GcpProviderConfig,
    KubernetesProviderConfig, ProviderConfigKind, SnowflakeProviderConfig,
};
use crate::temp_files::TempConfigFiles;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{debug, info, warn};

/// Placeholder used when `AWS_ACCOUNT_ID` is not set
pub const PLACEHOLDER_AWS_ACCOUNT_ID: &str = "000000000000";

/// In-memory provider configs, prior to being written out for a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfigs {
    pub aws: Option<AwsProviderConfig>,
    pub gcp: Option<GcpProviderConfig>,
    pub azure: Option<AzureProviderConfig>,
    pub atlas: Option<AtlasProviderConfig>,
    pub auth0: Option<Auth0ProviderConfig>,
    pub cloudflare: Option<CloudflareProviderConfig>,
    pub confluent: Option<ConfluentProviderConfig>,
    pub kubernetes: Option<KubernetesProviderConfig>,
    pub snowflake: Option<SnowflakeProviderConfig>,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl ProviderConfigs {
    /// Collect AWS, GCP and Azure configs from the environment
    ///
    /// Providers whose variables are absent are left unset.
    pub fn from_env() -> Result<Self> {
        let configs = Self {
            aws: aws_from_env(),
            gcp: gcp_from_env()?,
            azure: azure_from_env(),
            ..Default::default()
        };
        info!(
            aws = configs.aws.is_some(),
            gcp = configs.gcp.is_some(),
            azure = configs.azure.is_some(),
            "Loaded provider configs from environment"
        );
        Ok(configs)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn aws_from_env() -> Option<AwsProviderConfig> {
    let access_key_id = non_empty_var("AWS_ACCESS_KEY_ID")?;
    let secret_access_key = non_empty_var("AWS_SECRET_ACCESS_KEY")?;

    let region = non_empty_var("AWS_REGION")
        .or_else(|| non_empty_var("AWS_DEFAULT_REGION"))
        .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string());
    let account_id = non_empty_var("AWS_ACCOUNT_ID").unwrap_or_else(|| {
        warn!("AWS_ACCOUNT_ID not set, using placeholder account id");
        PLACEHOLDER_AWS_ACCOUNT_ID.to_string()
    });

    Some(AwsProviderConfig {
        account_id,
        access_key_id,
        secret_access_key,
        region,
        session_token: non_empty_var("AWS_SESSION_TOKEN").unwrap_or_default(),
    })
}

fn gcp_from_env() -> Result<Option<GcpProviderConfig>> {
    let key_json = if let Some(path) = non_empty_var("GOOGLE_APPLICATION_CREDENTIALS") {
        debug!(path = %path, "Reading GCP key file");
        std::fs::read(&path).map_err(|e| StackInputError::ReadProviderConfig {
            path: path.into(),
            message: e.to_string(),
        })?
    } else if let Some(inline) = non_empty_var("GOOGLE_CREDENTIALS") {
        inline.into_bytes()
    } else {
        return Ok(None);
    };

    Ok(Some(GcpProviderConfig {
        service_account_key_base64: STANDARD.encode(key_json),
    }))
}

fn azure_from_env() -> Option<AzureProviderConfig> {
    Some(AzureProviderConfig {
        client_id: non_empty_var("ARM_CLIENT_ID")?,
        client_secret: non_empty_var("ARM_CLIENT_SECRET")?,
        tenant_id: non_empty_var("ARM_TENANT_ID")?,
        subscription_id: non_empty_var("ARM_SUBSCRIPTION_ID")?,
    })
}

/// Write each config to a temporary file and point the options at them
///
/// The files live as long as the returned [`TempConfigFiles`].
pub fn build_options_from_configs(
    configs: &ProviderConfigs,
) -> Result<(StackInputProviderConfigOptions, TempConfigFiles)> {
    let mut options = StackInputProviderConfigOptions::default();
    let mut files = TempConfigFiles::default();

    if let Some(config) = &configs.aws {
        options.set(ProviderConfigKind::Aws, files.write(ProviderConfigKind::Aws, config)?);
    }
    if let Some(config) = &configs.gcp {
        options.set(ProviderConfigKind::Gcp, files.write(ProviderConfigKind::Gcp, config)?);
    }
    if let Some(config) = &configs.azure {
        options.set(ProviderConfigKind::Azure, files.write(ProviderConfigKind::Azure, config)?);
    }
    if let Some(config) = &configs.atlas {
        options.set(ProviderConfigKind::Atlas, files.write(ProviderConfigKind::Atlas, config)?);
    }
    if let Some(config) = &configs.auth0 {
        options.set(ProviderConfigKind::Auth0, files.write(ProviderConfigKind::Auth0, config)?);
    }
    if let Some(config) = &configs.cloudflare {
        options.set(
            ProviderConfigKind::Cloudflare,
            files.write(ProviderConfigKind::Cloudflare, config)?,
        );
    }
    if let Some(config) = &configs.confluent {
        options.set(
            ProviderConfigKind::Confluent,
            files.write(ProviderConfigKind::Confluent, config)?,
        );
    }
    if let Some(config) = &configs.kubernetes {
        options.set(
            ProviderConfigKind::Kubernetes,
            files.write(ProviderConfigKind::Kubernetes, config)?,
        );
    }
    if let Some(config) = &configs.snowflake {
        options.set(
            ProviderConfigKind::Snowflake,
            files.write(ProviderConfigKind::Snowflake, config)?,
        );
    }

    Ok((options, files))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const AWS_VARS: [&str; 6] = [
        "AWS_ACCESS_KEY_ID",
        "AWS_SECRET_ACCESS_KEY",
        "AWS_REGION",
        "AWS_DEFAULT_REGION",
        "AWS_ACCOUNT_ID",
        "AWS_SESSION_TOKEN",
    ];

    #[test]
    #[serial]
    fn test_aws_from_env_defaults() {
        let mut vars: Vec<(&str, Option<&str>)> = AWS_VARS.iter().map(|v| (*v, None)).collect();
        vars[0].1 = Some("AKIA");
        vars[1].1 = Some("secret");

        temp_env::with_vars(vars, || {
            let aws = aws_from_env().unwrap();
            assert_eq!(aws.access_key_id, "AKIA");
            assert_eq!(aws.region, "us-east-1");
            assert_eq!(aws.account_id, "000000000000");
            assert!(aws.session_token.is_empty());
        });
    }

    #[test]
    #[serial]
    fn test_aws_region_falls_back_to_default_region() {
        temp_env::with_vars(
            [
                ("AWS_ACCESS_KEY_ID", Some("AKIA")),
                ("AWS_SECRET_ACCESS_KEY", Some("secret")),
                ("AWS_REGION", None),
                ("AWS_DEFAULT_REGION", Some("ap-northeast-1")),
                ("AWS_ACCOUNT_ID", Some("123456789012")),
                ("AWS_SESSION_TOKEN", Some("token")),
            ],
            || {
                let aws = aws_from_env().unwrap();
                assert_eq!(aws.region, "ap-northeast-1");
                assert_eq!(aws.account_id, "123456789012");
                assert_eq!(aws.session_token, "token");
            },
        );
    }

    #[test]
    #[serial]
    fn test_aws_requires_both_keys() {
        temp_env::with_vars(
            [
                ("AWS_ACCESS_KEY_ID", Some("AKIA")),
                ("AWS_SECRET_ACCESS_KEY", None::<&str>),
            ],
            || assert!(aws_from_env().is_none()),
        );
    }

    #[test]
    #[serial]
    fn test_gcp_from_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let key = dir.path().join("key.json");
        std::fs::write(&key, r#"{"type":"service_account"}"#).unwrap();

        temp_env::with_vars(
            [
                ("GOOGLE_APPLICATION_CREDENTIALS", Some(key.to_str().unwrap())),
                ("GOOGLE_CREDENTIALS", Some("ignored")),
            ],
            || {
                let gcp = gcp_from_env().unwrap().unwrap();
                let decoded = STANDARD.decode(&gcp.service_account_key_base64).unwrap();
                assert_eq!(decoded, br#"{"type":"service_account"}"#);
            },
        );
    }

    #[test]
    #[serial]
    fn test_gcp_from_inline_json() {
        temp_env::with_vars(
            [
                ("GOOGLE_APPLICATION_CREDENTIALS", None),
                ("GOOGLE_CREDENTIALS", Some("{}")),
            ],
            || {
                let gcp = gcp_from_env().unwrap().unwrap();
                assert_eq!(gcp.service_account_key_base64, STANDARD.encode("{}"));
            },
        );
    }

    #[test]
    #[serial]
    fn test_gcp_missing_key_file() {
        temp_env::with_var("GOOGLE_APPLICATION_CREDENTIALS", Some("/nonexistent/key.json"), || {
            assert!(matches!(
                gcp_from_env(),
                Err(StackInputError::ReadProviderConfig { .. })
            ));
        });
    }

    #[test]
    #[serial]
    fn test_azure_requires_all_four() {
        let full = [
            ("ARM_CLIENT_ID", Some("c")),
            ("ARM_CLIENT_SECRET", Some("s")),
            ("ARM_TENANT_ID", Some("t")),
            ("ARM_SUBSCRIPTION_ID", Some("sub")),
        ];
        temp_env::with_vars(full, || {
            let azure = azure_from_env().unwrap();
            assert_eq!(azure.subscription_id, "sub");
        });

        let partial = [
            ("ARM_CLIENT_ID", Some("c")),
            ("ARM_CLIENT_SECRET", Some("s")),
            ("ARM_TENANT_ID", Some("t")),
            ("ARM_SUBSCRIPTION_ID", None),
        ];
        temp_env::with_vars(partial, || assert!(azure_from_env().is_none()));
    }

    #[test]
    fn test_build_options_from_configs_cleans_up() {
        let configs = ProviderConfigs {
            aws: Some(AwsProviderConfig::default()),
            azure: Some(AzureProviderConfig::default()),
            ..Default::default()
        };

        let (options, files) = build_options_from_configs(&configs).unwrap();
        let aws_path = options.aws_provider_config.clone().unwrap();
        assert!(aws_path.exists());
        assert!(options.azure_provider_config.is_some());
        assert!(options.gcp_provider_config.is_none());
        assert_eq!(files.len(), 2);

        let written: AwsProviderConfig =
            serde_yaml::from_str(&std::fs::read_to_string(&aws_path).unwrap()).unwrap();
        assert_eq!(written.region, "us-east-1");

        drop(files);
        assert!(!aws_path.exists());
    }
}
