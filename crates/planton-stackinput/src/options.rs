use crate::provider_config::ProviderConfigKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Provider config files to merge into a stack input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackInputProviderConfigOptions {
    pub aws_provider_config: Option<PathBuf>,
    pub gcp_provider_config: Option<PathBuf>,
    pub azure_provider_config: Option<PathBuf>,
    pub atlas_provider_config: Option<PathBuf>,
    pub auth0_provider_config: Option<PathBuf>,
    pub cloudflare_provider_config: Option<PathBuf>,
    pub confluent_provider_config: Option<PathBuf>,
    pub kubernetes_provider_config: Option<PathBuf>,
    pub snowflake_provider_config: Option<PathBuf>,
}

impl StackInputProviderConfigOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aws_provider_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.aws_provider_config = Some(path.into());
        self
    }

    pub fn with_gcp_provider_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.gcp_provider_config = Some(path.into());
        self
    }

    pub fn with_azure_provider_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.azure_provider_config = Some(path.into());
        self
    }

    pub fn with_atlas_provider_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.atlas_provider_config = Some(path.into());
        self
    }

    pub fn with_auth0_provider_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth0_provider_config = Some(path.into());
        self
    }

    pub fn with_cloudflare_provider_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.cloudflare_provider_config = Some(path.into());
        self
    }

    pub fn with_confluent_provider_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.confluent_provider_config = Some(path.into());
        self
    }

    pub fn with_kubernetes_provider_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.kubernetes_provider_config = Some(path.into());
        self
    }

    pub fn with_snowflake_provider_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.snowflake_provider_config = Some(path.into());
        self
    }

    pub fn get(&self, kind: ProviderConfigKind) -> Option<&Path> {
        self.slot(kind).as_deref()
    }

    pub fn set(&mut self, kind: ProviderConfigKind, path: impl Into<PathBuf>) {
        *self.slot_mut(kind) = Some(path.into());
    }

    /// Supplied configs in stack-input order
    pub fn iter(&self) -> impl Iterator<Item = (ProviderConfigKind, &Path)> {
        ProviderConfigKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|path| (kind, path)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Pick up `<provider>-provider-config.yaml` files present in `dir`
    pub fn from_input_dir(dir: &Path) -> Self {
        let mut options = Self::default();
        for kind in ProviderConfigKind::ALL {
            let path = dir.join(kind.file_name());
            if path.is_file() {
                debug!(provider = %kind, path = %path.display(), "Found provider config in input dir");
                options.set(kind, path);
            }
        }
        options
    }

    /// Fill unset entries from `other`; entries already set are kept
    pub fn merge(mut self, other: &Self) -> Self {
        for (kind, path) in other.iter() {
            if self.get(kind).is_none() {
                self.set(kind, path);
            }
        }
        self
    }

    fn slot(&self, kind: ProviderConfigKind) -> &Option<PathBuf> {
        match kind {
            ProviderConfigKind::Aws => &self.aws_provider_config,
            ProviderConfigKind::Gcp => &self.gcp_provider_config,
            ProviderConfigKind::Azure => &self.azure_provider_config,
            ProviderConfigKind::Atlas => &self.atlas_provider_config,
            ProviderConfigKind::Auth0 => &self.auth0_provider_config,
            ProviderConfigKind::Cloudflare => &self.cloudflare_provider_config,
            ProviderConfigKind::Confluent => &self.confluent_provider_config,
            ProviderConfigKind::Kubernetes => &self.kubernetes_provider_config,
            ProviderConfigKind::Snowflake => &self.snowflake_provider_config,
        }
    }

    fn slot_mut(&mut self, kind: ProviderConfigKind) -> &mut Option<PathBuf> {
        match kind {
            ProviderConfigKind::Aws => &mut self.aws_provider_config,
            ProviderConfigKind::Gcp => &mut self.gcp_provider_config,
            ProviderConfigKind::Azure => &mut self.azure_provider_config,
            ProviderConfigKind::Atlas => &mut self.atlas_provider_config,
            ProviderConfigKind::Auth0 => &mut self.auth0_provider_config,
            ProviderConfigKind::Cloudflare => &mut self.cloudflare_provider_config,
            ProviderConfigKind::Confluent => &mut self.confluent_provider_config,
            ProviderConfigKind::Kubernetes => &mut self.kubernetes_provider_config,
            ProviderConfigKind::Snowflake => &mut self.snowflake_provider_config,
        }
    }
}
