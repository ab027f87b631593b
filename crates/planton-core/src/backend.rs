//! Pulumi backend selection from manifest labels

use crate::error::{ManifestError, Result};
use crate::model::Manifest;
use std::fmt;

pub const STACK_FQDN_LABEL: &str = "pulumi.project-planton.org/stack.fqdn";
pub const ORGANIZATION_LABEL: &str = "pulumi.project-planton.org/organization";
pub const PROJECT_LABEL: &str = "pulumi.project-planton.org/project";
pub const STACK_NAME_LABEL: &str = "pulumi.project-planton.org/stack.name";

/// Pulumi stack coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PulumiBackendConfig {
    pub organization: String,
    pub project: String,
    pub stack_name: String,
}

impl PulumiBackendConfig {
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        stack_name: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            project: project.into(),
            stack_name: stack_name.into(),
        }
    }

    /// Read the backend from the manifest labels
    ///
    /// `stack.fqdn` wins over the three individual labels.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        let labels = &manifest.metadata.labels;
        if labels.is_empty() {
            return Err(ManifestError::Backend(
                "no labels found in manifest".to_string(),
            ));
        }

        if let Some(fqdn) = labels.get(STACK_FQDN_LABEL) {
            return parse_stack_fqdn(fqdn);
        }

        let (Some(organization), Some(project), Some(stack_name)) = (
            labels.get(ORGANIZATION_LABEL),
            labels.get(PROJECT_LABEL),
            labels.get(STACK_NAME_LABEL),
        ) else {
            return Err(ManifestError::Backend(format!(
                "missing required Pulumi backend labels: either {} or all of {}, {}, {}",
                STACK_FQDN_LABEL, ORGANIZATION_LABEL, PROJECT_LABEL, STACK_NAME_LABEL
            )));
        };

        let organization = organization.trim();
        let project = project.trim();
        let stack_name = stack_name.trim();
        if organization.is_empty() || project.is_empty() || stack_name.is_empty() {
            return Err(ManifestError::Backend(
                "Pulumi backend labels cannot be empty".to_string(),
            ));
        }

        Ok(Self::new(organization, project, stack_name))
    }

    /// `org/project/stack`
    pub fn stack_fqdn(&self) -> String {
        format!("{}/{}/{}", self.organization, self.project, self.stack_name)
    }
}

impl fmt::Display for PulumiBackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stack_fqdn())
    }
}

/// Parse `org/project/stack`
pub fn parse_stack_fqdn(fqdn: &str) -> Result<PulumiBackendConfig> {
    let parts: Vec<&str> = fqdn.trim().split('/').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(ManifestError::Backend(format!(
            "invalid stack.fqdn format: expected 'organization/project/stack', got '{}'",
            fqdn
        )));
    }
    if parts.iter().any(|p| p.is_empty()) {
        return Err(ManifestError::Backend(format!(
            "stack FQDN components cannot be empty: '{}'",
            fqdn
        )));
    }
    Ok(PulumiBackendConfig::new(parts[0], parts[1], parts[2]))
}
