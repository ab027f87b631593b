//! Values shared by every resource a GCP module registers

use crate::error::GcpModuleError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use planton_cloud::{Program, Resource, secret, string_map};
use planton_registry::CloudResourceKind;
use planton_stackinput::{GcpProviderConfig, StackInput};
use std::collections::BTreeMap;

/// Logical name of the explicit GCP provider resource
pub const GCP_PROVIDER: &str = "gcp-provider";

pub struct Locals {
    pub name: String,
    pub provider: Option<String>,
    pub labels: BTreeMap<String, String>,
}

impl Locals {
    /// Register the provider (when configured) and compute labels
    ///
    /// `project` becomes the provider's default project.
    pub fn new(
        program: &mut Program,
        input: &StackInput,
        kind: CloudResourceKind,
        project: &str,
    ) -> planton_cloud::Result<Self> {
        let provider = match &input.gcp_provider_config {
            Some(config) => {
                let resource = provider_resource(config, project)?;
                Some(program.register(GCP_PROVIDER, resource)?)
            }
            None => {
                tracing::debug!("No gcpProviderConfig, using ambient Google credentials");
                None
            }
        };

        Ok(Self {
            name: input.target.metadata.name.clone(),
            provider,
            labels: planton_cloud::gcp_labels(&input.target, kind),
        })
    }

    pub fn resource(&self, type_token: &str) -> Resource {
        let resource = Resource::new(type_token);
        match &self.provider {
            Some(provider) => resource.provider(provider),
            None => resource,
        }
    }

    pub fn labels(&self) -> serde_json::Value {
        string_map(&self.labels)
    }
}

/// Decode the base64 service account key into the JSON the provider expects
pub fn decode_service_account_key(encoded: &str) -> Result<String, GcpModuleError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| GcpModuleError::ServiceAccountKey(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| GcpModuleError::ServiceAccountKey(e.to_string()))
}

fn provider_resource(config: &GcpProviderConfig, project: &str) -> Result<Resource, GcpModuleError> {
    let credentials = decode_service_account_key(&config.service_account_key_base64)?;
    Ok(Resource::new("pulumi:providers:gcp")
        .property("credentials", secret(credentials))
        .non_empty("project", project))
}
