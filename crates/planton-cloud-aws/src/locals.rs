//! Values shared by every resource a module registers

use planton_cloud::{Invoke, Program, Resource, secret, string_map};
use planton_registry::CloudResourceKind;
use planton_stackinput::{AwsProviderConfig, StackInput};
use std::collections::BTreeMap;

/// Logical name of the explicit AWS provider resource
pub const AWS_PROVIDER: &str = "aws-provider";

pub struct Locals {
    /// `metadata.name` of the target manifest
    pub name: String,
    /// Set when the stack input carries `awsProviderConfig`
    pub provider: Option<String>,
    pub tags: BTreeMap<String, String>,
}

impl Locals {
    /// Register the provider (when configured) and compute tags
    pub fn new(
        program: &mut Program,
        input: &StackInput,
        kind: CloudResourceKind,
    ) -> planton_cloud::Result<Self> {
        let provider = match &input.aws_provider_config {
            Some(config) => Some(program.register(AWS_PROVIDER, provider_resource(config))?),
            None => {
                tracing::debug!("No awsProviderConfig, using ambient AWS credentials");
                None
            }
        };

        Ok(Self {
            name: input.target.metadata.name.clone(),
            provider,
            tags: planton_cloud::aws_tags(&input.target, kind),
        })
    }

    /// A resource bound to this module's provider
    pub fn resource(&self, type_token: &str) -> Resource {
        let resource = Resource::new(type_token);
        match &self.provider {
            Some(provider) => resource.provider(provider),
            None => resource,
        }
    }

    /// An invoke bound to this module's provider
    pub fn invoke(&self, function: &str) -> Invoke {
        let invoke = Invoke::new(function);
        match &self.provider {
            Some(provider) => invoke.provider(provider),
            None => invoke,
        }
    }

    /// Standard tags merged with user tags; user tags win
    pub fn tags_with(&self, extra: &BTreeMap<String, String>) -> serde_json::Value {
        let mut tags = self.tags.clone();
        tags.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        string_map(&tags)
    }

    pub fn tags(&self) -> serde_json::Value {
        string_map(&self.tags)
    }
}

fn provider_resource(config: &AwsProviderConfig) -> Resource {
    Resource::new("pulumi:providers:aws")
        .property("region", config.region.clone())
        .property("accessKey", secret(config.access_key_id.clone()))
        .property("secretKey", secret(config.secret_access_key.clone()))
        .optional(
            "token",
            (!config.session_token.is_empty()).then(|| secret(config.session_token.clone())),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use planton_core::{Manifest, Metadata};

    fn input(with_config: bool) -> StackInput {
        let input = StackInput::new(Manifest {
            kind: "AwsSecurityGroup".to_string(),
            metadata: Metadata::named("web"),
            ..Default::default()
        });
        if with_config {
            input.with_aws(AwsProviderConfig {
                region: "eu-west-1".to_string(),
                access_key_id: "AKIA".to_string(),
                secret_access_key: "secret".to_string(),
                ..Default::default()
            })
        } else {
            input
        }
    }

    #[test]
    fn test_provider_registered_from_config() {
        let mut program = Program::new("web");
        let locals =
            Locals::new(&mut program, &input(true), CloudResourceKind::AwsSecurityGroup).unwrap();

        let provider = program.resource(AWS_PROVIDER).unwrap();
        assert_eq!(provider.get("region"), Some(&serde_json::json!("eu-west-1")));
        assert_eq!(
            provider.get("secretKey"),
            Some(&serde_json::json!({ "fn::secret": "secret" }))
        );
        assert!(provider.get("token").is_none());

        let sg = locals.resource("aws:ec2:SecurityGroup");
        assert_eq!(sg.options.provider.as_deref(), Some("${aws-provider}"));
    }

    #[test]
    fn test_ambient_credentials_without_config() {
        let mut program = Program::new("web");
        let locals =
            Locals::new(&mut program, &input(false), CloudResourceKind::AwsSecurityGroup).unwrap();
        assert_eq!(program.resource_count(), 0);
        assert!(locals.resource("aws:ec2:SecurityGroup").options.provider.is_none());
        assert_eq!(locals.name, "web");
    }

    #[test]
    fn test_user_tags_win() {
        let mut program = Program::new("web");
        let locals =
            Locals::new(&mut program, &input(false), CloudResourceKind::AwsSecurityGroup).unwrap();
        let extra = BTreeMap::from([(
            planton_cloud::labels::RESOURCE_TAG.to_string(),
            "custom".to_string(),
        )]);
        assert_eq!(
            locals.tags_with(&extra)[planton_cloud::labels::RESOURCE_TAG],
            "custom"
        );
    }
}
