//! Pulumi YAML program model
//!
//! Modules register resources, invokes and outputs into a [`Program`],
//! which renders to a `runtime: yaml` project file:
//!
//! ```yaml
//! name: orders
//! runtime: yaml
//! variables:
//!   subnet:
//!     fn::invoke:
//!       function: aws:ec2:getSubnet
//!       arguments:
//!         id: subnet-1
//! resources:
//!   table:
//!     type: aws:dynamodb:Table
//!     properties: { ... }
//!     options:
//!       provider: ${aws-provider}
//! outputs:
//!   TableArn: ${table.arn}
//! ```

use crate::error::{CloudError, Result};
use planton_core::Manifest;
use serde::Serialize;
use serde_json::{Map, Value};
use serde_yaml::Mapping;
use std::collections::BTreeMap;

/// `${name}`: a reference to a whole resource or variable
pub fn resource_ref(name: &str) -> String {
    format!("${{{}}}", name)
}

/// `${name.attr}`: a reference to one resource property
pub fn output_ref(name: &str, attr: &str) -> String {
    format!("${{{}.{}}}", name, attr)
}

/// Mark a value as secret in the rendered program
pub fn secret(value: impl Into<Value>) -> Value {
    let mut map = Map::new();
    map.insert("fn::secret".to_string(), value.into());
    Value::Object(map)
}

/// A string map (tags, labels) as a property value
pub fn string_map(map: &BTreeMap<String, String>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::from(v.clone())))
            .collect(),
    )
}

/// Options shared by every resource
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl ResourceOptions {
    pub fn is_empty(&self) -> bool {
        self.provider.is_none() && self.parent.is_none() && self.depends_on.is_empty()
    }
}

/// One resource registration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    /// Type token, e.g. `aws:dynamodb:Table`
    #[serde(rename = "type")]
    pub type_token: String,

    #[serde(skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,

    #[serde(skip_serializing_if = "ResourceOptions::is_empty")]
    pub options: ResourceOptions,
}

impl Resource {
    pub fn new(type_token: impl Into<String>) -> Self {
        Self {
            type_token: type_token.into(),
            properties: Map::new(),
            options: ResourceOptions::default(),
        }
    }

    pub fn property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Set the property only when a value is present
    pub fn optional(mut self, key: &str, value: Option<impl Into<Value>>) -> Self {
        if let Some(value) = value {
            self.properties.insert(key.to_string(), value.into());
        }
        self
    }

    /// Set the property only when the string is non-empty
    pub fn non_empty(self, key: &str, value: &str) -> Self {
        let value = (!value.is_empty()).then(|| value.to_string());
        self.optional(key, value)
    }

    /// Use the named provider resource
    pub fn provider(mut self, provider: &str) -> Self {
        self.options.provider = Some(resource_ref(provider));
        self
    }

    pub fn parent(mut self, parent: &str) -> Self {
        self.options.parent = Some(resource_ref(parent));
        self
    }

    pub fn depends_on(mut self, name: &str) -> Self {
        self.options.depends_on.push(resource_ref(name));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Whether this is an explicit provider resource (`pulumi:providers:*`)
    pub fn is_provider(&self) -> bool {
        self.type_token.starts_with("pulumi:providers:")
    }
}

/// A `fn::invoke` data-source lookup bound to a variable
#[derive(Debug, Clone, PartialEq)]
pub struct Invoke {
    pub function: String,
    pub arguments: Map<String, Value>,
    /// Single field to extract from the result
    pub return_field: Option<String>,
    pub provider: Option<String>,
}

impl Invoke {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            arguments: Map::new(),
            return_field: None,
            provider: None,
        }
    }

    pub fn argument(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.to_string(), value.into());
        self
    }

    pub fn returning(mut self, field: &str) -> Self {
        self.return_field = Some(field.to_string());
        self
    }

    pub fn provider(mut self, provider: &str) -> Self {
        self.provider = Some(resource_ref(provider));
        self
    }

    fn to_value(&self) -> Value {
        let mut invoke = Map::new();
        invoke.insert("function".to_string(), Value::from(self.function.clone()));
        if !self.arguments.is_empty() {
            invoke.insert(
                "arguments".to_string(),
                Value::Object(self.arguments.clone()),
            );
        }
        if let Some(field) = &self.return_field {
            invoke.insert("return".to_string(), Value::from(field.clone()));
        }
        if let Some(provider) = &self.provider {
            let mut options = Map::new();
            options.insert("provider".to_string(), Value::from(provider.clone()));
            invoke.insert("options".to_string(), Value::Object(options));
        }

        let mut wrapper = Map::new();
        wrapper.insert("fn::invoke".to_string(), Value::Object(invoke));
        Value::Object(wrapper)
    }
}

/// A Pulumi YAML program
///
/// Resources, variables and outputs keep their registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub name: String,
    pub description: Option<String>,
    variables: Vec<(String, Invoke)>,
    resources: Vec<(String, Resource)>,
    outputs: Vec<(String, Value)>,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A program named after the manifest, described by its kind
    pub fn for_manifest(manifest: &Manifest) -> Self {
        Self::new(manifest.metadata.name.clone()).with_description(manifest.kind.clone())
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Register a resource, returning its logical name
    pub fn register(&mut self, name: impl Into<String>, resource: Resource) -> Result<String> {
        let name = name.into();
        if self.contains(&name) {
            return Err(CloudError::DuplicateResource(name));
        }
        tracing::debug!(name = %name, type_token = %resource.type_token, "Registered resource");
        self.resources.push((name.clone(), resource));
        Ok(name)
    }

    /// Bind an invoke to a variable, returning `${name}`
    pub fn invoke(&mut self, name: impl Into<String>, invoke: Invoke) -> Result<String> {
        let name = name.into();
        if self.contains(&name) {
            return Err(CloudError::DuplicateResource(name));
        }
        let reference = resource_ref(&name);
        self.variables.push((name, invoke));
        Ok(reference)
    }

    /// Declare a stack output; a later value for the same key replaces the earlier
    pub fn export(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.outputs.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.outputs.push((key, value)),
        }
    }

    fn contains(&self, name: &str) -> bool {
        self.resources.iter().any(|(n, _)| n == name)
            || self.variables.iter().any(|(n, _)| n == name)
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    pub fn resources(&self) -> impl Iterator<Item = (&str, &Resource)> {
        self.resources.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn resources_of_type<'a>(
        &'a self,
        type_token: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a Resource)> {
        self.resources().filter(move |(_, r)| r.type_token == type_token)
    }

    pub fn variable(&self, name: &str) -> Option<&Invoke> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn output(&self, key: &str) -> Option<&Value> {
        self.outputs.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn output_keys(&self) -> Vec<&str> {
        self.outputs.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Render as a `Pulumi.yaml` document
    pub fn to_yaml(&self) -> Result<String> {
        let mut doc = Mapping::new();
        doc.insert("name".into(), self.name.clone().into());
        doc.insert("runtime".into(), "yaml".into());
        if let Some(description) = &self.description {
            doc.insert("description".into(), description.clone().into());
        }

        if !self.variables.is_empty() {
            let mut variables = Mapping::new();
            for (name, invoke) in &self.variables {
                variables.insert(name.clone().into(), serde_yaml::to_value(invoke.to_value())?);
            }
            doc.insert("variables".into(), variables.into());
        }

        if !self.resources.is_empty() {
            let mut resources = Mapping::new();
            for (name, resource) in &self.resources {
                resources.insert(name.clone().into(), serde_yaml::to_value(resource)?);
            }
            doc.insert("resources".into(), resources.into());
        }

        if !self.outputs.is_empty() {
            let mut outputs = Mapping::new();
            for (key, value) in &self.outputs {
                outputs.insert(key.clone().into(), serde_yaml::to_value(value)?);
            }
            doc.insert("outputs".into(), outputs.into());
        }

        Ok(serde_yaml::to_string(&doc)?)
    }
}
