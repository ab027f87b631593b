use crate::error::{Result, StackInputError};
use crate::options::StackInputProviderConfigOptions;
use crate::yaml::to_yaml_string;
use planton_core::Manifest;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::{debug, instrument};

pub const TARGET_KEY: &str = "target";

/// Assemble the stack input document handed to an IaC module
///
/// The manifest lands under `target`; each supplied provider config file
/// lands under its `<provider>ProviderConfig` key.
#[instrument(skip_all, fields(kind = %manifest.kind))]
pub fn build_stack_input_yaml(
    manifest: &Manifest,
    options: &StackInputProviderConfigOptions,
) -> Result<String> {
    let mut document = Mapping::new();
    document.insert(
        Value::String(TARGET_KEY.to_string()),
        serde_yaml::to_value(manifest)?,
    );

    for (kind, path) in options.iter() {
        let key = kind.stack_input_key();
        let config = read_provider_config(path)?;
        insert_unique(&mut document, key, config)?;
        debug!(provider = %kind, path = %path.display(), "Added provider config");
    }

    to_yaml_string(&Value::Mapping(document))
}

fn read_provider_config(path: &Path) -> Result<Value> {
    let content =
        std::fs::read_to_string(path).map_err(|e| StackInputError::ReadProviderConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let value: Value = serde_yaml::from_str(&content)?;
    Ok(match value {
        Value::Null => Value::Mapping(Mapping::new()),
        other => other,
    })
}

fn insert_unique(document: &mut Mapping, key: &str, value: Value) -> Result<()> {
    if document.contains_key(key) {
        return Err(StackInputError::DuplicateKey(key.to_string()));
    }
    document.insert(Value::String(key.to_string()), value);
    Ok(())
}
