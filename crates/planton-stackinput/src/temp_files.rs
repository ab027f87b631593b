use crate::error::{Result, StackInputError};
use crate::provider_config::ProviderConfigKind;
use crate::yaml::to_yaml_string;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Temporary provider config files; removed on drop
#[derive(Debug, Default)]
pub struct TempConfigFiles {
    files: Vec<NamedTempFile>,
}

impl TempConfigFiles {
    /// Serialize `config` into a new `<provider>-provider-config-*.yaml` file
    pub fn write<T: Serialize>(&mut self, kind: ProviderConfigKind, config: &T) -> Result<PathBuf> {
        let content = to_yaml_string(&serde_yaml::to_value(config)?)?;

        let mut file = tempfile::Builder::new()
            .prefix(&format!("{}-provider-config-", kind.as_str()))
            .suffix(".yaml")
            .tempfile()
            .map_err(|e| StackInputError::TempFile(e.to_string()))?;
        file.write_all(content.as_bytes())
            .map_err(|e| StackInputError::TempFile(e.to_string()))?;
        file.flush()?;

        let path = file.path().to_path_buf();
        self.files.push(file);
        Ok(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
