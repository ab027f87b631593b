pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_DIR_ENV: &str = "PLANTON_CONFIG_DIR";
pub const MANIFEST_ENV: &str = "PLANTON_MANIFEST";
const CONFIG_FILE: &str = "config.yaml";

/// Keys accepted by `planton config set|get`
pub const CONFIG_KEYS: [&str; 3] = ["backend-url", "pulumi-backend-url", "module-dir"];

/// User-level CLI settings stored in `config.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Control plane endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,

    /// Passed to `pulumi login`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pulumi_backend_url: Option<String>,

    /// Local checkout of IaC modules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_dir: Option<String>,
}

impl CliConfig {
    pub fn get(&self, key: &str) -> Result<Option<&str>> {
        let value = match key {
            "backend-url" => &self.backend_url,
            "pulumi-backend-url" => &self.pulumi_backend_url,
            "module-dir" => &self.module_dir,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        Ok(value.as_deref())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let slot = match key {
            "backend-url" => &mut self.backend_url,
            "pulumi-backend-url" => &mut self.pulumi_backend_url,
            "module-dir" => &mut self.module_dir,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        };
        *slot = Some(value.into());
        Ok(())
    }

    /// Set keys in [`CONFIG_KEYS`] order
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| match self.get(key) {
                Ok(Some(value)) => Some((*key, value)),
                _ => None,
            })
            .collect()
    }
}

/// planton config directory
///
/// `PLANTON_CONFIG_DIR` wins over `~/.config/planton`. Created if missing.
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()
            .ok_or(ConfigError::ConfigDirNotFound)?
            .join("planton"),
    };

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn config_file_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

/// Load `config.yaml`, or the default when the file does not exist
pub fn load_config() -> Result<CliConfig> {
    let path = config_file_path()?;
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let content = std::fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Ok(CliConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

pub fn save_config(config: &CliConfig) -> Result<()> {
    let path = config_file_path()?;
    std::fs::write(path, serde_yaml::to_string(config)?)?;
    Ok(())
}

pub fn set_value(key: &str, value: &str) -> Result<()> {
    let mut config = load_config()?;
    config.set(key, value)?;
    save_config(&config)
}

pub fn get_value(key: &str) -> Result<Option<String>> {
    let config = load_config()?;
    Ok(config.get(key)?.map(str::to_string))
}

pub fn list_values() -> Result<Vec<(String, String)>> {
    let config = load_config()?;
    Ok(config
        .entries()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect())
}

/// Find the manifest to operate on when none is given
///
/// Search order:
/// 1. `PLANTON_MANIFEST` environment variable
/// 2. current directory: manifest.yaml, manifest.yml
/// 3. ./.planton/manifest.yaml
pub fn find_manifest_file() -> Result<PathBuf> {
    if let Ok(manifest_path) = std::env::var(MANIFEST_ENV) {
        let path = PathBuf::from(manifest_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;
    for filename in ["manifest.yaml", "manifest.yml"] {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let path = current_dir.join(".planton").join("manifest.yaml");
    if path.exists() {
        return Ok(path);
    }

    Err(ConfigError::ManifestNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial]
    fn test_get_config_dir_from_env() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("nested").join("planton");

        temp_env::with_var(CONFIG_DIR_ENV, Some(&target), || {
            let config_dir = get_config_dir().unwrap();
            assert_eq!(config_dir, target);
            assert!(config_dir.exists());
        });
    }

    #[test]
    #[serial]
    fn test_load_config_defaults_when_missing() {
        let temp_dir = tempfile::tempdir().unwrap();

        temp_env::with_var(CONFIG_DIR_ENV, Some(temp_dir.path()), || {
            let config = load_config().unwrap();
            assert_eq!(config, CliConfig::default());
            assert!(list_values().unwrap().is_empty());
        });
    }

    #[test]
    #[serial]
    fn test_set_get_list_values() {
        let temp_dir = tempfile::tempdir().unwrap();

        temp_env::with_var(CONFIG_DIR_ENV, Some(temp_dir.path()), || {
            set_value("module-dir", "/opt/modules").unwrap();
            set_value("backend-url", "https://api.example.com").unwrap();

            assert_eq!(get_value("module-dir").unwrap().as_deref(), Some("/opt/modules"));
            assert_eq!(get_value("pulumi-backend-url").unwrap(), None);

            let values = list_values().unwrap();
            assert_eq!(
                values,
                vec![
                    ("backend-url".to_string(), "https://api.example.com".to_string()),
                    ("module-dir".to_string(), "/opt/modules".to_string()),
                ]
            );

            let saved = fs::read_to_string(temp_dir.path().join("config.yaml")).unwrap();
            assert!(saved.contains("moduleDir: /opt/modules"));
        });
    }

    #[test]
    #[serial]
    fn test_unknown_key() {
        let temp_dir = tempfile::tempdir().unwrap();

        temp_env::with_var(CONFIG_DIR_ENV, Some(temp_dir.path()), || {
            assert!(matches!(
                set_value("region", "us-east-1"),
                Err(ConfigError::UnknownKey(_))
            ));
            assert!(matches!(get_value("region"), Err(ConfigError::UnknownKey(_))));
        });
    }

    #[test]
    #[serial]
    fn test_find_manifest_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("manifest.yml"), "kind: AwsVpc").unwrap();
        fs::write(temp_dir.path().join("manifest.yaml"), "kind: AwsVpc").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset(MANIFEST_ENV, find_manifest_file).unwrap();
        assert!(result.ends_with("manifest.yaml"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_manifest_file_in_planton_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        let planton_dir = temp_dir.path().join(".planton");
        fs::create_dir(&planton_dir).unwrap();
        fs::write(planton_dir.join("manifest.yaml"), "kind: AwsVpc").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset(MANIFEST_ENV, find_manifest_file).unwrap();
        assert!(result.ends_with(".planton/manifest.yaml"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_find_manifest_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manifest_path = temp_dir.path().join("custom.yaml");
        fs::write(&manifest_path, "kind: AwsVpc").unwrap();

        let result = temp_env::with_var(MANIFEST_ENV, Some(&manifest_path), find_manifest_file);
        assert_eq!(result.unwrap(), manifest_path);
    }

    #[test]
    #[serial]
    fn test_find_manifest_file_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = temp_env::with_var_unset(MANIFEST_ENV, find_manifest_file);
        assert!(matches!(result, Err(ConfigError::ManifestNotFound)));

        std::env::set_current_dir(original_dir).unwrap();
    }
}
