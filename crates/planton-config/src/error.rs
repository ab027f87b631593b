use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config directory not found")]
    ConfigDirNotFound,

    #[error(
        "manifest file not found. Looked in:\n\
        - PLANTON_MANIFEST environment variable\n\
        - current directory: manifest.yaml, manifest.yml\n\
        - ./.planton/manifest.yaml\n\
        Pass one explicitly with -f/--manifest"
    )]
    ManifestNotFound,

    #[error("unknown config key '{0}' (supported: backend-url, pulumi-backend-url, module-dir)")]
    UnknownKey(String),

    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
