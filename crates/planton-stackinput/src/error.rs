use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StackInputError {
    #[error("failed to read provider config {path}: {message}")]
    ReadProviderConfig { path: PathBuf, message: String },

    #[error("stack input already contains key '{0}'")]
    DuplicateKey(String),

    #[error("stack input is missing {0}")]
    MissingProviderConfig(&'static str),

    #[error("environment variable {0} is not set")]
    MissingEnvVar(String),

    #[error("failed to write temporary provider config: {0}")]
    TempFile(String),

    #[error("manifest error: {0}")]
    Manifest(#[from] planton_core::ManifestError),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StackInputError>;
