use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest: {path}\nreason: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("manifest not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid manifest YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON conversion error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("spec of {kind} does not match its schema: {source}")]
    InvalidSpec {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid override '{expr}': {reason}")]
    InvalidOverride { expr: String, reason: String },

    #[error("invalid Pulumi backend configuration: {0}")]
    Backend(String),

    #[error("invalid discovery pattern: {0}")]
    Pattern(String),
}

pub type Result<T> = std::result::Result<T, ManifestError>;
