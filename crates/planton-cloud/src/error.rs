//! IaC module error types

use planton_registry::CloudResourceKind;
use std::fmt;
use thiserror::Error;

/// A malformed or contradictory spec field
///
/// Raised before any resource is registered in a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// An error that is not tied to a single field
    pub fn general(reason: impl Into<String>) -> Self {
        Self::new("", reason)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "validation error: {}", self.reason)
        } else {
            write!(f, "validation error on {:?}: {}", self.field, self.reason)
        }
    }
}

impl std::error::Error for ValidationError {}

/// IaC module and engine errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Module error: {0}")]
    Module(String),

    #[error("No IaC module registered for kind: {0}")]
    ModuleNotFound(CloudResourceKind),

    #[error("Duplicate resource name in program: {0}")]
    DuplicateResource(String),

    #[error("pulumi CLI not found on PATH")]
    PulumiNotFound,

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("pulumi {operation} failed: {message}")]
    Engine { operation: String, message: String },

    #[error(transparent)]
    StackInput(#[from] planton_stackinput::StackInputError),

    #[error(transparent)]
    Manifest(#[from] planton_core::ManifestError),

    #[error(transparent)]
    Registry(#[from] planton_registry::RegistryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
