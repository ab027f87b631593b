//! GCP module error types

use planton_cloud::{CloudError, ValidationError};
use thiserror::Error;

/// GCP module errors
#[derive(Error, Debug)]
pub enum GcpModuleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid service account key: {0}")]
    ServiceAccountKey(String),
}

impl From<GcpModuleError> for CloudError {
    fn from(err: GcpModuleError) -> Self {
        match err {
            GcpModuleError::Validation(e) => CloudError::Validation(e),
            other => CloudError::Module(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GcpModuleError>;

pub(crate) fn invalid<T>(field: impl Into<String>, reason: impl Into<String>) -> Result<T> {
    Err(ValidationError::new(field, reason).into())
}
