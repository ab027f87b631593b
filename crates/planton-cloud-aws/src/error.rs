//! AWS module error types

use planton_cloud::{CloudError, ValidationError};
use thiserror::Error;

/// AWS module errors
#[derive(Error, Debug)]
pub enum AwsModuleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("conversion error from {from} to {to}: {reason}")]
    Conversion {
        from: &'static str,
        to: &'static str,
        reason: String,
    },
}

impl AwsModuleError {
    pub fn conversion(from: &'static str, to: &'static str, reason: impl Into<String>) -> Self {
        Self::Conversion {
            from,
            to,
            reason: reason.into(),
        }
    }
}

impl From<AwsModuleError> for CloudError {
    fn from(err: AwsModuleError) -> Self {
        match err {
            AwsModuleError::Validation(e) => CloudError::Validation(e),
            other => CloudError::Module(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AwsModuleError>;

/// Shorthand for a field validation failure
pub(crate) fn invalid<T>(field: impl Into<String>, reason: impl Into<String>) -> Result<T> {
    Err(ValidationError::new(field, reason).into())
}
