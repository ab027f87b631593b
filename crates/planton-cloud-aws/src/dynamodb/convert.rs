//! Spec enums to the strings the AWS provider expects

use super::spec::{
    AttributeType, BillingMode, KeyType, ProjectionType, SseType, StreamViewType, TableClass,
};
use crate::error::{AwsModuleError, Result};

fn unspecified(from: &'static str) -> AwsModuleError {
    AwsModuleError::conversion(from, "aws string", "value is unspecified")
}

pub fn attribute_type(value: AttributeType) -> Result<&'static str> {
    match value {
        AttributeType::String => Ok("S"),
        AttributeType::Number => Ok("N"),
        AttributeType::Binary => Ok("B"),
        AttributeType::Unspecified => Err(unspecified("AttributeType")),
    }
}

pub fn key_type(value: KeyType) -> Result<&'static str> {
    match value {
        KeyType::Hash => Ok("HASH"),
        KeyType::Range => Ok("RANGE"),
        KeyType::Unspecified => Err(unspecified("KeyType")),
    }
}

pub fn billing_mode(value: BillingMode) -> Result<&'static str> {
    match value {
        BillingMode::Provisioned => Ok("PROVISIONED"),
        BillingMode::PayPerRequest => Ok("PAY_PER_REQUEST"),
        BillingMode::Unspecified => Err(unspecified("BillingMode")),
    }
}

pub fn projection_type(value: ProjectionType) -> Result<&'static str> {
    match value {
        ProjectionType::All => Ok("ALL"),
        ProjectionType::KeysOnly => Ok("KEYS_ONLY"),
        ProjectionType::Include => Ok("INCLUDE"),
        ProjectionType::Unspecified => Err(unspecified("ProjectionType")),
    }
}

pub fn stream_view_type(value: StreamViewType) -> Result<&'static str> {
    match value {
        StreamViewType::NewImage => Ok("NEW_IMAGE"),
        StreamViewType::OldImage => Ok("OLD_IMAGE"),
        StreamViewType::NewAndOldImages => Ok("NEW_AND_OLD_IMAGES"),
        StreamViewType::KeysOnly => Ok("KEYS_ONLY"),
        StreamViewType::Unspecified => Err(unspecified("StreamViewType")),
    }
}

pub fn sse_type(value: SseType) -> Result<&'static str> {
    match value {
        SseType::Aes256 => Ok("AES256"),
        SseType::Kms => Ok("KMS"),
        SseType::Unspecified => Err(unspecified("SseType")),
    }
}

/// `None` leaves the provider default in place
pub fn table_class(value: TableClass) -> Option<&'static str> {
    match value {
        TableClass::Standard => Some("STANDARD"),
        TableClass::StandardInfrequentAccess => Some("STANDARD_INFREQUENT_ACCESS"),
        TableClass::Unspecified => None,
    }
}
