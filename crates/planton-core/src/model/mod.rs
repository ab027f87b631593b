//! Manifest data model
//!
//! Every cloud resource is described by a Kubernetes-style document with
//! `apiVersion`, `kind`, `metadata` and a kind-specific `spec`.

mod manifest;
mod metadata;

pub use manifest::*;
pub use metadata::*;
