//! planton-core
//!
//! Manifest model shared by every planton crate: the Kubernetes-style
//! resource document, its loader, `--set` overrides and the Pulumi backend
//! coordinates carried in its labels.

pub mod backend;
pub mod error;
pub mod loader;
pub mod model;
pub mod overrides;

pub use backend::{PulumiBackendConfig, parse_stack_fqdn};
pub use error::{ManifestError, Result};
pub use loader::{discover_manifests, load_manifest, load_manifest_with_overrides, parse_manifest};
pub use model::{Manifest, Metadata};
pub use overrides::{apply_overrides, parse_override};
