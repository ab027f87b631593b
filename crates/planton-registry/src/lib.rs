//! Cloud resource kind registry
//!
//! Maps every `CloudResourceKind` to its ID prefix, owning provider,
//! version and Kubernetes category, and resolves loosely written kind
//! names. The table is compiled into the binary and is read-only.

pub mod error;
pub mod kind;
pub mod lookup;
pub mod provider;
pub mod resolve;
pub mod template;

pub use error::{RegistryError, Result};
pub use kind::{CloudResourceKind, CloudResourceKindMeta, KIND_TABLE};
pub use lookup::{
    KIND_ALIASES, all_kinds, api_version, kind_by_id_prefix, kind_by_kind_name, kind_from_string,
    kinds_for_provider, kubernetes_resource_type, meta, provider,
};
pub use provider::{CloudResourceProvider, KubernetesResourceType};
pub use resolve::{closest_kind_names, resolve_manifest_kind};
pub use template::{extract_kind_from_yaml, new_instance};
