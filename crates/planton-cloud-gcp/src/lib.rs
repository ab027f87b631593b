//! GCP modules for Planton
//!
//! - `GcpDnsZone`: Cloud DNS managed zone, record sets and DNS admin bindings
//! - `GcpGkeCluster`: private GKE cluster with its VPC, router and NAT
//!
//! With `gcpProviderConfig` in the stack input, the base64 service account
//! key is decoded into an explicit `pulumi:providers:gcp` resource. Without
//! it the ambient Google credentials of the `pulumi` process are used.

pub mod dns_zone;
pub mod error;
pub mod gke_cluster;
pub mod locals;

pub use dns_zone::DnsZoneModule;
pub use error::{GcpModuleError, Result};
pub use gke_cluster::GkeClusterModule;
pub use locals::{GCP_PROVIDER, Locals, decode_service_account_key};

use planton_cloud::ModuleCatalog;

/// Register every GCP module
pub fn register(catalog: &mut ModuleCatalog) {
    catalog.register(Box::new(DnsZoneModule));
    catalog.register(Box::new(GkeClusterModule));
}
