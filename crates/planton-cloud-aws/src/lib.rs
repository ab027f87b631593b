//! AWS modules for Planton
//!
//! Each module maps one AWS kind to a Pulumi YAML program.
//!
//! # Kinds
//!
//! - `AwsDynamodb`: table, indexes, streams, TTL, SSE and autoscaling
//! - `AwsRdsCluster`: cluster, security group, subnet and parameter groups
//! - `AwsEcsCluster`: Fargate cluster and capacity providers
//! - `AwsEcsService`: Fargate task definition, service and ALB routing
//! - `AwsSecurityGroup`: security group with inline rules
//!
//! # Credentials
//!
//! With `awsProviderConfig` in the stack input, every resource is bound to an
//! explicit `pulumi:providers:aws` resource whose keys are marked secret.
//! Without it the ambient AWS credentials of the `pulumi` process are used.
//!
//! # Example
//!
//! ```ignore
//! use planton_cloud::{ModuleCatalog, ResourceModule};
//! use planton_stackinput::StackInput;
//!
//! let mut catalog = ModuleCatalog::new();
//! planton_cloud_aws::register(&mut catalog);
//!
//! let input = StackInput::from_yaml(&yaml)?;
//! let kind = planton_registry::resolve_manifest_kind(&input.target)?;
//! let program = catalog.require(kind)?.render(&input)?;
//! println!("{}", program.to_yaml()?);
//! ```

pub mod dynamodb;
pub mod ecs_cluster;
pub mod ecs_service;
pub mod error;
pub mod locals;
pub mod rds_cluster;
pub mod security_group;

pub use dynamodb::DynamodbModule;
pub use ecs_cluster::EcsClusterModule;
pub use ecs_service::EcsServiceModule;
pub use error::{AwsModuleError, Result};
pub use locals::{AWS_PROVIDER, Locals};
pub use rds_cluster::RdsClusterModule;
pub use security_group::SecurityGroupModule;

use planton_cloud::ModuleCatalog;

/// Register every AWS module
pub fn register(catalog: &mut ModuleCatalog) {
    catalog.register(Box::new(DynamodbModule));
    catalog.register(Box::new(EcsClusterModule));
    catalog.register(Box::new(EcsServiceModule));
    catalog.register(Box::new(RdsClusterModule));
    catalog.register(Box::new(SecurityGroupModule));
}
