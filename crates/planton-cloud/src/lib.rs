//! Planton IaC modules
//!
//! This crate defines the module abstraction every provisioned kind
//! implements and the engine that runs the resulting programs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                   planton CLI                    │
//! │          (render / plan / apply / destroy)       │
//! └─────────────────┬───────────────────────────────┘
//!                   │ StackInput
//! ┌─────────────────▼───────────────────────────────┐
//! │                 planton-cloud                    │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  trait ResourceModule { validate, ... }   │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │   Program    │  │ PulumiEngine │            │
//! │  │ (YAML model) │  │ (pulumi CLI) │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │  cloud-aws    │ │   cloud-gcp   │
//! │   modules     │ │    modules    │
//! └───────────────┘ └───────────────┘
//! ```

pub mod action;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod labels;
pub mod module;
pub mod program;

// Re-exports
pub use action::{Action, ActionType, Plan, PlanSummary};
pub use catalog::ModuleCatalog;
pub use engine::{EngineOutput, IacEngine, Operation, PulumiEngine, StackRun, run_succeeded};
pub use error::{CloudError, Result, ValidationError};
pub use labels::{aws_tags, gcp_labels};
pub use module::ResourceModule;
pub use program::{
    Invoke, Program, Resource, ResourceOptions, output_ref, resource_ref, secret,
    string_map,
};
