//! Stack input assembly
//!
//! A stack input is the single YAML document an IaC module consumes:
//!
//! ```yaml
//! target:                 # the resource manifest
//!   apiVersion: ...
//!   kind: ...
//! awsProviderConfig:      # one key per supplied provider config
//!   accountId: ...
//! ```
//!
//! This crate builds that document from a manifest plus provider config
//! files, sources provider configs from the environment, and parses the
//! document back into typed form for modules.

pub mod builder;
pub mod env;
pub mod error;
pub mod options;
pub mod provider_config;
pub mod stack_input;
pub mod temp_files;
pub mod yaml;

pub use builder::{TARGET_KEY, build_stack_input_yaml};
pub use env::{PLACEHOLDER_AWS_ACCOUNT_ID, ProviderConfigs, build_options_from_configs};
pub use error::{Result, StackInputError};
pub use options::StackInputProviderConfigOptions;
pub use provider_config::*;
pub use stack_input::{STACK_INPUT_ENV, StackInput};
pub use temp_files::TempConfigFiles;
