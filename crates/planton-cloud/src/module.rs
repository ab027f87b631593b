//! The IaC module trait

use crate::error::Result;
use crate::program::Program;
use planton_registry::CloudResourceKind;
use planton_stackinput::StackInput;

/// A per-kind IaC module
///
/// Every module is a pure mapping from a stack input to a program:
/// validate the typed spec, map enums to provider strings, register
/// resources and declare outputs.
pub trait ResourceModule: Send + Sync {
    /// The kind this module provisions
    fn kind(&self) -> CloudResourceKind;

    /// Check the spec without registering anything
    fn validate(&self, input: &StackInput) -> Result<()>;

    /// Build the program; callers go through [`ResourceModule::render`]
    fn program(&self, input: &StackInput) -> Result<Program>;

    /// Stack output keys this module may export
    fn output_keys(&self) -> &'static [&'static str];

    /// Validate, then build the program
    fn render(&self, input: &StackInput) -> Result<Program> {
        self.validate(input)?;
        let program = self.program(input)?;
        tracing::debug!(
            kind = %self.kind(),
            resources = program.resource_count(),
            "Rendered program"
        );
        Ok(program)
    }
}
