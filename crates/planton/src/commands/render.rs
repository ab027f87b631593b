use crate::StackArgs;
use crate::utils::render_program;

/// Print the module's Pulumi YAML program
pub fn handle(args: &StackArgs) -> anyhow::Result<()> {
    let (_, program) = render_program(args)?;
    print!("{}", program.to_yaml()?);
    Ok(())
}
