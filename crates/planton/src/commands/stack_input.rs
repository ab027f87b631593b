use crate::StackArgs;
use crate::utils::prepare_stack;

/// Print the assembled stack input YAML
pub fn handle(args: &StackArgs) -> anyhow::Result<()> {
    let prepared = prepare_stack(args)?;
    print!("{}", prepared.stack_input_yaml);
    Ok(())
}
