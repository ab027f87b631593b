use crate::StackArgs;
use crate::utils::{engine, render_program, resolve_backend};
use colored::Colorize;
use planton_cloud::{IacEngine, Operation, Plan, PlanSummary, StackRun};

pub async fn handle(args: &StackArgs, preview: bool, stack_fqdn: Option<&str>) -> anyhow::Result<()> {
    let (prepared, program) = render_program(args)?;
    let plan = Plan::from_program(&program);

    println!(
        "{} {}",
        prepared.kind.to_string().cyan().bold(),
        prepared.input.target.metadata.name
    );
    for action in &plan.actions {
        println!(
            "  {} {} {}",
            action.action_type.symbol().green(),
            action.resource_name,
            action.type_token.dimmed()
        );
    }
    println!();
    println!("Plan: {}", plan.summary());

    if !preview {
        return Ok(());
    }

    let backend = resolve_backend(&prepared.input, stack_fqdn)?;
    println!();
    println!("{} {}", "Previewing stack".blue(), backend.stack_fqdn().cyan());
    let run = StackRun {
        program: &program,
        stack_input_yaml: &prepared.stack_input_yaml,
        backend: &backend,
    };
    let output = engine()?.run(Operation::Preview, run, false).await?;
    print!("{}", output.stdout);
    if let Some(summary) = PlanSummary::from_preview_output(&output.stdout) {
        println!();
        println!("Preview: {}", summary.to_string().bold());
    }
    Ok(())
}
