use crate::StackArgs;
use crate::utils::{engine, render_program, resolve_backend};
use colored::Colorize;
use planton_cloud::{IacEngine, Operation, StackRun};
use std::io::Write;

fn confirm(operation: Operation, stack: &str) -> anyhow::Result<bool> {
    print!("Run {} on stack {}? [y/N]: ", operation, stack);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Run `up`, `refresh` or `destroy` against the manifest's stack
pub async fn handle(
    operation: Operation,
    args: &StackArgs,
    stack_fqdn: Option<&str>,
    yes: bool,
) -> anyhow::Result<()> {
    let (prepared, program) = render_program(args)?;
    let backend = resolve_backend(&prepared.input, stack_fqdn)?;
    let stack = backend.stack_fqdn();

    // pulumi refuses to mutate a stack non-interactively without --yes
    if !yes && !confirm(operation, &stack)? {
        println!("{}", "Cancelled".yellow());
        return Ok(());
    }

    println!(
        "{} {} {}",
        format!("Running pulumi {}", operation).blue(),
        "on".blue(),
        stack.cyan()
    );
    let engine = engine()?;
    let run = StackRun {
        program: &program,
        stack_input_yaml: &prepared.stack_input_yaml,
        backend: &backend,
    };
    let output = engine.run(operation, run, true).await?;
    print!("{}", output.stdout);
    println!(
        "{}",
        format!("✓ pulumi {} finished in {}ms", operation, output.duration_ms)
            .green()
            .bold()
    );

    if operation == Operation::Up {
        let outputs = engine.stack_outputs(run).await?;
        if !outputs.is_empty() {
            println!();
            println!("Outputs:");
            for (key, value) in &outputs {
                let value = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                println!("  {}: {}", key.cyan(), value);
            }
        }
    }
    Ok(())
}
