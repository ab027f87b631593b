use colored::Colorize;

pub fn handle_set(key: &str, value: &str) -> anyhow::Result<()> {
    planton_config::set_value(key, value)?;
    println!("{} {} = {}", "✓".green().bold(), key.cyan(), value);
    Ok(())
}

pub fn handle_get(key: &str) -> anyhow::Result<()> {
    match planton_config::get_value(key)? {
        Some(value) => println!("{}", value),
        None => println!("{}", "(not set)".dimmed()),
    }
    Ok(())
}

pub fn handle_list() -> anyhow::Result<()> {
    let values = planton_config::list_values()?;
    if values.is_empty() {
        println!("{}", "No config values set".dimmed());
        println!(
            "  {}",
            format!("supported keys: {}", planton_config::CONFIG_KEYS.join(", ")).dimmed()
        );
        return Ok(());
    }
    for (key, value) in values {
        println!("{} = {}", key.cyan(), value);
    }
    Ok(())
}
