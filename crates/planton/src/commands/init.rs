use planton_registry::new_instance;

/// Print a manifest skeleton for `kind`
pub fn handle(kind: &str) -> anyhow::Result<()> {
    let kind = super::kind::resolve(kind)?;
    let manifest = new_instance(kind)?;
    print!("{}", manifest.to_yaml()?);
    Ok(())
}
