use crate::utils::{catalog, manifest_path};
use colored::Colorize;
use planton_cloud::ModuleCatalog;
use planton_registry::resolve_manifest_kind;
use planton_stackinput::StackInput;
use std::path::{Path, PathBuf};

/// Load, resolve and validate one manifest
///
/// Kinds without a module only get the load and kind checks.
fn validate_file(catalog: &ModuleCatalog, path: &Path, overrides: &[String]) -> anyhow::Result<String> {
    let manifest = planton_core::load_manifest_with_overrides(path, overrides)?;
    let kind = resolve_manifest_kind(&manifest)?;

    match catalog.get(kind) {
        Some(module) => {
            module.validate(&StackInput::new(manifest))?;
            Ok(format!("{}", kind))
        }
        None => Ok(format!("{} (no module, spec not checked)", kind)),
    }
}

pub fn handle(manifest: Option<PathBuf>, overrides: &[String]) -> anyhow::Result<()> {
    let path = manifest_path(manifest)?;
    let files = if path.is_dir() {
        planton_core::discover_manifests(&path)?
    } else {
        vec![path.clone()]
    };
    if files.is_empty() {
        anyhow::bail!("no manifests found in {}", path.display());
    }

    println!("{}", "Validating manifests...".blue());
    let catalog = catalog();
    let mut failed = 0;
    for file in &files {
        match validate_file(&catalog, file, overrides) {
            Ok(summary) => {
                println!(
                    "{} {} {}",
                    "✓".green().bold(),
                    file.display().to_string().cyan(),
                    summary.dimmed()
                );
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}", "✗".red().bold(), file.display().to_string().cyan());
                eprintln!("  {:#}", e);
            }
        }
    }

    println!();
    if failed > 0 {
        anyhow::bail!("{} of {} manifests failed validation", failed, files.len());
    }
    println!("{}", format!("✓ {} manifests valid", files.len()).green().bold());
    Ok(())
}
