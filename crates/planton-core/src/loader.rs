//! Manifest loading
//!
//! Reads manifest YAML from disk, applies `--set` overrides and discovers
//! manifests below a directory.

use crate::error::{ManifestError, Result};
use crate::model::Manifest;
use crate::overrides::apply_overrides;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Parse a manifest from YAML text
pub fn parse_manifest(content: &str) -> Result<Manifest> {
    let manifest: Manifest = serde_yaml::from_str(content)?;
    Ok(manifest)
}

/// Load a manifest file
#[instrument(fields(path = %path.display()))]
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    load_manifest_with_overrides(path, &[])
}

/// Load a manifest file and apply `key=value` overrides in order
#[instrument(skip(overrides), fields(path = %path.display(), overrides = overrides.len()))]
pub fn load_manifest_with_overrides(path: &Path, overrides: &[String]) -> Result<Manifest> {
    if !path.exists() {
        return Err(ManifestError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| ManifestError::IoError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(bytes = content.len(), "Read manifest file");

    if overrides.is_empty() {
        let manifest = parse_manifest(&content)?;
        info!(kind = %manifest.kind, name = %manifest.metadata.name, "Manifest loaded");
        return Ok(manifest);
    }

    // Overrides operate on the generic document so they can reach any spec field.
    let mut document: serde_json::Value = serde_yaml::from_str(&content)?;
    apply_overrides(&mut document, overrides)?;
    let manifest = Manifest::from_json_value(document)?;
    info!(
        kind = %manifest.kind,
        name = %manifest.metadata.name,
        "Manifest loaded with overrides"
    );
    Ok(manifest)
}

/// Find every `*.yaml` / `*.yml` file below `dir`, sorted by path
#[instrument(fields(dir = %dir.display()))]
pub fn discover_manifests(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for ext in ["yaml", "yml"] {
        let pattern = dir.join("**").join(format!("*.{}", ext));
        let pattern = pattern.to_string_lossy();
        let entries =
            glob::glob(&pattern).map_err(|e| ManifestError::Pattern(e.to_string()))?;
        for entry in entries.flatten() {
            if entry.is_file() {
                found.push(entry);
            }
        }
    }

    found.sort();
    found.dedup();
    debug!(count = found.len(), "Discovered manifest files");
    Ok(found)
}
