use crate::error::{RegistryError, Result};
use crate::kind::{CloudResourceKind, KIND_TABLE};
use crate::lookup::{kind_from_string, normalize};
use planton_core::Manifest;
use tracing::warn;

const MAX_SUGGESTIONS: usize = 3;

/// Resolve the kind of a loaded manifest
///
/// Unknown kinds fail with the closest known names attached.
pub fn resolve_manifest_kind(manifest: &Manifest) -> Result<CloudResourceKind> {
    let kind = kind_from_string(&manifest.kind);
    if kind != CloudResourceKind::Unspecified {
        return Ok(kind);
    }

    warn!(kind = %manifest.kind, "Unsupported cloud resource kind");
    Err(RegistryError::UnsupportedManifestKind {
        kind: manifest.kind.clone(),
        suggestions: closest_kind_names(&manifest.kind),
    })
}

/// Known kind names nearest to `input` by edit distance on normalized forms
pub fn closest_kind_names(input: &str) -> Vec<&'static str> {
    let target = normalize(input);
    if target.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(usize, &'static str)> = KIND_TABLE
        .iter()
        .map(|meta| (edit_distance(&target, &normalize(meta.name)), meta.name))
        .filter(|(distance, _)| *distance <= target.len().max(3) / 2)
        .collect();
    scored.sort();
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, name)| name)
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
