use colored::Colorize;
use planton_registry::{
    CloudResourceKind, CloudResourceProvider, KIND_TABLE, api_version, closest_kind_names,
    kind_by_id_prefix, kind_from_string, kinds_for_provider, meta,
};

pub fn resolve(name: &str) -> anyhow::Result<CloudResourceKind> {
    let kind = kind_from_string(name);
    if kind != CloudResourceKind::Unspecified {
        return Ok(kind);
    }

    let suggestions = closest_kind_names(name);
    if suggestions.is_empty() {
        anyhow::bail!("unknown kind '{}'", name);
    }
    anyhow::bail!(
        "unknown kind '{}' (did you mean: {}?)",
        name,
        suggestions.join(", ")
    )
}

fn print_kind(kind: CloudResourceKind) -> anyhow::Result<()> {
    let meta = meta(kind)?;
    println!("{}", meta.name.cyan().bold());
    println!("  id prefix:   {}", meta.id_prefix);
    println!("  provider:    {}", meta.provider);
    println!("  version:     {}", meta.version);
    println!("  api version: {}", api_version(kind)?);
    if let Some(category) = meta.kubernetes_category {
        println!("  k8s type:    {}", category);
    }
    Ok(())
}

pub fn handle_get(name: &str) -> anyhow::Result<()> {
    print_kind(resolve(name)?)
}

pub fn handle_prefix(prefix: &str) -> anyhow::Result<()> {
    print_kind(kind_by_id_prefix(prefix)?)
}

pub fn handle_list(provider: Option<&str>) -> anyhow::Result<()> {
    let metas: Vec<_> = match provider {
        Some(p) => {
            let provider: CloudResourceProvider = p.parse().map_err(anyhow::Error::msg)?;
            kinds_for_provider(provider).collect()
        }
        None => KIND_TABLE.iter().collect(),
    };

    for meta in &metas {
        println!(
            "{} {:<10} {}",
            format!("{:<40}", meta.name).cyan(),
            meta.id_prefix,
            meta.provider.to_string().dimmed()
        );
    }
    println!();
    println!("{} kinds", metas.len());
    Ok(())
}
