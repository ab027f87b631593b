use crate::StackArgs;
use anyhow::Context;
use planton_cloud::{ModuleCatalog, Program, PulumiEngine};
use planton_core::{PulumiBackendConfig, parse_stack_fqdn};
use planton_registry::{CloudResourceKind, resolve_manifest_kind};
use planton_stackinput::{
    ProviderConfigKind, ProviderConfigs, StackInput, StackInputProviderConfigOptions,
    build_options_from_configs, build_stack_input_yaml,
};
use std::path::PathBuf;
use tracing::debug;

/// Every module compiled into the binary
pub fn catalog() -> ModuleCatalog {
    let mut catalog = ModuleCatalog::new();
    planton_cloud_aws::register(&mut catalog);
    planton_cloud_gcp::register(&mut catalog);
    catalog
}

/// The explicit `-f` path, or the discovered default manifest
pub fn manifest_path(explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(planton_config::find_manifest_file()?),
    }
}

/// A manifest turned into its stack input
pub struct PreparedStack {
    pub stack_input_yaml: String,
    pub input: StackInput,
    pub kind: CloudResourceKind,
}

/// Provider config files from flags, then `--input-dir`
///
/// Explicit flags win over files found in the input directory.
pub fn provider_options(args: &StackArgs) -> StackInputProviderConfigOptions {
    let mut options = StackInputProviderConfigOptions::new();
    let flags = [
        (ProviderConfigKind::Aws, &args.aws_provider_config),
        (ProviderConfigKind::Gcp, &args.gcp_provider_config),
        (ProviderConfigKind::Azure, &args.azure_provider_config),
        (ProviderConfigKind::Kubernetes, &args.kubernetes_provider_config),
    ];
    for (kind, path) in flags {
        if let Some(path) = path {
            options.set(kind, path);
        }
    }

    match &args.input_dir {
        Some(dir) => options.merge(&StackInputProviderConfigOptions::from_input_dir(dir)),
        None => options,
    }
}

/// Load the manifest and assemble its stack input
///
/// With `--from-env`, provider configs sourced from the environment fill
/// whatever the flags and input directory left unset.
pub fn prepare_stack(args: &StackArgs) -> anyhow::Result<PreparedStack> {
    let path = manifest_path(args.manifest.clone())?;
    let manifest = planton_core::load_manifest_with_overrides(&path, &args.overrides)
        .with_context(|| format!("failed to load manifest {}", path.display()))?;
    let kind = resolve_manifest_kind(&manifest)?;
    debug!(kind = %kind, path = %path.display(), "Resolved manifest kind");

    let options = provider_options(args);
    let stack_input_yaml = if args.from_env {
        let configs = ProviderConfigs::from_env()?;
        // The temp files must outlive the build below.
        let (env_options, _files) = build_options_from_configs(&configs)?;
        build_stack_input_yaml(&manifest, &options.merge(&env_options))?
    } else {
        build_stack_input_yaml(&manifest, &options)?
    };

    let input = StackInput::from_yaml(&stack_input_yaml)?;
    Ok(PreparedStack {
        stack_input_yaml,
        input,
        kind,
    })
}

/// Validate and render the manifest's program
pub fn render_program(args: &StackArgs) -> anyhow::Result<(PreparedStack, Program)> {
    let prepared = prepare_stack(args)?;
    let catalog = catalog();
    let module = catalog.require(prepared.kind)?;
    let program = module.render(&prepared.input)?;
    Ok((prepared, program))
}

/// `--stack` when given, otherwise the manifest's backend labels
pub fn resolve_backend(
    input: &StackInput,
    stack_fqdn: Option<&str>,
) -> anyhow::Result<PulumiBackendConfig> {
    let backend = match stack_fqdn {
        Some(fqdn) => parse_stack_fqdn(fqdn)?,
        None => PulumiBackendConfig::from_manifest(&input.target)
            .context("pass --stack or set the Pulumi backend labels on the manifest")?,
    };
    Ok(backend)
}

/// Pulumi engine honoring the configured backend url
pub fn engine() -> anyhow::Result<PulumiEngine> {
    let config = planton_config::load_config()?;
    let engine = PulumiEngine::new();
    Ok(match config.pulumi_backend_url {
        Some(url) if !url.is_empty() => engine.with_backend_url(url),
        _ => engine,
    })
}
