mod commands;
mod utils;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "planton")]
#[command(about = "Render, plan and apply cloud resource manifests", long_about = None)]
struct Cli {
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up cloud resource kinds
    #[command(subcommand)]
    Kind(KindCommands),
    /// Print an empty manifest for a kind
    Init {
        /// Kind name (e.g. AwsDynamodb, aws-dynamodb)
        kind: String,
    },
    /// Validate a manifest, or every manifest below a directory
    Validate {
        /// Manifest file or directory
        #[arg(short = 'f', long = "manifest", env = "PLANTON_MANIFEST")]
        manifest: Option<PathBuf>,
        /// Override a manifest field (e.g. spec.tableName=orders)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
    /// Print the stack input for a manifest
    StackInput(StackArgs),
    /// Print the Pulumi YAML program for a manifest
    Render(StackArgs),
    /// Summarize the resources a manifest provisions
    Plan {
        #[command(flatten)]
        stack: StackArgs,
        /// Also run `pulumi preview` against the stack
        #[arg(long)]
        preview: bool,
        /// Pulumi stack (org/project/stack); read from manifest labels when omitted
        #[arg(long = "stack", value_name = "FQDN", env = "PLANTON_STACK")]
        stack_fqdn: Option<String>,
    },
    /// Create or update the stack's resources
    Apply(EngineArgs),
    /// Refresh the stack state from the cloud
    Refresh(EngineArgs),
    /// Delete the stack's resources
    Destroy(EngineArgs),
    /// Read and write CLI settings
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Show version
    Version,
}

#[derive(Subcommand)]
enum KindCommands {
    /// Show one kind
    Get {
        /// Kind name, any casing
        name: String,
    },
    /// List kinds
    List {
        /// Only kinds of this provider (aws, gcp, kubernetes, ...)
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Find the kind owning an id prefix
    Prefix {
        /// Id prefix (e.g. ddb)
        prefix: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set a value
    Set { key: String, value: String },
    /// Print a value
    Get { key: String },
    /// Print every value that is set
    List,
}

/// Manifest and provider config selection shared by stack commands
#[derive(Args, Debug, Default)]
pub struct StackArgs {
    /// Manifest file (defaults to ./manifest.yaml)
    #[arg(short = 'f', long = "manifest", env = "PLANTON_MANIFEST")]
    pub manifest: Option<PathBuf>,
    /// Override a manifest field (e.g. spec.tableName=orders)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
    /// Directory holding <provider>-provider-config.yaml files
    #[arg(long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    pub aws_provider_config: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    pub gcp_provider_config: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    pub azure_provider_config: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    pub kubernetes_provider_config: Option<PathBuf>,
    /// Build provider configs from AWS_*, GOOGLE_* and ARM_* variables
    #[arg(long)]
    pub from_env: bool,
}

#[derive(Args)]
struct EngineArgs {
    #[command(flatten)]
    stack: StackArgs,
    /// Pulumi stack (org/project/stack); read from manifest labels when omitted
    #[arg(long = "stack", value_name = "FQDN", env = "PLANTON_STACK")]
    stack_fqdn: Option<String>,
    /// Skip the confirmation prompt and preview
    #[arg(short = 'y', long)]
    yes: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if cli.verbose {
        filter = filter.add_directive(tracing::Level::DEBUG.into());
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    if let Err(e) = run(cli.command).await {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> anyhow::Result<()> {
    use planton_cloud::Operation;

    match command {
        Commands::Version => {
            println!("planton {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Kind(KindCommands::Get { name }) => commands::kind::handle_get(&name),
        Commands::Kind(KindCommands::List { provider }) => {
            commands::kind::handle_list(provider.as_deref())
        }
        Commands::Kind(KindCommands::Prefix { prefix }) => commands::kind::handle_prefix(&prefix),
        Commands::Init { kind } => commands::init::handle(&kind),
        Commands::Validate {
            manifest,
            overrides,
        } => commands::validate::handle(manifest, &overrides),
        Commands::StackInput(args) => commands::stack_input::handle(&args),
        Commands::Render(args) => commands::render::handle(&args),
        Commands::Plan {
            stack,
            preview,
            stack_fqdn,
        } => commands::plan::handle(&stack, preview, stack_fqdn.as_deref()).await,
        Commands::Apply(args) => {
            commands::run::handle(Operation::Up, &args.stack, args.stack_fqdn.as_deref(), args.yes)
                .await
        }
        Commands::Refresh(args) => {
            commands::run::handle(
                Operation::Refresh,
                &args.stack,
                args.stack_fqdn.as_deref(),
                args.yes,
            )
            .await
        }
        Commands::Destroy(args) => {
            commands::run::handle(
                Operation::Destroy,
                &args.stack,
                args.stack_fqdn.as_deref(),
                args.yes,
            )
            .await
        }
        Commands::Config(ConfigCommands::Set { key, value }) => {
            commands::config::handle_set(&key, &value)
        }
        Commands::Config(ConfigCommands::Get { key }) => commands::config::handle_get(&key),
        Commands::Config(ConfigCommands::List) => commands::config::handle_list(),
    }
}
