mod commands;
mod discover;

use std::path::PathBuf;
use std::process;

use cbs_core::CbsConfig;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter; `RUST_LOG` is the fallback.
const LOG_ENV: &str = "CBS_LOG";

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Cell spec toolchain: validate specs, map bus contracts, scaffold cells.
#[derive(Parser)]
#[command(
    name = "cbs",
    version,
    about = "Cell spec toolchain: validate specs, map bus contracts, scaffold cells"
)]
struct Cli {
    /// Workspace root containing the application and shared cell trees
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log debug events to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Config file (default: <root>/cbs.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat service-suffix findings as errors
    #[arg(long, global = true)]
    enforce_suffix: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every cell spec in the workspace
    Validate,

    /// Build each application's contract graph and write its cell map
    GenerateMap {
        /// Print the maps instead of writing ai/cell_map.md
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate a cell stub from its spec
    GenerateCell {
        /// Path to a spec.md or to a cell directory containing ai/spec.md
        spec: PathBuf,
        /// Write files (default is a dry run); existing files get .bak backups
        #[arg(long)]
        apply: bool,
    },
}

/// Settings shared by every subcommand.
pub(crate) struct Context {
    pub root: PathBuf,
    pub output: OutputFormat,
    pub quiet: bool,
    pub config: CbsConfig,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };
    tracing::debug!(
        root = %cli.root.display(),
        enforce_suffix = config.validation.enforce_service_suffix,
        "configuration resolved"
    );

    let ctx = Context {
        root: cli.root,
        output: cli.output,
        quiet: cli.quiet,
        config,
    };

    let code = match cli.command {
        Commands::Validate => commands::validate::cmd_validate(&ctx),
        Commands::GenerateMap { dry_run } => commands::generate_map::cmd_generate_map(&ctx, dry_run),
        Commands::GenerateCell { spec, apply } => {
            commands::generate_cell::cmd_generate_cell(&ctx, &spec, apply)
        }
    };
    process::exit(code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default));
    // Ignore a second init (only possible if a subscriber is already set).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Flag > environment > config file > defaults.
fn load_config(cli: &Cli) -> Result<CbsConfig, String> {
    let mut config = match &cli.config {
        Some(path) => CbsConfig::load(path),
        None => CbsConfig::load_from_root(&cli.root),
    }
    .map_err(|e| format!("config error: {}", e))?;

    config
        .apply_env(|var| std::env::var(var).ok())
        .map_err(|e| format!("config error: {}", e))?;
    if cli.enforce_suffix {
        config.validation.enforce_service_suffix = true;
    }
    Ok(config)
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
