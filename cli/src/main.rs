//! Strata CLI - Main entry point

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use strata_migrations::Config;
use strata_cli::error::CliError;

/// Environment variable holding the log filter
const LOG_ENV: &str = "STRATA_LOG";

/// Strata - dump and reload database schemas
#[derive(Parser, Debug)]
#[command(name = "strata")]
#[command(author, version, about = "Dump and reload database schemas", long_about = None)]
struct Cli {
    /// Path to config file (default: strata.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log library activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Target {
    /// Target environment (default: the configured default environment)
    #[arg(short, long, env = "STRATA_ENV")]
    environment: Option<String>,

    /// Migration directory, overriding the configured paths
    #[arg(short, long, value_name = "DIR")]
    path: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dump the database schema to a schema file
    #[command(name = "schema:dump")]
    SchemaDump {
        #[command(flatten)]
        target: Target,
    },

    /// Destroy the database and rebuild it from its schema file
    #[command(name = "schema:load")]
    SchemaLoad {
        #[command(flatten)]
        target: Target,

        /// Skip the confirmation question
        #[arg(short, long)]
        destroy: bool,
    },
}

fn main() -> ExitCode {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "strata_migrations=debug,strata_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::SchemaDump { target } => strata_cli::commands::dump::run(
            &config,
            target.environment.as_deref(),
            target.path.as_deref(),
        ),
        Command::SchemaLoad { target, destroy } => strata_cli::commands::load::run(
            &config,
            target.environment.as_deref(),
            target.path.as_deref(),
            destroy,
        ),
    }
}

/// Load configuration with fallback to default path
fn load_config(custom_path: Option<&Path>) -> Result<Config, CliError> {
    match custom_path {
        Some(path) => Config::load_from(path).map_err(Into::into),
        None => Config::load().map_err(Into::into),
    }
}
