//! # cce CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cce_cli::parse::{run_parse, ParseArgs};
use cce_cli::rewrite::{run_rewrite, RewriteArgs};
use cce_cli::validate::{run_validate, ValidateArgs};
use cce_cli::{load_parser, select_bundle, EXIT_ERROR};

/// Console cloud events toolchain.
///
/// Validates and normalizes console cloud events against the bundled
/// schema, resolving every schema reference offline.
#[derive(Parser, Debug)]
#[command(name = "cce", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Read schemas from this directory instead of the embedded bundle.
    #[arg(long, global = true, value_name = "DIR")]
    schema_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate an event against the schema.
    Validate(ValidateArgs),

    /// Print an event with schema defaults applied, after validating it.
    Parse(ParseArgs),

    /// Print the offline location of a public schema URI.
    Rewrite(RewriteArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let bundle = select_bundle(cli.schema_dir.as_deref());
    tracing::debug!(?bundle, "selected schema bundle");

    let mut out = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Validate(args) => {
            load_parser(bundle).and_then(|parser| run_validate(args, &parser, &mut out))
        }
        Commands::Parse(args) => {
            load_parser(bundle).and_then(|parser| run_parse(args, &parser, &mut out))
        }
        Commands::Rewrite(args) => run_rewrite(args, &bundle, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
