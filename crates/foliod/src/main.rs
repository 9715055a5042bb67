//! Command line interface for the folio document library.
//!
//! This crate provides the `folio` binary on top of the [`folio`] library. It supports:
//! - Writing an initial configuration
//! - Listing and searching the documents of a library
//! - Opening documents (or their folders) and editing their metadata
//! - Adding documents from local files and DOI metadata, with duplicate detection
//! - Inspecting resolved settings
//!
//! # Usage
//!
//! ```bash
//! # Write a configuration for a library rooted at ~/papers
//! folio init --dir ~/papers
//!
//! # Add a paper from a DOI and a local file, then commit it
//! folio add ~/Downloads/epr.pdf --from-doi 10.1103/PhysRev.47.777 --commit
//!
//! # List and open documents matching a search
//! folio list einstein --format
//! folio open einstein
//! ```
//!
//! Prompts can be skipped with the hidden `--accept-defaults` flag, and logging is controlled
//! with the `-v` flag or `RUST_LOG`.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  path::{Path, PathBuf},
  process::ExitCode,
};

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use folio::{
  config::Config,
  document::{format_doc, Document},
  error::FolioError,
  folder::{filter_folders, MATCH_ALL},
  library::Library,
  prelude::*,
};
use tracing::{debug, trace, warn};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Manage a folder-per-paper document library")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the configuration file. If not specified, `FOLIO_CONFIG` or the default
  /// platform-specific configuration directory is used.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// Library to operate on instead of the configured default
  #[arg(long, short, global = true)]
  lib: Option<String>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

/// Configures the logging system based on the verbosity level
///
/// # Arguments
///
/// * `verbosity` - Number of times the verbose flag was used
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Loads the configuration every command except `init` works from.
fn load_config(path: &Path) -> Result<Config> {
  if !path.exists() {
    return Err(FoliodError::NotInitialized(path.to_path_buf()));
  }
  Ok(Config::load(path)?)
}

/// Runs the parsed command. Every command except `init` needs an existing configuration.
async fn run(cli: Cli, terminal: &Terminal) -> Result<()> {
  let config_path = cli.config.unwrap_or_else(Config::default_path);
  trace!("Using configuration at {}", config_path.display());
  let library = cli.lib.as_deref();

  match cli.command {
    Commands::Init(args) => init(terminal, &config_path, library, args).await,
    Commands::List(args) => list(terminal, &load_config(&config_path)?, library, args).await,
    Commands::Open(args) => open(terminal, &load_config(&config_path)?, library, args).await,
    Commands::Edit(args) => edit(terminal, &load_config(&config_path)?, library, args).await,
    Commands::Add(args) => add(terminal, &load_config(&config_path)?, library, args).await,
    Commands::Config(args) => config(terminal, &load_config(&config_path)?, library, args).await,
  }
}

/// Entry point for the folio CLI application
///
/// Parses arguments, sets up logging and runs the requested command. Any error is reported on
/// stderr and turns into a failing exit code.
#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();
  setup_logging(cli.verbose);
  let terminal = Terminal::new(cli.accept_defaults);

  match run(cli, &terminal).await {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      debug!("Command failed: {e:?}");
      if let Err(reply_error) = terminal.reply(ResponseContent::Error(&e)) {
        warn!("Could not report error: {reply_error}");
      }
      ExitCode::FAILURE
    },
  }
}
