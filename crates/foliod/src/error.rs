//! Error types for the folio CLI.

use thiserror::Error;

use super::*;

/// Error type alias used throughout the CLI.
pub type Result<T> = core::result::Result<T, FoliodError>;

/// Errors that can occur while running a CLI command.
#[derive(Error, Debug)]
pub enum FoliodError {
  /// An error raised by the folio library
  #[error(transparent)]
  Folio(#[from] FolioError),

  /// A prompt could not be shown or answered
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// A file system operation failed
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// No configuration file exists yet
  #[error("No configuration found at {0:?}. Run `folio init` first")]
  NotInitialized(PathBuf),

  /// A search matched no document folder
  #[error("No document matches \"{0}\"")]
  NoMatch(String),

  /// The arguments do not describe anything to do
  #[error("{0}")]
  Usage(String),
}
