//! Error types for the folio library.
//!
//! This module provides one error type covering every failure mode of the library:
//! - Configuration and opener resolution
//! - File type detection on unreadable input
//! - Marker file parsing and writing
//! - Network and API errors during DOI retrieval
//!
//! "No matching document" is not an error: [`crate::matcher::locate_document`] returns an
//! `Option` that callers branch on.
//!
//! # Examples
//!
//! ```
//! use folio::{config::Config, error::FolioError};
//!
//! let config = Config::empty();
//! match config.get("no-such-setting", None) {
//!   Err(FolioError::MissingSetting(key)) => println!("{key} is not configured"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(value) => println!("Value: {value}"),
//! }
//! ```

use thiserror::Error;

use super::*;

/// Error type alias used for the [`folio`](crate) crate.
pub type Result<T> = core::result::Result<T, FolioError>;

/// Errors that can occur when working with the folio library.
#[derive(Error, Debug)]
pub enum FolioError {
  /// A setting was requested that is neither configured nor has a built-in default.
  #[error("Setting \"{0}\" is not configured and has no default")]
  MissingSetting(String),

  /// No usable opener could be resolved, or the configuration is otherwise inconsistent.
  #[error("{0}")]
  Config(String),

  /// A configured opener is neither a command string nor a registered callback.
  ///
  /// This happens when the configuration holds a non-string value (a table, a number) or an
  /// empty command for an opener key.
  #[error("Don't know how to use the opener configured for \"{0}\"")]
  InvalidOpener(String),

  /// The content of a file could not be read for type detection.
  ///
  /// This is deliberately distinct from a successful probe that matched no known format.
  #[error("Could not read {path:?} to determine its type: {source}")]
  Unreadable {
    /// The file that was probed
    path:   PathBuf,
    /// The underlying read failure
    source: std::io::Error,
  },

  /// A selection between several candidates was empty or cancelled.
  #[error("Nothing was selected")]
  NothingSelected,

  /// A document folder holds no file to open.
  #[error("Document in {0:?} has no associated files")]
  NoDocumentFile(PathBuf),

  /// The named library is not present in the configuration.
  #[error("Library \"{0}\" is not configured")]
  UnknownLibrary(String),

  /// The provided DOI or DOI URL doesn't match the expected format.
  #[error("Invalid identifier format: {0}")]
  InvalidIdentifier(String),

  /// An API returned an error response or a response we could not interpret.
  #[error("API error: {0}")]
  ApiError(String),

  /// A network request failed.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A marker file could not be parsed or written.
  #[error(transparent)]
  Yaml(#[from] serde_yaml_ng::Error),

  /// A JSON payload could not be decoded.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration file could not be written.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// A search pattern failed to compile.
  #[error(transparent)]
  Regex(#[from] regex::Error),
}
