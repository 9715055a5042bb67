//! Folder-per-paper document library management.
//!
//! `folio` manages a library of documents where every document lives in its own folder next to
//! a small YAML marker file (the "info" file) holding its metadata. The library provides:
//!
//! - Indexing of a library root into the folders that hold a marker file
//! - Matching of a candidate document against the known ones (deduplication)
//! - Content-based file type detection for the formats a library usually holds
//! - Launching of configured openers (viewers, editors, file browsers) on documents
//! - Metadata retrieval from Crossref for a DOI
//!
//! # Getting Started
//!
//! ```no_run
//! use folio::{config::Config, library::Library, matcher::locate_document, prelude::*};
//!
//! # fn example() -> Result<(), FolioError> {
//! let config = Config::load(Config::default_path())?;
//! let library = Library::from_config(&config, None)?;
//!
//! let documents = library.documents();
//! let candidate = folio::document::Document::new().with("doi", "10.1145/1327452.1327492");
//! if let Some(existing) = locate_document(&candidate, &documents) {
//!   println!("Already in the library: {:?}", existing.folder());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`config`]: Settings, libraries and opener resolution
//! - [`document`]: The key/value document type and template rendering
//! - [`folder`]: Library indexing and folder search
//! - [`matcher`]: Document deduplication
//! - [`filetype`]: File format detection by content
//! - [`identifier`]: Short unique identifiers for disambiguating names
//! - [`opener`]: Opening files with commands or callbacks
//! - [`crossref`]: DOI metadata retrieval
//! - [`git`]: Committing library changes

#![warn(missing_docs)]

use std::{
  collections::BTreeMap,
  fmt::Display,
  path::{Path, PathBuf},
  sync::Arc,
};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod config;
pub mod crossref;
pub mod document;
pub mod error;
pub mod filetype;
pub mod folder;
pub mod git;
pub mod identifier;
pub mod library;
pub mod matcher;
pub mod opener;

use crate::{config::Config, document::Document, error::*};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use folio::prelude::*;
///
/// fn example() -> Result<(), FolioError> { Ok(()) }
/// ```
pub mod prelude {
  pub use crate::{error::FolioError, opener::Picker};
}
