//! A configured library: its root directory and the documents below it.

use super::*;
use crate::folder::{filter_folders, get_folders};

/// A library as described by one `[libraries.<name>]` table of the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
  /// Library name
  pub name:      String,
  /// Root directory, `~` already expanded
  pub dir:       PathBuf,
  /// Name of the marker file identifying a document folder
  pub info_name: String,
}

impl Library {
  /// Builds a library directly, bypassing the configuration.
  pub fn new(name: &str, dir: impl Into<PathBuf>, info_name: &str) -> Self {
    Self { name: name.to_string(), dir: dir.into(), info_name: info_name.to_string() }
  }

  /// Resolves the library `name` (or the default library) from `config`.
  ///
  /// # Errors
  ///
  /// [`FolioError::UnknownLibrary`] if there is no such library, or [`FolioError::Config`] if it
  /// has no `dir`.
  pub fn from_config(config: &Config, name: Option<&str>) -> Result<Self> {
    let name = name.map(str::to_string).unwrap_or_else(|| config.default_library());
    let dir = config.library_dir(Some(&name))?;
    let info_name = config.info_name(Some(&name))?;
    debug!("Using library {name} at {}", dir.display());
    Ok(Self { name, dir, info_name })
  }

  /// Every document folder of the library.
  pub fn folders(&self) -> Vec<PathBuf> { get_folders(&self.dir, &self.info_name) }

  /// Every document of the library that could be loaded.
  ///
  /// Marker files that cannot be read or parsed are skipped with a warning.
  pub fn documents(&self) -> Vec<Document> { self.load(self.folders()) }

  /// The documents whose folder path matches `search` (see [`filter_folders`]).
  pub fn search(&self, search: &str) -> Result<Vec<Document>> {
    Ok(self.load(filter_folders(self.folders(), search)?))
  }

  /// Path of the marker file of the document stored in `folder`.
  pub fn info_path(&self, folder: &Path) -> PathBuf { folder.join(&self.info_name) }

  fn load(&self, folders: Vec<PathBuf>) -> Vec<Document> {
    folders
      .into_iter()
      .filter_map(|folder| match Document::from_folder(&folder, &self.info_name) {
        Ok(document) => Some(document),
        Err(e) => {
          warn!("Skipping {}: {e}", self.info_path(&folder).display());
          None
        },
      })
      .collect()
  }
}
