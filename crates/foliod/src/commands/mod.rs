use super::*;

pub mod add;
pub mod config;
pub mod edit;
pub mod init;
pub mod list;
pub mod open;

pub use add::{add, AddArgs};
pub use config::{config, ConfigArgs};
pub use edit::{edit, EditArgs};
pub use init::{init, InitArgs};
pub use list::{list, ListArgs};
pub use open::{open, OpenArgs};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write a new configuration file
  Init(InitArgs),

  /// List the documents of the library
  List(ListArgs),

  /// Open a document's file (or folder) with the configured program
  Open(OpenArgs),

  /// Edit a document's metadata file
  Edit(EditArgs),

  /// Add a document from local files and/or DOI metadata
  Add(AddArgs),

  /// Print the resolved value of a setting
  Config(ConfigArgs),
}

/// Renders the `header-format` line for a document folder, falling back to its path.
pub fn header(config: &Config, library: Option<&str>, folder: &Path, info_name: &str) -> String {
  let fallback = || folder.display().to_string();
  let (Ok(template), Ok(key)) =
    (config.get("header-format", library), config.get("format-doc-name", library))
  else {
    return fallback();
  };
  match Document::from_folder(folder, info_name) {
    Ok(document) => {
      let line = format_doc(&template, &document, &key);
      // a template made only of missing fields leaves separators behind
      if line.chars().any(char::is_alphanumeric) {
        line
      } else {
        fallback()
      }
    },
    Err(e) => {
      warn!("Could not read document in {}: {e}", folder.display());
      fallback()
    },
  }
}

/// Finds the folder `search` refers to, letting the user choose when several match.
pub fn pick_folder<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  library: Option<&str>,
  lib: &Library,
  search: &str,
) -> Result<PathBuf> {
  let mut folders = filter_folders(lib.folders(), search)?;
  debug!("{} folders match {search:?}", folders.len());
  match folders.len() {
    0 => Err(FoliodError::NoMatch(search.to_string())),
    1 => Ok(folders.remove(0)),
    _ => {
      let options = folders
        .iter()
        .map(|folder| header(config, library, folder, &lib.info_name))
        .collect::<Vec<_>>();
      let index =
        interaction.select("Select a document", &options)?.ok_or(FolioError::NothingSelected)?;
      if index < folders.len() {
        Ok(folders.swap_remove(index))
      } else {
        Err(FolioError::NothingSelected.into())
      }
    },
  }
}
