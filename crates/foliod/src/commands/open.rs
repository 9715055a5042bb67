//! Module for opening documents with external programs.

use folio::opener::{general_open, open_with, pick_path, Opened, Opener, Target};

use super::*;

/// Arguments that can be used for the [`Commands::Open`]
#[derive(Args, Clone)]
pub struct OpenArgs {
  /// Case-insensitive regular expression matched against folder paths
  #[arg(default_value = MATCH_ALL)]
  pub search: String,

  /// Program to open the file with, instead of the configured one
  #[arg(long)]
  pub tool: Option<String>,

  /// Open the document's folder with `file-browser` instead of its file
  #[arg(long)]
  pub folder: bool,

  /// Return as soon as the program has started
  #[arg(long)]
  pub no_wait: bool,
}

/// Function for the [`Commands::Open`] in the CLI.
pub async fn open<I: UserInteraction + Picker>(
  interaction: &I,
  config: &Config,
  library: Option<&str>,
  args: OpenArgs,
) -> Result<()> {
  let OpenArgs { search, tool, folder: open_folder, no_wait } = args;
  let lib = Library::from_config(config, library)?;
  let folder = pick_folder(interaction, config, library, &lib, &search)?;

  let (target, key) = if open_folder {
    (Target::Path(folder), "file-browser")
  } else {
    let document = Document::from_folder(&folder, &lib.info_name)?;
    let files = document.files();
    if files.is_empty() {
      return Err(FolioError::NoDocumentFile(folder).into());
    }
    (Target::Choice(files), "opentool")
  };

  let wait = !no_wait;
  let opened = match tool {
    Some(tool) => {
      let path = match target {
        Target::Path(path) => path,
        Target::Choice(paths) => pick_path(paths, interaction)?,
      };
      open_with(&Opener::Command(tool), &path, wait)?
    },
    None => general_open(target, key, config, library, None, wait, interaction)?,
  };

  match opened {
    Opened::Exited(0) | Opened::Returned(0) => Ok(()),
    Opened::Exited(code) | Opened::Returned(code) => interaction
      .reply(ResponseContent::Warning(&format!("The opener finished with exit code {code}"))),
    Opened::Spawned(child) => {
      trace!("Detached opener with pid {}", child.id());
      Ok(())
    },
  }
}
