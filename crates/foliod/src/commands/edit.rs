//! Module for editing document metadata.

use folio::opener::{general_open, Opened, Target};

use super::*;

/// Arguments that can be used for the [`Commands::Edit`]
#[derive(Args, Clone)]
pub struct EditArgs {
  /// Case-insensitive regular expression matched against folder paths
  #[arg(default_value = MATCH_ALL)]
  pub search: String,
}

/// Function for the [`Commands::Edit`] in the CLI.
///
/// Opens the document's metadata file with the `editor` setting and waits for it.
pub async fn edit<I: UserInteraction + Picker>(
  interaction: &I,
  config: &Config,
  library: Option<&str>,
  args: EditArgs,
) -> Result<()> {
  let lib = Library::from_config(config, library)?;
  let folder = pick_folder(interaction, config, library, &lib, &args.search)?;
  let info_path = lib.info_path(&folder);

  match general_open(Target::Path(info_path), "editor", config, library, None, true, interaction)? {
    Opened::Exited(0) | Opened::Returned(0) => Ok(()),
    Opened::Exited(code) | Opened::Returned(code) => interaction
      .reply(ResponseContent::Warning(&format!("The editor finished with exit code {code}"))),
    Opened::Spawned(_) => Ok(()),
  }
}
