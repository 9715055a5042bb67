//! Module for listing the documents of a library.

use super::*;

/// Arguments that can be used for the [`Commands::List`]
#[derive(Args, Clone)]
pub struct ListArgs {
  /// Case-insensitive regular expression matched against folder paths
  #[arg(default_value = MATCH_ALL)]
  pub search: String,

  /// Print the paths of the metadata files instead of the folders
  #[arg(long, conflicts_with = "format")]
  pub info: bool,

  /// Print each document through the `header-format` setting
  #[arg(long)]
  pub format: bool,
}

/// Function for the [`Commands::List`] in the CLI.
pub async fn list<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  library: Option<&str>,
  args: ListArgs,
) -> Result<()> {
  let ListArgs { search, info, format } = args;
  let lib = Library::from_config(config, library)?;
  let folders = filter_folders(lib.folders(), &search)?;

  if folders.is_empty() {
    return interaction.reply(ResponseContent::Info(&format!("No documents match \"{search}\"")));
  }

  for folder in &folders {
    let line = if format {
      header(config, library, folder, &lib.info_name)
    } else if info {
      lib.info_path(folder).display().to_string()
    } else {
      folder.display().to_string()
    };
    interaction.reply(ResponseContent::Plain(&line))?;
  }
  Ok(())
}
