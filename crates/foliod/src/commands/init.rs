//! Module for writing a first [`folio`] configuration

use folio::config::{expand_tilde, platform_opener, DEFAULT_LIBRARY};

use super::*;

/// Library root proposed when `--dir` is not given.
const DEFAULT_DIR: &str = "~/Documents/papers";

/// Arguments that can be used for the [`Commands::Init`]
#[derive(Args, Clone)]
pub struct InitArgs {
  /// Root directory of the library
  #[arg(long)]
  pub dir: Option<PathBuf>,
}

/// Function for the [`Commands::Init`] in the CLI.
///
/// Writes a configuration holding one library (named by `--lib`, or `papers`) and the platform
/// opener as `opentool`, then creates the library directory.
pub async fn init<I: UserInteraction>(
  interaction: &I,
  config_path: &Path,
  library: Option<&str>,
  args: InitArgs,
) -> Result<()> {
  if config_path.exists()
    && !interaction.confirm(
      &format!("A configuration already exists at {}. Overwrite it?", config_path.display()),
      false,
    )?
  {
    interaction.reply(ResponseContent::Info(
      "Keeping the existing configuration. Pass --config to write one elsewhere",
    ))?;
    return Ok(());
  }

  let dir = match args.dir {
    Some(dir) => dir,
    None => expand_tilde(&interaction.prompt("Where should the library live?", DEFAULT_DIR)?),
  };
  let name = library.unwrap_or(DEFAULT_LIBRARY);

  let mut config = Config::empty().with_library(name, &dir).with_setting("opentool", platform_opener());
  if name != DEFAULT_LIBRARY {
    config = config.with_setting("default-library", name);
  }
  config.save(config_path)?;
  std::fs::create_dir_all(&dir)?;

  interaction.reply(ResponseContent::Success(&format!(
    "Created configuration at {}\nLibrary \"{name}\" lives in {}",
    config_path.display(),
    dir.display(),
  )))?;
  Ok(())
}
