//! Module for inspecting settings.

use super::*;

/// Arguments that can be used for the [`Commands::Config`]
#[derive(Args, Clone)]
pub struct ConfigArgs {
  /// Name of the setting, e.g. `opentool` or `info-name`
  pub key: String,
}

/// Function for the [`Commands::Config`] in the CLI.
///
/// Prints the value the library section, `[settings]` or the built-in defaults resolve to.
pub async fn config<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  library: Option<&str>,
  args: ConfigArgs,
) -> Result<()> {
  let value = config.get(&args.key, library)?;
  interaction.reply(ResponseContent::Plain(&value))
}
