//! Talking to the user: prompts, selections and styled replies.

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use folio::opener::Picker;

use super::*;

pub static INFO_PREFIX: &str = "ℹ ";
pub static SUCCESS_PREFIX: &str = "✓ ";
pub static ERROR_PREFIX: &str = "✗ ";
pub static WARNING_PREFIX: &str = "! ";
pub static ITEM_PREFIX: &str = "├─";
pub static LAST_ITEM_PREFIX: &str = "└─";

/// Something to show the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// A document with all of its fields
  Document(&'a Document),
  /// A line of command output, printed without decoration
  Plain(&'a str),
  Success(&'a str),
  Error(&'a FoliodError),
  Info(&'a str),
  Warning(&'a str),
}

/// The ways a command can ask the user for input or report back.
pub trait UserInteraction {
  /// Asks a yes/no question.
  fn confirm(&self, message: &str, default: bool) -> Result<bool>;
  /// Asks for a line of text.
  fn prompt(&self, message: &str, default: &str) -> Result<String>;
  /// Lets the user choose one of `options`; `None` if cancelled.
  fn select(&self, message: &str, options: &[String]) -> Result<Option<usize>>;
  /// Shows `content`.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// Interaction through the terminal.
///
/// With `accept_defaults` no prompt is shown: questions take their default answer and
/// selections their first option.
#[derive(Debug, Clone, Copy)]
pub struct Terminal {
  accept_defaults: bool,
}

impl Terminal {
  pub fn new(accept_defaults: bool) -> Self { Self { accept_defaults } }
}

impl UserInteraction for Terminal {
  fn confirm(&self, message: &str, default: bool) -> Result<bool> {
    if self.accept_defaults {
      return Ok(default);
    }
    Ok(
      Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(default)
        .interact()?,
    )
  }

  fn prompt(&self, message: &str, default: &str) -> Result<String> {
    if self.accept_defaults {
      return Ok(default.to_string());
    }
    Ok(
      Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(default.to_string())
        .interact_text()?,
    )
  }

  fn select(&self, message: &str, options: &[String]) -> Result<Option<usize>> {
    if options.is_empty() {
      return Ok(None);
    }
    if self.accept_defaults {
      return Ok(Some(0));
    }
    Ok(
      Select::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .items(options)
        .default(0)
        .interact_opt()?,
    )
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Document(document) => {
        println!("{} {}", style(INFO_PREFIX).cyan(), style(document).white().bold());
        let keys = document.keys().collect::<Vec<_>>();
        for (i, key) in keys.iter().enumerate() {
          let prefix = if i + 1 == keys.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          let value = document.get_str(key).unwrap_or_default();
          println!("   {} {} {}", style(prefix).dim(), style(format!("{key}:")).green(), value);
        }
      },
      ResponseContent::Plain(line) => println!("{line}"),
      ResponseContent::Success(message) =>
        println!("{} {}", style(SUCCESS_PREFIX).green(), style(message).green()),
      ResponseContent::Error(error) =>
        eprintln!("{} {}", style(ERROR_PREFIX).red(), style(error).red()),
      ResponseContent::Info(message) => println!("{} {}", style(INFO_PREFIX).cyan(), message),
      ResponseContent::Warning(message) =>
        println!("{} {}", style(WARNING_PREFIX).yellow(), style(message).yellow()),
    }
    Ok(())
  }
}

impl Picker for Terminal {
  fn pick(&self, options: &[String]) -> folio::error::Result<Option<usize>> {
    self.select("Select a file", options).map_err(|e| match e {
      FoliodError::Folio(e) => e,
      other => FolioError::Io(std::io::Error::other(other.to_string())),
    })
  }
}
