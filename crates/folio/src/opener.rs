//! Opening files with configured external programs or in-process callbacks.
//!
//! An [`Opener`] is resolved once from the configuration ([`Config::opener`]) and is either a
//! command template or a callback. [`general_open`] runs it on a single path, or lets a
//! [`Picker`] choose one first when given several.
//!
//! Command templates are split on whitespace and run directly (no shell), so paths with spaces
//! need no quoting. A `{file}` token marks where the path goes; without one the path is appended.
//!
//! ```no_run
//! use folio::{
//!   config::Config,
//!   opener::{general_open, FirstPicker, Opened, Target},
//! };
//!
//! # fn example() -> folio::error::Result<()> {
//! let config = Config::empty().with_setting("viewer", "zathura --fork");
//! let target = Target::Path("paper.pdf".into());
//! if let Opened::Exited(code) = general_open(target, "viewer", &config, None, None, true, &FirstPicker)?
//! {
//!   println!("viewer exited with {code}");
//! }
//! # Ok(())
//! # }
//! ```

use std::process::{Child, Command, Stdio};

use super::*;

/// Token in a command template that is replaced by the file path.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// An in-process opener. Its return value is handed back to the caller unchanged.
pub type Callback = Arc<dyn Fn(&Path) -> Result<i32> + Send + Sync>;

/// A resolved way of opening a file.
#[derive(Clone)]
pub enum Opener {
  /// A command template such as `"zathura --fork"` or `"xdg-open {file}"`
  Command(String),
  /// A function invoked with the path
  Callback(Callback),
}

impl std::fmt::Debug for Opener {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Opener::Command(command) => f.debug_tuple("Command").field(command).finish(),
      Opener::Callback(_) => f.write_str("Callback(..)"),
    }
  }
}

/// What to open: one path, or several for the user to choose from.
#[derive(Debug, Clone)]
pub enum Target {
  /// A single file
  Path(PathBuf),
  /// Candidates handed to a [`Picker`]
  Choice(Vec<PathBuf>),
}

impl From<PathBuf> for Target {
  fn from(path: PathBuf) -> Self { Target::Path(path) }
}

impl From<Vec<PathBuf>> for Target {
  fn from(paths: Vec<PathBuf>) -> Self { Target::Choice(paths) }
}

/// The outcome of [`general_open`].
#[derive(Debug)]
pub enum Opened {
  /// A command ran to completion with this exit code (`-1` if killed by a signal)
  Exited(i32),
  /// A command was started in the background; the caller owns the handle
  Spawned(Child),
  /// A callback ran and returned this value
  Returned(i32),
}

/// Interactive selection among several options.
pub trait Picker {
  /// Returns the index of the chosen option, or `None` if the selection was cancelled.
  fn pick(&self, options: &[String]) -> Result<Option<usize>>;
}

/// A [`Picker`] that always takes the first option.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstPicker;

impl Picker for FirstPicker {
  fn pick(&self, options: &[String]) -> Result<Option<usize>> {
    Ok(if options.is_empty() { None } else { Some(0) })
  }
}

/// Picks one path out of `paths`. A single path is returned without asking.
pub fn pick_path(paths: Vec<PathBuf>, picker: &dyn Picker) -> Result<PathBuf> {
  if paths.len() == 1 {
    return paths.into_iter().next().ok_or(FolioError::NothingSelected);
  }
  let options = paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>();
  let index = picker.pick(&options)?.ok_or(FolioError::NothingSelected)?;
  paths.into_iter().nth(index).ok_or(FolioError::NothingSelected)
}

/// Opens `target` with the opener configured under `key`.
///
/// The opener is resolved in order from the configured `key`, the supplied `default_opener`, and
/// the general `opentool` setting. A command either blocks until it exits (`wait`) or is
/// detached, and a callback is always invoked directly.
///
/// # Errors
///
/// - [`FolioError::Config`] if no opener can be resolved
/// - [`FolioError::InvalidOpener`] if the configured value cannot be run
/// - [`FolioError::NothingSelected`] if a choice is empty or cancelled
/// - [`FolioError::Io`] if the command cannot be started
pub fn general_open(
  target: Target,
  key: &str,
  config: &Config,
  library: Option<&str>,
  default_opener: Option<Opener>,
  wait: bool,
  picker: &dyn Picker,
) -> Result<Opened> {
  let opener = resolve_opener(key, config, library, default_opener)?;
  let path = match target {
    Target::Path(path) => path,
    Target::Choice(paths) => pick_path(paths, picker)?,
  };
  open_with(&opener, &path, wait)
}

/// Resolves the opener for `key`, falling back to `default_opener` and then `opentool`.
pub fn resolve_opener(
  key: &str,
  config: &Config,
  library: Option<&str>,
  default_opener: Option<Opener>,
) -> Result<Opener> {
  match config.opener(key, library) {
    Ok(opener) => Ok(opener),
    Err(FolioError::MissingSetting(_)) => match default_opener {
      Some(opener) => Ok(opener),
      None => config.opener("opentool", library).map_err(|e| match e {
        FolioError::MissingSetting(_) =>
          FolioError::Config(format!("No opener configured for \"{key}\" and no default given")),
        other => other,
      }),
    },
    Err(e) => Err(e),
  }
}

/// Runs a resolved opener on `path`.
pub fn open_with(opener: &Opener, path: &Path, wait: bool) -> Result<Opened> {
  match opener {
    Opener::Callback(callback) => {
      debug!("Opening {} with a callback", path.display());
      callback(path).map(Opened::Returned)
    },
    Opener::Command(template) => {
      let argv = command_line(template, path);
      let (program, args) = argv
        .split_first()
        .ok_or_else(|| FolioError::InvalidOpener(template.to_string()))?;
      debug!("Open cmd {argv:?}");
      let mut command = Command::new(program);
      command.args(args);
      if wait {
        let status = command.status()?;
        trace!("{program:?} exited with {status}");
        Ok(Opened::Exited(status.code().unwrap_or(-1)))
      } else {
        let child = command.stdin(Stdio::null()).spawn()?;
        Ok(Opened::Spawned(child))
      }
    },
  }
}

/// Expands a command template into an argument vector for `path`.
pub fn command_line(template: &str, path: &Path) -> Vec<std::ffi::OsString> {
  let file = path.as_os_str();
  let mut argv = Vec::new();
  let mut substituted = false;
  for token in template.split_whitespace() {
    if token == FILE_PLACEHOLDER {
      argv.push(file.to_os_string());
      substituted = true;
    } else if token.contains(FILE_PLACEHOLDER) {
      argv.push(token.replace(FILE_PLACEHOLDER, &path.to_string_lossy()).into());
      substituted = true;
    } else {
      argv.push(token.into());
    }
  }
  if !substituted {
    argv.push(file.to_os_string());
  }
  argv
}
