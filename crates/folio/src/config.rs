//! User configuration: general settings, libraries and opener resolution.
//!
//! The configuration is a TOML file with a `[settings]` table and one table per library:
//!
//! ```toml
//! [settings]
//! opentool = "zathura"
//! editor = "nvim"
//!
//! [libraries.papers]
//! dir = "~/Documents/papers"
//! info-name = "info.yaml"
//! ```
//!
//! Every lookup goes through [`Config::get`], which consults the library table first, then
//! `[settings]`, and finally the built-in defaults.

use super::*;
use crate::opener::{Callback, Opener};

/// Name of the library used when none is requested explicitly.
pub const DEFAULT_LIBRARY: &str = "papers";

/// Parsed user configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Config {
  /// General settings shared by all libraries
  #[serde(default)]
  pub settings:  BTreeMap<String, toml::Value>,
  /// Per-library settings, keyed by library name
  #[serde(default)]
  pub libraries: BTreeMap<String, BTreeMap<String, toml::Value>>,
  /// Programmatic openers registered at runtime, keyed by setting name
  #[serde(skip)]
  callbacks:     BTreeMap<String, Callback>,
}

impl std::fmt::Debug for Config {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Config")
      .field("settings", &self.settings)
      .field("libraries", &self.libraries)
      .field("callbacks", &self.callbacks.keys().collect::<Vec<_>>())
      .finish()
  }
}

impl Config {
  /// A configuration with no settings and no libraries. Built-in defaults still apply.
  pub fn empty() -> Self { Self::default() }

  /// Returns the default location of the configuration file.
  ///
  /// The `FOLIO_CONFIG` environment variable takes precedence. Otherwise:
  /// - On Unix: `~/.config/folio/config.toml`
  /// - On macOS: `~/Library/Application Support/folio/config.toml`
  /// - On Windows: `%APPDATA%\folio\config.toml`
  /// - Fallback: `./folio/config.toml`
  pub fn default_path() -> PathBuf {
    if let Some(path) = std::env::var_os("FOLIO_CONFIG") {
      return PathBuf::from(path);
    }
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("folio").join("config.toml")
  }

  /// Loads a configuration file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
  }

  /// Writes this configuration to `path`, creating parent directories as needed.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    info!("Wrote configuration to {}", path.display());
    Ok(())
  }

  /// Adds (or replaces) a library rooted at `dir`.
  pub fn with_library(mut self, name: &str, dir: impl AsRef<Path>) -> Self {
    self.libraries.entry(name.to_string()).or_default().insert(
      "dir".to_string(),
      toml::Value::String(dir.as_ref().to_string_lossy().into_owned()),
    );
    self
  }

  /// Sets a general setting.
  pub fn with_setting(mut self, key: &str, value: &str) -> Self {
    self.settings.insert(key.to_string(), toml::Value::String(value.to_string()));
    self
  }

  /// Registers a programmatic opener under `key`. It takes precedence over the file contents.
  pub fn with_callback(mut self, key: &str, callback: Callback) -> Self {
    self.callbacks.insert(key.to_string(), callback);
    self
  }

  /// Resolves the raw value of `key`: library table, then `[settings]`, then defaults.
  fn lookup(&self, key: &str, library: Option<&str>) -> Option<toml::Value> {
    let library = library.map(str::to_string).unwrap_or_else(|| self.default_library());
    self
      .libraries
      .get(&library)
      .and_then(|table| table.get(key))
      .or_else(|| self.settings.get(key))
      .cloned()
      .or_else(|| default_setting(key).map(toml::Value::String))
  }

  /// Returns the value of a setting as a string.
  ///
  /// # Errors
  ///
  /// - [`FolioError::MissingSetting`] if the key is neither configured nor has a default
  /// - [`FolioError::Config`] if the value is a table or an array
  pub fn get(&self, key: &str, library: Option<&str>) -> Result<String> {
    match self.lookup(key, library) {
      None => Err(FolioError::MissingSetting(key.to_string())),
      Some(toml::Value::String(value)) => Ok(value),
      Some(toml::Value::Table(_) | toml::Value::Array(_)) =>
        Err(FolioError::Config(format!("Setting \"{key}\" is not a plain value"))),
      Some(other) => Ok(other.to_string()),
    }
  }

  /// The library used when none is requested explicitly.
  pub fn default_library(&self) -> String {
    match self.settings.get("default-library") {
      Some(toml::Value::String(name)) => name.clone(),
      _ => DEFAULT_LIBRARY.to_string(),
    }
  }

  /// Returns the root directory of a library, with `~` expanded.
  pub fn library_dir(&self, library: Option<&str>) -> Result<PathBuf> {
    let name = library.map(str::to_string).unwrap_or_else(|| self.default_library());
    let table = self.libraries.get(&name).ok_or_else(|| FolioError::UnknownLibrary(name.clone()))?;
    match table.get("dir") {
      Some(toml::Value::String(dir)) => Ok(expand_tilde(dir)),
      _ => Err(FolioError::Config(format!("Library \"{name}\" has no \"dir\" setting"))),
    }
  }

  /// Name of the marker file identifying a document folder.
  pub fn info_name(&self, library: Option<&str>) -> Result<String> { self.get("info-name", library) }

  /// Resolves the opener configured for `key`.
  ///
  /// Registered callbacks win over configured commands. A configured value that is not a
  /// non-empty string is rejected, since there is no way to run it.
  pub fn opener(&self, key: &str, library: Option<&str>) -> Result<Opener> {
    if let Some(callback) = self.callbacks.get(key) {
      return Ok(Opener::Callback(Arc::clone(callback)));
    }
    match self.lookup(key, library) {
      None => Err(FolioError::MissingSetting(key.to_string())),
      Some(toml::Value::String(command)) if !command.trim().is_empty() =>
        Ok(Opener::Command(command)),
      Some(_) => Err(FolioError::InvalidOpener(key.to_string())),
    }
  }
}

/// Built-in default for a setting, if it has one.
pub fn default_setting(key: &str) -> Option<String> {
  let value = match key {
    "info-name" => "info.yaml".to_string(),
    "format-doc-name" => "doc".to_string(),
    "default-library" => DEFAULT_LIBRARY.to_string(),
    "editor" => std::env::var("EDITOR")
      .or_else(|_| std::env::var("VISUAL"))
      .unwrap_or_else(|_| "vi".to_string()),
    "add-folder-name" => "{doc[author]}-{doc[title]}".to_string(),
    "header-format" => "{doc[title]} - {doc[author]}".to_string(),
    _ => return None,
  };
  Some(value)
}

/// The platform's generic "open this file" program, written into new configurations.
pub fn platform_opener() -> &'static str {
  if cfg!(target_os = "macos") {
    "open"
  } else if cfg!(target_os = "windows") {
    "explorer"
  } else {
    "xdg-open"
  }
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
  match path.strip_prefix('~') {
    Some(rest) => match dirs::home_dir() {
      Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
      None => PathBuf::from(path),
    },
    None => PathBuf::from(path),
  }
}
