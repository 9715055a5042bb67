//! The key/value document stored in every library folder.
//!
//! A [`Document`] has no fixed schema: it is whatever the marker file of its folder says, usually
//! `title`, `author`, `year`, identifiers such as `doi` or `isbn`, and a `files` list naming the
//! documents stored next to the marker file.
//!
//! # Examples
//!
//! ```
//! use folio::document::{format_doc, Document};
//!
//! let document = Document::new().with("author", "Fulano").with("title", "Something");
//! assert_eq!(format_doc("{doc[author]}{doc[title]}", &document, "doc"), "FulanoSomething");
//! assert_eq!(format_doc("{doc[author]}{doc[blahblah]}", &document, "doc"), "Fulano");
//! ```

use super::*;

/// Key holding the list of files belonging to a document.
pub const FILES_KEY: &str = "files";

/// One managed item: its metadata and the folder it lives in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
  /// Metadata as read from (or to be written to) the marker file
  data:   BTreeMap<String, Value>,
  /// Folder holding the marker file, if the document is backed by one
  folder: Option<PathBuf>,
}

impl Document {
  /// An empty document not yet backed by a folder.
  pub fn new() -> Self { Self::default() }

  /// Builds a document from raw metadata.
  pub fn from_data(data: BTreeMap<String, Value>) -> Self { Self { data, folder: None } }

  /// Loads the document stored in `folder` from its marker file named `info_name`.
  pub fn from_folder(folder: impl AsRef<Path>, info_name: &str) -> Result<Self> {
    let folder = folder.as_ref();
    let content = std::fs::read_to_string(folder.join(info_name))?;
    let data: Option<BTreeMap<String, Value>> = serde_yaml_ng::from_str(&content)?;
    trace!("Loaded document from {}", folder.display());
    Ok(Self { data: data.unwrap_or_default(), folder: Some(folder.to_path_buf()) })
  }

  /// Writes the metadata back to the marker file in the document's folder.
  pub fn save(&self, info_name: &str) -> Result<PathBuf> {
    let folder = self
      .folder
      .as_ref()
      .ok_or_else(|| FolioError::Config("Cannot save a document without a folder".to_string()))?;
    let path = folder.join(info_name);
    std::fs::write(&path, serde_yaml_ng::to_string(&self.data)?)?;
    debug!("Wrote {}", path.display());
    Ok(path)
  }

  /// Builder-style [`Document::set`] for string values.
  pub fn with(mut self, key: &str, value: &str) -> Self {
    self.set(key, Value::String(value.to_string()));
    self
  }

  /// Attaches the document to a folder.
  pub fn with_folder(mut self, folder: impl Into<PathBuf>) -> Self {
    self.folder = Some(folder.into());
    self
  }

  /// The folder holding this document, if any.
  pub fn folder(&self) -> Option<&Path> { self.folder.as_deref() }

  /// The raw value stored under `key`.
  pub fn get(&self, key: &str) -> Option<&Value> { self.data.get(key) }

  /// The value stored under `key` as text. Strings are returned verbatim, other scalars in their
  /// JSON rendering, and `null` as absent.
  pub fn get_str(&self, key: &str) -> Option<String> { self.data.get(key).and_then(value_to_text) }

  /// Whether `key` is present.
  pub fn contains_key(&self, key: &str) -> bool { self.data.contains_key(key) }

  /// All keys in sorted order.
  pub fn keys(&self) -> impl Iterator<Item = &String> { self.data.keys() }

  /// Stores `value` under `key`, returning the previous value.
  pub fn set(&mut self, key: &str, value: Value) -> Option<Value> {
    self.data.insert(key.to_string(), value)
  }

  /// Removes `key`, returning its value.
  pub fn remove(&mut self, key: &str) -> Option<Value> { self.data.remove(key) }

  /// The underlying metadata.
  pub fn data(&self) -> &BTreeMap<String, Value> { &self.data }

  /// The document's files, resolved against its folder.
  ///
  /// `files` may be a list or a single string; entries that are not strings are ignored.
  pub fn files(&self) -> Vec<PathBuf> {
    let names = match self.data.get(FILES_KEY) {
      Some(Value::Array(entries)) => entries.iter().filter_map(Value::as_str).collect::<Vec<_>>(),
      Some(Value::String(name)) => vec![name.as_str()],
      _ => Vec::new(),
    };
    names
      .into_iter()
      .map(|name| match &self.folder {
        Some(folder) => folder.join(name),
        None => PathBuf::from(name),
      })
      .collect()
  }

  /// Appends `name` to the `files` list.
  pub fn add_file(&mut self, name: &str) {
    let entry = Value::String(name.to_string());
    match self.data.get_mut(FILES_KEY) {
      Some(Value::Array(entries)) => entries.push(entry),
      Some(existing) if existing.is_string() => {
        let first = existing.take();
        *existing = Value::Array(vec![first, entry]);
      },
      _ => {
        self.data.insert(FILES_KEY.to_string(), Value::Array(vec![entry]));
      },
    }
  }
}

impl Display for Document {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match (self.get_str("title"), &self.folder) {
      (Some(title), _) => write!(f, "{title}"),
      (None, Some(folder)) => write!(f, "{}", folder.display()),
      (None, None) => write!(f, "<untitled>"),
    }
  }
}

/// Renders a scalar value as text.
fn value_to_text(value: &Value) -> Option<String> {
  match value {
    Value::Null => None,
    Value::String(s) => Some(s.clone()),
    other => Some(other.to_string()),
  }
}

/// Renders `template`, replacing every `{<key>[field]}` with the document's field.
///
/// Fields the document lacks render as the empty string; `key` is usually the
/// `format-doc-name` setting. Doubled braces are literal: `{{` renders as `{` and `}}` as `}`.
pub fn format_doc(template: &str, document: &Document, key: &str) -> String {
  lazy_static! {
    static ref PLACEHOLDER: Regex =
      Regex::new(r"\{\{|\}\}|\{(\w[\w-]*)\[([^\]]+)\]\}").unwrap();
  }
  PLACEHOLDER
    .replace_all(template, |caps: &regex::Captures| match (caps.get(1), caps.get(2)) {
      (Some(name), Some(field)) if name.as_str() == key =>
        document.get_str(field.as_str()).unwrap_or_default(),
      (Some(_), _) => caps[0].to_string(),
      (None, _) => caps[0][..1].to_string(),
    })
    .into_owned()
}

/// Cleans the basename of `doc_path` into something safe to use as a file or folder name.
///
/// The name is transliterated to ASCII and lowercased, and every run of characters other than
/// `a-z`, `0-9` and `.` becomes a single `-`.
///
/// ```
/// use folio::document::clean_document_name;
///
/// assert_eq!(clean_document_name("{{] __ }}albert )(*& $ß $+_ einstein (*]"), "albert-ss-einstein");
/// assert_eq!(
///   clean_document_name("/ashfd/df/  #$%@#$ }{_+\"[ ]hello öworld--- .pdf"),
///   "hello-oworld-.pdf"
/// );
/// ```
pub fn clean_document_name(doc_path: &str) -> String {
  lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9.]+").unwrap();
  }
  let basename = doc_path.rsplit(['/', '\\']).next().unwrap_or(doc_path);
  let ascii = deunicode::deunicode(basename).to_lowercase();
  DISALLOWED.replace_all(&ascii, "-").trim_matches('-').to_string()
}
