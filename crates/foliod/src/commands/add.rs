//! Module for adding documents to a library.

use folio::{
  crossref::doi_to_data,
  document::clean_document_name,
  filetype::{guess_file_extension, FileDescription, FileFormat},
  git::{git_add, git_commit},
  identifier::unique_identifier,
  matcher::locate_document,
};
use serde_json::Value;

use super::*;

/// Alphabet for the suffixes that tell apart folders and files with the same name.
const SUFFIX_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Field recording when a document was added.
const TIME_ADDED_KEY: &str = "time-added";

/// Folder name used when the template renders to nothing usable.
const FALLBACK_NAME: &str = "document";

/// Arguments that can be used for the [`Commands::Add`]
#[derive(Args, Clone)]
pub struct AddArgs {
  /// Files to store with the document
  pub files: Vec<PathBuf>,

  /// Fetch metadata from Crossref for this DOI (or doi.org URL)
  #[arg(long)]
  pub from_doi: Option<String>,

  /// Set a metadata field, e.g. `--set author="Einstein, A."`
  #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
  pub set: Vec<(String, String)>,

  /// Folder name to use instead of the `add-folder-name` template
  #[arg(long)]
  pub name: Option<String>,

  /// Commit the new document to the library's git repository
  #[arg(long)]
  pub commit: bool,
}

/// Parses a `key=value` pair.
fn parse_key_value(input: &str) -> core::result::Result<(String, String), String> {
  match input.split_once('=') {
    Some((key, value)) if !key.trim().is_empty() =>
      Ok((key.trim().to_string(), value.to_string())),
    _ => Err(format!("expected KEY=VALUE, got \"{input}\"")),
  }
}

/// Function for the [`Commands::Add`] in the CLI.
///
/// Nothing is written when the document is already part of the library.
pub async fn add<I: UserInteraction>(
  interaction: &I,
  config: &Config,
  library: Option<&str>,
  args: AddArgs,
) -> Result<()> {
  let AddArgs { files, from_doi, set, name, commit } = args;
  let lib = Library::from_config(config, library)?;

  let mut document = match &from_doi {
    Some(doi) => {
      interaction.reply(ResponseContent::Info(&format!("Fetching metadata for {doi}")))?;
      doi_to_data(doi).await?
    },
    None => Document::new(),
  };
  for (key, value) in set {
    document.set(&key, Value::String(value));
  }
  let has_metadata = document.keys().next().is_some();
  if !has_metadata && files.is_empty() {
    return Err(FoliodError::Usage(
      "Nothing to add: pass files, --from-doi or --set".to_string(),
    ));
  }

  let existing = lib.documents();
  if let Some(found) = locate_document(&document, &existing) {
    let location = found.folder().map(|f| f.display().to_string()).unwrap_or_default();
    interaction
      .reply(ResponseContent::Warning(&format!("Document is already in the library: {location}")))?;
    return interaction.reply(ResponseContent::Document(found));
  }

  // classify every file before touching the library
  let mut stored_names = Vec::with_capacity(files.len());
  for file in &files {
    let format = guess_file_extension(FileDescription::Path(file))?;
    let stored = stored_name(file, format);
    debug!("{} will be stored as {stored}", file.display());
    stored_names.push(stored);
  }

  let key = config.get("format-doc-name", library)?;
  let base = match &name {
    Some(name) => clean_document_name(name),
    None => {
      let template = config.get("add-folder-name", library)?;
      clean_document_name(&format_doc(&template, &document, &key))
    },
  };
  let base = if base.trim_matches(['-', '.']).is_empty() { FALLBACK_NAME.to_string() } else { base };
  let folder_name = free_name(&base, |candidate| lib.dir.join(candidate).exists())?;
  let folder = lib.dir.join(&folder_name);
  let mut document = document.with_folder(&folder);
  document.set(
    TIME_ADDED_KEY,
    Value::String(chrono::Local::now().format("%Y-%m-%d-%H:%M:%S").to_string()),
  );
  let info_path = fill_folder(&mut document, &files, stored_names, &lib.info_name)?;
  interaction.reply(ResponseContent::Success(&format!("Added {}", folder.display())))?;
  interaction.reply(ResponseContent::Document(&document))?;

  if commit {
    let mut changed = document.files();
    changed.push(info_path);
    let message = format!("Add {document}");
    let code = match git_add(&lib.dir, &changed)? {
      0 => git_commit(&lib.dir, &message)?,
      code => code,
    };
    if code != 0 {
      interaction.reply(ResponseContent::Warning(&format!("git exited with code {code}")))?;
    }
  }
  Ok(())
}

/// Creates the document's folder, copies `files` into it under `stored_names` and writes the
/// marker file, returning its path.
///
/// A folder that cannot be completely filled is removed again.
fn fill_folder(
  document: &mut Document,
  files: &[PathBuf],
  stored_names: Vec<String>,
  info_name: &str,
) -> Result<PathBuf> {
  let folder = document
    .folder()
    .map(Path::to_path_buf)
    .ok_or_else(|| FoliodError::Usage("The new document has no folder".to_string()))?;
  if let Some(parent) = folder.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::create_dir(&folder)?;

  let filled = copy_files(&folder, document, files, stored_names)
    .and_then(|()| Ok(document.save(info_name)?));
  if filled.is_err() {
    warn!("Removing incomplete document folder {}", folder.display());
    if let Err(e) = std::fs::remove_dir_all(&folder) {
      warn!("Could not remove {}: {e}", folder.display());
    }
  }
  filled
}

/// Copies every file into `folder`, suffixing names that are already taken.
fn copy_files(
  folder: &Path,
  document: &mut Document,
  files: &[PathBuf],
  stored_names: Vec<String>,
) -> Result<()> {
  for (file, stored) in files.iter().zip(stored_names) {
    let (stem, extension) = match stored.rsplit_once('.') {
      Some((stem, extension)) => (stem.to_string(), format!(".{extension}")),
      None => (stored.clone(), String::new()),
    };
    let target = if folder.join(&stored).exists() {
      free_name(&stem, |candidate| folder.join(format!("{candidate}{extension}")).exists())?
        + &extension
    } else {
      stored
    };
    std::fs::copy(file, folder.join(&target))?;
    trace!("Copied {} into {}", file.display(), folder.display());
    document.add_file(&target);
  }
  Ok(())
}

/// Cleaned file name with the extension of its detected format.
///
/// Plain files keep their own extension, since "text" covers everything from notes to BibTeX,
/// unless it claims one of the recognised binary formats.
fn stored_name(file: &Path, format: FileFormat) -> String {
  let stem = file.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
  let stem = match clean_document_name(&stem) {
    stem if stem.is_empty() => FALLBACK_NAME.to_string(),
    stem => stem,
  };
  let own = file.extension().map(|extension| clean_document_name(&extension.to_string_lossy()));
  let extension = match (format, own) {
    (FileFormat::Text, Some(own))
      if !own.is_empty() && FileFormat::KNOWN.iter().all(|known| known.extension() != own) =>
      own,
    _ => format.extension().to_string(),
  };
  format!("{stem}.{extension}")
}

/// `base` itself when free, otherwise `base-<suffix>` for the first free suffix.
fn free_name(base: &str, taken: impl Fn(&str) -> bool) -> Result<String> {
  if !taken(base) {
    return Ok(base.to_string());
  }
  unique_identifier(base, SUFFIX_ALPHABET, taken)
    .ok_or_else(|| FoliodError::Usage(format!("No free name left for \"{base}\"")))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_key_value() {
    assert_eq!(parse_key_value("author=Einstein, A.").unwrap(), (
      "author".to_string(),
      "Einstein, A.".to_string()
    ));
    assert_eq!(parse_key_value("note=a=b").unwrap().1, "a=b");
    assert!(parse_key_value("=x").is_err());
    assert!(parse_key_value("no-separator").is_err());
  }

  #[test]
  fn test_stored_name() {
    assert_eq!(stored_name(Path::new("/tmp/My Paper.PDF"), FileFormat::Pdf), "my-paper.pdf");
    assert_eq!(stored_name(Path::new("scan.bin"), FileFormat::Djvu), "scan.djvu");
    assert_eq!(stored_name(Path::new("refs.bib"), FileFormat::Text), "refs.bib");
    assert_eq!(stored_name(Path::new("README"), FileFormat::Text), "readme.txt");
    assert_eq!(stored_name(Path::new("fake.pdf"), FileFormat::Text), "fake.txt");
  }

  #[test]
  fn test_failed_copy_removes_folder() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("present.txt");
    std::fs::write(&present, "notes").unwrap();
    let folder = dir.path().join("library/new-document");
    let mut document = Document::new().with("title", "T").with_folder(&folder);

    let files = vec![present, dir.path().join("vanished.pdf")];
    let names = vec!["present.txt".to_string(), "vanished.pdf".to_string()];
    assert!(fill_folder(&mut document, &files, names, "info.yaml").is_err());
    assert!(!folder.exists());
    assert!(dir.path().join("library").is_dir());
  }

  #[test]
  fn test_fill_folder_writes_marker() {
    let dir = tempfile::tempdir().unwrap();
    let paper = dir.path().join("paper.pdf");
    std::fs::write(&paper, "%PDF-1.4").unwrap();
    let folder = dir.path().join("doc");
    let mut document = Document::new().with("title", "T").with_folder(&folder);

    let files = vec![paper.clone(), paper];
    let names = vec!["paper.pdf".to_string(), "paper.pdf".to_string()];
    let info = fill_folder(&mut document, &files, names, "info.yaml").unwrap();
    assert_eq!(info, folder.join("info.yaml"));
    assert!(folder.join("paper.pdf").is_file());
    assert!(folder.join("paper-a.pdf").is_file());
  }

  #[test]
  fn test_free_name() {
    let taken = ["paper", "paper-a"];
    assert_eq!(free_name("other", |c| taken.contains(&c)).unwrap(), "other");
    assert_eq!(free_name("paper", |c| taken.contains(&c)).unwrap(), "paper-b");
  }
}
