//! Library indexing: finding the folders that hold a document.
//!
//! A folder holds a document when it directly contains the marker file. Indexing is best effort,
//! so a subtree that cannot be read is logged and skipped instead of failing the whole scan.

use regex::RegexBuilder;
use walkdir::WalkDir;

use super::*;

/// Search term matching every folder.
pub const MATCH_ALL: &str = ".";

/// Crawls `root` and returns every folder (including `root` itself) that directly contains a
/// file named `info_name`.
///
/// Folders are returned in traversal order. Each directory is visited once, so the result holds
/// no duplicates. Symbolic links are not followed.
pub fn get_folders(root: impl AsRef<Path>, info_name: &str) -> Vec<PathBuf> {
  let root = root.as_ref();
  debug!("Indexing folders under {}", root.display());
  let mut folders = Vec::new();
  for entry in WalkDir::new(root) {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) => {
        warn!("Skipping unreadable path while indexing: {e}");
        continue;
      },
    };
    if entry.file_type().is_dir() && entry.path().join(info_name).is_file() {
      trace!("Found document folder {}", entry.path().display());
      folders.push(entry.into_path());
    }
  }
  debug!("Indexed {} folders", folders.len());
  folders
}

/// Keeps the folders whose path matches `search`, preserving their order.
///
/// `search` is a case-insensitive regular expression; one that does not compile is matched
/// literally instead.
pub fn filter_folders(folders: Vec<PathBuf>, search: &str) -> Result<Vec<PathBuf>> {
  let pattern = match RegexBuilder::new(search).case_insensitive(true).build() {
    Ok(pattern) => pattern,
    Err(e) => {
      debug!("Search {search:?} is not a valid expression ({e}), matching it literally");
      RegexBuilder::new(&regex::escape(search)).case_insensitive(true).build()?
    },
  };
  Ok(folders.into_iter().filter(|folder| pattern.is_match(&folder.to_string_lossy())).collect())
}

#[cfg(test)]
mod tests {
  use std::{collections::BTreeSet, fs};

  use super::*;

  fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "title: x\n").unwrap();
  }

  #[traced_test]
  #[test]
  fn test_only_marker_folders_are_indexed() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    touch(&root.join("einstein-relativity/info.yaml"));
    touch(&root.join("physics/bohr-atom/info.yaml"));
    touch(&root.join("physics/notes.txt"));
    fs::create_dir_all(root.join("empty/deeper")).unwrap();

    let found = get_folders(root, "info.yaml").into_iter().collect::<BTreeSet<_>>();
    let expected = [root.join("einstein-relativity"), root.join("physics/bohr-atom")]
      .into_iter()
      .collect::<BTreeSet<_>>();
    assert_eq!(found, expected);

    touch(&root.join("empty/deeper/unrelated.yaml"));
    let again = get_folders(root, "info.yaml").into_iter().collect::<BTreeSet<_>>();
    assert_eq!(again, expected);
  }

  #[test]
  fn test_root_itself_and_marker_in_subfolder_only() {
    let dir = tempdir().unwrap();
    assert!(get_folders(dir.path(), "info.yaml").is_empty());

    touch(&dir.path().join("info.yaml"));
    assert_eq!(get_folders(dir.path(), "info.yaml"), vec![dir.path().to_path_buf()]);
  }

  #[test]
  fn test_marker_must_be_a_file() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("doc/info.yaml")).unwrap();
    assert!(get_folders(dir.path(), "info.yaml").is_empty());
  }

  #[test]
  fn test_missing_root_is_empty() {
    let dir = tempdir().unwrap();
    assert!(get_folders(dir.path().join("does-not-exist"), "info.yaml").is_empty());
  }

  #[cfg(unix)]
  #[traced_test]
  #[test]
  fn test_unreadable_subfolder_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    touch(&dir.path().join("ok/info.yaml"));
    touch(&dir.path().join("locked/inner/info.yaml"));
    let locked = dir.path().join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
      // permissions are not enforced, e.g. for root
      fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
      return;
    }

    let found = get_folders(dir.path(), "info.yaml");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(found.contains(&dir.path().join("ok")));
    assert!(!found.contains(&dir.path().join("locked/inner")));
    assert!(logs_contain("Skipping unreadable path"));
  }

  #[test]
  fn test_filter_folders() {
    let folders = vec![
      PathBuf::from("/lib/einstein-relativity"),
      PathBuf::from("/lib/bohr-atom"),
      PathBuf::from("/lib/Einstein-Brownian"),
    ];
    assert_eq!(filter_folders(folders.clone(), MATCH_ALL).unwrap(), folders);
    assert_eq!(filter_folders(folders.clone(), "einstein").unwrap(), vec![
      PathBuf::from("/lib/einstein-relativity"),
      PathBuf::from("/lib/Einstein-Brownian"),
    ]);
    assert_eq!(filter_folders(folders.clone(), "bohr.*atom").unwrap(), vec![PathBuf::from(
      "/lib/bohr-atom"
    )]);
    assert!(filter_folders(folders.clone(), "(unclosed").unwrap().is_empty());
    let literal = vec![PathBuf::from("/lib/(unclosed")];
    assert_eq!(filter_folders(literal.clone(), "(unclosed").unwrap(), literal);
    assert!(filter_folders(folders, "curie").unwrap().is_empty());
  }
}
