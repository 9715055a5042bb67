use folio::folder::{filter_folders, get_folders, MATCH_ALL};

use super::*;

#[traced_test]
#[test]
fn test_index_nested_library() -> TestResult<()> {
  let (_config, library, dir) = create_test_library();
  write_document(dir.path(), "quantum/epr", "title: EPR\n");
  write_document(dir.path(), "quantum/bell", "title: Bell\n");
  write_document(dir.path(), "relativity", "title: Relativity\n");
  fs::create_dir_all(dir.path().join("inbox"))?;
  fs::write(dir.path().join("inbox/notes.txt"), "todo")?;

  let mut folders = library.folders();
  folders.sort();
  assert_eq!(folders, vec![
    dir.path().join("quantum/bell"),
    dir.path().join("quantum/epr"),
    dir.path().join("relativity"),
  ]);

  let quantum = filter_folders(folders.clone(), "quantum/")?;
  assert_eq!(quantum.len(), 2);
  assert_eq!(filter_folders(folders, MATCH_ALL)?.len(), 3);
  Ok(())
}

#[test]
fn test_custom_marker_name() -> TestResult<()> {
  let dir = tempdir()?;
  fs::create_dir_all(dir.path().join("book"))?;
  fs::write(dir.path().join("book/meta.yaml"), "title: A Book\n")?;
  write_document(dir.path(), "paper", "title: A Paper\n");

  assert_eq!(get_folders(dir.path(), "meta.yaml"), vec![dir.path().join("book")]);

  let library = Library::new("books", dir.path(), "meta.yaml");
  let documents = library.documents();
  assert_eq!(documents.len(), 1);
  assert_eq!(documents[0].get_str("title").as_deref(), Some("A Book"));
  Ok(())
}

#[test]
fn test_saved_documents_are_indexed() -> TestResult<()> {
  let (_config, library, dir) = create_test_library();
  let folder = dir.path().join("epr");
  fs::create_dir_all(&folder)?;
  create_test_document().with_folder(&folder).save(&library.info_name)?;

  let found = library.search("epr")?;
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].get_str("doi").as_deref(), Some("10.1103/PhysRev.47.777"));
  assert_eq!(found[0].folder(), Some(folder.as_path()));
  Ok(())
}
