use folio::{
  crossref::crossref_to_data,
  matcher::{locate_document, Filter},
};
use serde_json::json;

use super::*;

#[traced_test]
#[test]
fn test_locate_in_library() -> TestResult<()> {
  let (_config, library, dir) = create_test_library();
  write_document(dir.path(), "bell", "title: On the EPR paradox\nauthor: Bell, J. S.\n");
  write_document(
    dir.path(),
    "epr",
    "title: Something else entirely\nauthor: Nobody\ndoi: 10.1103/PhysRev.47.777\n",
  );
  let documents = library.documents();

  let found = locate_document(&create_test_document(), &documents).ok_or("not located")?;
  assert_eq!(found.folder(), Some(dir.path().join("epr").as_path()));

  let by_author_and_title =
    Document::new().with("title", "On the EPR paradox").with("author", "Bell, J. S.");
  let found = locate_document(&by_author_and_title, &documents).ok_or("not located")?;
  assert_eq!(found.folder(), Some(dir.path().join("bell").as_path()));

  let unrelated = Document::new().with("title", "On the EPR paradox").with("author", "Bohm");
  assert!(locate_document(&unrelated, &documents).is_none());
  Ok(())
}

#[test]
fn test_crossref_record_matches_stored_document() -> TestResult<()> {
  let (_config, library, dir) = create_test_library();
  write_document(dir.path(), "epr", "doi: 10.1103/PhysRev.47.777\n");

  let fetched = crossref_to_data(&json!({
    "message": {
      "DOI": "10.1103/PhysRev.47.777",
      "title": ["Can Quantum-Mechanical Description of Physical Reality Be Considered Complete?"],
      "author": [{ "given": "A.", "family": "Einstein" }]
    }
  }))?;
  assert!(locate_document(&fetched, &library.documents()).is_some());
  Ok(())
}

#[test]
fn test_filter_over_library() -> TestResult<()> {
  let (_config, library, dir) = create_test_library();
  write_document(dir.path(), "a", "author: Einstein\nyear: 1905\n");
  write_document(dir.path(), "b", "author: Einstein\nyear: 1935\n");
  write_document(dir.path(), "c", "author: Bohr\nyear: 1913\n");
  let documents = library.documents();

  let filter = Filter::new().contains("author", "einstein").equals("year", json!(1935));
  let found = filter.execute(&documents);
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].folder(), Some(dir.path().join("b").as_path()));
  Ok(())
}
