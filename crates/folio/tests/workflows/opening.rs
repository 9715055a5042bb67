use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use folio::{
  filetype::{guess_file_extension, FileFormat},
  opener::{general_open, FirstPicker, Opened, Opener, Target},
};

use super::*;

#[traced_test]
#[test]
fn test_open_document_file_with_callback() -> TestResult<()> {
  let (config, library, dir) = create_test_library();
  let folder = write_document(dir.path(), "epr", "title: EPR\nfiles:\n- notes.txt\n- epr.pdf\n");
  fs::write(folder.join("notes.txt"), "some notes")?;
  fs::write(folder.join("epr.pdf"), "%PDF-1.3")?;

  let calls = Arc::new(AtomicUsize::new(0));
  let seen = Arc::clone(&calls);
  let config = config.with_callback(
    "opentool",
    Arc::new(move |path: &Path| -> folio::error::Result<i32> {
      seen.fetch_add(1, Ordering::SeqCst);
      Ok(match guess_file_extension(path.into())? {
        FileFormat::Pdf => 1,
        _ => 2,
      })
    }),
  );

  let documents = library.documents();
  let files = documents[0].files();
  assert_eq!(files.len(), 2);

  // the first-choice picker opens notes.txt
  let opened = general_open(Target::Choice(files), "opentool", &config, None, None, true, &FirstPicker)?;
  assert!(matches!(opened, Opened::Returned(2)));

  let opened =
    general_open(Target::Path(folder.join("epr.pdf")), "viewer", &config, None, None, true, &FirstPicker)?;
  assert!(matches!(opened, Opened::Returned(1)));
  assert_eq!(calls.load(Ordering::SeqCst), 2);
  Ok(())
}

#[test]
fn test_default_opener_and_errors() -> TestResult<()> {
  let (config, _library, dir) = create_test_library();
  let path = dir.path().join("missing.pdf");

  let default = Opener::Callback(Arc::new(|_: &Path| -> folio::error::Result<i32> { Ok(42) }));
  let opened = general_open(path.clone().into(), "viewer", &config, None, Some(default), true, &FirstPicker)?;
  assert!(matches!(opened, Opened::Returned(42)));

  let result = general_open(path.into(), "viewer", &config, None, None, true, &FirstPicker);
  assert!(matches!(result, Err(FolioError::Config(_))));

  let result = general_open(Target::Choice(Vec::new()), "viewer", &config, None, None, true, &FirstPicker);
  assert!(matches!(result, Err(FolioError::Config(_) | FolioError::NothingSelected)));
  Ok(())
}
