//! File format detection from content.
//!
//! Formats are recognised by their signatures (magic bytes), never by file name, so a PDF renamed
//! to `.txt` is still a PDF. Detection first yields a MIME type. [`file_is`] then checks whether
//! that MIME type mentions a format name, and [`guess_file_extension`] tries the library formats
//! in a fixed order.
//!
//! A file that cannot be read is reported as [`FolioError::Unreadable`], never as "no format
//! matched".
//!
//! # Examples
//!
//! ```
//! use folio::filetype::{guess_file_extension, is_pdf, FileDescription, FileFormat};
//!
//! let buffer = b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n1 0 obj";
//! assert!(is_pdf(FileDescription::Buffer(buffer)).unwrap());
//! assert_eq!(guess_file_extension(FileDescription::Buffer(b"plain words")).unwrap(), FileFormat::Text);
//! ```

use std::io::Read;

use super::*;

/// How many leading bytes of a file are inspected.
pub const PROBE_LENGTH: u64 = 8192;

/// MIME type of PDF documents.
pub const MIME_PDF: &str = "application/pdf";
/// MIME type of DjVu documents.
pub const MIME_DJVU: &str = "image/vnd.djvu";
/// MIME type of EPUB books.
pub const MIME_EPUB: &str = "application/epub+zip";
/// MIME type of Mobipocket books.
pub const MIME_MOBI: &str = "application/x-mobipocket-ebook";
/// MIME type of ZIP archives that are not EPUB books.
pub const MIME_ZIP: &str = "application/zip";
/// MIME type of empty content.
pub const MIME_EMPTY: &str = "application/x-empty";
/// MIME type of UTF-8 text.
pub const MIME_TEXT: &str = "text/plain";
/// MIME type of unrecognised binary content.
pub const MIME_BINARY: &str = "application/octet-stream";

/// Content to classify: a file on disk or bytes already in memory.
#[derive(Debug, Clone, Copy)]
pub enum FileDescription<'a> {
  /// A file whose leading bytes are read
  Path(&'a Path),
  /// Bytes to inspect directly
  Buffer(&'a [u8]),
}

impl<'a> From<&'a Path> for FileDescription<'a> {
  fn from(path: &'a Path) -> Self { FileDescription::Path(path) }
}

impl<'a> From<&'a PathBuf> for FileDescription<'a> {
  fn from(path: &'a PathBuf) -> Self { FileDescription::Path(path.as_path()) }
}

impl<'a> From<&'a [u8]> for FileDescription<'a> {
  fn from(buffer: &'a [u8]) -> Self { FileDescription::Buffer(buffer) }
}

/// The document formats a library distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
  /// Portable Document Format
  Pdf,
  /// DjVu
  Djvu,
  /// EPUB
  Epub,
  /// Mobipocket
  Mobi,
  /// Anything else
  Text,
}

impl FileFormat {
  /// Formats tried by [`guess_file_extension`], in order.
  pub const KNOWN: [FileFormat; 4] =
    [FileFormat::Pdf, FileFormat::Djvu, FileFormat::Epub, FileFormat::Mobi];

  /// Lowercase format name, also used as the file extension.
  pub fn extension(&self) -> &'static str {
    match self {
      FileFormat::Pdf => "pdf",
      FileFormat::Djvu => "djvu",
      FileFormat::Epub => "epub",
      FileFormat::Mobi => "mobi",
      FileFormat::Text => "txt",
    }
  }
}

impl Display for FileFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.extension())
  }
}

/// Detects the MIME type of `description` from its content.
pub fn mime_type(description: FileDescription) -> Result<&'static str> {
  match description {
    FileDescription::Buffer(buffer) => Ok(sniff(buffer)),
    FileDescription::Path(path) => {
      let head = read_head(path)?;
      Ok(sniff(&head))
    },
  }
}

/// Reads the first [`PROBE_LENGTH`] bytes of `path`.
fn read_head(path: &Path) -> Result<Vec<u8>> {
  let unreadable = |source| FolioError::Unreadable { path: path.to_path_buf(), source };
  let file = std::fs::File::open(path).map_err(unreadable)?;
  let mut head = Vec::new();
  file.take(PROBE_LENGTH).read_to_end(&mut head).map_err(unreadable)?;
  Ok(head)
}

/// Matches `bytes` against the signature table.
fn sniff(bytes: &[u8]) -> &'static str {
  if bytes.starts_with(b"%PDF-") {
    MIME_PDF
  } else if bytes.starts_with(b"AT&TFORM")
    && matches!(bytes.get(12..16), Some(b"DJVU" | b"DJVM" | b"DJVI"))
  {
    MIME_DJVU
  } else if bytes.starts_with(b"PK\x03\x04") {
    // EPUB stores an uncompressed `mimetype` entry first, right after the 30-byte local header
    if bytes.get(30..38) == Some(&b"mimetype"[..])
      && bytes.get(38..58) == Some(&b"application/epub+zip"[..])
    {
      MIME_EPUB
    } else {
      MIME_ZIP
    }
  } else if bytes.get(60..68) == Some(&b"BOOKMOBI"[..]) {
    MIME_MOBI
  } else if bytes.is_empty() {
    MIME_EMPTY
  } else if is_text(bytes) {
    MIME_TEXT
  } else {
    MIME_BINARY
  }
}

/// Whether `bytes` look like text: UTF-8 (allowing a sequence cut off by the probe length) with
/// no NUL bytes.
fn is_text(bytes: &[u8]) -> bool {
  if bytes.contains(&0) {
    return false;
  }
  match std::str::from_utf8(bytes) {
    Ok(_) => true,
    Err(e) => e.error_len().is_none() && bytes.len() as u64 >= PROBE_LENGTH,
  }
}

/// Whether the content of `description` is of format `fmt`.
///
/// True when the detected MIME type contains `fmt`, ignoring case.
pub fn file_is(description: FileDescription, fmt: &str) -> Result<bool> {
  let mime = mime_type(description)?;
  let result = mime.to_lowercase().contains(&fmt.to_lowercase());
  if result {
    match description {
      FileDescription::Path(path) =>
        debug!("File {} appears to be of type {fmt}", path.display()),
      FileDescription::Buffer(_) => debug!("Buffer appears to be of type {fmt}"),
    }
  }
  Ok(result)
}

/// Whether the content is a PDF document.
pub fn is_pdf(description: FileDescription) -> Result<bool> { file_is(description, "pdf") }

/// Whether the content is a DjVu document.
pub fn is_djvu(description: FileDescription) -> Result<bool> { file_is(description, "djvu") }

/// Whether the content is an EPUB book.
pub fn is_epub(description: FileDescription) -> Result<bool> { file_is(description, "epub") }

/// Whether the content is a Mobipocket book.
pub fn is_mobi(description: FileDescription) -> Result<bool> { file_is(description, "mobi") }

/// Classifies the content as the first of [`FileFormat::KNOWN`] it matches, or
/// [`FileFormat::Text`].
///
/// The content is probed once, even for a path.
pub fn guess_file_extension(description: FileDescription) -> Result<FileFormat> {
  let head;
  let buffer = match description {
    FileDescription::Buffer(buffer) => buffer,
    FileDescription::Path(path) => {
      head = read_head(path)?;
      head.as_slice()
    },
  };
  for format in FileFormat::KNOWN {
    if file_is(FileDescription::Buffer(buffer), format.extension())? {
      return Ok(format);
    }
  }
  Ok(FileFormat::Text)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn epub() -> Vec<u8> {
    let mut bytes = b"PK\x03\x04".to_vec();
    bytes.resize(30, 0);
    bytes.extend_from_slice(b"mimetypeapplication/epub+zipPK\x03\x04");
    bytes
  }

  fn mobi() -> Vec<u8> {
    let mut bytes = b"Some Book Title".to_vec();
    bytes.resize(60, 0);
    bytes.extend_from_slice(b"BOOKMOBI");
    bytes.resize(200, 0);
    bytes
  }

  fn djvu() -> Vec<u8> { b"AT&TFORM\x00\x00\x10\x00DJVUINFO".to_vec() }

  #[test]
  fn test_signatures() {
    let cases: [(Vec<u8>, FileFormat); 5] = [
      (b"%PDF-1.4\n".to_vec(), FileFormat::Pdf),
      (djvu(), FileFormat::Djvu),
      (epub(), FileFormat::Epub),
      (mobi(), FileFormat::Mobi),
      (b"title: some notes\n".to_vec(), FileFormat::Text),
    ];
    for (bytes, expected) in cases {
      assert_eq!(guess_file_extension(FileDescription::Buffer(&bytes)).unwrap(), expected);
    }
  }

  #[test]
  fn test_mime_types() {
    assert_eq!(mime_type(FileDescription::Buffer(b"")).unwrap(), MIME_EMPTY);
    assert_eq!(mime_type(FileDescription::Buffer(b"PK\x03\x04rest")).unwrap(), MIME_ZIP);
    assert_eq!(mime_type(FileDescription::Buffer(b"\x00\x01\x02")).unwrap(), MIME_BINARY);
    assert_eq!(mime_type(FileDescription::Buffer("naïve".as_bytes())).unwrap(), MIME_TEXT);
  }

  #[test]
  fn test_file_is_case_insensitive_substring() {
    let buffer = b"%PDF-1.5";
    assert!(file_is(FileDescription::Buffer(buffer), "PDF").unwrap());
    assert!(file_is(FileDescription::Buffer(buffer), "application").unwrap());
    assert!(!file_is(FileDescription::Buffer(buffer), "djvu").unwrap());
    assert!(is_mobi(FileDescription::Buffer(&mobi())).unwrap());
    assert!(is_epub(FileDescription::Buffer(&epub())).unwrap());
    assert!(is_djvu(FileDescription::Buffer(&djvu())).unwrap());
  }

  #[traced_test]
  #[test]
  fn test_extension_is_ignored() {
    let dir = tempdir().unwrap();
    let disguised = dir.path().join("notes.txt");
    std::fs::write(&disguised, b"%PDF-1.7\nbinary").unwrap();
    assert!(is_pdf(FileDescription::Path(&disguised)).unwrap());
    assert_eq!(guess_file_extension((&disguised).into()).unwrap(), FileFormat::Pdf);

    let honest = dir.path().join("paper.pdf");
    std::fs::write(&honest, "just text").unwrap();
    assert_eq!(guess_file_extension((&honest).into()).unwrap(), FileFormat::Text);
  }

  #[test]
  fn test_unreadable_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.pdf");
    assert!(matches!(
      is_pdf(FileDescription::Path(&missing)),
      Err(FolioError::Unreadable { path, .. }) if path == missing
    ));
    assert!(matches!(
      guess_file_extension(FileDescription::Path(dir.path())),
      Err(FolioError::Unreadable { .. })
    ));
  }
}
