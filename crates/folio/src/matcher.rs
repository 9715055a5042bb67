//! Deciding whether a document is already part of a collection.
//!
//! Matching runs in two passes:
//!
//! 1. **Strong identifiers.** The existing documents are scanned in order, and for each one the
//!    keys of [`STRONG_IDENTIFIERS`] are checked in priority order. The first document sharing an
//!    equal value for one of them with the candidate is the match.
//! 2. **Author and title.** Otherwise, a [`Filter`] on exact `author` and `title` equality is run
//!    over the whole collection. The match is accepted only when it is unique, so an ambiguous
//!    result counts as no match rather than risking a wrong merge.
//!
//! # Examples
//!
//! ```
//! use folio::{document::Document, matcher::locate_document};
//!
//! let existing = vec![Document::new().with("doi", "10.1/x").with("author", "Z")];
//! let candidate = Document::new().with("doi", "10.1/x").with("author", "A").with("title", "T");
//! assert!(locate_document(&candidate, &existing).is_some());
//! ```

use super::*;

/// Keys treated as authoritative for identity, in priority order.
pub const STRONG_IDENTIFIERS: [&str; 5] = ["doi", "ref", "isbn", "isbn10", "url"];

/// Returns the existing document that `document` duplicates, if any.
///
/// `None` is an ordinary outcome: it means the candidate is new (or could not be told apart
/// from several existing documents).
pub fn locate_document<'a>(document: &Document, documents: &'a [Document]) -> Option<&'a Document> {
  if let Some(found) = documents.iter().find(|existing| shares_strong_identifier(document, existing))
  {
    debug!("Located {found} through a strong identifier");
    return Some(found);
  }

  let filter = Filter::author_and_title(document)?;
  match filter.execute(documents).as_slice() {
    [single] => {
      debug!("Located {single} through author and title");
      Some(*single)
    },
    [] => None,
    several => {
      debug!("{} documents share author and title, treating as no match", several.len());
      None
    },
  }
}

/// Whether both documents carry an equal value for any strong identifier.
fn shares_strong_identifier(candidate: &Document, existing: &Document) -> bool {
  STRONG_IDENTIFIERS.iter().any(|key| match (candidate.get(key), existing.get(key)) {
    (Some(a), Some(b)) => a == b,
    _ => false,
  })
}

/// A single field condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
  /// The field is present and exactly equal to the value
  Equals {
    /// Field name
    key:   String,
    /// Required value
    value: Value,
  },
  /// The field's text contains the value, ignoring case
  Contains {
    /// Field name
    key:    String,
    /// Required substring
    needle: String,
  },
}

impl Criterion {
  /// Whether `document` satisfies this criterion.
  pub fn matches(&self, document: &Document) -> bool {
    match self {
      Criterion::Equals { key, value } => document.get(key) == Some(value),
      Criterion::Contains { key, needle } => document
        .get_str(key)
        .is_some_and(|text| text.to_lowercase().contains(&needle.to_lowercase())),
    }
  }
}

/// A conjunction of field criteria evaluated over an in-memory collection.
///
/// ```
/// use folio::{document::Document, matcher::Filter};
///
/// let documents = vec![
///   Document::new().with("author", "Einstein").with("year", "1905"),
///   Document::new().with("author", "Bohr").with("year", "1913"),
/// ];
/// let found = Filter::new().contains("author", "einst").execute(&documents);
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
  /// All of these must hold
  criteria: Vec<Criterion>,
}

impl Filter {
  /// A filter matching every document.
  pub fn new() -> Self { Self::default() }

  /// Requires `key` to equal `value` exactly.
  pub fn equals(mut self, key: &str, value: Value) -> Self {
    self.criteria.push(Criterion::Equals { key: key.to_string(), value });
    self
  }

  /// Requires the text of `key` to contain `needle`, ignoring case.
  pub fn contains(mut self, key: &str, needle: &str) -> Self {
    self.criteria.push(Criterion::Contains { key: key.to_string(), needle: needle.to_string() });
    self
  }

  /// Exact `author` and `title` equality with `document`, or `None` if it lacks either field.
  pub fn author_and_title(document: &Document) -> Option<Self> {
    let author = document.get("author")?.clone();
    let title = document.get("title")?.clone();
    Some(Self::new().equals("author", author).equals("title", title))
  }

  /// Whether `document` satisfies every criterion.
  pub fn matches(&self, document: &Document) -> bool {
    self.criteria.iter().all(|criterion| criterion.matches(document))
  }

  /// The matching documents, in collection order.
  pub fn execute<'a>(&self, documents: &'a [Document]) -> Vec<&'a Document> {
    documents.iter().filter(|document| self.matches(document)).collect()
  }
}
