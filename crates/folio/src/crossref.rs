//! Bibliographic metadata from DOIs via the Crossref API.
//!
//! [`doi_to_data`] fetches `https://api.crossref.org/works/<doi>` and maps the response onto a
//! [`Document`] with [`crossref_to_data`]. The mapping is split out so it can be used (and tested)
//! without network access.

use reqwest::{header::USER_AGENT, Url};
use serde_json::json;

use super::*;

/// Crossref endpoint for single works.
pub const CROSSREF_WORKS_URL: &str = "https://api.crossref.org/works";

/// Resolvers whose URL paths are DOIs.
const DOI_HOSTS: [&str; 3] = ["doi.org", "dx.doi.org", "www.doi.org"];

/// Pulls a DOI out of a bare DOI, a `doi:` prefixed one, or a `doi.org` / `dx.doi.org` URL.
///
/// ```
/// use folio::crossref::extract_doi;
///
/// assert_eq!(extract_doi("https://doi.org/10.1103/PhysRev.47.777").unwrap(), "10.1103/PhysRev.47.777");
/// assert!(extract_doi("https://example.org/10.1103/PhysRev.47.777").is_err());
/// ```
pub fn extract_doi(input: &str) -> Result<String> {
  lazy_static! {
    static ref DOI: Regex = Regex::new(r"^10\.\d{4,9}/\S+$").unwrap();
  }
  let input = input.trim();
  let candidate = match Url::parse(input) {
    Ok(url) if matches!(url.scheme(), "http" | "https") => match url.host_str() {
      Some(host) if DOI_HOSTS.contains(&host) => url.path().trim_start_matches('/').to_string(),
      _ => return Err(FolioError::InvalidIdentifier(input.to_string())),
    },
    _ => input.strip_prefix("doi:").unwrap_or(input).to_string(),
  };

  if DOI.is_match(&candidate) {
    Ok(candidate)
  } else {
    Err(FolioError::InvalidIdentifier(input.to_string()))
  }
}

/// Fetches the Crossref record for `doi` and converts it to a document.
///
/// `doi` may be anything [`extract_doi`] accepts.
pub async fn doi_to_data(doi: &str) -> Result<Document> {
  let doi = extract_doi(doi)?;
  let url = format!("{CROSSREF_WORKS_URL}/{doi}");
  debug!("Fetching metadata from {url}");

  let client = reqwest::Client::new();
  let response = client
    .get(&url)
    .header(USER_AGENT, concat!("folio/", env!("CARGO_PKG_VERSION")))
    .send()
    .await?;

  let status = response.status();
  if !status.is_success() {
    return Err(FolioError::ApiError(format!("Crossref answered {status} for {doi}")));
  }
  let data = response.bytes().await?;
  trace!("Crossref response: {}", String::from_utf8_lossy(&data));

  let json: Value = serde_json::from_slice(&data)?;
  crossref_to_data(&json)
}

/// Maps a Crossref `works` response onto a document.
///
/// Fields absent from the response are left out rather than stored empty.
pub fn crossref_to_data(response: &Value) -> Result<Document> {
  let message = response
    .get("message")
    .filter(|message| message.is_object())
    .ok_or_else(|| FolioError::ApiError("Crossref response has no message".to_string()))?;

  let mut document = Document::new();

  if let Some(title) = first_string(message.get("title")) {
    document.set("title", Value::String(title));
  }

  let authors = extract_authors(message);
  if !authors.is_empty() {
    let names = authors.iter().map(|(family, given)| match given {
      Some(given) => format!("{family}, {given}"),
      None => family.clone(),
    });
    document.set("author", Value::String(names.collect::<Vec<_>>().join(" and ")));
    let list = authors
      .iter()
      .map(|(family, given)| json!({ "family": family, "given": given }))
      .collect::<Vec<_>>();
    document.set("author_list", Value::Array(list));
  }

  if let Some(doi) = message.get("DOI").and_then(Value::as_str) {
    document.set("doi", Value::String(doi.to_string()));
  }
  if let Some(journal) = first_string(message.get("container-title")) {
    document.set("journal", Value::String(journal));
  }

  for (source, target) in [
    ("volume", "volume"),
    ("issue", "issue"),
    ("page", "pages"),
    ("publisher", "publisher"),
    ("URL", "url"),
    ("type", "type"),
  ] {
    if let Some(value) = message.get(source).and_then(Value::as_str) {
      document.set(target, Value::String(value.to_string()));
    }
  }

  let year = ["published-print", "published-online", "issued"]
    .iter()
    .find_map(|key| message.pointer(&format!("/{key}/date-parts/0/0")).and_then(Value::as_i64));
  if let Some(year) = year {
    document.set("year", json!(year));
  }

  debug!("Mapped Crossref record to {document}");
  Ok(document)
}

/// The string itself, or the first string of an array.
fn first_string(value: Option<&Value>) -> Option<String> {
  match value? {
    Value::String(s) => Some(s.clone()),
    Value::Array(entries) => entries.first()?.as_str().map(String::from),
    _ => None,
  }
}

/// `(family, given)` for every author; organisations only carry a `name`.
fn extract_authors(message: &Value) -> Vec<(String, Option<String>)> {
  let Some(Value::Array(authors)) = message.get("author") else {
    return Vec::new();
  };
  authors
    .iter()
    .filter_map(|author| {
      let given = author.get("given").and_then(Value::as_str).map(String::from);
      match (author.get("family").and_then(Value::as_str), given) {
        (Some(family), given) => Some((family.to_string(), given)),
        (None, Some(given)) => Some((given, None)),
        (None, None) => author.get("name").and_then(Value::as_str).map(|n| (n.to_string(), None)),
      }
    })
    .collect()
}
