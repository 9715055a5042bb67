//! Short unique identifiers for disambiguating names.
//!
//! [`create_identifier`] enumerates every string over an alphabet: all strings of length one in
//! alphabet order, then all strings of length two in lexicographic product order, and so on
//! without end. Each call starts a fresh sequence.
//!
//! ```
//! use folio::identifier::create_identifier;
//!
//! let first = create_identifier("ab").take(6).collect::<Vec<_>>();
//! assert_eq!(first, ["a", "b", "aa", "ab", "ba", "bb"]);
//! ```

use super::*;

/// Lazy, unbounded sequence of identifiers over an alphabet.
#[derive(Debug, Clone)]
pub struct Identifiers {
  /// The symbols, in order
  alphabet: Vec<char>,
  /// Index into `alphabet` for each position of the next identifier
  digits:   Vec<usize>,
}

/// Starts a new identifier sequence over the characters of `alphabet`.
///
/// An empty alphabet produces an empty sequence.
pub fn create_identifier(alphabet: &str) -> Identifiers {
  Identifiers { alphabet: alphabet.chars().collect(), digits: vec![0] }
}

impl Iterator for Identifiers {
  type Item = String;

  fn next(&mut self) -> Option<String> {
    if self.alphabet.is_empty() {
      return None;
    }
    let current = self.digits.iter().map(|&d| self.alphabet[d]).collect();

    // odometer increment; on overflow every position wraps and the length grows by one
    let base = self.alphabet.len();
    let mut position = self.digits.len();
    loop {
      if position == 0 {
        self.digits.insert(0, 0);
        break;
      }
      position -= 1;
      self.digits[position] += 1;
      if self.digits[position] < base {
        break;
      }
      self.digits[position] = 0;
    }
    Some(current)
  }
}

/// Returns the identifier at `index` (zero-based) of the sequence over `alphabet`.
///
/// Equivalent to `create_identifier(alphabet).nth(index)` without walking the sequence.
pub fn nth_identifier(alphabet: &str, index: usize) -> Option<String> {
  let symbols = alphabet.chars().collect::<Vec<_>>();
  let base = symbols.len();
  match base {
    0 => return None,
    1 => return Some(symbols[0].to_string().repeat(index.checked_add(1)?)),
    _ => {},
  }
  // find the length bucket: there are base^n identifiers of length n
  let mut remaining = index;
  let mut length = 1u32;
  let mut bucket = base;
  while remaining >= bucket {
    remaining -= bucket;
    length += 1;
    bucket = bucket.checked_mul(base)?;
  }
  let mut out = vec![symbols[0]; length as usize];
  for slot in out.iter_mut().rev() {
    *slot = symbols[remaining % base];
    remaining /= base;
  }
  Some(out.into_iter().collect())
}

/// Appends `-<identifier>` to `base`, using the first identifier for which `taken` is false.
///
/// The generator knows nothing about collisions, so the check is up to the caller.
pub fn unique_identifier(
  base: &str,
  alphabet: &str,
  taken: impl Fn(&str) -> bool,
) -> Option<String> {
  create_identifier(alphabet)
    .map(|id| format!("{base}-{id}"))
    .find(|candidate| !taken(candidate.as_str()))
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn test_length_ascending_product_order() {
    let ids = create_identifier("ab").take(14).collect::<Vec<_>>();
    assert_eq!(ids, [
      "a", "b", "aa", "ab", "ba", "bb", "aaa", "aab", "aba", "abb", "baa", "bab", "bba", "bbb"
    ]);
  }

  #[test]
  fn test_restartable() {
    let mut first = create_identifier("xyz");
    first.next();
    first.next();
    assert_eq!(create_identifier("xyz").next().as_deref(), Some("x"));
    assert_eq!(first.next().as_deref(), Some("z"));
  }

  #[test]
  fn test_no_repeats_within_length() {
    let ids = create_identifier("abc").take(3 + 9 + 27).collect::<Vec<_>>();
    let unique = ids.iter().collect::<HashSet<_>>();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(ids.iter().filter(|id| id.len() == 2).count(), 9);
    assert_eq!(ids.last().map(String::as_str), Some("ccc"));
  }

  #[test]
  fn test_empty_alphabet() {
    assert_eq!(create_identifier("").next(), None);
    assert_eq!(nth_identifier("", 0), None);
  }

  #[test]
  fn test_nth_matches_iteration() {
    let alphabet = "abcdefghijklmnopqrstuvwxyz";
    for (index, id) in create_identifier(alphabet).take(800).enumerate() {
      assert_eq!(nth_identifier(alphabet, index), Some(id));
    }
  }

  #[test]
  fn test_single_symbol_alphabet() {
    let ids = create_identifier("x").take(4).collect::<Vec<_>>();
    assert_eq!(ids, ["x", "xx", "xxx", "xxxx"]);
    for (index, id) in ids.into_iter().enumerate() {
      assert_eq!(nth_identifier("x", index), Some(id));
    }
    assert_eq!(nth_identifier("x", 9_999).map(|id| id.len()), Some(10_000));
  }

  #[test]
  fn test_unique_identifier() {
    let taken = ["paper-a", "paper-b"];
    assert_eq!(
      unique_identifier("paper", "abc", |c| taken.contains(&c)).as_deref(),
      Some("paper-c")
    );
    assert_eq!(unique_identifier("paper", "", |_| false), None);
  }
}
