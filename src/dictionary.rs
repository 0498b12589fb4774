use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::Err;

/// Word lookups used by the gloss renderer. Implementations match words
/// case-insensitively; a miss is not an error.
pub trait Dictionary {
  /// English gloss word for `word`
  fn gloss(&self, word: &str) -> Option<&str>;

  /// Keyword describing argument `place` of `word`
  fn keyword(&self, word: &str, place: u32) -> Option<&str>;
}

/// A dictionary that knows no words
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDictionary;

impl Dictionary for NullDictionary {
  fn gloss(&self, _word: &str) -> Option<&str> {
    None
  }

  fn keyword(&self, _word: &str, _place: u32) -> Option<&str> {
    None
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Entry {
  pub gloss: Option<String>,
  /// Place number -> keyword
  pub keywords: BTreeMap<u32, String>,
}

/// In-memory dictionary, keyed by lowercased word
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
  entries: HashMap<String, Entry>,
}

impl WordList {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, word: &str, entry: Entry) {
    self.entries.insert(word.to_lowercase(), entry);
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Err> {
    fs::read_to_string(path)?.parse()
  }

  fn entry(&self, word: &str) -> Option<&Entry> {
    let entry = self.entries.get(&word.to_lowercase());
    if entry.is_none() {
      trace!(word, "dictionary miss");
    }
    entry
  }
}

impl FromStr for WordList {
  type Err = Err;

  /// Parses a JSON object of `word -> { gloss, keywords }`
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let raw: HashMap<String, Entry> = serde_json::from_str(s)?;
    let mut words = Self::new();
    for (word, entry) in raw {
      words.insert(&word, entry);
    }
    Ok(words)
  }
}

impl Dictionary for WordList {
  fn gloss(&self, word: &str) -> Option<&str> {
    self.entry(word)?.gloss.as_deref()
  }

  fn keyword(&self, word: &str, place: u32) -> Option<&str> {
    self.entry(word)?.keywords.get(&place).map(String::as_str)
  }
}
