use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Err;

/// Gloss text surrounding each argument place of one predicate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceRecord {
  /// After the first place
  pub bridi1post: Option<String>,
  /// Before the second place
  pub bridi2: Option<String>,
  /// After the second place
  pub bridi2post: Option<String>,
  /// Before the third place onwards
  pub bridirest: Vec<String>,
}

fn present(s: Option<&String>) -> Option<&str> {
  s.map(String::as_str).filter(|s| !s.is_empty())
}

impl PlaceRecord {
  /// Text rendered before an argument in `place` (1-based)
  pub fn before(&self, place: u32) -> Option<&str> {
    match place {
      0 | 1 => None,
      2 => present(self.bridi2.as_ref()),
      n => present(self.bridirest.get(n as usize - 3)),
    }
  }

  /// Text rendered after an argument in `place` (1-based)
  pub fn after(&self, place: u32) -> Option<&str> {
    match place {
      1 => present(self.bridi1post.as_ref()),
      2 => present(self.bridi2post.as_ref()),
      _ => None,
    }
  }
}

/// Place records keyed by predicate head word. Read-only while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceTable(HashMap<String, PlaceRecord>);

impl PlaceTable {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, word: impl Into<String>, record: PlaceRecord) {
    self.0.insert(word.into(), record);
  }

  pub fn get(&self, word: &str) -> Option<&PlaceRecord> {
    self.0.get(word)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Err> {
    fs::read_to_string(path)?.parse()
  }
}

impl FromStr for PlaceTable {
  type Err = Err;

  /// Parses a JSON object of `word -> record`
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(serde_json::from_str(s)?)
  }
}

impl FromIterator<(String, PlaceRecord)> for PlaceTable {
  fn from_iter<I: IntoIterator<Item = (String, PlaceRecord)>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}
