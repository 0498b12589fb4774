#[macro_use]
extern crate lazy_static;

pub mod brackets;
pub mod dictionary;
pub mod error;
pub mod gloss;
pub mod mode;
pub mod places;
pub mod syntree;
pub mod utils;

use tracing::{debug, warn};

use crate::brackets::{Brackets, ElisionExemption, is_place_tag, prettify};
use crate::dictionary::{Dictionary, NullDictionary};
pub use crate::error::RenderError;
use crate::gloss::Glosser;
pub use crate::mode::{Format, Mode};
pub use crate::places::{PlaceRecord, PlaceTable};
pub use crate::syntree::Node;
pub use crate::utils::Err;

/// Renders parse trees. Holds the configuration every rendering call reads:
/// the place table, the dictionary, and which elided leaves stay visible.
/// Built once, then shared read-only.
pub struct Renderer {
  places: PlaceTable,
  dictionary: Box<dyn Dictionary + Send + Sync>,
  exemption: ElisionExemption,
}

impl Default for Renderer {
  fn default() -> Self {
    Self {
      places: PlaceTable::new(),
      dictionary: Box::new(NullDictionary),
      exemption: is_place_tag,
    }
  }
}

impl Renderer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_places(self, places: PlaceTable) -> Self {
    Self { places, ..self }
  }

  pub fn with_dictionary(self, dictionary: impl Dictionary + Send + Sync + 'static) -> Self {
    Self {
      dictionary: Box::new(dictionary),
      ..self
    }
  }

  /// Replaces the rule deciding which elided leaves are shown even when
  /// the `f` flag is off
  pub fn with_exemption(self, exemption: ElisionExemption) -> Self {
    Self { exemption, ..self }
  }

  pub fn places(&self) -> &PlaceTable {
    &self.places
  }

  /// Bracket notation, before prettifying
  pub fn brackets(&self, tree: &Node, mode: &Mode) -> String {
    Brackets::new(mode, self.exemption).render(tree)
  }

  /// English gloss, before prettifying
  pub fn gloss(&self, tree: &Node, mode: &Mode) -> String {
    Glosser::new(&self.places, self.dictionary.as_ref(), mode, self.exemption).gloss(tree)
  }

  /// Renders `tree` in the format `mode` selects
  pub fn format(&self, tree: &Node, mode: &Mode) -> Result<String, RenderError> {
    let format = mode.format()?;
    debug!(%format, s = mode.s, f = mode.f, p = mode.p, "rendering tree");

    let out = match format {
      Format::RawStructure => serde_json::to_string(tree)?,
      Format::Raw => serde_json::to_string(&tree.strip_structure())?,
      Format::Brackets => Self::prettify_checked(&self.brackets(tree, mode)),
      Format::Gloss => Self::prettify_checked(&self.gloss(tree, mode)),
    };
    Ok(out)
  }

  fn prettify_checked(rendered: &str) -> String {
    let (open, close) = utils::bracket_count(rendered);
    debug!(open, close, "bracket count");
    if open != close {
      warn!(open, close, "unbalanced brackets in rendered tree");
    }
    prettify(rendered)
  }
}

/// Renders `tree` with an empty place table and no dictionary
pub fn format(tree: &Node, mode: &Mode) -> Result<String, RenderError> {
  Renderer::default().format(tree, mode)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dictionary::WordList;

  const TREE: &str = r#"{
    "role": "bridi",
    "head": [{
      "place": 1,
      "sumti": { "word": "mi" },
      "structure": [{ "word": "fa", "elided": true, "selmaho": "FA" }, { "word": "mi", "selmaho": "KOhA" }]
    }],
    "tail": {
      "selbri": { "structure": { "word": "klama", "selmaho": "BRIVLA" }, "se_table": [1, 2, 3, 4, 5] },
      "tail_terms": [{
        "place": 2,
        "sumti": [{ "word": "le" }, { "word": "zarci" }, { "word": "ku", "elided": true }]
      }]
    },
    "structure": [
      {
        "place": 1,
        "sumti": { "word": "mi" },
        "structure": [{ "word": "fa", "elided": true, "selmaho": "FA" }, { "word": "mi", "selmaho": "KOhA" }]
      },
      { "word": "cu", "elided": true, "selmaho": "CU" },
      [
        { "structure": { "word": "klama", "selmaho": "BRIVLA" }, "se_table": [1, 2, 3, 4, 5] },
        [{ "word": "le", "selmaho": "LE" }, { "word": "zarci", "selmaho": "BRIVLA" }, { "word": "ku", "elided": true, "selmaho": "KU" }]
      ]
    ]
  }"#;

  fn tree() -> Node {
    serde_json::from_str(TREE).unwrap()
  }

  fn renderer() -> Renderer {
    let places: PlaceTable = r#"{ "klama": { "bridi1post": "goes", "bridi2": "to" } }"#
      .parse()
      .unwrap();
    let words: WordList = r#"{ "zarci": { "gloss": "market" } }"#.parse().unwrap();
    Renderer::new().with_places(places).with_dictionary(words)
  }

  fn mode(format: Format, f: bool, s: bool, p: bool) -> Mode {
    Mode {
      f,
      s,
      p,
      ..Mode::new(format)
    }
  }

  #[test]
  fn test_brackets() {
    let r = renderer();
    let tree = tree();

    assert_eq!(
      r.format(&tree, &mode(Format::Brackets, true, false, false)).unwrap(),
      "([FA mi] CU [klama {le zarci KU}])"
    );
    assert_eq!(
      r.format(&tree, &mode(Format::Brackets, false, false, false)).unwrap(),
      "([FA mi] [klama {le zarci}])"
    );
    assert_eq!(
      r.format(&tree, &mode(Format::Brackets, false, true, false)).unwrap(),
      "([FA KOhA:mi] [BRIVLA:klama {LE:le BRIVLA:zarci}])"
    );
    assert_eq!(
      r.format(&tree, &mode(Format::Brackets, false, false, true)).unwrap(),
      "([FA mi] [{1,2,3,4,5}:klama {le zarci}])"
    );
  }

  #[test]
  fn test_gloss() {
    let r = renderer();
    assert_eq!(
      r.format(&tree(), &Mode::new(Format::Gloss)).unwrap(),
      "([me goes] [to {the market}])"
    );
  }

  #[test]
  fn test_raw_modes() {
    let r = renderer();
    let tree = tree();

    let raw = r.format(&tree, &Mode::new(Format::Raw)).unwrap();
    assert!(!raw.contains("structure"));
    let reparsed: Node = serde_json::from_str(&raw).unwrap();
    assert_eq!(reparsed, tree.strip_structure());

    let full = r.format(&tree, &Mode::new(Format::RawStructure)).unwrap();
    let reparsed: Node = serde_json::from_str(&full).unwrap();
    assert_eq!(reparsed, tree);
  }

  #[test]
  fn test_raw_modes_keep_unknown_content() {
    let src = r#"{"role":"relativized_selbri","structure":[{"word":"poi"},{"word":"klama"}],"quantifier":{"word":"ro"}}"#;
    let tree: Node = serde_json::from_str(src).unwrap();

    let full = format(&tree, &Mode::new(Format::RawStructure)).unwrap();
    assert_eq!(full, src);

    let raw = format(&tree, &Mode::new(Format::Raw)).unwrap();
    assert_eq!(raw, r#"{"role":"relativized_selbri","quantifier":{"word":"ro"}}"#);
  }

  #[test]
  fn test_unknown_format() {
    let mode = Mode {
      format: "pretty".to_string(),
      ..Mode::default()
    };
    let err = format(&tree(), &mode).unwrap_err();
    assert!(matches!(err, RenderError::UnknownFormat(ref m) if m == "pretty"));
    assert_eq!(err.to_string(), "unrecognized mode: pretty");
  }

  #[test]
  fn test_custom_exemption() {
    let r = renderer().with_exemption(|leaf| leaf.word == "cu");
    assert_eq!(
      r.format(&tree(), &mode(Format::Brackets, false, false, false)).unwrap(),
      "(mi CU [klama {le zarci}])"
    );
  }

  #[test]
  fn test_default_renderer() {
    let out = format(&tree(), &Mode::new(Format::Gloss)).unwrap();
    assert_eq!(out, "([klama1 me] [klama2 {the zarci}])");
  }
}
