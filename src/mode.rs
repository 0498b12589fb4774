use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Output format selected by [`Mode::format`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  Brackets,
  Gloss,
  Raw,
  RawStructure,
}

impl FromStr for Format {
  type Err = RenderError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "brackets" | "b" => Ok(Self::Brackets),
      "gloss" | "g" => Ok(Self::Gloss),
      "raw" | "r" => Ok(Self::Raw),
      "rawstructure" => Ok(Self::RawStructure),
      other => Err(RenderError::UnknownFormat(other.to_string())),
    }
  }
}

impl fmt::Display for Format {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Brackets => "brackets",
      Self::Gloss => "gloss",
      Self::Raw => "raw",
      Self::RawStructure => "rawstructure",
    };
    write!(f, "{}", name)
  }
}

/// Rendering options. Fields missing from a serialized mode take their
/// defaults; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mode {
  /// Format name, checked when rendering
  pub format: String,
  /// Show word class (selma'o) tags
  pub s: bool,
  /// Show elided tokens
  pub f: bool,
  /// Show place tables
  pub p: bool,
  /// Grammar start rule, only meaningful to the parser
  #[serde(alias = "startRule")]
  pub start_rule: String,
}

impl Default for Mode {
  fn default() -> Self {
    Self {
      format: Format::Brackets.to_string(),
      s: false,
      f: true,
      p: false,
      start_rule: "text".to_string(),
    }
  }
}

impl Mode {
  pub fn new(format: Format) -> Self {
    Self {
      format: format.to_string(),
      ..Self::default()
    }
  }

  pub fn format(&self) -> Result<Format, RenderError> {
    self.format.parse()
  }
}
