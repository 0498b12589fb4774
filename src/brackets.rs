use serde_json::Value;
use tracing::warn;

use crate::mode::Mode;
use crate::syntree::{Leaf, Node};
use crate::utils::{SUPERSCRIPT_DIGITS, encode};

/// Rendered in place of a node shape the renderers don't understand
pub const PLACEHOLDER: &str = "[???]";

const OPEN_GLYPHS: [char; 4] = ['(', '[', '{', '<'];
const CLOSE_GLYPHS: [char; 4] = [')', ']', '}', '>'];

/// Decides whether an elided leaf stays visible when elided tokens are hidden
pub type ElisionExemption = fn(&Leaf) -> bool;

/// Place tags (selma'o FA) are filled in by the parser to show implicit
/// places, so they are shown even when elided.
pub fn is_place_tag(leaf: &Leaf) -> bool {
  leaf.selmaho.as_deref() == Some("FA")
}

fn is_falsy(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::Bool(b) => !b,
    Value::Number(n) => n.as_f64() == Some(0.0),
    Value::String(s) => s.is_empty(),
    Value::Array(_) | Value::Object(_) => false,
  }
}

/// Whether a composite child survives filtering: empty composites, empty
/// tokens and null-like values are dropped, and so are elided leaves unless
/// `f` is set or the exemption holds.
pub(crate) fn is_visible(node: &Node, mode: &Mode, exemption: ElisionExemption) -> bool {
  match node {
    Node::Composite(cs) => !cs.is_empty(),
    Node::Text(t) => !t.is_empty(),
    Node::Leaf(leaf) => !leaf.elided || mode.f || exemption(leaf),
    Node::Other(value) => !is_falsy(value),
    _ => true,
  }
}

pub(crate) fn placeholder(node: &Node) -> String {
  warn!(?node, "unrenderable node");
  PLACEHOLDER.to_string()
}

/// Renders a tree in nested-bracket notation
#[derive(Clone)]
pub struct Brackets<'a> {
  mode: &'a Mode,
  exemption: ElisionExemption,
}

impl<'a> Brackets<'a> {
  pub fn new(mode: &'a Mode, exemption: ElisionExemption) -> Self {
    Self { mode, exemption }
  }

  pub fn render(&self, node: &Node) -> String {
    match node {
      Node::Composite(children) => self.render_sequence(children.iter()),
      Node::Wrapper(w) => match w.structure.as_deref() {
        Some(inner) => match (&w.se_table, self.mode.p) {
          (Some(table), true) => {
            let table = table
              .iter()
              .map(u32::to_string)
              .collect::<Vec<_>>()
              .join(",");
            format!("[{}]:{}", table, self.render(inner))
          }
          _ => self.render(inner),
        },
        None => placeholder(node),
      },
      Node::Text(t) => t.clone(),
      Node::Leaf(leaf) => self.render_leaf(leaf),
      Node::Other(_) => placeholder(node),
      _ => match node.structure() {
        Some(inner) => self.render(inner),
        None => self.render_sequence(node.semantic_children().into_iter()),
      },
    }
  }

  fn render_leaf(&self, leaf: &Leaf) -> String {
    let text = if leaf.elided {
      leaf.word.to_uppercase()
    } else {
      leaf.word.clone()
    };
    match &leaf.selmaho {
      Some(selmaho) if self.mode.s && !leaf.elided => format!("{}:{}", selmaho, text),
      _ => text,
    }
  }

  fn render_sequence<'n>(&self, children: impl Iterator<Item = &'n Node>) -> String {
    let visible = children
      .filter(|c| is_visible(c, self.mode, self.exemption))
      .collect::<Vec<_>>();
    if visible.len() == 1 {
      return self.render(visible[0]);
    }
    let rendered = visible
      .into_iter()
      .map(|c| self.render(c))
      .collect::<Vec<_>>();
    format!("[{}]", rendered.join(" "))
  }
}

/// Renders `node` in bracket notation, keeping elided place tags visible
pub fn bracket(node: &Node, mode: &Mode) -> String {
  Brackets::new(mode, is_place_tag).render(node)
}

fn floor_number(depth: usize) -> String {
  if depth != 0 && depth % OPEN_GLYPHS.len() == 0 {
    encode(depth / OPEN_GLYPHS.len(), &SUPERSCRIPT_DIGITS)
  } else {
    String::new()
  }
}

/// Replaces literal brackets with glyphs cycling by depth, `( [ { <`, and
/// numbers each completed cycle with a superscript "floor": the fifth level
/// opens with `(¹`, the ninth with `(²`.
///
/// ```
/// use jbotree::brackets::prettify;
///
/// assert_eq!(prettify("[a [b c]]"), "(a [b c])");
/// assert_eq!(prettify("[[[[[x]]]]]"), "([{<(¹x¹)>}])");
/// ```
pub fn prettify(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  let mut depth = 0usize;
  for c in s.chars() {
    match c {
      '[' => {
        out.push(OPEN_GLYPHS[depth % OPEN_GLYPHS.len()]);
        out.push_str(&floor_number(depth));
        depth += 1;
      }
      ']' if depth > 0 => {
        depth -= 1;
        out.push_str(&floor_number(depth));
        out.push(CLOSE_GLYPHS[depth % CLOSE_GLYPHS.len()]);
      }
      ']' => {
        warn!("unbalanced closing bracket");
        out.push(c);
      }
      c => out.push(c),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::syntree::{Bridi, Role, Tail, Wrapper};
  use serde_json::Map;

  fn mode(f: bool, s: bool, p: bool) -> Mode {
    Mode {
      f,
      s,
      p,
      ..Mode::default()
    }
  }

  fn words(ws: &[&str]) -> Node {
    Node::Composite(ws.iter().map(|w| Node::word(*w)).collect())
  }

  #[test]
  fn test_leaf_rendering() {
    let leaf = Node::Leaf(Leaf::new("klama").with_selmaho("BRIVLA"));
    assert_eq!(bracket(&leaf, &mode(true, false, false)), "klama");
    assert_eq!(bracket(&leaf, &mode(true, true, false)), "BRIVLA:klama");

    let elided = Node::Leaf(Leaf::elided("ku").with_selmaho("KU"));
    // elided words are shouted and never tagged
    assert_eq!(bracket(&elided, &mode(true, true, false)), "KU");
  }

  #[test]
  fn test_composite_and_transparency() {
    let tree = Node::Composite(vec![
      Node::word("mi"),
      Node::Composite(vec![Node::word("klama")]),
      Node::Composite(vec![]),
      words(&["le", "zarci"]),
    ]);
    assert_eq!(bracket(&tree, &Mode::default()), "[mi klama [le zarci]]");

    let single = Node::Composite(vec![Node::Composite(vec![words(&["a", "b"])])]);
    assert_eq!(bracket(&single, &Mode::default()), "[a b]");
    assert_eq!(bracket(&Node::Composite(vec![]), &Mode::default()), "[]");
  }

  #[test]
  fn test_elided_filtering() {
    let tree = Node::Composite(vec![
      Node::Leaf(Leaf::elided("fa").with_selmaho("FA")),
      Node::word("mi"),
      Node::Leaf(Leaf::elided("cu").with_selmaho("CU")),
      Node::word("klama"),
      Node::Leaf(Leaf::elided("vau").with_selmaho("VAU")),
    ]);

    assert_eq!(bracket(&tree, &mode(true, false, false)), "[FA mi CU klama VAU]");
    assert_eq!(bracket(&tree, &mode(false, false, false)), "[FA mi klama]");

    let hidden = mode(false, false, false);
    let nothing_exempt = Brackets::new(&hidden, |_| false);
    assert_eq!(nothing_exempt.render(&tree), "[mi klama]");
  }

  #[test]
  fn test_place_table_prefix() {
    let selbri = Node::Wrapper(Wrapper {
      structure: Some(Box::new(words(&["se", "klama"]))),
      se_table: Some(vec![2, 1, 3, 4, 5]),
      tertau: None,
      extra: Map::new(),
    });
    assert_eq!(bracket(&selbri, &mode(true, false, false)), "[se klama]");
    assert_eq!(
      bracket(&selbri, &mode(true, false, true)),
      "[2,1,3,4,5]:[se klama]"
    );
    assert_eq!(bracket(&Node::wrap(Node::word("x")), &mode(true, false, true)), "x");
  }

  #[test]
  fn test_placeholder() {
    let broken = Node::Composite(vec![Node::word("coi"), Node::Wrapper(Wrapper::default())]);
    assert_eq!(bracket(&broken, &Mode::default()), "[coi [???]]");
  }

  #[test]
  fn test_bare_tokens_and_falsy_values() {
    let tree: Node = serde_json::from_str(r#"[{ "word": "coi" }, "do", null, "", false]"#).unwrap();
    assert_eq!(bracket(&tree, &mode(false, true, false)), "[coi do]");

    let odd: Node = serde_json::from_str(r#"[{ "word": "coi" }, 7]"#).unwrap();
    assert_eq!(bracket(&odd, &Mode::default()), "[coi [???]]");

    let lone: Node = serde_json::from_str(r#"["coi", null]"#).unwrap();
    assert_eq!(bracket(&lone, &Mode::default()), "coi");
  }

  #[test]
  fn test_bridi_without_structure() {
    let tree = Node::Bridi(Bridi {
      role: Role::Bridi,
      head: vec![Node::word("TermA")],
      tail: Some(Box::new(Node::Tail(Tail {
        selbri: Box::new(Node::word("nelci")),
        preterms: vec![],
        tail_terms: vec![Node::word("TermB")],
        fa_after_tail: None,
        structure: None,
        extra: Map::new(),
      }))),
      contents: None,
      structure: None,
      extra: Map::new(),
    });
    assert_eq!(
      bracket(&tree, &mode(false, false, false)),
      "[TermA nelci TermB]"
    );
  }

  #[test]
  fn test_structure_wins_over_semantics() {
    let tree = Node::Bridi(Bridi {
      role: Role::Bridi,
      head: vec![Node::word("ignored")],
      tail: None,
      contents: None,
      structure: Some(Box::new(words(&["coi", "ro", "do"]))),
      extra: Map::new(),
    });
    assert_eq!(bracket(&tree, &Mode::default()), "[coi ro do]");
  }

  #[test]
  fn test_prettify() {
    assert_eq!(prettify("plain"), "plain");
    assert_eq!(prettify("[a [b [c [d]]]]"), "(a [b {c <d>}])");
    assert_eq!(prettify("[[[[[x] y]]]]"), "([{<(¹x¹) y>}])");

    let deep = format!("{}x{}", "[".repeat(9), "]".repeat(9));
    assert_eq!(prettify(&deep), "([{<(¹[{<(²x²)>}]¹)>}])");
  }

  #[test]
  fn test_prettify_unbalanced() {
    assert_eq!(prettify("a] [b"), "a] (b");
  }
}
