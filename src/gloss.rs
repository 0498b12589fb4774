//! English gloss rendering.
//!
//! A gloss is produced in two steps. First the tree is rewritten
//! structurally: bridi are reordered around their predicate, and each term
//! is decorated with the text the predicate's place record puts around its
//! argument place. Then the result is bracketed like the bracket renderer
//! does, except that words are swapped for English through a chain of
//! fixed tables and the dictionary.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::brackets::{ElisionExemption, is_visible, placeholder};
use crate::dictionary::Dictionary;
use crate::mode::Mode;
use crate::places::{PlaceRecord, PlaceTable};
use crate::syntree::{Bridi, Conjunction, Node, Role, Tail};

lazy_static! {
  /// Terminators and other purely structural particles, never rendered
  static ref REMOVED: HashSet<&'static str> =
    ["ku", "ke", "ke'e", "vau", "ku'o", "kei", "boi"].into_iter().collect();

  /// Quotation and parenthesis markers
  static ref UNTRANSLATABLE: HashMap<&'static str, &'static str> = [
    ("lu", "«"),
    ("li'u", "»"),
    ("lo'u", "«"),
    ("le'u", "»"),
    ("to", "("),
    ("toi", ")"),
    ("sei", "("),
    ("se'u", ")"),
  ]
  .into_iter()
  .collect();

  static ref ENGLISH: HashMap<&'static str, &'static str> = [
    ("lo", "a(n)"),
    ("le", "the"),
    ("la", "that-named"),
    ("nu", "event-of"),
    ("zo", "the-word:"),
    ("coi", "hello"),
    ("co'o", "goodbye"),
    ("ro", "each-of"),
    ("ma", "what"),
    ("na", "not"),
    ("na'e", "not"),
    ("nai", "-not"),
    ("nelci", "fond-of"),
    ("ka", "being"),
    ("tu'a", "about"),
    ("ie", "yeah"),
    ("e'u", "I-suggest"),
    ("e", "and"),
    ("a", "and/or"),
    ("je", "and"),
    ("ja", "and/or"),
    ("gi'e", ",-and"),
    ("gi'a", ",-and/or"),
    ("bu'u", "at"),
    ("ca", "at-present"),
    ("zo'u", ":"),
    ("za'a", "as-I-can-see"),
    ("za'adai", "as-you-can-see"),
    ("pu", "in-past"),
    ("ba", "in-future"),
    ("vau", "]"),
    ("doi", "oh"),
    ("uinai", "unfortunately"),
    ("u'u", "sorry"),
    ("ko", "do-it-so-that-you"),
    ("poi", "that"),
    ("noi", ", which"),
    ("me", "among"),
    ("pe'i", "in-my-opinion"),
    ("ui", "yay"),
    ("ju", "whether-or-not"),
    ("gu", "whether-or-not"),
    ("gi'u", "whether-or-not"),
    ("u", "whether-or-not"),
    ("xu", "is-it-true-that"),
    ("ka'e", "possibly-can"),
    ("re'u", "time"),
    ("roi", "times"),
    ("mi", "me"),
  ]
  .into_iter()
  .collect();
}

/// A tree after structural rewriting, before words are glossed
#[derive(Debug, Clone, PartialEq)]
enum Glossed<'t> {
  /// Part of the input, rewritten and glossed when rendered
  Node(&'t Node),
  Seq(Vec<Glossed<'t>>),
  /// A word that still goes through the gloss tables
  Word(String),
  /// English text, rendered verbatim
  Shielded(String),
}

impl<'t> Glossed<'t> {
  /// Sequence of the parts that are present and non-empty
  fn seq(parts: impl IntoIterator<Item = Option<Glossed<'t>>>) -> Self {
    Self::Seq(
      parts
        .into_iter()
        .flatten()
        .filter(|p| !p.is_empty())
        .collect(),
    )
  }

  fn shielded(text: Option<&str>) -> Option<Self> {
    text.map(|t| Self::Shielded(t.to_string()))
  }

  fn is_empty(&self) -> bool {
    match self {
      Self::Node(node) => node.is_empty(),
      Self::Seq(parts) => parts.is_empty(),
      Self::Word(s) | Self::Shielded(s) => s.is_empty(),
    }
  }
}

/// What term resolution needs to know about a predicate. Worked out once per
/// tail and shared by all of its terms.
#[derive(Debug, Clone, Copy)]
struct Predicate<'t, 'r> {
  node: Option<&'t Node>,
  word: Option<&'t str>,
  se_table: Option<&'t [u32]>,
  record: Option<&'r PlaceRecord>,
}

impl Predicate<'_, '_> {
  /// Maps a declared place through the conversion table
  fn place(&self, declared: u32) -> u32 {
    self
      .se_table
      .and_then(|table| table.get(declared.checked_sub(1)? as usize))
      .copied()
      .unwrap_or(declared)
  }
}

pub struct Glosser<'a> {
  places: &'a PlaceTable,
  dictionary: &'a dyn Dictionary,
  mode: &'a Mode,
  exemption: ElisionExemption,
}

impl<'a> Glosser<'a> {
  pub fn new(
    places: &'a PlaceTable,
    dictionary: &'a dyn Dictionary,
    mode: &'a Mode,
    exemption: ElisionExemption,
  ) -> Self {
    Self {
      places,
      dictionary,
      mode,
      exemption,
    }
  }

  pub fn gloss(&self, node: &Node) -> String {
    self.render_node(node)
  }

  fn predicate<'t>(&self, selbri: Option<&'t Node>) -> Predicate<'t, 'a> {
    let word = selbri.and_then(Node::head_word);
    Predicate {
      node: selbri,
      word,
      se_table: selbri.and_then(Node::se_table),
      record: word.and_then(|w| self.places.get(w)),
    }
  }

  /// Role-specific rewrite, or None to render the node as it is
  fn rewrite<'t>(&self, node: &'t Node) -> Option<Glossed<'t>> {
    match node {
      Node::Bridi(bridi) => match bridi.role {
        Role::Bridi => Some(self.bridi(bridi)),
        Role::Precedence => bridi.contents.as_deref().map(Glossed::Node),
        Role::Other(_) => None,
      },
      _ => None,
    }
  }

  fn bridi<'t>(&self, bridi: &'t Bridi) -> Glossed<'t> {
    let tail = bridi.tail.as_deref();
    let predicate = self.predicate(tail.and_then(Node::selbri));
    let head = self.terms(&bridi.head, &predicate);
    let tail = tail.map(|t| match t {
      Node::Tail(t) => self.tail(t, None, &predicate),
      other => self.bridi_tail(other, None),
    });
    Glossed::seq([Some(head), tail])
  }

  /// `upper` is Some below a conjunction, holding the term lists attached
  /// above it, innermost first.
  fn bridi_tail<'t>(&self, tail: &'t Node, upper: Option<&[&'t [Node]]>) -> Glossed<'t> {
    match tail {
      Node::Conjunction(conj) => {
        let mut shared = Vec::new();
        if !conj.tail_terms.is_empty() {
          shared.push(conj.tail_terms.as_slice());
        }
        shared.extend(upper.unwrap_or_default().iter().copied());

        let left = conj
          .left
          .as_deref()
          .map(|l| self.bridi_tail(l, Some(shared.as_slice())));
        let right = self.bridi_tail(&conj.right, Some(shared.as_slice()));
        Self::conjoined(conj, left, right)
      }
      Node::Tail(t) => self.tail(t, upper, &self.predicate(Some(&*t.selbri))),
      other => Glossed::Node(other),
    }
  }

  fn tail<'t>(
    &self,
    tail: &'t Tail,
    upper: Option<&[&'t [Node]]>,
    predicate: &Predicate<'t, '_>,
  ) -> Glossed<'t> {
    let preterms = self.terms(&tail.preterms, predicate);
    let tail_terms = self.terms(&tail.tail_terms, predicate);

    // a place tag after the tail that skips the first place leaves the
    // predicate without its implied position
    let first_place_skipped = tail
      .fa_after_tail
      .as_ref()
      .is_some_and(|used| !used.contains(&1));

    let mut parts = vec![Some(preterms)];
    if upper.is_some() || first_place_skipped {
      parts.push(self.predicate_first(predicate));
    }
    parts.push(Some(tail_terms));
    for &terms in upper.unwrap_or_default() {
      parts.push(Some(self.terms(terms, predicate)));
    }
    Glossed::seq(parts)
  }

  fn conjoined<'t>(
    conj: &'t Conjunction,
    left: Option<Glossed<'t>>,
    right: Glossed<'t>,
  ) -> Glossed<'t> {
    let mut parts = vec![left, conj.joiner.as_deref().map(Glossed::Node)];
    parts.extend(conj.scope.iter().map(|s| Some(Glossed::Node(s))));
    parts.push(Some(right));
    Glossed::seq(parts)
  }

  fn terms<'t>(&self, terms: &'t [Node], predicate: &Predicate<'t, '_>) -> Glossed<'t> {
    Glossed::seq(terms.iter().map(|t| Some(self.resolve_term(t, predicate))))
  }

  fn resolve_term<'t>(&self, term: &'t Node, predicate: &Predicate<'t, '_>) -> Glossed<'t> {
    match term {
      Node::Conjunction(conj) => {
        let left = conj
          .left
          .as_deref()
          .map(|l| self.resolve_term(l, predicate));
        let right = self.resolve_term(&conj.right, predicate);
        Self::conjoined(conj, left, right)
      }
      Node::Composite(group) => self.terms(group, predicate),
      _ => Self::place_term(term, predicate),
    }
  }

  fn place_term<'t>(term: &'t Node, predicate: &Predicate<'t, '_>) -> Glossed<'t> {
    let (declared, sumti) = match term {
      Node::Term(t) => (t.place, &*t.sumti),
      Node::Leaf(l) => (l.place, term),
      _ => (None, term),
    };
    let Some(place) = declared.map(|d| predicate.place(d)).filter(|&p| p > 0) else {
      return Glossed::Node(term);
    };

    match (predicate.record, predicate.word) {
      (Some(record), _) => Glossed::seq([
        Glossed::shielded(record.before(place)),
        Some(Glossed::Node(sumti)),
        Glossed::shielded(record.after(place)),
      ]),
      (None, Some(word)) => Glossed::seq([
        Some(Glossed::Word(format!("{}{}", word, place))),
        Some(Glossed::Node(sumti)),
      ]),
      (None, None) => Glossed::Node(term),
    }
  }

  /// Gloss for the predicate's first place, shown when word order no
  /// longer implies it
  fn predicate_first<'t>(&self, predicate: &Predicate<'t, '_>) -> Option<Glossed<'t>> {
    if let Some(record) = predicate.record {
      return Glossed::shielded(record.after(1));
    }
    match predicate.word {
      Some(word) => Some(
        Glossed::shielded(self.dictionary.keyword(word, 1))
          .unwrap_or_else(|| Glossed::Word(word.to_string())),
      ),
      None => predicate.node.map(Glossed::Node),
    }
  }

  fn keep(&self, glossed: &Glossed) -> bool {
    match glossed {
      Glossed::Node(node) => {
        is_visible(node, self.mode, self.exemption)
          && !node.text().is_some_and(|w| REMOVED.contains(w))
      }
      Glossed::Word(word) => !word.is_empty() && !REMOVED.contains(word.as_str()),
      other => !other.is_empty(),
    }
  }

  fn render(&self, glossed: &Glossed) -> String {
    match glossed {
      Glossed::Node(node) => self.render_node(node),
      Glossed::Seq(parts) => self.render_sequence(parts),
      Glossed::Word(word) => self.gloss_word(word),
      Glossed::Shielded(text) => text.clone(),
    }
  }

  fn render_node(&self, node: &Node) -> String {
    if let Some(rewritten) = self.rewrite(node) {
      return self.render(&rewritten);
    }
    match node {
      Node::Composite(children) => {
        self.render_sequence(&children.iter().map(Glossed::Node).collect::<Vec<_>>())
      }
      Node::Leaf(leaf) => self.gloss_word(&leaf.word),
      Node::Text(t) => self.gloss_word(t),
      Node::Other(_) => placeholder(node),
      Node::Wrapper(w) => match w.structure.as_deref() {
        Some(inner) => self.render_node(inner),
        None => placeholder(node),
      },
      _ => match node.structure() {
        Some(inner) => self.render_node(inner),
        None => self.render_sequence(
          &node
            .semantic_children()
            .into_iter()
            .map(Glossed::Node)
            .collect::<Vec<_>>(),
        ),
      },
    }
  }

  fn render_sequence(&self, parts: &[Glossed]) -> String {
    let kept = parts.iter().filter(|p| self.keep(p)).collect::<Vec<_>>();
    if kept.len() == 1 {
      return self.render(kept[0]);
    }
    let rendered = kept.into_iter().map(|p| self.render(p)).collect::<Vec<_>>();
    format!("[{}]", rendered.join(" "))
  }

  /// Fixed tables first, then the dictionary, then the word itself
  fn gloss_word(&self, word: &str) -> String {
    if let Some(text) = UNTRANSLATABLE.get(word).or_else(|| ENGLISH.get(word)) {
      return text.to_string();
    }
    match self.dictionary.gloss(word) {
      Some(gloss) => gloss.to_string(),
      None => {
        trace!(word, "no gloss found");
        word.to_string()
      }
    }
  }
}
