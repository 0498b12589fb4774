use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn is_false(b: &bool) -> bool {
  !*b
}

/// A word token
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Leaf {
  pub word: String,
  /// Synthesized by the parser, not present in the input text
  #[serde(default, skip_serializing_if = "is_false")]
  pub elided: bool,
  /// Word class (selma'o)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub selmaho: Option<String>,
  /// Argument place this word fills, when it stands as a term by itself
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub place: Option<u32>,
  /// Fields the renderers don't read, kept for the raw formats
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Leaf {
  pub fn new(word: impl Into<String>) -> Self {
    Self {
      word: word.into(),
      elided: false,
      selmaho: None,
      place: None,
      extra: Map::new(),
    }
  }

  pub fn elided(word: impl Into<String>) -> Self {
    Self {
      elided: true,
      ..Self::new(word)
    }
  }

  pub fn with_selmaho(mut self, selmaho: impl Into<String>) -> Self {
    self.selmaho = Some(selmaho.into());
    self
  }

  pub fn with_place(mut self, place: u32) -> Self {
    self.place = Some(place);
    self
  }
}

/// Carries a link to the parse structure below it. Predicate nodes are
/// wrappers: `se_table` maps a declared place to the underlying place of the
/// predicate, `tertau` links a compound to its head.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub struct Wrapper {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub structure: Option<Box<Node>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub se_table: Option<Vec<u32>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tertau: Option<Box<Node>>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// What a role-tagged node stands for. Roles without their own rendering
/// rule keep their name so the raw formats write it back unchanged.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
  Bridi,
  Precedence,
  Other(String),
}

impl From<String> for Role {
  fn from(name: String) -> Self {
    match name.as_str() {
      "bridi" => Self::Bridi,
      "precedence" => Self::Precedence,
      _ => Self::Other(name),
    }
  }
}

impl From<Role> for String {
  fn from(role: Role) -> Self {
    match role {
      Role::Bridi => "bridi".to_string(),
      Role::Precedence => "precedence".to_string(),
      Role::Other(name) => name,
    }
  }
}

/// A predicate relation: leading terms plus a (possibly conjoined) tail
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Bridi {
  pub role: Role,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub head: Vec<Node>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tail: Option<Box<Node>>,
  /// What a `precedence` node unwraps to
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contents: Option<Box<Node>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub structure: Option<Box<Node>>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// Two terms or two predicate tails joined by a connective
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Conjunction {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub left: Option<Box<Node>>,
  pub right: Box<Node>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub joiner: Option<Box<Node>>,
  /// Scope marker (`bo`, optionally with its tag)
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub scope: Vec<Node>,
  /// Terms after a conjoined tail; they apply to both sides
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub tail_terms: Vec<Node>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub structure: Option<Box<Node>>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// The predicate of a bridi together with the terms around it
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Tail {
  pub selbri: Box<Node>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub preterms: Vec<Node>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub tail_terms: Vec<Node>,
  /// Places explicitly tagged after the tail, if any tag appears there
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub fa_after_tail: Option<Vec<u32>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub structure: Option<Box<Node>>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// An argument with its declared place
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Term {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub place: Option<u32>,
  pub sumti: Box<Node>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub structure: Option<Box<Node>>,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// A node of the parser's output. Arrays are composites and strings are bare
/// word tokens. Objects are told apart by their required field (`word`,
/// `role`, `right`, `selbri`, `sumti`), anything else is a wrapper. Any
/// other JSON value is kept as is and renders as a placeholder.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
  Composite(Vec<Node>),
  Text(String),
  Leaf(Leaf),
  Bridi(Bridi),
  Conjunction(Conjunction),
  Tail(Tail),
  Term(Term),
  Wrapper(Wrapper),
  Other(Value),
}

impl From<Leaf> for Node {
  fn from(leaf: Leaf) -> Self {
    Self::Leaf(leaf)
  }
}

impl From<Vec<Node>> for Node {
  fn from(children: Vec<Node>) -> Self {
    Self::Composite(children)
  }
}

impl Node {
  pub fn word(word: impl Into<String>) -> Self {
    Self::Leaf(Leaf::new(word))
  }

  pub fn wrap(inner: Node) -> Self {
    Self::Wrapper(Wrapper {
      structure: Some(Box::new(inner)),
      ..Wrapper::default()
    })
  }

  pub fn is_leaf(&self) -> bool {
    matches!(self, Self::Leaf(_))
  }

  pub fn get_leaf(&self) -> Option<&Leaf> {
    match self {
      Self::Leaf(l) => Some(l),
      _ => None,
    }
  }

  /// Word text of a leaf or a bare token
  pub fn text(&self) -> Option<&str> {
    match self {
      Self::Leaf(l) => Some(&l.word),
      Self::Text(t) => Some(t),
      _ => None,
    }
  }

  /// An empty composite, which renderers drop
  pub fn is_empty(&self) -> bool {
    matches!(self, Self::Composite(cs) if cs.is_empty())
  }

  pub fn structure(&self) -> Option<&Node> {
    match self {
      Self::Composite(_) | Self::Text(_) | Self::Leaf(_) | Self::Other(_) => None,
      Self::Wrapper(w) => w.structure.as_deref(),
      Self::Bridi(b) => b.structure.as_deref(),
      Self::Conjunction(c) => c.structure.as_deref(),
      Self::Tail(t) => t.structure.as_deref(),
      Self::Term(t) => t.structure.as_deref(),
    }
  }

  /// Children of a semantic node in surface order, used when it carries no
  /// structure link. A bridi's tail is spliced in so the relation reads as
  /// one sequence.
  pub fn semantic_children(&self) -> Vec<&Node> {
    match self {
      Self::Composite(cs) => cs.iter().collect(),
      Self::Text(_) | Self::Leaf(_) | Self::Other(_) => Vec::new(),
      Self::Wrapper(w) => w.tertau.as_deref().into_iter().collect(),
      Self::Bridi(b) => {
        let mut children = b.head.iter().collect::<Vec<_>>();
        children.extend(b.contents.as_deref());
        match b.tail.as_deref() {
          Some(tail @ Self::Tail(t)) if t.structure.is_none() => {
            children.extend(tail.semantic_children())
          }
          Some(tail) => children.push(tail),
          None => {}
        }
        children
      }
      Self::Conjunction(c) => {
        let mut children = c.left.as_deref().into_iter().collect::<Vec<_>>();
        children.extend(c.joiner.as_deref());
        children.extend(c.scope.iter());
        children.push(&c.right);
        children.extend(c.tail_terms.iter());
        children
      }
      Self::Tail(t) => {
        let mut children = t.preterms.iter().collect::<Vec<_>>();
        children.push(&t.selbri);
        children.extend(t.tail_terms.iter());
        children
      }
      Self::Term(t) => vec![&t.sumti],
    }
  }

  /// The predicate of a tail node
  pub fn selbri(&self) -> Option<&Node> {
    match self {
      Self::Tail(t) => Some(&t.selbri),
      _ => None,
    }
  }

  /// Place conversion table of a predicate node
  pub fn se_table(&self) -> Option<&[u32]> {
    match self {
      Self::Wrapper(w) => w.se_table.as_deref(),
      _ => None,
    }
  }

  /// Follows the head-of-compound chain until no further compounding exists
  pub fn compound_head(&self) -> &Node {
    let mut node = self;
    while let Self::Wrapper(Wrapper {
      tertau: Some(head), ..
    }) = node
    {
      node = head;
    }
    node
  }

  /// The word heading a (possibly compound) predicate
  pub fn head_word(&self) -> Option<&str> {
    match self.compound_head() {
      Self::Wrapper(w) => match w.structure.as_deref()? {
        Self::Composite(cs) => cs.iter().find_map(Node::text),
        inner => inner.text(),
      },
      head => head.text(),
    }
  }

  /// Returns a copy of the tree with every structure link removed, keeping
  /// only semantic content. Fields the renderers don't read are kept, minus
  /// any `structure` key nested inside them.
  pub fn strip_structure(&self) -> Node {
    fn strip_all(nodes: &[Node]) -> Vec<Node> {
      nodes.iter().map(Node::strip_structure).collect()
    }

    fn strip_boxed(node: &Option<Box<Node>>) -> Option<Box<Node>> {
      node.as_deref().map(|n| Box::new(n.strip_structure()))
    }

    match self {
      Self::Composite(cs) => Self::Composite(strip_all(cs)),
      Self::Text(t) => Self::Text(t.clone()),
      Self::Leaf(l) => Self::Leaf(Leaf {
        extra: strip_map(&l.extra),
        ..l.clone()
      }),
      Self::Wrapper(w) => Self::Wrapper(Wrapper {
        structure: None,
        se_table: w.se_table.clone(),
        tertau: strip_boxed(&w.tertau),
        extra: strip_map(&w.extra),
      }),
      Self::Bridi(b) => Self::Bridi(Bridi {
        role: b.role.clone(),
        head: strip_all(&b.head),
        tail: strip_boxed(&b.tail),
        contents: strip_boxed(&b.contents),
        structure: None,
        extra: strip_map(&b.extra),
      }),
      Self::Conjunction(c) => Self::Conjunction(Conjunction {
        left: strip_boxed(&c.left),
        right: Box::new(c.right.strip_structure()),
        joiner: strip_boxed(&c.joiner),
        scope: strip_all(&c.scope),
        tail_terms: strip_all(&c.tail_terms),
        structure: None,
        extra: strip_map(&c.extra),
      }),
      Self::Tail(t) => Self::Tail(Tail {
        selbri: Box::new(t.selbri.strip_structure()),
        preterms: strip_all(&t.preterms),
        tail_terms: strip_all(&t.tail_terms),
        fa_after_tail: t.fa_after_tail.clone(),
        structure: None,
        extra: strip_map(&t.extra),
      }),
      Self::Term(t) => Self::Term(Term {
        place: t.place,
        sumti: Box::new(t.sumti.strip_structure()),
        structure: None,
        extra: strip_map(&t.extra),
      }),
      Self::Other(v) => Self::Other(strip_value(v)),
    }
  }
}

fn strip_map(map: &Map<String, Value>) -> Map<String, Value> {
  map
    .iter()
    .filter(|(key, _)| key.as_str() != "structure")
    .map(|(key, value)| (key.clone(), strip_value(value)))
    .collect()
}

fn strip_value(value: &Value) -> Value {
  match value {
    Value::Object(map) => Value::Object(strip_map(map)),
    Value::Array(values) => Value::Array(values.iter().map(strip_value).collect()),
    other => other.clone(),
  }
}
