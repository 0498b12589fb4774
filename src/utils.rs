use std::error::Error;

/// Boxed static error type
pub type Err = Box<dyn Error + 'static>;

/// Unicode superscript digits, 0 through 9
pub const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// Writes `value` in base `digits.len()`, using `digits` as the digit glyphs.
/// Most significant digit first, no leading zeros, and zero is the empty string.
///
/// ```
/// use jbotree::utils::{encode, SUPERSCRIPT_DIGITS};
///
/// assert_eq!(encode(0, &SUPERSCRIPT_DIGITS), "");
/// assert_eq!(encode(12, &SUPERSCRIPT_DIGITS), "¹²");
/// assert_eq!(encode(5, &['0', '1']), "101");
/// ```
///
/// # Panics
///
/// Panics if `digits` has fewer than two glyphs, since no positional base
/// below two exists.
pub fn encode(value: usize, digits: &[char]) -> String {
  let radix = digits.len();
  assert!(radix >= 2, "a digit set needs at least two glyphs");

  let mut value = value;
  let mut reversed = Vec::new();
  while value > 0 {
    reversed.push(digits[value % radix]);
    value /= radix;
  }
  reversed.into_iter().rev().collect()
}

/// Replaces `len` chars of `s` starting at char `pos` with `sub`. The span is
/// clamped to the end of the string; a `pos` past the end leaves `s` unchanged.
///
/// ```
/// use jbotree::utils::splice;
///
/// assert_eq!(splice("mi klama", 3, 5, "cliva"), "mi cliva");
/// assert_eq!(splice("coi", 1, 99, "u"), "cu");
/// assert_eq!(splice("coi", 3, 1, "!"), "coi");
/// ```
pub fn splice(s: &str, pos: usize, len: usize, sub: &str) -> String {
  let count = s.chars().count();
  if pos >= count {
    return s.to_string();
  }
  let len = len.min(count - pos);
  s.chars()
    .take(pos)
    .chain(sub.chars())
    .chain(s.chars().skip(pos + len))
    .collect()
}

/// Counts literal `[` and `]` characters, as (open, close)
pub fn bracket_count(s: &str) -> (usize, usize) {
  s.chars().fold((0, 0), |(open, close), c| match c {
    '[' => (open + 1, close),
    ']' => (open, close + 1),
    _ => (open, close),
  })
}
