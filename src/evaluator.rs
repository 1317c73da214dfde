//! Answer grading: order-independent, stop-word-tolerant token matching.
//!
//! Both texts are lower-cased, a fixed punctuation set is stripped, and the
//! result is split on single spaces. A guess matches when every non-"the"
//! token on either side occurs somewhere on the other side. Duplicates are
//! not counted.
//!
//! Stripped punctuation can glue words ("U.S.A." ~ "usa") or separate them
//! ("Mona-Lisa" ~ "mona lisa"); a guess is accepted under either reading.
//! Whitespace is strict under both: doubled or trailing spaces leave an
//! empty token that the other side has to match.

/// Characters removed before tokenizing. Other punctuation (quotes, `?`,
/// `'`, `+`, `@`, ...) is kept and must match literally.
const STRIPPED: &[char] = &[
  '.', ',', '/', '#', '!', '$', '%', '^', '&', '*', ';', ':', '{', '}', '=', '-', '_', '`', '~', '(', ')',
];

const STOP_WORD: &str = "the";

/// Lower-case and drop the stripped punctuation set.
pub fn normalize(text: &str) -> String {
  text.to_lowercase().chars().filter(|c| !STRIPPED.contains(c)).collect()
}

/// Split on single spaces. Empty input yields `[""]`, and runs of spaces
/// yield empty tokens, same as a plain string split.
pub fn tokens(normalized: &str) -> Vec<&str> {
  normalized.split(' ').collect()
}

fn covers(from: &[&str], within: &[&str]) -> bool {
  from.iter().filter(|t| **t != STOP_WORD).all(|t| within.contains(t))
}

fn symmetric(g: &[&str], a: &[&str]) -> bool {
  covers(g, a) && covers(a, g)
}

fn matches_joined(guess: &str, answer: &str) -> bool {
  let (g, a) = (normalize(guess), normalize(answer));
  symmetric(&tokens(&g), &tokens(&a))
}

/// Space-split tokens, each further broken at stripped punctuation. A token
/// that was empty, or held only punctuation, stays as one `""`.
fn split_tokens(lowered: &str) -> Vec<&str> {
  let mut out = Vec::new();
  for raw in lowered.split(' ') {
    let before = out.len();
    out.extend(raw.split(STRIPPED).filter(|piece| !piece.is_empty()));
    if out.len() == before {
      out.push("");
    }
  }
  out
}

fn matches_split(guess: &str, answer: &str) -> bool {
  let (g, a) = (guess.to_lowercase(), answer.to_lowercase());
  symmetric(&split_tokens(&g), &split_tokens(&a))
}

pub fn is_match(guess: &str, answer: &str) -> bool {
  matches_joined(guess, answer) || matches_split(guess, answer)
}
