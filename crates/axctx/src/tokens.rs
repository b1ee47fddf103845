/*!
Language-aware approximate token counting.

Costs are abstract token units, calibrated against LLM tokenizers rather than
matching them exactly. CJK scripts tokenize near two tokens per character;
Latin text near three tokens per word. The CJK heuristic kicks in once more
than 10% of the counted characters are CJK, since mixed UI strings (a CJK
label inside a Latin window title) still tokenize CJK-heavy.
*/

/// Ratio of CJK code points above which the character-count heuristic is used.
const CJK_RATIO_THRESHOLD: f64 = 0.10;

/// Estimated tokens per character for CJK-majority strings.
const TOKENS_PER_CJK_CHAR: f64 = 2.0;

/// Estimated tokens per word for everything else.
const TOKENS_PER_WORD: f64 = 3.0;

/// Estimate the token cost of a string.
///
/// Deterministic, no allocation, O(len). Cheap enough to call once per
/// string per materialized node.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn estimate_tokens(text: &str) -> u32 {
  if text.is_empty() {
    return 0;
  }

  let mut counted = 0usize; // non-whitespace, non-punctuation
  let mut cjk = 0usize;
  let mut non_ws = 0usize;
  for ch in text.chars() {
    if ch.is_whitespace() {
      continue;
    }
    non_ws += 1;
    if ch.is_ascii_punctuation() {
      continue;
    }
    counted += 1;
    if is_cjk(ch) {
      cjk += 1;
    }
  }

  if counted > 0 && (cjk as f64 / counted as f64) > CJK_RATIO_THRESHOLD {
    (non_ws as f64 * TOKENS_PER_CJK_CHAR).ceil() as u32
  } else {
    let words = text.split_whitespace().count();
    (words as f64 * TOKENS_PER_WORD).ceil() as u32
  }
}

/// Is this code point in a CJK script range?
const fn is_cjk(ch: char) -> bool {
  matches!(ch,
    '\u{4E00}'..='\u{9FFF}'     // CJK Unified Ideographs
    | '\u{3400}'..='\u{4DBF}'   // CJK Extension A
    | '\u{F900}'..='\u{FAFF}'   // CJK Compatibility Ideographs
    | '\u{3040}'..='\u{309F}'   // Hiragana
    | '\u{30A0}'..='\u{30FF}'   // Katakana
    | '\u{AC00}'..='\u{D7AF}'   // Hangul Syllables
    | '\u{FF66}'..='\u{FF9D}'   // Halfwidth Katakana
  )
}
