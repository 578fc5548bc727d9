//! Gibberish heuristic — a cheap, non-semantic test for keyboard-mash input.
//!
//! Flags text that either has almost no vowels and only short tokens, or
//! contains a character repeated three or more times in a row. It is a
//! heuristic: "Nginx SRE" style abbreviations can trip the vowel rule, and
//! pronounceable nonsense ("blorft") passes. Callers treat a positive as
//! "probably nonsense", never as proof.

use crate::screening::alpha_tokens;

/// Vowel share below which short-token text is considered nonsense.
const MIN_VOWEL_RATIO: f64 = 0.25;
/// Tokens at least this long exempt text from the vowel rule.
const LONG_TOKEN_LEN: usize = 4;
/// A run of this many identical characters marks text as nonsense.
const REPEAT_RUN_LEN: usize = 3;

pub fn is_gibberish(text: &str) -> bool {
    let letters: Vec<char> = text.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if letters.is_empty() {
        return true;
    }

    let vowels = letters
        .iter()
        .filter(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'))
        .count();
    let vowel_ratio = vowels as f64 / letters.len() as f64;

    let all_tokens_short = alpha_tokens(text)
        .iter()
        .all(|t| t.len() < LONG_TOKEN_LEN);

    (vowel_ratio < MIN_VOWEL_RATIO && all_tokens_short) || has_repeated_run(text)
}

fn has_repeated_run(text: &str) -> bool {
    let mut run = 0;
    let mut previous: Option<char> = None;
    for c in text.chars() {
        if previous == Some(c) {
            run += 1;
        } else {
            run = 1;
            previous = Some(c);
        }
        if run >= REPEAT_RUN_LEN {
            return true;
        }
    }
    false
}
