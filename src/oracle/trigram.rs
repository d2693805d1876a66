//! Whitespace-token trigrams used for redundancy blocking.

use std::collections::HashSet;

/// Three consecutive whitespace-delimited tokens.
pub type Trigram<'a> = (&'a str, &'a str, &'a str);

/// All distinct trigrams of `sentence`; empty for fewer than three tokens.
pub fn trigrams(sentence: &str) -> HashSet<Trigram<'_>> {
    let tokens: Vec<&str> = sentence.split_whitespace().collect();
    tokens
        .windows(3)
        .map(|window| (window[0], window[1], window[2]))
        .collect()
}
