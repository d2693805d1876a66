//! Rule-based sentence splitting tuned for EU legislative prose.

use once_cell::sync::Lazy;
use regex::Regex;

/// Terminal punctuation, optional closing quotes or brackets, then whitespace.
static BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]+["'\x{201D}\x{2019})\]]*\s+"#).expect("valid regex"));

/// Tokens that end in a period without ending a sentence.
const ABBREVIATIONS: &[&str] = &[
    "art.", "arts.", "cf.", "co.", "dr.", "e.g.", "ec.", "eu.", "etc.", "i.e.", "inc.", "ltd.",
    "mr.", "mrs.", "ms.", "no.", "nos.", "o.j.", "oj.", "p.", "para.", "paras.", "pp.", "prof.",
    "reg.", "st.", "vol.", "vs.",
];

/// Abbreviations that also close a sentence when a capitalised word follows.
const CLOSING_ABBREVIATIONS: &[&str] = &["etc.", "no."];

/// Split text into trimmed, non-empty sentences.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in BOUNDARY.find_iter(text) {
        let head = &text[start..boundary.end()];
        let next = text[boundary.end()..].chars().next();
        if !opens_sentence(next) || abbreviation_holds(head, next) {
            continue;
        }
        push_trimmed(&mut sentences, head);
        start = boundary.end();
    }
    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn opens_sentence(next: Option<char>) -> bool {
    match next {
        Some(c) => {
            c.is_uppercase() || c.is_ascii_digit() || matches!(c, '"' | '\'' | '(' | '\u{201C}')
        }
        None => false,
    }
}

fn abbreviation_holds(head: &str, next: Option<char>) -> bool {
    let Some(word) = head.split_whitespace().next_back() else {
        return false;
    };
    let word = word.to_lowercase();
    if !ABBREVIATIONS.contains(&word.as_str()) {
        return false;
    }
    !(CLOSING_ABBREVIATIONS.contains(&word.as_str()) && next.is_some_and(char::is_uppercase))
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}
