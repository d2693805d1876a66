//! Porter stemmer for ROUGE token matching.
//!
//! Implements the five steps of Porter's algorithm with his published
//! revisions (`bli` -> `ble`, `logi` -> `log`), so British and American
//! spellings of the same inflection ("harmonises"/"harmonised") land on one
//! stem. Input is expected to be lowercase ASCII.

/// Stem a lowercase token. Tokens of three characters or fewer pass through.
pub fn stem(token: &str) -> String {
    if token.len() <= 3 || !token.is_ascii() {
        return token.to_string();
    }
    let mut word = token.as_bytes().to_vec();
    strip_plural(&mut word);
    strip_verbal(&mut word);
    soften_terminal_y(&mut word);
    replace_longest(&mut word, DERIVATIONAL, |stem, _| measure(stem) > 0);
    replace_longest(&mut word, ADJECTIVAL, |stem, _| measure(stem) > 0);
    replace_longest(&mut word, RESIDUAL, |stem, suffix| {
        measure(stem) > 1 && (suffix != "ion" || matches!(stem.last(), Some(b's' | b't')))
    });
    tidy_ending(&mut word);
    word.into_iter().map(char::from).collect()
}

const DERIVATIONAL: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
    ("logi", "log"),
];

const ADJECTIVAL: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const RESIDUAL: &[(&str, &str)] = &[
    ("al", ""),
    ("ance", ""),
    ("ence", ""),
    ("er", ""),
    ("ic", ""),
    ("able", ""),
    ("ible", ""),
    ("ant", ""),
    ("ement", ""),
    ("ment", ""),
    ("ent", ""),
    ("ion", ""),
    ("ou", ""),
    ("ism", ""),
    ("ate", ""),
    ("iti", ""),
    ("ous", ""),
    ("ive", ""),
    ("ize", ""),
];

fn is_consonant(word: &[u8], i: usize) -> bool {
    match word[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences in `stem`.
fn measure(stem: &[u8]) -> usize {
    let mut count = 0;
    let mut after_vowel = false;
    for i in 0..stem.len() {
        let consonant = is_consonant(stem, i);
        if consonant && after_vowel {
            count += 1;
        }
        after_vowel = !consonant;
    }
    count
}

fn has_vowel(stem: &[u8]) -> bool {
    (0..stem.len()).any(|i| !is_consonant(stem, i))
}

fn ends_with_double_consonant(word: &[u8]) -> bool {
    let n = word.len();
    n >= 2 && word[n - 1] == word[n - 2] && is_consonant(word, n - 1)
}

/// Consonant, vowel, consonant ending where the last is not `w`, `x` or `y`.
fn ends_cvc(word: &[u8]) -> bool {
    let n = word.len();
    n >= 3
        && is_consonant(word, n - 3)
        && !is_consonant(word, n - 2)
        && is_consonant(word, n - 1)
        && !matches!(word[n - 1], b'w' | b'x' | b'y')
}

fn strip_plural(word: &mut Vec<u8>) {
    if word.ends_with(b"sses") || word.ends_with(b"ies") {
        word.truncate(word.len() - 2);
    } else if word.ends_with(b"ss") {
        // caress
    } else if word.ends_with(b"s") {
        word.pop();
    }
}

fn strip_verbal(word: &mut Vec<u8>) {
    if word.ends_with(b"eed") {
        if measure(&word[..word.len() - 3]) > 0 {
            word.pop();
        }
        return;
    }

    let stripped = [&b"ed"[..], &b"ing"[..]]
        .into_iter()
        .find(|suffix| word.ends_with(suffix) && has_vowel(&word[..word.len() - suffix.len()]));
    let Some(suffix) = stripped else {
        return;
    };
    word.truncate(word.len() - suffix.len());
    if word.ends_with(b"at") || word.ends_with(b"bl") || word.ends_with(b"iz") {
        word.push(b'e');
    } else if ends_with_double_consonant(word)
        && !matches!(word.last(), Some(b'l' | b's' | b'z'))
    {
        word.pop();
    } else if measure(word) == 1 && ends_cvc(word) {
        word.push(b'e');
    }
}

fn soften_terminal_y(word: &mut Vec<u8>) {
    if word.ends_with(b"y") && has_vowel(&word[..word.len() - 1]) {
        word.pop();
        word.push(b'i');
    }
}

/// Only the longest matching suffix is considered; if its condition fails
/// the word is left alone.
fn replace_longest(
    word: &mut Vec<u8>,
    rules: &[(&str, &str)],
    condition: impl Fn(&[u8], &str) -> bool,
) {
    let Some(&(suffix, replacement)) = rules
        .iter()
        .filter(|(suffix, _)| word.ends_with(suffix.as_bytes()))
        .max_by_key(|(suffix, _)| suffix.len())
    else {
        return;
    };
    let stem_len = word.len() - suffix.len();
    if condition(&word[..stem_len], suffix) {
        word.truncate(stem_len);
        word.extend_from_slice(replacement.as_bytes());
    }
}

fn tidy_ending(word: &mut Vec<u8>) {
    if word.ends_with(b"e") {
        let stem = &word[..word.len() - 1];
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            word.pop();
        }
    }
    if word.ends_with(b"ll") && measure(word) > 1 {
        word.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::stem;

    #[test]
    fn plurals_collapse() {
        assert_eq!(stem("mammals"), "mammal");
        assert_eq!(stem("caresses"), "caress");
        assert_eq!(stem("ponies"), "poni");
        assert_eq!(stem("regulations"), stem("regulation"));
    }

    #[test]
    fn verbal_suffixes_are_removed() {
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("adopted"), "adopt");
        assert_eq!(stem("agreed"), "agre");
        assert_eq!(stem("harmonized"), "harmon");
        assert_eq!(stem("falling"), "fall");
        assert_eq!(stem("hoping"), "hope");
    }

    #[test]
    fn british_and_american_inflections_conflate() {
        assert_eq!(stem("harmonises"), "harmonis");
        assert_eq!(stem("harmonised"), "harmonis");
        assert_eq!(stem("authorises"), "authoris");
        assert_eq!(stem("authorised"), "authoris");
        assert_eq!(stem("harmonizes"), stem("harmonized"));
    }

    #[test]
    fn derivational_suffixes_reduce() {
        assert_eq!(stem("relational"), "relat");
        assert_eq!(stem("notification"), "notif");
        assert_eq!(stem("directive"), "direct");
        assert_eq!(stem("commission"), "commiss");
        assert_eq!(stem("labelling"), "label");
        assert_eq!(stem("rules"), "rule");
    }

    #[test]
    fn short_and_vowelless_tokens_pass_through() {
        assert_eq!(stem("are"), "are");
        assert_eq!(stem("sing"), "sing");
        assert_eq!(stem("2024"), "2024");
    }

    #[test]
    fn terminal_y_becomes_i() {
        assert_eq!(stem("happy"), "happi");
        assert_eq!(stem("policy"), "polici");
    }
}
