use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

lazy_static! {
    static ref RUSSIAN: Stemmer = Stemmer::create(Algorithm::Russian);
    static ref ENGLISH: Stemmer = Stemmer::create(Algorithm::English);
}

/// Folded word forms discarded during tokenization.
pub type StopWords = HashSet<String>;

/// Lowercase with full Unicode casing, then collapse `ё` into `е`.
/// The collapse is deliberate and baked into the index, so it must be applied
/// the same way to corpus text, query words and dictionary terms.
pub fn fold(text: &str) -> String {
    text.to_lowercase().replace('ё', "е")
}

/// Split on every code point that is neither letter nor digit.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_cyrillic(c: char) -> bool {
    ('\u{0400}'..='\u{04FF}').contains(&c)
}

/// Stem one word with the Snowball algorithm matching its script: Russian for
/// tokens carrying any Cyrillic letter, English otherwise. The input is folded
/// first, which makes the choice and the stem case-insensitive.
pub fn stem(word: &str) -> String {
    let folded = fold(word);
    if folded.chars().any(is_cyrillic) {
        RUSSIAN.stem(&folded).into_owned()
    } else {
        ENGLISH.stem(&folded).into_owned()
    }
}

/// The full text pipeline: tokenize, fold, drop stop words, stem.
pub fn extract_stems(text: &str, stop_words: &StopWords) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .map(fold)
        .filter(|token| !stop_words.contains(token))
        .map(|token| stem(&token))
        .collect()
}
