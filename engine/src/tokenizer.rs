use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

lazy_static! {
    // Words are separated by plain spaces only; tabs and other control bytes stay
    // inside the word so that validation can reject them.
    static ref WORD: Regex = Regex::new(r"[^ ]+").expect("valid regex");
}

/// Split text into space-delimited words, borrowing from `text`.
pub fn split_into_words(text: &str) -> Vec<&str> {
    WORD.find_iter(text).map(|m| m.as_str()).collect()
}

/// A valid word carries no control characters (bytes below 0x20).
pub fn is_valid_word(word: &str) -> bool {
    !word.bytes().any(|b| b < b' ')
}

/// Collect words into an ordered set, dropping empty strings.
pub fn make_unique_non_empty_strings<I, S>(words: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .filter_map(|w| {
            let w = w.as_ref();
            (!w.is_empty()).then(|| w.to_string())
        })
        .collect()
}
