use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::tokenizer::{is_valid_word, split_into_words};

/// Parsed query: words that must match and words that exclude a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'q> {
    pub plus_words: Vec<&'q str>,
    pub minus_words: Vec<&'q str>,
}

struct QueryWord<'q> {
    data: &'q str,
    is_minus: bool,
    is_stop: bool,
}

impl<'q> Query<'q> {
    /// Parse and normalize: both word lists come back sorted and deduplicated.
    pub fn parse(text: &'q str, stop_words: &BTreeSet<String>) -> Result<Self> {
        let mut query = Self::parse_raw(text, stop_words)?;
        sort_unique(&mut query.plus_words);
        sort_unique(&mut query.minus_words);
        Ok(query)
    }

    /// Parse keeping words in query order, duplicates included.
    pub fn parse_raw(text: &'q str, stop_words: &BTreeSet<String>) -> Result<Self> {
        let mut query = Query::default();
        for word in split_into_words(text) {
            let word = parse_query_word(word, stop_words)?;
            if word.is_stop {
                continue;
            }
            if word.is_minus {
                query.minus_words.push(word.data);
            } else {
                query.plus_words.push(word.data);
            }
        }
        Ok(query)
    }
}

fn parse_query_word<'q>(text: &'q str, stop_words: &BTreeSet<String>) -> Result<QueryWord<'q>> {
    let (data, is_minus) = match text.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (text, false),
    };
    if data.is_empty() || data.starts_with('-') || !is_valid_word(data) {
        return Err(Error::MalformedQuery(text.to_string()));
    }
    Ok(QueryWord { data, is_minus, is_stop: stop_words.contains(data) })
}

pub(crate) fn sort_unique<T: Ord>(words: &mut Vec<T>) {
    words.sort_unstable();
    words.dedup();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::make_unique_non_empty_strings;

    fn stop_words() -> BTreeSet<String> {
        make_unique_non_empty_strings(["in", "the"])
    }

    #[test]
    fn splits_plus_and_minus() {
        let sw = stop_words();
        let q = Query::parse("white cat -dog -collar cat", &sw).unwrap();
        assert_eq!(q.plus_words, vec!["cat", "white"]);
        assert_eq!(q.minus_words, vec!["collar", "dog"]);
    }

    #[test]
    fn raw_parse_keeps_order_and_duplicates() {
        let sw = stop_words();
        let q = Query::parse_raw("white cat -dog cat", &sw).unwrap();
        assert_eq!(q.plus_words, vec!["white", "cat", "cat"]);
        assert_eq!(q.minus_words, vec!["dog"]);
    }

    #[test]
    fn stop_words_dropped_from_both_sides() {
        let sw = stop_words();
        let q = Query::parse("cat in -the", &sw).unwrap();
        assert_eq!(q.plus_words, vec!["cat"]);
        assert!(q.minus_words.is_empty());
    }

    #[test]
    fn malformed_words_rejected() {
        let sw = stop_words();
        for bad in ["cat -", "--dog", "cat -\x01x", "ca\x02t"] {
            assert!(
                matches!(Query::parse(bad, &sw), Err(Error::MalformedQuery(_))),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(
            Query::parse("cat --dog", &sw),
            Err(Error::MalformedQuery("--dog".into()))
        );
    }

    #[test]
    fn inner_dash_is_fine() {
        let sw = stop_words();
        let q = Query::parse("well-known -x-ray", &sw).unwrap();
        assert_eq!(q.plus_words, vec!["well-known"]);
        assert_eq!(q.minus_words, vec!["x-ray"]);
    }
}
