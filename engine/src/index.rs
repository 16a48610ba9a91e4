use std::collections::{btree_set, BTreeMap, BTreeSet, HashMap};
use std::iter::Copied;

use tracing::debug;

use crate::config::SearchConfig;
use crate::document::{compute_average_rating, DocumentData, DocumentStatus};
use crate::error::{Error, Result};
use crate::tokenizer::{is_valid_word, make_unique_non_empty_strings, split_into_words};
use crate::DocId;

/// term -> document -> term frequency
pub type Postings = BTreeMap<DocId, f64>;
/// term -> term frequency, for one document
pub type WordFrequencies = BTreeMap<String, f64>;

static EMPTY_FREQUENCIES: WordFrequencies = BTreeMap::new();

/// In-memory inverted index with a forward view per document.
///
/// Not internally synchronized for mutation: `add_document` and `remove_document`
/// take `&mut self`, so the borrow checker keeps writers away from readers. Any
/// number of readers (including parallel scoring and batch queries) may share `&self`.
#[derive(Debug, Default)]
pub struct SearchIndex {
    pub(crate) stop_words: BTreeSet<String>,
    pub(crate) word_to_document_freqs: HashMap<String, Postings>,
    pub(crate) document_to_word_freqs: HashMap<DocId, WordFrequencies>,
    pub(crate) documents: HashMap<DocId, DocumentData>,
    document_ids: BTreeSet<DocId>,
    pub(crate) config: SearchConfig,
}

impl SearchIndex {
    /// Build from a space-delimited stop word string.
    pub fn new(stop_words_text: &str) -> Result<Self> {
        Self::from_stop_words(split_into_words(stop_words_text))
    }

    /// Build from any collection of stop words. Empty strings are ignored and
    /// duplicates collapse.
    pub fn from_stop_words<I, S>(stop_words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = make_unique_non_empty_strings(stop_words);
        if let Some(bad) = stop_words.iter().find(|w| !is_valid_word(w)) {
            return Err(Error::InvalidConfiguration(format!(
                "stop word {bad:?} contains control characters"
            )));
        }
        Ok(Self { stop_words, ..Self::default() })
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Index a document. Fails without touching the index if the id is negative or
    /// live, or if any word carries control characters.
    pub fn add_document(
        &mut self,
        document_id: DocId,
        document: &str,
        status: DocumentStatus,
        ratings: &[i32],
    ) -> Result<()> {
        if document_id < 0 || self.documents.contains_key(&document_id) {
            return Err(Error::InvalidDocumentId(document_id));
        }
        let words = self.split_into_words_no_stop(document)?;

        if !words.is_empty() {
            let inv_word_count = 1.0 / words.len() as f64;
            let mut word_freqs = WordFrequencies::new();
            for word in &words {
                *word_freqs.entry((*word).to_string()).or_insert(0.0) += inv_word_count;
            }
            for (word, &tf) in &word_freqs {
                self.word_to_document_freqs
                    .entry(word.clone())
                    .or_default()
                    .insert(document_id, tf);
            }
            self.document_to_word_freqs.insert(document_id, word_freqs);
        }

        self.documents.insert(
            document_id,
            DocumentData { rating: compute_average_rating(ratings), status },
        );
        self.document_ids.insert(document_id);
        debug!(doc_id = document_id, words = words.len(), ?status, "document added");
        Ok(())
    }

    /// Drop a document and every posting that references it. Unknown ids are ignored.
    pub fn remove_document(&mut self, document_id: DocId) {
        if self.documents.remove(&document_id).is_none() {
            return;
        }
        self.document_ids.remove(&document_id);
        if let Some(word_freqs) = self.document_to_word_freqs.remove(&document_id) {
            for word in word_freqs.keys() {
                if let Some(postings) = self.word_to_document_freqs.get_mut(word) {
                    postings.remove(&document_id);
                    if postings.is_empty() {
                        self.word_to_document_freqs.remove(word);
                    }
                }
            }
        }
        debug!(doc_id = document_id, "document removed");
    }

    /// Term frequencies of one document, empty for unknown ids.
    pub fn word_frequencies(&self, document_id: DocId) -> &WordFrequencies {
        self.document_to_word_freqs
            .get(&document_id)
            .unwrap_or(&EMPTY_FREQUENCIES)
    }

    /// Postings of a term, if any live document contains it.
    pub fn postings(&self, word: &str) -> Option<&Postings> {
        self.word_to_document_freqs.get(word)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.word_to_document_freqs.len()
    }

    pub fn document_status(&self, document_id: DocId) -> Option<DocumentStatus> {
        self.documents.get(&document_id).map(|d| d.status)
    }

    pub fn document_rating(&self, document_id: DocId) -> Option<i32> {
        self.documents.get(&document_id).map(|d| d.rating)
    }

    /// Live document ids in ascending order.
    pub fn document_ids(&self) -> DocumentIds<'_> {
        self.document_ids.iter().copied()
    }

    fn split_into_words_no_stop<'t>(&self, text: &'t str) -> Result<Vec<&'t str>> {
        let mut words = Vec::new();
        for word in split_into_words(text) {
            if !is_valid_word(word) {
                return Err(Error::InvalidToken(word.to_string()));
            }
            if !self.is_stop_word(word) {
                words.push(word);
            }
        }
        Ok(words)
    }
}

pub type DocumentIds<'a> = Copied<btree_set::Iter<'a, DocId>>;

impl<'a> IntoIterator for &'a SearchIndex {
    type Item = DocId;
    type IntoIter = DocumentIds<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.document_ids()
    }
}
