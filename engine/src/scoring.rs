//! TF-IDF ranking over a [`SearchIndex`].
//!
//! Relevance of a document is the sum over matching plus words of
//! `tf * ln(N / df)`. A minus-word hit removes the document outright. Results are
//! ordered by relevance, with relevances closer than the configured epsilon
//! ranked by rating and then by ascending id, and cut to `max_results`.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::concurrent_map::ConcurrentMap;
use crate::document::{Document, DocumentStatus};
use crate::error::{Error, Result};
use crate::index::{Postings, SearchIndex};
use crate::query::{sort_unique, Query};
use crate::DocId;

/// How a query is evaluated. Never changes the result, only the speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Parallel,
}

/// Plus words found in a document, and its status.
pub type MatchedWords<'a> = (Vec<&'a str>, DocumentStatus);

impl SearchIndex {
    /// Top documents with status [`DocumentStatus::Actual`].
    pub fn find_top_documents(&self, raw_query: &str) -> Result<Vec<Document>> {
        self.find_top_documents_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn find_top_documents_by_status(
        &self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.find_top_documents_by(raw_query, move |_, document_status, _| document_status == status)
    }

    pub fn find_top_documents_by<P>(&self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        self.find_top_documents_in(ExecutionMode::Sequential, raw_query, predicate)
    }

    /// Top documents passing `predicate(id, status, rating)`, evaluated in `mode`.
    pub fn find_top_documents_in<P>(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        predicate: P,
    ) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let query = Query::parse(raw_query, &self.stop_words)?;
        let relevance = match mode {
            ExecutionMode::Sequential => self.accumulate_sequential(&query, &predicate),
            ExecutionMode::Parallel => self.accumulate_parallel(&query, &predicate),
        };

        let mut matched: Vec<Document> = relevance
            .into_iter()
            .filter_map(|(id, relevance)| {
                self.documents.get(&id).map(|data| Document::new(id, relevance, data.rating))
            })
            .collect();
        debug!(
            plus = query.plus_words.len(),
            minus = query.minus_words.len(),
            hits = matched.len(),
            ?mode,
            "query scored"
        );
        rank(&mut matched, self.config.relevance_epsilon);
        matched.truncate(self.config.max_results);
        Ok(matched)
    }

    /// Plus words of `raw_query` present in the document, sorted and deduplicated.
    /// Empty if any minus word is present.
    pub fn match_document(&self, raw_query: &str, document_id: DocId) -> Result<MatchedWords<'_>> {
        self.match_document_in(ExecutionMode::Sequential, raw_query, document_id)
    }

    pub fn match_document_in(
        &self,
        mode: ExecutionMode,
        raw_query: &str,
        document_id: DocId,
    ) -> Result<MatchedWords<'_>> {
        let data = self
            .documents
            .get(&document_id)
            .ok_or(Error::DocumentNotFound(document_id))?;
        let query = Query::parse_raw(raw_query, &self.stop_words)?;

        let excluded = match mode {
            ExecutionMode::Sequential => query
                .minus_words
                .iter()
                .any(|word| self.indexed_word_in(word, document_id).is_some()),
            ExecutionMode::Parallel => query
                .minus_words
                .par_iter()
                .any(|word| self.indexed_word_in(word, document_id).is_some()),
        };
        if excluded {
            return Ok((Vec::new(), data.status));
        }

        let mut matched: Vec<&str> = match mode {
            ExecutionMode::Sequential => query
                .plus_words
                .iter()
                .filter_map(|word| self.indexed_word_in(word, document_id))
                .collect(),
            ExecutionMode::Parallel => query
                .plus_words
                .par_iter()
                .filter_map(|word| self.indexed_word_in(word, document_id))
                .collect(),
        };
        sort_unique(&mut matched);
        Ok((matched, data.status))
    }

    /// The index's own copy of `word`, if the document contains it.
    fn indexed_word_in(&self, word: &str, document_id: DocId) -> Option<&str> {
        self.word_to_document_freqs
            .get_key_value(word)
            .filter(|(_, postings)| postings.contains_key(&document_id))
            .map(|(key, _)| key.as_str())
    }

    fn inverse_document_freq(&self, postings: &Postings) -> f64 {
        (self.document_count() as f64 / postings.len() as f64).ln()
    }

    fn accumulate_sequential<P>(&self, query: &Query<'_>, predicate: &P) -> BTreeMap<DocId, f64>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool,
    {
        let mut relevance: BTreeMap<DocId, f64> = BTreeMap::new();
        for word in &query.plus_words {
            let Some(postings) = self.word_to_document_freqs.get(*word) else {
                continue;
            };
            let idf = self.inverse_document_freq(postings);
            for (&id, &tf) in postings {
                if let Some(data) = self.documents.get(&id) {
                    if predicate(id, data.status, data.rating) {
                        *relevance.entry(id).or_insert(0.0) += tf * idf;
                    }
                }
            }
        }
        for word in &query.minus_words {
            if let Some(postings) = self.word_to_document_freqs.get(*word) {
                for id in postings.keys() {
                    relevance.remove(id);
                }
            }
        }
        relevance
    }

    fn accumulate_parallel<P>(&self, query: &Query<'_>, predicate: &P) -> BTreeMap<DocId, f64>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let relevance: ConcurrentMap<DocId, f64> = ConcurrentMap::new(self.config.shard_count);
        query.plus_words.par_iter().for_each(|word| {
            let Some(postings) = self.word_to_document_freqs.get(*word) else {
                return;
            };
            let idf = self.inverse_document_freq(postings);
            for (&id, &tf) in postings {
                if let Some(data) = self.documents.get(&id) {
                    if predicate(id, data.status, data.rating) {
                        relevance.accumulate_add(id, tf * idf);
                    }
                }
            }
        });
        query.minus_words.par_iter().for_each(|word| {
            if let Some(postings) = self.word_to_document_freqs.get(*word) {
                for &id in postings.keys() {
                    relevance.erase(id);
                }
            }
        });
        relevance.drain()
    }
}

/// Sort by relevance descending. Runs of neighbours whose relevance differs by
/// less than `epsilon` are reordered by rating descending, then id ascending.
pub fn rank(documents: &mut [Document], epsilon: f64) {
    documents.sort_by(|l, r| r.relevance.total_cmp(&l.relevance).then(l.id.cmp(&r.id)));
    let mut start = 0;
    while start < documents.len() {
        let mut end = start + 1;
        while end < documents.len()
            && documents[end - 1].relevance - documents[end].relevance < epsilon
        {
            end += 1;
        }
        documents[start..end].sort_by(|l, r| r.rating.cmp(&l.rating).then(l.id.cmp(&r.id)));
        start = end;
    }
}
