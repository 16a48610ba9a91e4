use std::collections::HashSet;
use std::fmt;

use tracing::info;

use crate::index::SearchIndex;
use crate::DocId;

/// Notice emitted for each duplicate document removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateFound(pub DocId);

impl fmt::Display for DuplicateFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "found duplicate document id {}", self.0)
    }
}

/// Ids of documents whose set of words equals that of a lower id, in ascending order.
pub fn find_duplicates(index: &SearchIndex) -> Vec<DocId> {
    let mut seen: HashSet<Vec<&str>> = HashSet::new();
    let mut duplicates = Vec::new();
    for document_id in index.document_ids() {
        let words: Vec<&str> = index
            .word_frequencies(document_id)
            .keys()
            .map(String::as_str)
            .collect();
        if !seen.insert(words) {
            duplicates.push(document_id);
        }
    }
    duplicates
}

/// Remove every duplicate found by [`find_duplicates`], keeping the lowest id of
/// each group. Logs one [`DuplicateFound`] line per removal and returns the
/// removed ids.
pub fn remove_duplicates(index: &mut SearchIndex) -> Vec<DocId> {
    let duplicates = find_duplicates(index);
    for &document_id in &duplicates {
        info!("{}", DuplicateFound(document_id));
        index.remove_document(document_id);
    }
    duplicates
}
