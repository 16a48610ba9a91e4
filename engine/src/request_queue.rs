use std::collections::VecDeque;

use crate::document::{Document, DocumentStatus};
use crate::error::Result;
use crate::index::SearchIndex;
use crate::DocId;

/// Requests remembered by default: one per minute of a day.
pub const MIN_IN_DAY: usize = 1440;

/// Runs queries against an index while tracking, over a sliding window of the
/// most recent requests, how many came back empty.
pub struct RequestQueue<'a> {
    index: &'a SearchIndex,
    requests: VecDeque<bool>,
    capacity: usize,
    no_result_requests: usize,
}

impl<'a> RequestQueue<'a> {
    pub fn new(index: &'a SearchIndex) -> Self {
        Self::with_capacity(index, MIN_IN_DAY)
    }

    pub fn with_capacity(index: &'a SearchIndex, capacity: usize) -> Self {
        Self {
            index,
            requests: VecDeque::with_capacity(capacity),
            capacity,
            no_result_requests: 0,
        }
    }

    pub fn add_find_request(&mut self, raw_query: &str) -> Result<Vec<Document>> {
        self.add_find_request_by_status(raw_query, DocumentStatus::Actual)
    }

    pub fn add_find_request_by_status(
        &mut self,
        raw_query: &str,
        status: DocumentStatus,
    ) -> Result<Vec<Document>> {
        self.add_find_request_by(raw_query, move |_, document_status, _| document_status == status)
    }

    pub fn add_find_request_by<P>(&mut self, raw_query: &str, predicate: P) -> Result<Vec<Document>>
    where
        P: Fn(DocId, DocumentStatus, i32) -> bool + Sync,
    {
        let found = self.index.find_top_documents_by(raw_query, predicate)?;
        self.record(found.is_empty());
        Ok(found)
    }

    /// Empty results among the requests currently in the window.
    pub fn no_result_requests(&self) -> usize {
        self.no_result_requests
    }

    fn record(&mut self, is_empty: bool) {
        if self.capacity == 0 {
            return;
        }
        if self.requests.len() == self.capacity {
            if let Some(true) = self.requests.pop_front() {
                self.no_result_requests -= 1;
            }
        }
        self.requests.push_back(is_empty);
        if is_empty {
            self.no_result_requests += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SearchIndex {
        let mut index = SearchIndex::new("and in at").unwrap();
        let docs = [
            (1, "curly cat curly tail", vec![7, 2, 7]),
            (2, "curly dog and fancy collar", vec![1, 2, 3]),
            (3, "big cat fancy collar ", vec![1, 2, 8]),
            (4, "big dog sparrow Eugene", vec![1, 3, 2]),
            (5, "big dog sparrow Vasiliy", vec![1, 1, 1]),
        ];
        for (id, text, ratings) in docs {
            index.add_document(id, text, DocumentStatus::Actual, &ratings).unwrap();
        }
        index
    }

    #[test]
    fn window_evicts_oldest_requests() {
        let index = index();
        let mut queue = RequestQueue::new(&index);
        for _ in 0..1439 {
            queue.add_find_request("empty request").unwrap();
        }
        queue.add_find_request("curly dog").unwrap();
        assert_eq!(queue.no_result_requests(), 1439);
        queue.add_find_request("big collar").unwrap();
        queue.add_find_request("sparrow").unwrap();
        assert_eq!(queue.no_result_requests(), 1437);
    }

    #[test]
    fn errors_are_not_recorded() {
        let index = index();
        let mut queue = RequestQueue::with_capacity(&index, 2);
        assert!(queue.add_find_request("cat --dog").is_err());
        queue.add_find_request("nothing").unwrap();
        assert_eq!(queue.no_result_requests(), 1);
        let banned = queue.add_find_request_by_status("cat", DocumentStatus::Banned).unwrap();
        assert!(banned.is_empty());
        assert_eq!(queue.no_result_requests(), 2);
        queue.add_find_request_by("cat", |id, _, _| id == 1).unwrap();
        assert_eq!(queue.no_result_requests(), 1);
    }

    #[test]
    fn zero_capacity_tracks_nothing() {
        let index = index();
        let mut queue = RequestQueue::with_capacity(&index, 0);
        queue.add_find_request("nothing").unwrap();
        assert_eq!(queue.no_result_requests(), 0);
    }
}
