//! In-memory document search with TF-IDF ranking and minus-word filtering.
//!
//! [`SearchIndex`] owns the inverted and forward maps. Queries are plain words,
//! with `-word` excluding any document that contains `word`. Scoring runs either
//! on the calling thread or spread over rayon workers through a lock-striped
//! [`ConcurrentMap`]; both give the same ranking.

pub mod batch;
pub mod concurrent_map;
pub mod config;
pub mod dedup;
pub mod document;
pub mod error;
pub mod index;
pub mod paginate;
pub mod query;
pub mod request_queue;
pub mod scoring;
pub mod timing;
pub mod tokenizer;

pub type DocId = i32;

pub use batch::{process_queries, process_queries_in, process_queries_joined};
pub use concurrent_map::ConcurrentMap;
pub use config::SearchConfig;
pub use dedup::{find_duplicates, remove_duplicates, DuplicateFound};
pub use document::{Document, DocumentStatus};
pub use error::{Error, Result};
pub use index::{SearchIndex, WordFrequencies};
pub use paginate::{paginate, Paginator};
pub use query::Query;
pub use request_queue::RequestQueue;
pub use scoring::{ExecutionMode, MatchedWords};
pub use timing::LogDuration;
