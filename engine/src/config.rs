use serde::{Deserialize, Serialize};

pub const MAX_RESULT_DOCUMENT_COUNT: usize = 5;
pub const RELEVANCE_EPSILON: f64 = 1e-6;
pub const SHARD_COUNT: usize = 16;

/// Tunables for ranking and parallel scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Results returned by a top-documents query.
    pub max_results: usize,
    /// Relevances closer than this are ranked as equal and ordered by rating.
    pub relevance_epsilon: f64,
    /// Shards in the aggregation map used by parallel scoring.
    pub shard_count: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULT_DOCUMENT_COUNT,
            relevance_epsilon: RELEVANCE_EPSILON,
            shard_count: SHARD_COUNT,
        }
    }
}
