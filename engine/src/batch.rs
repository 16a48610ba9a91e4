use rayon::prelude::*;

use crate::document::{Document, DocumentStatus};
use crate::error::Result;
use crate::index::SearchIndex;
use crate::scoring::ExecutionMode;

/// Run every query against `index` in parallel. Result `i` belongs to query `i`.
pub fn process_queries<Q>(index: &SearchIndex, queries: &[Q]) -> Result<Vec<Vec<Document>>>
where
    Q: AsRef<str> + Sync,
{
    process_queries_in(index, ExecutionMode::Sequential, queries)
}

/// Like [`process_queries`], with each query itself scored in `mode`.
pub fn process_queries_in<Q>(
    index: &SearchIndex,
    mode: ExecutionMode,
    queries: &[Q],
) -> Result<Vec<Vec<Document>>>
where
    Q: AsRef<str> + Sync,
{
    queries
        .par_iter()
        .map(|query| {
            index.find_top_documents_in(mode, query.as_ref(), |_, status, _| {
                status == DocumentStatus::Actual
            })
        })
        .collect()
}

/// All results of [`process_queries`] concatenated in query order.
pub fn process_queries_joined<Q>(index: &SearchIndex, queries: &[Q]) -> Result<Vec<Document>>
where
    Q: AsRef<str> + Sync,
{
    Ok(process_queries(index, queries)?.into_iter().flatten().collect())
}
