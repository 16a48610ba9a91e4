use crate::DocId;

/// Errors returned by the search engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Negative id, or an id that is already live in the index.
    #[error("invalid document id {0}")]
    InvalidDocumentId(DocId),
    /// A document word contains control characters.
    #[error("word {0:?} is invalid")]
    InvalidToken(String),
    /// Empty minus word, double dash, or control characters in a query word.
    #[error("query word {0:?} is invalid")]
    MalformedQuery(String),
    /// Stop words rejected at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("document {0} not found")]
    DocumentNotFound(DocId),
}

pub type Result<T> = std::result::Result<T, Error>;
