//! Error types for query normalization and paging.

use thiserror::Error;

/// A query input whose shape can't be turned into FOLIO parameters.
///
/// These are caller contract violations and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// `query` held something other than a string
    #[error("query must be a string, got {value}")]
    QueryNotString { value: String },

    /// `query` held more than one value
    #[error("query must be a single value, got {count}: {values:?}")]
    MultipleQueries { count: usize, values: Vec<String> },

    /// `filters` held something other than a string or list of strings
    #[error("filters must be strings, got {value}")]
    FilterNotString { value: String },
}

/// Result type for query classification
pub type Result<T> = std::result::Result<T, QueryError>;

/// A response body that doesn't look like a FOLIO collection envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("response body is not a JSON object")]
    NotAnObject,

    #[error("response body has no integer totalRecords")]
    MissingTotalRecords,

    #[error("response body has no array of records")]
    MissingRecords,
}

/// Errors from driving a paging session over a transport.
#[derive(Debug, Error)]
pub enum PagingError {
    #[error("invalid query: {0}")]
    Query(#[from] QueryError),

    #[error("invalid response: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Errors from loading paging configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("page_size must be positive")]
    ZeroPageSize,
}
