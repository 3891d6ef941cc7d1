// src/error.rs
//! Typed errors for the metric engine and the document store.
//!
//! `MetricError` is per-article and recoverable: the batch runner logs it with
//! the article title and moves on. `StoreError` bubbles up through `anyhow` at
//! the orchestration layer.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),

    #[error("field `{field}` is malformed: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("zero denominator while computing `{0}`")]
    ZeroDenominator(&'static str),

    #[error("sentiment list is empty")]
    EmptySentimentList,

    #[error("lexicon has no `{0}` category")]
    MissingCategory(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("collection `{collection}` is not valid JSON: {source}")]
    Serde {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("document has no key field `{0}`")]
    MissingKey(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
