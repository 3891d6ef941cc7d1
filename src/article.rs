// src/article.rs
//! Article view over a raw store document.
//!
//! Enrichment passes fill disjoint subsets of fields (`words`/`pos` from
//! segmentation, `sentiment_list` from scoring, `count_topic` from topic
//! modelling), so every field except `title` is optional here. The aggregator
//! decides which of them are required.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::MetricError;
use crate::store::Document;

pub const TITLE: &str = "title";
pub const TEXT: &str = "text";
pub const HTML: &str = "html";
pub const WORDS: &str = "words";
pub const POS: &str = "pos";
pub const SENTIMENT_LIST: &str = "sentiment_list";
pub const COUNT_TOPIC: &str = "count_topic";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Article {
    pub title: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub words: Option<Vec<String>>,
    /// `(token, tag)` pairs, stored as two-element arrays.
    pub pos: Option<Vec<(String, String)>>,
    pub sentiment_list: Option<Vec<i64>>,
    pub count_topic: Option<i64>,
}

impl Article {
    pub fn from_document(doc: &Document) -> Result<Self, MetricError> {
        let title = field::<String>(doc, TITLE)?.ok_or(MetricError::MissingField(TITLE))?;
        Ok(Self {
            title,
            text: field(doc, TEXT)?,
            html: field(doc, HTML)?,
            words: field(doc, WORDS)?,
            pos: field(doc, POS)?,
            sentiment_list: field(doc, SENTIMENT_LIST)?,
            count_topic: field(doc, COUNT_TOPIC)?,
        })
    }

    /// Title for log lines, even when the document could not be parsed.
    pub fn title_of(doc: &Document) -> String {
        match doc.get(TITLE) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "<untitled>".to_string(),
        }
    }
}

/// `null` is treated like an absent field.
fn field<T: DeserializeOwned>(doc: &Document, name: &'static str) -> Result<Option<T>, MetricError> {
    match doc.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| MetricError::InvalidField {
                field: name,
                message: e.to_string(),
            }),
    }
}
