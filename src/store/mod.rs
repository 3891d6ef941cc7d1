// src/store/mod.rs
//! Keyed document-store contract used by every pipeline stage.
//!
//! Documents are flat JSON objects. Collections are addressed by name and the
//! pipeline writes exclusively through keyed upserts (merge-or-insert by a
//! unique key field), so re-running a stage is idempotent.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StoreResult;

pub type Document = Map<String, Value>;

/// Minimal query language; enough for the pipeline's lookups and cleanups.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Eq(String, Value),
    Exists(String),
    /// Field absent, `null`, or an empty string/array.
    MissingOrEmpty(String),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: &str, value: impl Into<Value>) -> Self {
        Filter::Eq(field.to_string(), value.into())
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(f, v) => doc.get(f) == Some(v),
            Filter::Exists(f) => doc.contains_key(f),
            Filter::MissingOrEmpty(f) => match doc.get(f) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(Value::Array(a)) => a.is_empty(),
                Some(_) => false,
            },
            Filter::And(fs) => fs.iter().all(|f| f.matches(doc)),
            Filter::Or(fs) => fs.iter().any(|f| f.matches(doc)),
        }
    }
}

/// One keyed upsert: `$set` the document's fields on the record whose
/// `key` field equals the document's own `key` value, inserting if absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Upsert {
    pub key: String,
    pub doc: Document,
}

impl Upsert {
    pub fn by(key: &str, doc: Document) -> Self {
        Self {
            key: key.to_string(),
            doc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub matched: usize,
    pub inserted: usize,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All matching documents, in insertion order, at most `limit` of them.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>>;

    /// Like `find` but only the named fields are kept.
    async fn find_projected(
        &self,
        collection: &str,
        filter: &Filter,
        fields: &[&str],
    ) -> StoreResult<Vec<Document>> {
        let docs = self.find(collection, filter, None).await?;
        Ok(docs.into_iter().map(|d| project(d, fields)).collect())
    }

    async fn upsert(&self, collection: &str, op: Upsert) -> StoreResult<WriteSummary> {
        self.bulk_upsert(collection, vec![op]).await
    }

    async fn bulk_upsert(&self, collection: &str, ops: Vec<Upsert>) -> StoreResult<WriteSummary>;

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<usize> {
        Ok(self.find(collection, filter, None).await?.len())
    }

    /// Returns the number of removed documents.
    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<usize>;
}

pub fn project(doc: Document, fields: &[&str]) -> Document {
    doc.into_iter()
        .filter(|(k, _)| fields.contains(&k.as_str()))
        .collect()
}

/// Apply keyed upserts to an in-memory collection. Shared by both stores.
/// Every op is checked for its key first; on error `docs` is left untouched.
pub(crate) fn apply_upserts(
    docs: &mut Vec<Document>,
    ops: Vec<Upsert>,
) -> StoreResult<WriteSummary> {
    use crate::error::StoreError;
    use std::collections::{HashMap, HashSet};

    if let Some(op) = ops.iter().find(|op| !op.doc.contains_key(&op.key)) {
        return Err(StoreError::MissingKey(op.key.clone()));
    }

    // (key field, serialized key value) -> position; values are not Hash.
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut indexed_fields: HashSet<String> = HashSet::new();

    let mut summary = WriteSummary::default();
    for op in ops {
        let key_val = match op.doc.get(&op.key) {
            Some(v) => v.to_string(),
            None => return Err(StoreError::MissingKey(op.key)),
        };

        if indexed_fields.insert(op.key.clone()) {
            for (i, d) in docs.iter().enumerate() {
                if let Some(v) = d.get(&op.key) {
                    index.entry((op.key.clone(), v.to_string())).or_insert(i);
                }
            }
        }

        match index.get(&(op.key.clone(), key_val.clone())) {
            Some(&i) => {
                let existing = &mut docs[i];
                for (k, v) in op.doc {
                    existing.insert(k, v);
                }
                summary.matched += 1;
            }
            None => {
                index.insert((op.key, key_val), docs.len());
                docs.push(op.doc);
                summary.inserted += 1;
            }
        }
    }
    Ok(summary)
}
