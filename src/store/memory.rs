// src/store/memory.rs
//! In-process store: tests, dry runs and small corpora.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use super::{apply_upserts, Document, DocumentStore, Filter, Upsert, WriteSummary};
use crate::error::StoreResult;

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection directly (replaces its contents).
    pub fn with_collection(self, name: &str, docs: Vec<Document>) -> Self {
        self.inner
            .write()
            .expect("memory store lock poisoned")
            .insert(name.to_string(), docs);
        self
    }

    /// Full copy of a collection; empty when it does not exist.
    pub fn snapshot(&self, name: &str) -> Vec<Document> {
        self.inner
            .read()
            .expect("memory store lock poisoned")
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>> {
        let guard = self.inner.read().expect("memory store lock poisoned");
        let Some(docs) = guard.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|d| filter.matches(d))
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn bulk_upsert(&self, collection: &str, ops: Vec<Upsert>) -> StoreResult<WriteSummary> {
        let mut guard = self.inner.write().expect("memory store lock poisoned");
        let docs = guard.entry(collection.to_string()).or_default();
        apply_upserts(docs, ops)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<usize> {
        let mut guard = self.inner.write().expect("memory store lock poisoned");
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|d| !filter.matches(d));
        Ok(before - docs.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn find_limit_count_delete() {
        let store = MemoryStore::new().with_collection(
            "articles",
            vec![
                doc(json!({"title": "a", "text": "x"})),
                doc(json!({"title": "b", "text": ""})),
                doc(json!({"title": "c"})),
            ],
        );

        assert_eq!(store.find("articles", &Filter::All, Some(2)).await.unwrap().len(), 2);
        assert_eq!(store.find("nope", &Filter::All, None).await.unwrap().len(), 0);

        let empty = Filter::MissingOrEmpty("text".into());
        assert_eq!(store.count("articles", &empty).await.unwrap(), 2);
        assert_eq!(store.delete_many("articles", &empty).await.unwrap(), 2);
        assert_eq!(store.count("articles", &Filter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn projected_find_and_upsert() {
        let store = MemoryStore::new();
        store
            .upsert("idx", Upsert::by("title", doc(json!({"title": "a", "n": 1, "m": 2}))))
            .await
            .unwrap();
        store
            .upsert("idx", Upsert::by("title", doc(json!({"title": "a", "n": 5}))))
            .await
            .unwrap();

        let got = store
            .find_projected("idx", &Filter::All, &["title", "n"])
            .await
            .unwrap();
        assert_eq!(got, vec![doc(json!({"title": "a", "n": 5}))]);
        assert_eq!(store.snapshot("idx")[0].get("m"), Some(&json!(2)));
    }
}
