// src/store/json_file.rs
//! Directory-backed store: one pretty-printed JSON array per collection
//! (`<dir>/<collection>.json`). Writes go through a temp file + rename so a
//! crash mid-write never leaves a truncated collection behind.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::{apply_upserts, Document, DocumentStore, Filter, Upsert, WriteSummary};
use crate::error::{StoreError, StoreResult};

#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (and create if needed) a store directory.
    pub async fn open<P: AsRef<Path>>(dir: P) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_err(&dir, e))?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    async fn load(&self, collection: &str) -> StoreResult<Vec<Document>> {
        let path = self.path_for(collection);
        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(&path, e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| StoreError::Serde {
            collection: collection.to_string(),
            source: e,
        })
    }

    async fn save(&self, collection: &str, docs: &[Document]) -> StoreResult<()> {
        let path = self.path_for(collection);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(docs).map_err(|e| StoreError::Serde {
            collection: collection.to_string(),
            source: e,
        })?;
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| io_err(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| io_err(&path, e))
    }
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Document>> {
        let docs = self.load(collection).await?;
        Ok(docs
            .into_iter()
            .filter(|d| filter.matches(d))
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn bulk_upsert(&self, collection: &str, ops: Vec<Upsert>) -> StoreResult<WriteSummary> {
        if ops.is_empty() {
            return Ok(WriteSummary::default());
        }
        let _guard = self.write_lock.lock().await;
        let mut docs = self.load(collection).await?;
        let summary = apply_upserts(&mut docs, ops)?;
        self.save(collection, &docs).await?;
        Ok(summary)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<usize> {
        let _guard = self.write_lock.lock().await;
        let mut docs = self.load(collection).await?;
        let before = docs.len();
        docs.retain(|d| !filter.matches(d));
        let removed = before - docs.len();
        if removed > 0 {
            self.save(collection, &docs).await?;
        }
        Ok(removed)
    }
}
