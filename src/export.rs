// src/export.rs
//! Post-processing over whole collections: field-mapped export, the join with
//! engagement records, pruning of incomplete documents, and single-field copy.

use anyhow::{Context, Result};
use std::collections::HashMap;
use tracing::{info, warn};

use crate::article::Article;
use crate::store::{Document, DocumentStore, Filter, Upsert};

/// External name of `field` under `field_map`, or the field itself when unmapped.
pub fn external_name<'a>(field_map: &'a [(String, String)], field: &'a str) -> &'a str {
    field_map
        .iter()
        .find(|(internal, _)| internal == field)
        .map(|(_, external)| external.as_str())
        .unwrap_or(field)
}

/// Copy every document of `src` into `dst`, keeping only mapped fields under
/// their external names. Documents are keyed in `dst` by the external name of
/// `key`; documents lacking `key` are skipped. Returns the number written.
pub async fn map_fields(
    store: &dyn DocumentStore,
    src: &str,
    dst: &str,
    field_map: &[(String, String)],
    key: &str,
) -> Result<usize> {
    let docs = store
        .find(src, &Filter::All, None)
        .await
        .with_context(|| format!("export: reading {src}"))?;
    let out_key = external_name(field_map, key);

    let mut ops = Vec::with_capacity(docs.len());
    for doc in docs {
        let Some(key_value) = doc.get(key) else {
            warn!(target: "export", collection = src, key, "document without key; skipped");
            continue;
        };
        let mut mapped: Document = field_map
            .iter()
            .filter_map(|(internal, external)| {
                doc.get(internal).map(|v| (external.clone(), v.clone()))
            })
            .collect();
        // the key is carried over even when the map does not list it
        mapped
            .entry(out_key.to_string())
            .or_insert_with(|| key_value.clone());
        ops.push(Upsert::by(out_key, mapped));
    }

    let written = ops.len();
    store
        .bulk_upsert(dst, ops)
        .await
        .with_context(|| format!("export: writing {dst}"))?;
    info!(target: "export", src, dst, written, "fields mapped");
    Ok(written)
}

/// Inner join of `left` and `right` on `left[left_key] == right[right_key]`.
/// Right-hand fields fill in; on a name clash the left value wins. Results
/// are upserted into `dst` keyed by `left_key`. Returns the number of joined
/// documents.
pub async fn merge(
    store: &dyn DocumentStore,
    left: &str,
    right: &str,
    left_key: &str,
    right_key: &str,
    dst: &str,
) -> Result<usize> {
    let left_docs = store
        .find(left, &Filter::All, None)
        .await
        .with_context(|| format!("merge: reading {left}"))?;
    let right_docs = store
        .find(right, &Filter::All, None)
        .await
        .with_context(|| format!("merge: reading {right}"))?;

    // Values are not Hash; index by their JSON text. First one wins on duplicates.
    let mut by_key: HashMap<String, &Document> = HashMap::with_capacity(right_docs.len());
    for doc in &right_docs {
        if let Some(k) = doc.get(right_key) {
            by_key.entry(k.to_string()).or_insert(doc);
        }
    }

    let mut ops = Vec::new();
    let mut unmatched = 0usize;
    for doc in left_docs {
        let Some(other) = doc.get(left_key).and_then(|k| by_key.get(&k.to_string())) else {
            unmatched += 1;
            continue;
        };
        let mut joined = doc.clone();
        for (k, v) in other.iter() {
            if k != right_key || right_key == left_key {
                joined.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }
        ops.push(Upsert::by(left_key, joined));
    }

    let joined = ops.len();
    store
        .bulk_upsert(dst, ops)
        .await
        .with_context(|| format!("merge: writing {dst}"))?;
    info!(target: "export", left, right, dst, joined, unmatched, "collections merged");
    Ok(joined)
}

/// Delete documents where any of `fields` is missing, null or empty.
pub async fn prune_incomplete(
    store: &dyn DocumentStore,
    collection: &str,
    fields: &[String],
) -> Result<usize> {
    if fields.is_empty() {
        return Ok(0);
    }
    let filter = Filter::Or(
        fields
            .iter()
            .map(|f| Filter::MissingOrEmpty(f.clone()))
            .collect(),
    );
    let removed = store
        .delete_many(collection, &filter)
        .await
        .with_context(|| format!("prune: deleting from {collection}"))?;
    info!(target: "export", collection, ?fields, removed, "incomplete documents pruned");
    Ok(removed)
}

/// Copy `field` from every document in `from` onto the document with the same
/// `key` in `to` (inserting it if absent). Returns the number copied.
pub async fn copy_field(
    store: &dyn DocumentStore,
    from: &str,
    to: &str,
    field: &str,
    key: &str,
) -> Result<usize> {
    let docs = store
        .find_projected(from, &Filter::All, &[key, field])
        .await
        .with_context(|| format!("copy: reading {from}"))?;

    let mut ops = Vec::with_capacity(docs.len());
    for doc in docs {
        if !doc.contains_key(field) || !doc.contains_key(key) {
            warn!(
                target: "export",
                field,
                title = %Article::title_of(&doc),
                "field not found; not copied"
            );
            continue;
        }
        ops.push(Upsert::by(key, doc));
    }

    let copied = ops.len();
    store
        .bulk_upsert(to, ops)
        .await
        .with_context(|| format!("copy: writing {to}"))?;
    info!(target: "export", from, to, field, copied, "field copied");
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::{json, Value};

    fn doc(v: Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    fn field_map() -> Vec<(String, String)> {
        vec![
            ("title".into(), "题目".into()),
            ("fog".into(), "迷雾指数".into()),
        ]
    }

    #[tokio::test]
    async fn map_fields_renames_and_drops_unmapped() {
        let store = MemoryStore::new().with_collection(
            "indexs",
            vec![
                doc(json!({"title": "a", "fog": 1.5, "rare": 2})),
                doc(json!({"title": "b"})),
                doc(json!({"fog": 9.0})),
            ],
        );
        let n = map_fields(&store, "indexs", "indexs_zh", &field_map(), "title")
            .await
            .unwrap();
        assert_eq!(n, 2);
        let out = store.snapshot("indexs_zh");
        assert_eq!(out[0], doc(json!({"题目": "a", "迷雾指数": 1.5})));
        assert_eq!(out[1], doc(json!({"题目": "b"})));

        // rerun is idempotent
        map_fields(&store, "indexs", "indexs_zh", &field_map(), "title")
            .await
            .unwrap();
        assert_eq!(store.snapshot("indexs_zh").len(), 2);
    }

    #[tokio::test]
    async fn map_fields_keeps_unmapped_key() {
        let store = MemoryStore::new().with_collection(
            "indexs",
            vec![
                doc(json!({"title": "a", "fog": 1.5, "rare": 2})),
                doc(json!({"title": "b", "rare": 1})),
            ],
        );
        let map = vec![("fog".to_string(), "迷雾指数".to_string())];
        let n = map_fields(&store, "indexs", "out", &map, "title").await.unwrap();
        assert_eq!(n, 2);
        assert_eq!(
            store.snapshot("out"),
            vec![
                doc(json!({"title": "a", "迷雾指数": 1.5})),
                doc(json!({"title": "b"})),
            ]
        );
    }

    #[tokio::test]
    async fn merge_is_inner_join_with_left_precedence() {
        let store = MemoryStore::new()
            .with_collection(
                "demands",
                vec![
                    doc(json!({"title": "a", "reads": 10, "fog": "left"})),
                    doc(json!({"title": "z", "reads": 1})),
                ],
            )
            .with_collection(
                "indexs_zh",
                vec![
                    doc(json!({"题目": "a", "fog": 2.0, "rare": 3})),
                    doc(json!({"题目": "b", "fog": 1.0})),
                ],
            );
        let n = merge(&store, "demands", "indexs_zh", "title", "题目", "merge")
            .await
            .unwrap();
        assert_eq!(n, 1);
        let out = store.snapshot("merge");
        assert_eq!(
            out,
            vec![doc(json!({"title": "a", "reads": 10, "fog": "left", "rare": 3}))]
        );
    }

    #[tokio::test]
    async fn prune_removes_docs_missing_any_field() {
        let store = MemoryStore::new().with_collection(
            "articles",
            vec![
                doc(json!({"title": "a", "text": "x", "html": "<p>"})),
                doc(json!({"title": "b", "text": null, "html": "<p>"})),
                doc(json!({"title": "c", "text": "x", "html": ""})),
                doc(json!({"title": "d", "text": "x"})),
            ],
        );
        let removed = prune_incomplete(&store, "articles", &["text".into(), "html".into()])
            .await
            .unwrap();
        assert_eq!(removed, 3);
        assert_eq!(store.snapshot("articles").len(), 1);
        assert_eq!(prune_incomplete(&store, "articles", &[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn copy_field_by_key() {
        let store = MemoryStore::new()
            .with_collection(
                "articles",
                vec![
                    doc(json!({"title": "a", "data_availability": true, "text": "x"})),
                    doc(json!({"title": "b"})),
                ],
            )
            .with_collection("indexs", vec![doc(json!({"title": "a", "fog": 1.0}))]);
        let n = copy_field(&store, "articles", "indexs", "data_availability", "title")
            .await
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(
            store.snapshot("indexs"),
            vec![doc(json!({"title": "a", "fog": 1.0, "data_availability": true}))]
        );
    }
}
