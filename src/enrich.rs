// src/enrich.rs
//! Enrichment passes: fill `words`/`pos` and `sentiment_list` on every
//! article that has text. Both passes upsert by title, so reruns overwrite.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::article::{Article, POS, SENTIMENT_LIST, TEXT, TITLE, WORDS};
use crate::segment::{Segmenter, Tagger};
use crate::sentiment::SentimentScorer;
use crate::store::{Document, DocumentStore, Filter, Upsert};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub written: usize,
    pub skipped: usize,
}

fn text_of(doc: &Document) -> Option<&str> {
    match doc.get(TEXT) {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// Upsert for one enriched article; `None` (and a log line) when it has no
/// usable text or title.
fn enriched<F>(doc: &Document, pass: &'static str, fill: F) -> Option<Upsert>
where
    F: FnOnce(&str) -> Document,
{
    let title = doc.get(TITLE).cloned();
    match (title, text_of(doc)) {
        (Some(title @ Value::String(_)), Some(text)) => {
            let mut out = fill(text);
            out.insert(TITLE.to_string(), title);
            Some(Upsert::by(TITLE, out))
        }
        _ => {
            warn!(target: "enrich", pass, title = %Article::title_of(doc), "text not found; skipped");
            None
        }
    }
}

async fn write_all(
    store: &dyn DocumentStore,
    dst: &str,
    ops: Vec<Upsert>,
    skipped: usize,
    pass: &'static str,
) -> Result<PassSummary> {
    let written = ops.len();
    store
        .bulk_upsert(dst, ops)
        .await
        .with_context(|| format!("{pass}: writing {dst}"))?;
    info!(target: "enrich", pass, written, skipped, "pass finished");
    Ok(PassSummary { written, skipped })
}

/// Segment and tag every article in `src`, writing `words` and `pos` to `dst`.
pub async fn segment_pass<S>(
    store: &dyn DocumentStore,
    segmenter: &S,
    src: &str,
    dst: &str,
) -> Result<PassSummary>
where
    S: Segmenter + Tagger + ?Sized,
{
    let docs = store
        .find(src, &Filter::All, None)
        .await
        .with_context(|| format!("segment: reading {src}"))?;

    let mut ops = Vec::with_capacity(docs.len());
    let mut skipped = 0usize;
    for doc in &docs {
        let op = enriched(doc, "segment", |text| {
            let words = segmenter.segment(text);
            let pos: Vec<Value> = segmenter
                .tag(text)
                .into_iter()
                .map(|(w, t)| json!([w, t]))
                .collect();
            let mut out = Document::new();
            out.insert(WORDS.to_string(), json!(words));
            out.insert(POS.to_string(), Value::Array(pos));
            out
        });
        match op {
            Some(op) => ops.push(op),
            None => skipped += 1,
        }
    }
    write_all(store, dst, ops, skipped, "segment").await
}

/// Score every sentence of every article in `src`, writing `sentiment_list` to `dst`.
pub async fn sentiment_pass(
    store: &dyn DocumentStore,
    scorer: &SentimentScorer,
    src: &str,
    dst: &str,
) -> Result<PassSummary> {
    let docs = store
        .find(src, &Filter::All, None)
        .await
        .with_context(|| format!("sentiment: reading {src}"))?;

    let mut ops = Vec::with_capacity(docs.len());
    let mut skipped = 0usize;
    for doc in &docs {
        let op = enriched(doc, "sentiment", |text| {
            let mut out = Document::new();
            out.insert(SENTIMENT_LIST.to_string(), json!(scorer.score_text(text)));
            out
        });
        match op {
            Some(op) => ops.push(op),
            None => skipped += 1,
        }
    }
    write_all(store, dst, ops, skipped, "sentiment").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::Lexicon;
    use crate::segment::WhitespaceSegmenter;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn doc(v: Value) -> Document {
        v.as_object().cloned().unwrap()
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_collection(
            "articles",
            vec![
                doc(json!({"title": "a", "text": "good day. bad day."})),
                doc(json!({"title": "b", "text": ""})),
                doc(json!({"title": "c"})),
            ],
        )
    }

    #[tokio::test]
    async fn segment_pass_writes_words_and_pairs() {
        let store = store();
        let s = segment_pass(&store, &WhitespaceSegmenter, "articles", "articles")
            .await
            .unwrap();
        assert_eq!(s, PassSummary { written: 1, skipped: 2 });

        let a = &store.snapshot("articles")[0];
        assert_eq!(a.get(WORDS), Some(&json!(["good", "day.", "bad", "day."])));
        assert_eq!(a.get(POS).unwrap()[0], json!(["good", "n"]));
        // text survives the $set merge
        assert_eq!(a.get(TEXT), Some(&json!("good day. bad day.")));
    }

    #[tokio::test]
    async fn sentiment_pass_writes_one_score_per_sentence() {
        let store = store();
        let lex = Lexicon::builder()
            .sentiment("joy", "good", 2)
            .sentiment("anger", "bad", -1)
            .build();
        let scorer = SentimentScorer::new(Arc::new(lex), Arc::new(WhitespaceSegmenter));
        let s = sentiment_pass(&store, &scorer, "articles", "indexs")
            .await
            .unwrap();
        assert_eq!(s.written, 1);

        let out = store.snapshot("indexs");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get(SENTIMENT_LIST), Some(&json!([2, -1])));
        assert_eq!(out[0].get(TITLE), Some(&json!("a")));
    }
}
