// tests/batch_isolation.rs
use article_readability::aggregate::{Aggregator, AggregatorSettings};
use article_readability::batch::{BatchOptions, BatchRunner};
use article_readability::config::LexiconPaths;
use article_readability::error::MetricError;
use article_readability::lexicon::Lexicon;
use article_readability::store::{Document, DocumentStore, Filter, JsonFileStore, MemoryStore};
use serde_json::json;
use std::sync::Arc;

fn article(i: usize) -> Document {
    json!({
        "title": format!("article-{i}"),
        "text": "研究表明运动有益健康。但是过度运动也会带来损伤！",
        "html": "<p>研究</p><p>运动</p><img src=\"a.png\"/><a href=\"#\">link</a>",
        "words": ["研究", "表明", "运动", "有益", "健康", "。",
                  "但是", "过度", "运动", "也", "会", "带来", "损伤", "！"],
        "pos": [["研究","vn"],["表明","v"],["运动","vn"],["有益","v"],["健康","a"],["。","x"],
                ["但是","c"],["过度","d"],["运动","vn"],["也","d"],["会","v"],["带来","v"],
                ["损伤","vn"],["！","x"]],
        "sentiment_list": [2, 0],
        "count_topic": 3
    })
    .as_object()
    .cloned()
    .unwrap()
}

fn aggregator() -> Aggregator {
    let lex = Lexicon::load(&LexiconPaths::under("data")).expect("load bundled lexicon");
    Aggregator::new(Arc::new(lex), AggregatorSettings::default())
}

#[tokio::test]
async fn one_bad_article_does_not_stop_the_batch() {
    let mut docs: Vec<Document> = (0..10).map(article).collect();
    docs[4].remove("html");
    let store = Arc::new(MemoryStore::new().with_collection("articles", docs));

    let runner = BatchRunner::new(store.clone(), aggregator());
    let summary = runner.run(&BatchOptions::default()).await.unwrap();

    assert_eq!(summary.processed, 10);
    assert_eq!(summary.written, 9);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.failures[0].title, "article-4");
    assert_eq!(summary.failures[0].error, MetricError::MissingField("html"));

    let out = store.snapshot("indexs");
    assert_eq!(out.len(), 9);
    assert!(out.iter().all(|d| d.get("completely") == Some(&json!(true))));
    assert!(out.iter().all(|d| d.get("title") != Some(&json!("article-4"))));
    assert_eq!(out[0].get("count_topic"), Some(&json!(3)));
    assert_eq!(out[0].get("cite"), Some(&json!(2)));
    assert_eq!(out[0].get("turning"), Some(&json!(1)));
    assert_eq!(out[0].get("images"), Some(&json!(1)));
}

#[tokio::test]
async fn rerun_with_skip_completed_only_retries_failures() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::open(tmp.path()).await.unwrap());

    let mut docs: Vec<Document> = (0..4).map(article).collect();
    docs[1].insert("sentiment_list".into(), json!([]));
    store
        .bulk_upsert(
            "articles",
            docs.into_iter()
                .map(|d| article_readability::store::Upsert::by("title", d))
                .collect(),
        )
        .await
        .unwrap();

    let runner = BatchRunner::new(store.clone(), aggregator());
    let first = runner.run(&BatchOptions::default()).await.unwrap();
    assert_eq!((first.written, first.failed), (3, 1));
    assert_eq!(first.failures[0].error, MetricError::EmptySentimentList);

    // fix the broken article, then rerun skipping complete records
    store
        .upsert(
            "articles",
            article_readability::store::Upsert::by("title", article(1)),
        )
        .await
        .unwrap();
    let opts = BatchOptions {
        skip_completed: true,
        chunk_size: 1,
        ..BatchOptions::default()
    };
    let second = runner.run(&opts).await.unwrap();
    assert_eq!(second.skipped, 3);
    assert_eq!(second.processed, 1);
    assert_eq!(second.written, 1);

    let complete = store
        .count("indexs", &Filter::eq("completely", true))
        .await
        .unwrap();
    assert_eq!(complete, 4);
}

#[tokio::test]
async fn bounded_reruns_advance_past_completed_articles() {
    let docs: Vec<Document> = (0..6).map(article).collect();
    let store = Arc::new(MemoryStore::new().with_collection("articles", docs));
    let runner = BatchRunner::new(store.clone(), aggregator());
    let opts = BatchOptions {
        limit: Some(3),
        skip_completed: true,
        ..BatchOptions::default()
    };

    let first = runner.run(&opts).await.unwrap();
    assert_eq!((first.processed, first.skipped), (3, 0));

    let second = runner.run(&opts).await.unwrap();
    assert_eq!((second.processed, second.skipped), (3, 3));
    assert_eq!(store.snapshot("indexs").len(), 6);

    let third = runner.run(&opts).await.unwrap();
    assert_eq!((third.processed, third.skipped, third.written), (0, 6, 0));
}
