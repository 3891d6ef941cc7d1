// tests/pipeline_run.rs
use article_readability::batch::BatchOptions;
use article_readability::config::PipelineConfig;
use article_readability::lexicon::Lexicon;
use article_readability::pipeline::Pipeline;
use article_readability::segment::JiebaSegmenter;
use article_readability::store::{Document, DocumentStore, Filter, JsonFileStore, Upsert};
use serde_json::json;
use std::sync::Arc;

fn doc(v: serde_json::Value) -> Document {
    v.as_object().cloned().unwrap()
}

#[tokio::test]
async fn full_run_from_raw_articles_to_merged_export() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = PipelineConfig::from_toml_str(&format!(
        "store_dir = {:?}\n",
        tmp.path().display().to_string()
    ))
    .unwrap();
    let lexicon = Lexicon::load(&cfg.lexicon).expect("load bundled lexicon");
    let store = Arc::new(JsonFileStore::open(&cfg.store_dir).await.unwrap());

    store
        .bulk_upsert(
            "articles",
            vec![
                Upsert::by(
                    "title",
                    doc(json!({
                        "title": "高血压",
                        "text": "研究表明高血压患者必须按时服用药物。但是很多人担心副作用！",
                        "html": "<p>高血压</p><p>药物</p><table></table>"
                    })),
                ),
                Upsert::by(
                    "title",
                    doc(json!({
                        "title": "睡眠",
                        "text": "充足的睡眠让人快乐。",
                        "html": "<p>睡眠</p>"
                    })),
                ),
                Upsert::by("title", doc(json!({"title": "空白", "text": ""}))),
            ],
        )
        .await
        .unwrap();
    store
        .bulk_upsert(
            "demands",
            vec![
                Upsert::by("title", doc(json!({"title": "高血压", "reads": 120}))),
                Upsert::by("title", doc(json!({"title": "无关", "reads": 3}))),
            ],
        )
        .await
        .unwrap();

    let pipeline = Pipeline::new(
        cfg,
        store.clone(),
        Arc::new(lexicon),
        Arc::new(JiebaSegmenter::new()),
    );
    let report = pipeline.run_all(&BatchOptions::default()).await.unwrap();

    assert_eq!(report.pruned, 1);
    assert_eq!(report.segmented.written, 2);
    assert_eq!(report.scored.written, 2);
    assert_eq!(report.batch.written, 2);
    assert_eq!(report.batch.failed, 0);
    assert_eq!(report.exported, 2);
    assert_eq!(report.merged, 1);

    let idx = store
        .find("indexs", &Filter::eq("title", "高血压"), None)
        .await
        .unwrap();
    assert_eq!(idx.len(), 1);
    assert_eq!(idx[0].get("sentence_count"), Some(&json!(2)));
    assert_eq!(idx[0].get("paragraphs"), Some(&json!(2)));
    assert_eq!(idx[0].get("tables"), Some(&json!(1)));
    assert_eq!(idx[0].get("completely"), Some(&json!(true)));

    let merged = store.find("merge", &Filter::All, None).await.unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].get("reads"), Some(&json!(120)));
    assert_eq!(merged[0].get("句子数"), Some(&json!(2)));
    assert!(merged[0].get("迷雾指数").is_some());
}
