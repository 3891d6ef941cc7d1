// src/pipeline.rs
//! Wiring of the individual passes into the full offline run.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::aggregate::{Aggregator, AggregatorSettings};
use crate::article::{TEXT, TITLE};
use crate::batch::{BatchOptions, BatchRunner, BatchSummary};
use crate::config::PipelineConfig;
use crate::enrich::{self, PassSummary};
use crate::export;
use crate::lexicon::Lexicon;
use crate::segment::{Segmenter, Tagger};
use crate::sentiment::SentimentScorer;
use crate::store::DocumentStore;

/// Anything that can both segment and tag.
pub trait TextAnalyzer: Segmenter + Tagger {}
impl<T: Segmenter + Tagger> TextAnalyzer for T {}

pub struct Pipeline {
    cfg: PipelineConfig,
    store: Arc<dyn DocumentStore>,
    lexicon: Arc<Lexicon>,
    analyzer: Arc<dyn TextAnalyzer>,
}

/// Counts from one full run, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub pruned: usize,
    pub segmented: PassSummary,
    pub scored: PassSummary,
    pub batch: BatchSummary,
    pub exported: usize,
    pub merged: usize,
}

impl Pipeline {
    pub fn new(
        cfg: PipelineConfig,
        store: Arc<dyn DocumentStore>,
        lexicon: Arc<Lexicon>,
        analyzer: Arc<dyn TextAnalyzer>,
    ) -> Self {
        Self {
            cfg,
            store,
            lexicon,
            analyzer,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.cfg
    }

    pub async fn prune(&self, collection: &str, fields: &[String]) -> Result<usize> {
        export::prune_incomplete(self.store.as_ref(), collection, fields).await
    }

    pub async fn segment(&self) -> Result<PassSummary> {
        let articles = &self.cfg.collections.articles;
        enrich::segment_pass(self.store.as_ref(), self.analyzer.as_ref(), articles, articles).await
    }

    pub async fn sentiment(&self) -> Result<PassSummary> {
        let segmenter: Arc<dyn Segmenter> = Arc::new(AnalyzerSegmenter(self.analyzer.clone()));
        let scorer = SentimentScorer::new(self.lexicon.clone(), segmenter);
        enrich::sentiment_pass(
            self.store.as_ref(),
            &scorer,
            &self.cfg.collections.articles,
            &self.cfg.collections.articles,
        )
        .await
    }

    pub async fn metrics(&self, opts: &BatchOptions) -> Result<BatchSummary> {
        let aggregator = Aggregator::new(
            self.lexicon.clone(),
            AggregatorSettings {
                long_sentence_threshold: self.cfg.metrics.long_sentence_threshold,
            },
        );
        BatchRunner::new(self.store.clone(), aggregator).run(opts).await
    }

    pub async fn export(&self) -> Result<usize> {
        export::map_fields(
            self.store.as_ref(),
            &self.cfg.collections.indexes,
            &self.cfg.collections.export,
            self.lexicon.field_map(),
            TITLE,
        )
        .await
    }

    pub async fn merge(&self) -> Result<usize> {
        let c = &self.cfg.collections;
        let right_key = export::external_name(self.lexicon.field_map(), TITLE);
        export::merge(self.store.as_ref(), &c.demands, &c.export, TITLE, right_key, &c.merged).await
    }

    /// prune -> segment -> sentiment -> metrics -> export -> merge
    pub async fn run_all(&self, opts: &BatchOptions) -> Result<RunReport> {
        let pruned = self
            .prune(&self.cfg.collections.articles, &[TEXT.to_string()])
            .await?;
        let segmented = self.segment().await?;
        let scored = self.sentiment().await?;
        let batch = self.metrics(opts).await?;
        let exported = self.export().await?;
        let merged = self.merge().await?;

        info!(
            target: "pipeline",
            pruned,
            segmented = segmented.written,
            scored = scored.written,
            computed = batch.written,
            failed = batch.failed,
            exported,
            merged,
            "pipeline finished"
        );
        Ok(RunReport {
            pruned,
            segmented,
            scored,
            batch,
            exported,
            merged,
        })
    }
}

/// Exposes the segmenting half of a shared analyzer as a `Segmenter`.
struct AnalyzerSegmenter(Arc<dyn TextAnalyzer>);

impl Segmenter for AnalyzerSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        self.0.segment(text)
    }
}
