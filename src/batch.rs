// src/batch.rs
//! Batch runner: compute a metric record for every article and persist the
//! survivors with keyed bulk upserts.
//!
//! Each article is computed inside its own `Result`. A failure is logged with
//! the article title, counted and otherwise ignored; it never writes a partial
//! record and never aborts the run. Store errors do abort the run.

use ::metrics::{counter, describe_counter, describe_gauge, gauge};
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::aggregate::{Aggregator, COMPLETION_MARKER};
use crate::article::{Article, TITLE};
use crate::config::PipelineConfig;
use crate::error::MetricError;
use crate::store::{DocumentStore, Filter, Upsert};

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "batch_articles_processed_total",
            "Articles the metric computation was attempted for."
        );
        describe_counter!(
            "batch_articles_skipped_total",
            "Articles skipped because their record is already complete."
        );
        describe_counter!(
            "batch_articles_failed_total",
            "Articles whose metric computation failed."
        );
        describe_counter!(
            "batch_records_written_total",
            "Metric records upserted into the target collection."
        );
        describe_gauge!("batch_last_run_ts", "Unix ts when a batch run last finished.");
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub source: String,
    pub target: String,
    pub limit: Option<usize>,
    pub skip_completed: bool,
    pub marker_field: String,
    pub chunk_size: usize,
    pub progress_every: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl BatchOptions {
    pub fn from_config(cfg: &PipelineConfig) -> Self {
        Self {
            source: cfg.collections.articles.clone(),
            target: cfg.collections.indexes.clone(),
            limit: cfg.batch.limit,
            skip_completed: cfg.batch.skip_completed,
            marker_field: cfg.batch.marker_field.clone(),
            chunk_size: cfg.batch.chunk_size.max(1),
            progress_every: cfg.batch.progress_every.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub title: String,
    pub error: MetricError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub written: usize,
    pub failures: Vec<Failure>,
}

pub struct BatchRunner {
    store: Arc<dyn DocumentStore>,
    aggregator: Aggregator,
}

impl BatchRunner {
    pub fn new(store: Arc<dyn DocumentStore>, aggregator: Aggregator) -> Self {
        Self { store, aggregator }
    }

    pub async fn run(&self, opts: &BatchOptions) -> Result<BatchSummary> {
        ensure_metrics_described();

        // `limit` counts computed articles; completed ones do not use it up.
        let read_limit = if opts.skip_completed { None } else { opts.limit };
        let articles = self
            .store
            .find(&opts.source, &Filter::All, read_limit)
            .await
            .with_context(|| format!("reading articles from {}", opts.source))?;

        let completed = if opts.skip_completed {
            self.completed_titles(opts).await?
        } else {
            HashSet::new()
        };

        info!(
            target: "batch",
            source = %opts.source,
            target_collection = %opts.target,
            articles = articles.len(),
            already_complete = completed.len(),
            "batch started"
        );

        let chunk_size = opts.chunk_size.max(1);
        let progress_every = opts.progress_every.max(1);
        let mut summary = BatchSummary::default();
        let mut pending: Vec<Upsert> = Vec::with_capacity(chunk_size.min(articles.len()));

        for doc in &articles {
            if opts.limit.is_some_and(|n| summary.processed >= n) {
                break;
            }
            let title = Article::title_of(doc);
            if completed.contains(&title) {
                summary.skipped += 1;
                counter!("batch_articles_skipped_total").increment(1);
                continue;
            }

            summary.processed += 1;
            counter!("batch_articles_processed_total").increment(1);

            match self.aggregator.compute_document(doc) {
                Ok(record) => pending.push(Upsert::by(TITLE, record.to_document())),
                Err(error) => {
                    warn!(target: "batch", title = %title, error = %error, "metric computation failed");
                    counter!("batch_articles_failed_total").increment(1);
                    summary.failed += 1;
                    summary.failures.push(Failure { title, error });
                }
            }

            if pending.len() >= chunk_size {
                summary.written += self.flush(&opts.target, &mut pending).await?;
            }
            if summary.processed % progress_every == 0 {
                info!(
                    target: "batch",
                    processed = summary.processed,
                    failed = summary.failed,
                    written = summary.written,
                    "progress"
                );
            }
        }
        summary.written += self.flush(&opts.target, &mut pending).await?;

        let now = chrono::Utc::now().timestamp().max(0);
        gauge!("batch_last_run_ts").set(now as f64);
        info!(
            target: "batch",
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed,
            written = summary.written,
            "batch finished"
        );
        Ok(summary)
    }

    /// Titles of target records whose marker field is `true`.
    async fn completed_titles(&self, opts: &BatchOptions) -> Result<HashSet<String>> {
        let marker = if opts.marker_field.is_empty() {
            COMPLETION_MARKER
        } else {
            opts.marker_field.as_str()
        };
        let done = self
            .store
            .find_projected(&opts.target, &Filter::eq(marker, true), &[TITLE])
            .await
            .with_context(|| format!("reading completed records from {}", opts.target))?;
        Ok(done
            .iter()
            .filter_map(|d| match d.get(TITLE) {
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            })
            .collect())
    }

    async fn flush(&self, target: &str, pending: &mut Vec<Upsert>) -> Result<usize> {
        if pending.is_empty() {
            return Ok(0);
        }
        let ops = std::mem::take(pending);
        let n = ops.len();
        let res = self
            .store
            .bulk_upsert(target, ops)
            .await
            .with_context(|| format!("bulk upsert of {n} records into {target}"))?;
        debug!(target: "batch", matched = res.matched, inserted = res.inserted, "chunk flushed");
        counter!("batch_records_written_total").increment(n as u64);
        Ok(n)
    }
}
