// src/lib.rs
// Public library surface for the CLI and integration tests.

pub mod aggregate;
pub mod article;
pub mod batch;
pub mod config;
pub mod enrich;
pub mod error;
pub mod export;
pub mod indices;
pub mod lexicon;
pub mod pipeline;
pub mod segment;
pub mod sentiment;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{Aggregator, AggregatorSettings, MetricRecord};
pub use crate::article::Article;
pub use crate::batch::{BatchOptions, BatchRunner, BatchSummary};
pub use crate::error::{MetricError, StoreError};
pub use crate::lexicon::Lexicon;
pub use crate::pipeline::{Pipeline, RunReport};
