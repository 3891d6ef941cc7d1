// src/indices/mod.rs
//! Per-dimension metric functions.
//!
//! Every function here is pure: inputs in, a small typed record out. Shared
//! lexical resources come in as an explicit `&Lexicon` argument. Composition
//! order lives in `crate::aggregate`.

pub mod composite;
pub mod discourse;
pub mod emotion;
pub mod lexical;
pub mod parallelism;
pub mod reality;
pub mod sentence;
pub mod structure;

pub use composite::fog;
pub use discourse::{marker_counts, rare_metrics, term_occurrences, MarkerCounts, RareMetrics};
pub use emotion::{sentiment_metrics, SentimentMetrics};
pub use lexical::{frequencies, lexical_metrics, LexicalMetrics, TokenFreq};
pub use parallelism::parallelism_count;
pub use reality::{real_percentage, RealityMetrics};
pub use sentence::{sentence_metrics, split_sentences, SentenceMetrics};
pub use structure::{structure_metrics, StructureMetrics};

/// `num / denom`, or 0.0 when the denominator is zero.
#[inline]
pub(crate) fn ratio_or_zero(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}
