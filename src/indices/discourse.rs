// src/indices/discourse.rs
//! Discourse-marker, domain-vocabulary and rare-character counts.
//!
//! Marker counting is pure frequency lookup: for each term of a list, add the
//! number of times it occurs in the token sequence. Token order is irrelevant.

use serde::{Deserialize, Serialize};

use super::lexical::TokenFreq;
use super::ratio_or_zero;
use crate::error::MetricError;
use crate::lexicon::{Lexicon, ASSERTION, CITE, CONCESSION, LEVEL, TURNING};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerCounts {
    pub assertion: usize,
    pub cite: usize,
    pub concession: usize,
    pub turning: usize,
    pub level: usize,
}

/// Sum of per-term occurrence counts. A term listed twice counts twice.
pub fn term_occurrences<S: AsRef<str>>(freq: &TokenFreq<'_>, terms: &[S]) -> usize {
    terms
        .iter()
        .map(|t| freq.get(t.as_ref()).copied().unwrap_or(0))
        .sum()
}

/// Counts for the five rhetorical categories. Errors if the lexicon lacks one
/// of them, which `Lexicon::load` already rules out for on-disk lexicons.
pub fn marker_counts(freq: &TokenFreq<'_>, lexicon: &Lexicon) -> Result<MarkerCounts, MetricError> {
    let count = |cat: &str| -> Result<usize, MetricError> {
        Ok(term_occurrences(freq, lexicon.require_category(cat)?))
    };
    Ok(MarkerCounts {
        assertion: count(ASSERTION)?,
        cite: count(CITE)?,
        concession: count(CONCESSION)?,
        turning: count(TURNING)?,
        level: count(LEVEL)?,
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RareMetrics {
    pub rare: usize,
    pub rare_percentage: f64,
}

/// Character-level (not token-level) rare-character density of raw text.
pub fn rare_metrics(text: &str, lexicon: &Lexicon) -> RareMetrics {
    let (mut total, mut rare) = (0usize, 0usize);
    for c in text.chars() {
        total += 1;
        if lexicon.is_rare(c) {
            rare += 1;
        }
    }
    RareMetrics {
        rare,
        rare_percentage: ratio_or_zero(rare, total),
    }
}
