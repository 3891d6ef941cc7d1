// src/indices/sentence.rs
//! Sentence-structure metrics over raw text plus its POS tag sequence.
//!
//! Sentences are cut at every `。.!?！？`; no abbreviation or quote handling.
//! Tags must come from the same text the sentences were cut from; the caller
//! is responsible for passing a matching pair.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ratio_or_zero;
use crate::error::MetricError;

static SENTENCE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[。.!?！？]").expect("valid sentence regex"));
pub const DEFAULT_LONG_SENTENCE_THRESHOLD: usize = 10;

/// Smoothing term in `v / (v + a + ε)`.
pub const VA_EPSILON: f64 = 0.0001;

pub const TAG_MARK: &str = "x";
pub const TAG_VERB: &str = "v";
pub const TAG_ADJ: &str = "a";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceMetrics {
    pub sentence_count: usize,
    pub long_sentence_count: usize,
    pub short_sentence_count: usize,
    pub sentenced_length_dev: f64,
    pub average_sentence_length: f64,
    pub cohesive: f64,
    pub mark_radio: f64,
    #[serde(rename = "break")]
    pub break_ratio: f64,
    pub v_a: f64,
}

/// Trimmed, non-empty sentences in text order.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_SPLIT
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn sentence_metrics<T: AsRef<str>>(
    text: &str,
    tags: &[T],
    long_threshold: usize,
) -> Result<SentenceMetrics, MetricError> {
    let lengths: Vec<usize> = split_sentences(text)
        .into_iter()
        .map(|s| s.chars().count())
        .collect();
    let sentence_count = lengths.len();
    // Sentences are non-empty after trimming, so a zero mean only happens here.
    if sentence_count == 0 {
        return Err(MetricError::ZeroDenominator("cohesive"));
    }

    let long = lengths.iter().filter(|&&l| l > long_threshold).count();
    let n = sentence_count as f64;
    let mean = lengths.iter().sum::<usize>() as f64 / n;
    let var = lengths
        .iter()
        .map(|&l| {
            let d = l as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    let (mut marks, mut verbs, mut adjs) = (0usize, 0usize, 0usize);
    for t in tags {
        match t.as_ref() {
            TAG_MARK => marks += 1,
            TAG_VERB => verbs += 1,
            TAG_ADJ => adjs += 1,
            _ => {}
        }
    }

    Ok(SentenceMetrics {
        sentence_count,
        long_sentence_count: long,
        short_sentence_count: sentence_count - long,
        sentenced_length_dev: var.sqrt(),
        average_sentence_length: mean,
        cohesive: 1.0 / mean,
        mark_radio: ratio_or_zero(marks, tags.len()),
        break_ratio: marks as f64 / n,
        v_a: verbs as f64 / (verbs as f64 + adjs as f64 + VA_EPSILON),
    })
}
