// src/indices/emotion.rs
//! Aggregation of the per-sentence sentiment score list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::MetricError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentMetrics {
    /// Mean score, truncated toward zero.
    pub sentiment_score: i64,
    /// Number of distinct score values.
    pub sentiment_variety: usize,
}

pub fn sentiment_metrics(scores: &[i64]) -> Result<SentimentMetrics, MetricError> {
    if scores.is_empty() {
        return Err(MetricError::EmptySentimentList);
    }
    let sum: i64 = scores.iter().sum();
    // i64 division already truncates toward zero
    let mean = sum / scores.len() as i64;
    let distinct: BTreeSet<i64> = scores.iter().copied().collect();
    Ok(SentimentMetrics {
        sentiment_score: mean,
        sentiment_variety: distinct.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_truncates_toward_zero() {
        assert_eq!(sentiment_metrics(&[1, 2]).unwrap().sentiment_score, 1);
        assert_eq!(sentiment_metrics(&[-1, -2]).unwrap().sentiment_score, -1);
        assert_eq!(sentiment_metrics(&[-3, 1]).unwrap().sentiment_score, -1);
        assert_eq!(sentiment_metrics(&[0]).unwrap().sentiment_score, 0);
    }

    #[test]
    fn variety_counts_distinct_values() {
        let m = sentiment_metrics(&[1, 2, 2, 0, 1]).unwrap();
        assert_eq!(m.sentiment_variety, 3);
    }

    #[test]
    fn empty_list_is_rejected() {
        assert_eq!(sentiment_metrics(&[]), Err(MetricError::EmptySentimentList));
    }
}
