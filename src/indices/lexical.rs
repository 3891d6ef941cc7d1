// src/indices/lexical.rs
//! Token-level diversity metrics: counts, ratios, average length, entropy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ratio_or_zero;

/// Token -> occurrence count. Ordered so that float sums over it are
/// reproducible between runs.
pub type TokenFreq<'a> = BTreeMap<&'a str, usize>;

pub fn frequencies<S: AsRef<str>>(tokens: &[S]) -> TokenFreq<'_> {
    let mut freq = TokenFreq::new();
    for t in tokens {
        *freq.entry(t.as_ref()).or_insert(0) += 1;
    }
    freq
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LexicalMetrics {
    pub total_word_count: usize,
    /// Tokens that occur exactly once.
    pub unique_word_count: usize,
    pub unique_word_percentage: f64,
    /// Distinct tokens.
    pub non_repeating_word_count: usize,
    pub word_ratio: f64,
    pub average_word_length: f64,
    pub entropy: f64,
}

pub fn lexical_metrics<S: AsRef<str>>(tokens: &[S]) -> LexicalMetrics {
    let freq = frequencies(tokens);
    lexical_metrics_from(tokens, &freq)
}

/// Same as `lexical_metrics` when the caller already holds the frequency table.
pub fn lexical_metrics_from<S: AsRef<str>>(tokens: &[S], freq: &TokenFreq<'_>) -> LexicalMetrics {
    let total = tokens.len();
    let unique = freq.values().filter(|&&c| c == 1).count();
    let distinct = freq.len();
    let total_chars: usize = tokens.iter().map(|t| t.as_ref().chars().count()).sum();

    LexicalMetrics {
        total_word_count: total,
        unique_word_count: unique,
        unique_word_percentage: ratio_or_zero(unique, total),
        non_repeating_word_count: distinct,
        word_ratio: ratio_or_zero(distinct, total),
        average_word_length: ratio_or_zero(total_chars, total),
        entropy: entropy(freq, total),
    }
}

/// Shannon entropy (bits) of the empirical distribution.
fn entropy(freq: &TokenFreq<'_>, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    let h: f64 = freq
        .values()
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.log2()
        })
        .sum();
    // a single repeated token gives -1*log2(1) = -0.0
    h.max(0.0)
}
