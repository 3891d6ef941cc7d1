// src/indices/composite.rs
//! Metrics derived from other stages' outputs.
//!
//! Taking the typed stage outputs as arguments means a composite cannot be
//! evaluated before its inputs exist.

use super::reality::RealityMetrics;
use super::sentence::SentenceMetrics;

pub const FOG_SENTENCE_WEIGHT: f64 = 0.8;

/// Simplified fog-like index: `0.8 * average_sentence_length + real_percentage`.
/// This is not Gunning fog and must not be "corrected" to it.
pub fn fog(sentence: &SentenceMetrics, reality: &RealityMetrics) -> f64 {
    FOG_SENTENCE_WEIGHT * sentence.average_sentence_length + reality.real_percentage
}
