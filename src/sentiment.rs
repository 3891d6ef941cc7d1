// src/sentiment.rs
use std::sync::Arc;

use crate::indices::split_sentences;
use crate::lexicon::Lexicon;
use crate::segment::Segmenter;

/// Per-sentence lexicon scoring. Produces the `sentiment_list` the
/// aggregator later reduces to a mean and a variety count.
#[derive(Clone)]
pub struct SentimentScorer {
    lexicon: Arc<Lexicon>,
    segmenter: Arc<dyn Segmenter>,
}

impl SentimentScorer {
    pub fn new(lexicon: Arc<Lexicon>, segmenter: Arc<dyn Segmenter>) -> Self {
        Self { lexicon, segmenter }
    }

    /// Score for a single word, summed over every emotion (0 if unknown).
    #[inline]
    fn word_score(&self, w: &str) -> i64 {
        self.lexicon.sentiment_of(w)
    }

    pub fn score_sentence(&self, sentence: &str) -> i64 {
        self.segmenter
            .segment(sentence)
            .iter()
            .map(|w| self.word_score(w))
            .sum()
    }

    /// One score per non-empty sentence, in text order. Splitting matches the
    /// sentence metrics, so a trailing delimiter adds no empty, zero-scored entry.
    pub fn score_text(&self, text: &str) -> Vec<i64> {
        split_sentences(text)
            .into_iter()
            .map(|s| self.score_sentence(s))
            .collect()
    }
}

impl std::fmt::Debug for SentimentScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentScorer").finish_non_exhaustive()
    }
}
