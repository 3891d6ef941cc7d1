// src/segment.rs
//! Word segmentation and part-of-speech tagging.
//!
//! The metric functions only ever see the token and tag sequences stored on
//! the article, so the segmenter sits behind two small traits and can be
//! swapped for a whitespace splitter in tests.

use jieba_rs::Jieba;
use once_cell::sync::Lazy;

pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

pub trait Tagger: Send + Sync {
    /// `(token, tag)` pairs in text order.
    fn tag(&self, text: &str) -> Vec<(String, String)>;
}

// Loading the bundled dictionary takes a noticeable moment; share one copy.
static JIEBA: Lazy<Jieba> = Lazy::new(Jieba::new);

/// Default Chinese segmenter/tagger, bundled dictionary with HMM enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct JiebaSegmenter;

impl JiebaSegmenter {
    pub fn new() -> Self {
        Self
    }
}

impl Segmenter for JiebaSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        JIEBA
            .cut(text, true)
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl Tagger for JiebaSegmenter {
    fn tag(&self, text: &str) -> Vec<(String, String)> {
        JIEBA
            .tag(text, true)
            .into_iter()
            .map(|t| (t.word.to_string(), t.tag.to_string()))
            .collect()
    }
}

/// Splits on whitespace and tags every token `n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceSegmenter;

impl Segmenter for WhitespaceSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

impl Tagger for WhitespaceSegmenter {
    fn tag(&self, text: &str) -> Vec<(String, String)> {
        text.split_whitespace()
            .map(|w| (w.to_string(), "n".to_string()))
            .collect()
    }
}
