// src/aggregate.rs
//! Per-article metric aggregation.
//!
//! Stages run in a fixed order and hand typed outputs to the next:
//! 1) required-input check
//! 2) independent metrics (structure, lexical, markers, medical, rarity,
//!    reality, parallelism, metaphor)
//! 3) sentence structure (needs the tag sequence)
//! 4) sentiment aggregation (needs the sentiment list)
//! 5) composites (need stages 2 and 3)
//! 6) record assembly
//!
//! Any failure fails the whole article; there are no partially filled records.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::article::{Article, HTML, POS, SENTIMENT_LIST, TEXT, WORDS};
use crate::error::MetricError;
use crate::indices::discourse::{marker_counts, rare_metrics, term_occurrences, MarkerCounts, RareMetrics};
use crate::indices::emotion::{sentiment_metrics, SentimentMetrics};
use crate::indices::lexical::{frequencies, lexical_metrics_from, LexicalMetrics};
use crate::indices::parallelism::parallelism_count;
use crate::indices::reality::{real_percentage, RealityMetrics};
use crate::indices::sentence::{sentence_metrics, SentenceMetrics, DEFAULT_LONG_SENTENCE_THRESHOLD};
use crate::indices::structure::{structure_metrics, StructureMetrics};
use crate::indices::fog;
use crate::lexicon::{Lexicon, METAPHOR, PARALLELISM};
use crate::store::Document;

/// Name of the completion marker field on every metric record.
pub const COMPLETION_MARKER: &str = "completely";

#[derive(Debug, Clone, Copy)]
pub struct AggregatorSettings {
    pub long_sentence_threshold: usize,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            long_sentence_threshold: DEFAULT_LONG_SENTENCE_THRESHOLD,
        }
    }
}

/// One flat feature record per article, keyed by title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    pub title: String,
    #[serde(flatten)]
    pub structure: StructureMetrics,
    #[serde(flatten)]
    pub lexical: LexicalMetrics,
    #[serde(flatten)]
    pub sentence: SentenceMetrics,
    #[serde(flatten)]
    pub sentiment: SentimentMetrics,
    #[serde(flatten)]
    pub markers: MarkerCounts,
    pub medical: usize,
    #[serde(flatten)]
    pub rare: RareMetrics,
    #[serde(flatten)]
    pub reality: RealityMetrics,
    pub parallelism: usize,
    pub metaphor: usize,
    pub fog: f64,
    pub character_count: usize,
    pub pos_len: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_topic: Option<i64>,
    pub completely: bool,
}

impl MetricRecord {
    /// Flat store document.
    pub fn to_document(&self) -> Document {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            // A struct of numbers and strings always serializes to an object.
            _ => unreachable!("MetricRecord serializes to a JSON object"),
        }
    }
}

/// Stage 1 output: every required input, borrowed from the article.
struct Inputs<'a> {
    title: &'a str,
    text: &'a str,
    html: &'a str,
    words: &'a [String],
    tags: Vec<&'a str>,
    sentiment: &'a [i64],
}

/// Stage 2 output.
struct Independent {
    structure: StructureMetrics,
    lexical: LexicalMetrics,
    markers: MarkerCounts,
    medical: usize,
    rare: RareMetrics,
    reality: RealityMetrics,
    parallelism: usize,
    metaphor: usize,
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    lexicon: Arc<Lexicon>,
    settings: AggregatorSettings,
}

impl Aggregator {
    pub fn new(lexicon: Arc<Lexicon>, settings: AggregatorSettings) -> Self {
        Self { lexicon, settings }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Run all stages for one article.
    pub fn compute(&self, article: &Article) -> Result<MetricRecord, MetricError> {
        let inputs = required_inputs(article)?;
        let independent = self.independent_stage(&inputs)?;
        let sentence = sentence_metrics(
            inputs.text,
            &inputs.tags,
            self.settings.long_sentence_threshold,
        )?;
        let sentiment = sentiment_metrics(inputs.sentiment)?;
        let fog = fog(&sentence, &independent.reality);

        let pos_len = inputs.tags.iter().collect::<BTreeSet<_>>().len();

        Ok(MetricRecord {
            title: inputs.title.to_string(),
            structure: independent.structure,
            lexical: independent.lexical,
            sentence,
            sentiment,
            markers: independent.markers,
            medical: independent.medical,
            rare: independent.rare,
            reality: independent.reality,
            parallelism: independent.parallelism,
            metaphor: independent.metaphor,
            fog,
            character_count: inputs.text.chars().count(),
            pos_len,
            count_topic: article.count_topic,
            completely: true,
        })
    }

    /// Parse a raw store document and compute its record.
    pub fn compute_document(&self, doc: &Document) -> Result<MetricRecord, MetricError> {
        let article = Article::from_document(doc)?;
        self.compute(&article)
    }

    fn independent_stage(&self, inputs: &Inputs<'_>) -> Result<Independent, MetricError> {
        let lex = &*self.lexicon;
        let freq = frequencies(inputs.words);

        Ok(Independent {
            structure: structure_metrics(inputs.html),
            lexical: lexical_metrics_from(inputs.words, &freq),
            markers: marker_counts(&freq, lex)?,
            medical: term_occurrences(&freq, lex.medical_terms()),
            rare: rare_metrics(inputs.text, lex),
            reality: real_percentage(&inputs.tags, lex)?,
            parallelism: parallelism_count(inputs.words, lex.require_category(PARALLELISM)?),
            metaphor: term_occurrences(&freq, lex.require_category(METAPHOR)?),
        })
    }
}

fn required_inputs(article: &Article) -> Result<Inputs<'_>, MetricError> {
    let text = article.text.as_deref().ok_or(MetricError::MissingField(TEXT))?;
    let html = article.html.as_deref().ok_or(MetricError::MissingField(HTML))?;
    let words = article.words.as_deref().ok_or(MetricError::MissingField(WORDS))?;
    let pos = article.pos.as_deref().ok_or(MetricError::MissingField(POS))?;
    let sentiment = article
        .sentiment_list
        .as_deref()
        .ok_or(MetricError::MissingField(SENTIMENT_LIST))?;

    Ok(Inputs {
        title: &article.title,
        text,
        html,
        words,
        tags: pos.iter().map(|(_, tag)| tag.as_str()).collect(),
        sentiment,
    })
}
