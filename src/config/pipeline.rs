// src/config/pipeline.rs
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs};

use crate::indices::sentence::DEFAULT_LONG_SENTENCE_THRESHOLD;

pub const ENV_LONG_SENTENCE_THRESHOLD: &str = "READABILITY_LONG_SENTENCE_THRESHOLD";

fn default_store_dir() -> PathBuf {
    PathBuf::from("data/store")
}
fn default_long_threshold() -> usize {
    DEFAULT_LONG_SENTENCE_THRESHOLD
}
fn default_chunk_size() -> usize {
    500
}
fn default_progress_every() -> usize {
    100
}
fn default_marker() -> String {
    "completely".to_string()
}

/// Top-level pipeline configuration (`config/pipeline.toml`).
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    #[serde(default)]
    pub collections: Collections,
    #[serde(default)]
    pub lexicon: LexiconPaths,
    #[serde(default)]
    pub metrics: MetricSettings,
    #[serde(default)]
    pub batch: BatchSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Collections {
    pub articles: String,
    pub indexes: String,
    pub demands: String,
    /// Field-mapped copy of `indexes`.
    pub export: String,
    /// Result of joining `demands` with `export`.
    pub merged: String,
}

impl Default for Collections {
    fn default() -> Self {
        Self {
            articles: "articles".into(),
            indexes: "indexs".into(),
            demands: "demands".into(),
            export: "indexs_zh".into(),
            merged: "merge".into(),
        }
    }
}

/// File locations of every lexical resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LexiconPaths {
    pub stop_words: PathBuf,
    pub word_dict: PathBuf,
    pub sentiment_dict: PathBuf,
    pub pos_table: PathBuf,
    pub rare_words: PathBuf,
    pub medical_dir: PathBuf,
    pub field_map: PathBuf,
}

impl Default for LexiconPaths {
    fn default() -> Self {
        Self::under("data")
    }
}

impl LexiconPaths {
    /// Conventional file names under one directory.
    pub fn under<P: AsRef<Path>>(dir: P) -> Self {
        let d = dir.as_ref();
        Self {
            stop_words: d.join("stop_words.txt"),
            word_dict: d.join("word_dict.json"),
            sentiment_dict: d.join("sentiment_dict.json"),
            pos_table: d.join("pos.csv"),
            rare_words: d.join("rare_words.txt"),
            medical_dir: d.join("chinese_medical_words"),
            field_map: d.join("field_map.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricSettings {
    /// Sentences strictly longer than this many chars count as long.
    pub long_sentence_threshold: usize,
}

impl Default for MetricSettings {
    fn default() -> Self {
        Self {
            long_sentence_threshold: default_long_threshold(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub limit: Option<usize>,
    pub skip_completed: bool,
    pub marker_field: String,
    pub chunk_size: usize,
    pub progress_every: usize,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            limit: None,
            skip_completed: false,
            marker_field: default_marker(),
            chunk_size: default_chunk_size(),
            progress_every: default_progress_every(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            collections: Collections::default(),
            lexicon: LexiconPaths::default(),
            metrics: MetricSettings::default(),
            batch: BatchSettings::default(),
        }
    }
}

impl PipelineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let mut cfg: PipelineConfig = toml::from_str(s)?;

        // Env override for the one knob people tune between runs.
        if let Some(t) = parse_threshold_env(env::var(ENV_LONG_SENTENCE_THRESHOLD).ok()) {
            cfg.metrics.long_sentence_threshold = t;
        }

        cfg.sanitize();
        Ok(cfg)
    }

    /// Replace nonsensical values with defaults instead of failing the run.
    fn sanitize(&mut self) {
        if self.batch.chunk_size == 0 {
            self.batch.chunk_size = default_chunk_size();
        }
        if self.batch.progress_every == 0 {
            self.batch.progress_every = default_progress_every();
        }
        if self.batch.marker_field.trim().is_empty() {
            self.batch.marker_field = default_marker();
        }
    }
}

fn parse_threshold_env(raw: Option<String>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.collections.indexes, "indexs");
        assert_eq!(cfg.batch.chunk_size, 500);
        assert_eq!(cfg.batch.marker_field, "completely");
        assert_eq!(cfg.lexicon.pos_table, PathBuf::from("data/pos.csv"));
    }

    #[test]
    fn zero_chunk_size_is_sanitized() {
        let cfg = PipelineConfig::from_toml_str(
            r#"
store_dir = "/tmp/x"

[batch]
chunk_size = 0
marker_field = "  "
limit = 10
"#,
        )
        .unwrap();
        assert_eq!(cfg.batch.chunk_size, 500);
        assert_eq!(cfg.batch.marker_field, "completely");
        assert_eq!(cfg.batch.limit, Some(10));
        assert_eq!(cfg.store_dir, PathBuf::from("/tmp/x"));
    }

    #[test]
    fn threshold_env_parsing() {
        assert_eq!(parse_threshold_env(Some(" 12 ".into())), Some(12));
        assert_eq!(parse_threshold_env(Some("abc".into())), None);
        assert_eq!(parse_threshold_env(None), None);
    }
}
