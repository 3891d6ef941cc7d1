// src/config/mod.rs
pub mod pipeline;

pub use pipeline::{BatchSettings, Collections, LexiconPaths, MetricSettings, PipelineConfig};

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/pipeline.toml";
pub const ENV_CONFIG_PATH: &str = "READABILITY_CONFIG_PATH";

/// Resolve and load the pipeline config:
/// 1) explicit path (CLI `--config`)
/// 2) $READABILITY_CONFIG_PATH
/// 3) config/pipeline.toml
/// 4) built-in defaults when none of the above exists
pub fn load_config(explicit: Option<&Path>) -> Result<PipelineConfig> {
    if let Some(p) = explicit {
        return load_from(p);
    }
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default.exists() {
        return load_from(&default);
    }
    PipelineConfig::from_toml_str("")
}

fn load_from(path: &Path) -> Result<PipelineConfig> {
    PipelineConfig::load_from_file(path)
        .with_context(|| format!("loading pipeline config from {}", path.display()))
}
