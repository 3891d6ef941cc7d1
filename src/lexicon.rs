// src/lexicon.rs
//! Lexical resource set: word lists, discourse-marker categories, sentiment
//! tables and the part-of-speech "reality" table.
//!
//! Everything is loaded once at startup and then shared read-only (usually
//! behind an `Arc`). Any file that cannot be read or parsed is a hard error:
//! the batch has no meaningful output without its lexicon.
//!
//! Expected layout (paths are configurable, see `config::LexiconPaths`):
//! - `stop_words.txt`       one term per line; required, loaded and counted only
//! - `word_dict.json`       `{ "assertion": ["..."], "cite": [...], ... }`
//! - `sentiment_dict.json`  `{ "joy": { "term": 2 }, "anger": { ... } }`
//! - `pos.csv` / `pos.json` tag -> is-real table (`en,isreal` header for CSV)
//! - `rare_words.txt`       every non-whitespace char is a rare character
//! - medical dir            every `*.txt` inside, one term per line
//! - `field_map.json`       internal metric name -> external column name

use anyhow::{anyhow, bail, Context, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::LexiconPaths;
use crate::error::MetricError;

/// Discourse / rhetoric categories that `word_dict.json` must define.
pub const REQUIRED_CATEGORIES: [&str; 7] = [
    ASSERTION, CITE, CONCESSION, TURNING, LEVEL, METAPHOR, PARALLELISM,
];

pub const ASSERTION: &str = "assertion";
pub const CITE: &str = "cite";
pub const CONCESSION: &str = "concession";
pub const TURNING: &str = "turning";
pub const LEVEL: &str = "level";
pub const METAPHOR: &str = "metaphor";
/// Conjunctions/prepositions scanned by the parallelism detector.
pub const PARALLELISM: &str = "parallelism";

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    categories: HashMap<String, Vec<String>>,
    sentiment: BTreeMap<String, HashMap<String, i64>>,
    reality: HashMap<String, bool>,
    rare_chars: HashSet<char>,
    medical: Vec<String>,
    field_map: Vec<(String, String)>,
}

impl Lexicon {
    /// Load every resource from disk. Fails on the first missing or corrupt file.
    pub fn load(paths: &LexiconPaths) -> Result<Self> {
        let stop_words = read_lines(&paths.stop_words)?.len();
        let categories = load_categories(&paths.word_dict)?;
        let sentiment = load_sentiment(&paths.sentiment_dict)?;
        let reality = load_reality(&paths.pos_table)?;
        let rare_chars = load_rare_chars(&paths.rare_words)?;
        let medical = load_term_dir(&paths.medical_dir)?;
        let field_map = load_field_map(&paths.field_map)?;

        let lex = Self {
            categories,
            sentiment,
            reality,
            rare_chars,
            medical,
            field_map,
        };
        info!(
            target: "lexicon",
            stop_words,
            categories = lex.categories.len(),
            sentiment_tables = lex.sentiment.len(),
            pos_tags = lex.reality.len(),
            rare_chars = lex.rare_chars.len(),
            medical_terms = lex.medical.len(),
            "lexicon loaded"
        );
        Ok(lex)
    }

    /// Term list for a discourse category; `None` when the category is unknown.
    pub fn category(&self, name: &str) -> Option<&[String]> {
        self.categories.get(name).map(Vec::as_slice)
    }

    /// Like `category` but turns an unknown category into an error.
    pub fn require_category(&self, name: &str) -> Result<&[String], MetricError> {
        self.category(name)
            .ok_or_else(|| MetricError::MissingCategory(name.to_string()))
    }

    /// Reality classification of a POS tag; `None` when the tag is not in the table.
    pub fn is_real(&self, tag: &str) -> Option<bool> {
        self.reality.get(tag).copied()
    }

    /// Sum of a term's scores over every emotion table (0 when unscored).
    pub fn sentiment_of(&self, term: &str) -> i64 {
        self.sentiment
            .values()
            .filter_map(|table| table.get(term))
            .sum()
    }

    pub fn is_rare(&self, c: char) -> bool {
        self.rare_chars.contains(&c)
    }

    pub fn medical_terms(&self) -> &[String] {
        &self.medical
    }

    /// Internal -> external field names.
    pub fn field_map(&self) -> &[(String, String)] {
        &self.field_map
    }

    /// Builder used by tests and tools that assemble a lexicon in memory.
    pub fn builder() -> LexiconBuilder {
        LexiconBuilder::default()
    }
}

/// In-memory construction; skips the required-category check on purpose so
/// tests can build minimal lexicons.
#[derive(Debug, Default)]
pub struct LexiconBuilder {
    inner: Lexicon,
}

impl LexiconBuilder {
    pub fn category<I, S>(mut self, name: &str, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .categories
            .insert(name.to_string(), terms.into_iter().map(Into::into).collect());
        self
    }

    pub fn sentiment(mut self, emotion: &str, term: &str, score: i64) -> Self {
        self.inner
            .sentiment
            .entry(emotion.to_string())
            .or_default()
            .insert(term.to_string(), score);
        self
    }

    pub fn pos(mut self, tag: &str, is_real: bool) -> Self {
        self.inner.reality.insert(tag.to_string(), is_real);
        self
    }

    pub fn rare_chars(mut self, chars: &str) -> Self {
        self.inner
            .rare_chars
            .extend(chars.chars().filter(|c| !c.is_whitespace()));
        self
    }

    pub fn medical<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.medical.extend(terms.into_iter().map(Into::into));
        self
    }

    pub fn field(mut self, internal: &str, external: &str) -> Self {
        self.inner
            .field_map
            .push((internal.to_string(), external.to_string()));
        self
    }

    pub fn build(self) -> Lexicon {
        self.inner
    }
}

// --- loaders ---

fn read_to_string(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {what} from {}", path.display()))
}

/// One trimmed, non-empty term per line.
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let content = read_to_string(path, "word list")?;
    Ok(parse_lines(&content))
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn load_categories(path: &Path) -> Result<HashMap<String, Vec<String>>> {
    let content = read_to_string(path, "word dictionary")?;
    parse_categories(&content).with_context(|| format!("parsing {}", path.display()))
}

fn parse_categories(content: &str) -> Result<HashMap<String, Vec<String>>> {
    let cats: HashMap<String, Vec<String>> = serde_json::from_str(content)?;
    let missing: Vec<&str> = REQUIRED_CATEGORIES
        .iter()
        .copied()
        .filter(|c| !cats.contains_key(*c))
        .collect();
    if !missing.is_empty() {
        bail!("word dictionary is missing categories: {}", missing.join(", "));
    }
    Ok(cats)
}

fn load_sentiment(path: &Path) -> Result<BTreeMap<String, HashMap<String, i64>>> {
    let content = read_to_string(path, "sentiment dictionary")?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn load_reality(path: &Path) -> Result<HashMap<String, bool>> {
    let content = read_to_string(path, "POS reality table")?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let parsed = match ext.as_str() {
        "json" => parse_reality_json(&content),
        _ => parse_reality_csv(&content),
    };
    parsed.with_context(|| format!("parsing {}", path.display()))
}

fn parse_reality_json(content: &str) -> Result<HashMap<String, bool>> {
    let raw: HashMap<String, serde_json::Value> = serde_json::from_str(content)?;
    raw.into_iter()
        .map(|(tag, v)| {
            let real = match &v {
                serde_json::Value::Bool(b) => *b,
                serde_json::Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
                other => bail!("tag `{tag}` has non-boolean value {other}"),
            };
            Ok((tag, real))
        })
        .collect()
}

/// `en,isreal` header followed by `tag,0|1` rows. Extra columns are ignored.
fn parse_reality_csv(content: &str) -> Result<HashMap<String, bool>> {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let header = lines.next().ok_or_else(|| anyhow!("empty POS table"))?;
    let cols: Vec<&str> = header.split(',').map(str::trim).collect();
    let tag_idx = cols
        .iter()
        .position(|c| *c == "en")
        .ok_or_else(|| anyhow!("POS table header lacks `en` column"))?;
    let real_idx = cols
        .iter()
        .position(|c| *c == "isreal")
        .ok_or_else(|| anyhow!("POS table header lacks `isreal` column"))?;

    let mut out = HashMap::new();
    for (n, line) in lines.enumerate() {
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let (Some(tag), Some(flag)) = (fields.get(tag_idx), fields.get(real_idx)) else {
            bail!("POS table row {} is short: {line:?}", n + 2);
        };
        let real = match *flag {
            "1" | "true" | "True" | "TRUE" => true,
            "0" | "false" | "False" | "FALSE" => false,
            other => bail!("POS table row {} has bad isreal value {other:?}", n + 2),
        };
        out.insert((*tag).to_string(), real);
    }
    Ok(out)
}

fn load_rare_chars(path: &Path) -> Result<HashSet<char>> {
    let content = read_to_string(path, "rare characters")?;
    Ok(content.chars().filter(|c| !c.is_whitespace()).collect())
}

/// Every `*.txt` in the directory, sorted by file name so load order is stable.
fn load_term_dir(dir: &Path) -> Result<Vec<String>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading term directory {}", dir.display()))?;
    let mut files: Vec<_> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("txt"))
        .collect();
    files.sort();

    let mut terms = Vec::new();
    for f in files {
        terms.extend(read_lines(&f)?);
    }
    Ok(terms)
}

fn load_field_map(path: &Path) -> Result<Vec<(String, String)>> {
    let content = read_to_string(path, "field map")?;
    // Without serde_json's `preserve_order` the entries come back sorted by key.
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    map.into_iter()
        .map(|(k, v)| match v {
            serde_json::Value::String(s) => Ok((k, s)),
            other => bail!("field map entry `{k}` is not a string: {other}"),
        })
        .collect()
}
