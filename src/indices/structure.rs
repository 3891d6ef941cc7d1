// src/indices/structure.rs
//! Structural counts from raw article HTML.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureMetrics {
    pub images: usize,
    pub audio: usize,
    pub video: usize,
    pub paragraphs: usize,
    pub tables: usize,
    pub links: usize,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static IMG: Lazy<Selector> = Lazy::new(|| selector("img"));
static AUDIO: Lazy<Selector> = Lazy::new(|| selector("audio"));
static VIDEO: Lazy<Selector> = Lazy::new(|| selector("video"));
static P: Lazy<Selector> = Lazy::new(|| selector("p"));
static TABLE: Lazy<Selector> = Lazy::new(|| selector("table"));
static A: Lazy<Selector> = Lazy::new(|| selector("a"));

/// Count media/layout elements. The HTML5 parser is lenient, so malformed
/// markup yields whatever elements it recovers and empty input yields zeros.
pub fn structure_metrics(html: &str) -> StructureMetrics {
    if html.trim().is_empty() {
        return StructureMetrics::default();
    }
    let doc = Html::parse_document(html);
    let count = |sel: &Selector| doc.select(sel).count();
    StructureMetrics {
        images: count(&IMG),
        audio: count(&AUDIO),
        video: count(&VIDEO),
        paragraphs: count(&P),
        tables: count(&TABLE),
        links: count(&A),
    }
}
