// src/indices/parallelism.rs
//! Parallelism (rhetorical repetition) detector.
//!
//! Tokens are first filtered down to the configured connectives, keeping
//! their relative order. Positions are indices into that filtered sequence.
//! A connective "exhibits parallelism" when it occurs at least
//! `MIN_OCCURRENCES` times and at least `MIN_CLOSE_PAIRS` of its position
//! pairs are fewer than `MAX_GAP` filtered positions apart.
//!
//! The pair scan is O(k²) in a term's occurrence count k; k stays small
//! because only connectives survive the filter.

use std::collections::{BTreeMap, HashSet};

pub const MIN_OCCURRENCES: usize = 3;
pub const MIN_CLOSE_PAIRS: usize = 3;
pub const MAX_GAP: usize = 5;

/// Number of distinct connectives that exhibit parallelism.
pub fn parallelism_count<S: AsRef<str>, C: AsRef<str>>(tokens: &[S], connectives: &[C]) -> usize {
    let wanted: HashSet<&str> = connectives.iter().map(|c| c.as_ref()).collect();

    let mut positions: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    let filtered = tokens
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| wanted.contains(t));
    for (pos, term) in filtered.enumerate() {
        positions.entry(term).or_default().push(pos);
    }

    positions
        .values()
        .filter(|p| p.len() >= MIN_OCCURRENCES && has_close_repetition(p))
        .count()
}

/// Scan pairs in increasing order and stop once enough close pairs are seen.
pub fn has_close_repetition(positions: &[usize]) -> bool {
    let mut close = 0usize;
    for (i, &a) in positions.iter().enumerate() {
        for &b in &positions[i + 1..] {
            if b.abs_diff(a) < MAX_GAP {
                close += 1;
                if close >= MIN_CLOSE_PAIRS {
                    return true;
                }
            }
        }
    }
    false
}
