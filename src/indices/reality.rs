// src/indices/reality.rs
//! "Reality" index: share of content-word tags among classified tags.

use serde::{Deserialize, Serialize};

use crate::error::MetricError;
use crate::lexicon::Lexicon;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RealityMetrics {
    pub real_percentage: f64,
}

/// `real / (real + unreal)`. Tags missing from the reality table are neither
/// real nor unreal and do not enter the denominator.
pub fn real_percentage<T: AsRef<str>>(
    tags: &[T],
    lexicon: &Lexicon,
) -> Result<RealityMetrics, MetricError> {
    let (mut real, mut unreal) = (0usize, 0usize);
    for t in tags {
        match lexicon.is_real(t.as_ref()) {
            Some(true) => real += 1,
            Some(false) => unreal += 1,
            None => {}
        }
    }
    let denom = real + unreal;
    if denom == 0 {
        return Err(MetricError::ZeroDenominator("real_percentage"));
    }
    Ok(RealityMetrics {
        real_percentage: real as f64 / denom as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex() -> Lexicon {
        Lexicon::builder()
            .pos("n", true)
            .pos("v", true)
            .pos("a", true)
            .pos("d", false)
            .pos("x", false)
            .build()
    }

    #[test]
    fn ratio_ignores_unknown_tags() {
        let tags = ["n", "v", "d", "x", "zz", "zz"];
        let m = real_percentage(&tags, &lex()).unwrap();
        assert!((m.real_percentage - 0.5).abs() < 1e-12);
    }

    #[test]
    fn stays_in_unit_interval() {
        for tags in [&["n"][..], &["x"][..], &["n", "x", "x"][..]] {
            let p = real_percentage(tags, &lex()).unwrap().real_percentage;
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn nothing_classified_is_an_error() {
        let tags = ["zz"];
        assert_eq!(
            real_percentage(&tags, &lex()),
            Err(MetricError::ZeroDenominator("real_percentage"))
        );
        let empty: [&str; 0] = [];
        assert!(real_percentage(&empty, &lex()).is_err());
    }
}
