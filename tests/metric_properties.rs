// tests/metric_properties.rs
use article_readability::indices::lexical::lexical_metrics;
use article_readability::indices::parallelism::{has_close_repetition, parallelism_count};
use article_readability::indices::{frequencies, marker_counts, sentence_metrics};
use article_readability::lexicon::{
    Lexicon, ASSERTION, CITE, CONCESSION, LEVEL, METAPHOR, PARALLELISM, TURNING,
};

fn marker_lexicon() -> Lexicon {
    Lexicon::builder()
        .category(ASSERTION, ["必须"])
        .category(CITE, ["研究"])
        .category(CONCESSION, ["虽然"])
        .category(TURNING, ["但是", "然而"])
        .category(LEVEL, ["而且"])
        .category(METAPHOR, ["好像"])
        .category(PARALLELISM, ["和"])
        .build()
}

#[test]
fn lexical_bounds_hold_on_varied_inputs() {
    let samples: Vec<Vec<&str>> = vec![
        vec![],
        vec!["a"],
        vec!["a", "a", "a"],
        vec!["a", "b", "a", "c", "d", "d"],
        vec!["健康", "饮食", "健康", "运动", "睡眠"],
    ];
    for tokens in samples {
        let m = lexical_metrics(&tokens);
        assert!(m.unique_word_count <= m.total_word_count);
        assert!(m.non_repeating_word_count <= m.total_word_count);
        assert!((0.0..=1.0).contains(&m.word_ratio));
        assert!((0.0..=1.0).contains(&m.unique_word_percentage));
        assert!(m.entropy >= 0.0);
    }
}

#[test]
fn entropy_extremes() {
    let same = lexical_metrics(&["x"; 8]);
    assert_eq!(same.entropy, 0.0);

    let distinct = lexical_metrics(&["a", "b", "c", "d", "e", "f", "g", "h"]);
    assert!((distinct.entropy - 3.0).abs() < 1e-12);
}

#[test]
fn parallelism_distance_threshold() {
    assert!(has_close_repetition(&[0, 1, 2]));
    assert!(!has_close_repetition(&[0, 10, 20]));

    let tight = ["和", "和", "和"];
    assert_eq!(parallelism_count(&tight, &["和"]), 1);
    let two = ["和", "和"];
    assert_eq!(parallelism_count(&two, &["和"]), 0);
}

#[test]
fn discourse_counts_ignore_order_but_sentence_metrics_do_not() {
    let lex = marker_lexicon();
    let tokens = ["研究", "表明", "但是", "虽然", "而且", "但是", "必须"];
    let mut reversed = tokens;
    reversed.reverse();

    let a = marker_counts(&frequencies(&tokens), &lex).unwrap();
    let b = marker_counts(&frequencies(&reversed), &lex).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.turning, 2);

    let tags: [&str; 0] = [];
    let s1 = sentence_metrics("短。这是一个更长的句子。", &tags, 10).unwrap();
    let s2 = sentence_metrics("。短这是一个更长的句子。", &tags, 10).unwrap();
    assert_ne!(s1.sentence_count, s2.sentence_count);
}

#[test]
fn text_without_sentences_is_an_error() {
    let tags = ["x"];
    assert!(sentence_metrics("。！？", &tags, 10).is_err());
}
