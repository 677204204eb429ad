use indexmap::IndexMap;

use super::common::*;
use crate::workflows::assessment::engine::filter_relevant;

#[test]
fn strictly_above_threshold_is_relevant() {
    let mut scores = IndexMap::new();
    scores.insert(spectrum(FOCUS), 3.5);
    scores.insert(spectrum(SENSORY), 2.0);
    scores.insert(spectrum(SOCIAL), 3.0);

    let relevant = filter_relevant(&scores, &thresholds());
    let keys: Vec<&str> = relevant.iter().map(|key| key.0.as_str()).collect();
    assert_eq!(keys, vec![FOCUS, SOCIAL]);
}

#[test]
fn score_exactly_at_threshold_is_not_relevant() {
    let mut scores = IndexMap::new();
    scores.insert(spectrum(FOCUS), 2.5);

    assert!(filter_relevant(&scores, &thresholds()).is_empty());
}

#[test]
fn epsilon_above_threshold_is_relevant() {
    let mut scores = IndexMap::new();
    scores.insert(spectrum(FOCUS), 2.5 + 1e-9);

    let relevant = filter_relevant(&scores, &thresholds());
    assert_eq!(relevant, vec![spectrum(FOCUS)]);
}

#[test]
fn missing_threshold_excludes_even_a_maximal_score() {
    let mut scores = IndexMap::new();
    scores.insert(spectrum("Nieuw Spectrum"), 4.0);
    scores.insert(spectrum(FOCUS), 4.0);

    let relevant = filter_relevant(&scores, &thresholds());
    assert_eq!(relevant, vec![spectrum(FOCUS)]);
}

#[test]
fn output_preserves_score_map_order() {
    let mut scores = IndexMap::new();
    scores.insert(spectrum(SOCIAL), 2.6);
    scores.insert(spectrum(FOCUS), 3.9);
    scores.insert(spectrum(EMOTION), 3.1);

    let relevant = filter_relevant(&scores, &thresholds());
    let keys: Vec<&str> = relevant.iter().map(|key| key.0.as_str()).collect();
    assert_eq!(keys, vec![SOCIAL, FOCUS, EMOTION]);
}
