use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::super::domain::SpectrumKey;

/// Select the spectrums whose score strictly exceeds their configured
/// threshold.
///
/// Strict `>` is deliberate: a score exactly at the threshold does not
/// unlock a deep dive. A spectrum missing from `thresholds` is excluded
/// rather than rejected, so new bank spectrums without a threshold policy
/// stay dormant. Output preserves the score map's insertion order; ranking
/// by magnitude is the allocator's job.
pub fn filter_relevant(
    scores: &IndexMap<SpectrumKey, f64>,
    thresholds: &BTreeMap<SpectrumKey, f64>,
) -> Vec<SpectrumKey> {
    scores
        .iter()
        .filter(|(spectrum, score)| {
            thresholds
                .get(*spectrum)
                .map(|threshold| **score > *threshold)
                .unwrap_or(false)
        })
        .map(|(spectrum, _)| spectrum.clone())
        .collect()
}
