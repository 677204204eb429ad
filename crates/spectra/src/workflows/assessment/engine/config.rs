use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::SpectrumKey;

/// Screening policy: per-spectrum relevance thresholds and the global
/// phase-2 question cap.
///
/// A spectrum without a threshold entry is never relevant. A cap of zero or
/// below is a valid configuration meaning "skip phase 2 entirely"; it is not
/// rejected here or anywhere downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningConfig {
    pub thresholds: BTreeMap<SpectrumKey, f64>,
    pub phase_two_cap: i32,
}

impl ScreeningConfig {
    pub fn threshold_for(&self, spectrum: &SpectrumKey) -> Option<f64> {
        self.thresholds.get(spectrum).copied()
    }
}
