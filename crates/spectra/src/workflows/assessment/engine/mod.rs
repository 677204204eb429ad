mod allocation;
mod config;
mod relevance;
mod scoring;

pub use allocation::{AllocationResult, SpectrumAllocation};
pub use config::ScreeningConfig;

pub use allocation::allocate;
pub use relevance::filter_relevant;
pub use scoring::compute_scores;

use indexmap::IndexMap;

use super::domain::{Answer, QuestionBank, SpectrumKey, ValidationError};

/// Stateless screening pipeline applying one `ScreeningConfig` snapshot.
///
/// The stages are pure functions over in-memory data; the engine just keeps
/// the policy values together so callers cannot mix thresholds and caps from
/// different configurations within one run.
pub struct ScreeningEngine {
    config: ScreeningConfig,
}

impl ScreeningEngine {
    pub fn new(config: ScreeningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    /// Aggregate phase-1 answers into per-spectrum scores.
    pub fn score_phase_one(
        &self,
        answers: &[Answer],
        bank: &QuestionBank,
    ) -> Result<IndexMap<SpectrumKey, f64>, ValidationError> {
        compute_scores(answers, bank)
    }

    /// Filter relevant spectrums and allocate phase-2 questions under the
    /// global cap.
    pub fn plan(
        &self,
        scores: &IndexMap<SpectrumKey, f64>,
        bank: &QuestionBank,
    ) -> AllocationResult {
        let relevant = filter_relevant(scores, &self.config.thresholds);
        allocate(&relevant, scores, bank, self.config.phase_two_cap)
    }
}
