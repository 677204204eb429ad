use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::super::domain::{QuestionBank, QuestionId, SpectrumKey};

/// Phase-2 questions assigned to one relevant spectrum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumAllocation {
    pub spectrum: SpectrumKey,
    pub question_ids: Vec<QuestionId>,
}

/// The engine's output: per-spectrum scores plus the capacity-constrained
/// phase-2 assignment. Immutable once produced; a new phase-1 submission
/// produces a new result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationResult {
    pub scores: IndexMap<SpectrumKey, f64>,
    pub allocations: Vec<SpectrumAllocation>,
}

impl AllocationResult {
    pub fn total_allocated(&self) -> usize {
        self.allocations
            .iter()
            .map(|allocation| allocation.question_ids.len())
            .sum()
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.allocations
            .iter()
            .any(|allocation| allocation.question_ids.contains(id))
    }
}

/// Rank relevant spectrums by score and allocate phase-2 questions under the
/// global cap.
///
/// The sort is stable and descending, so equal scores keep their relative
/// order from `relevant`. The cap bounds the total question count, not a
/// per-spectrum count: once it is exhausted, lower-priority spectrums
/// receive nothing and are omitted from the result. A question tagged with
/// several spectrums is only ever allocated to the highest-priority one,
/// tracked through a single allocated set shared across the loop.
pub fn allocate(
    relevant: &[SpectrumKey],
    scores: &IndexMap<SpectrumKey, f64>,
    bank: &QuestionBank,
    cap: i32,
) -> AllocationResult {
    let mut result = AllocationResult {
        scores: scores.clone(),
        allocations: Vec::new(),
    };

    if cap <= 0 || relevant.is_empty() {
        return result;
    }
    let cap = cap as usize;

    let mut ranked: Vec<SpectrumKey> = relevant.to_vec();
    ranked.sort_by(|a, b| {
        let score_a = scores.get(a).copied().unwrap_or(f64::NEG_INFINITY);
        let score_b = scores.get(b).copied().unwrap_or(f64::NEG_INFINITY);
        score_b.total_cmp(&score_a)
    });

    let mut allocated: HashSet<QuestionId> = HashSet::new();
    for spectrum in ranked {
        let remaining = cap - allocated.len();
        if remaining == 0 {
            break;
        }

        let question_ids: Vec<QuestionId> = bank
            .phase_two_for(&spectrum)
            .into_iter()
            .filter(|question| !allocated.contains(&question.id))
            .take(remaining)
            .map(|question| question.id.clone())
            .collect();

        if question_ids.is_empty() {
            continue;
        }

        allocated.extend(question_ids.iter().cloned());
        result.allocations.push(SpectrumAllocation {
            spectrum,
            question_ids,
        });
    }

    result
}
