use std::collections::HashSet;

use indexmap::IndexMap;

use super::super::domain::{Answer, Phase, QuestionBank, SpectrumKey, ValidationError};

/// Aggregate phase-1 answers into per-spectrum mean scores.
///
/// Spectrums enter the result map in the order they first appear on the
/// bank's phase-1 questions, so downstream ordering is deterministic no
/// matter how the caller ordered the answers. A spectrum with no contributing
/// answers is omitted, not scored as zero.
pub fn compute_scores(
    answers: &[Answer],
    bank: &QuestionBank,
) -> Result<IndexMap<SpectrumKey, f64>, ValidationError> {
    let mut seen = HashSet::with_capacity(answers.len());
    for answer in answers {
        bank.resolve(answer, Phase::One)?;
        if !seen.insert(answer.question_id.clone()) {
            return Err(ValidationError::DuplicateAnswer(answer.question_id.clone()));
        }
    }

    let mut totals: IndexMap<SpectrumKey, (f64, u32)> = IndexMap::new();
    for question in bank.phase_questions(Phase::One) {
        let Some(answer) = answers
            .iter()
            .find(|answer| answer.question_id == question.id)
        else {
            continue;
        };

        for spectrum in &question.spectrums {
            let entry = totals.entry(spectrum.clone()).or_insert((0.0, 0));
            entry.0 += f64::from(answer.weight);
            entry.1 += 1;
        }
    }

    Ok(totals
        .into_iter()
        .map(|(spectrum, (sum, count))| (spectrum, sum / f64::from(count)))
        .collect())
}
