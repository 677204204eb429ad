use std::io::Read;

use serde::Deserialize;

use super::normalizer::normalize_label;
use crate::workflows::assessment::{AnswerOption, Phase, Question, QuestionId, SpectrumKey};

#[derive(Debug)]
pub(crate) enum RowError {
    MissingId,
    UnknownPhase(String),
    MissingSpectrums,
    MissingOptions,
    MalformedOption(String),
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowError::MissingId => write!(f, "missing question id"),
            RowError::UnknownPhase(value) => {
                write!(f, "phase must be 'phase1' or 'phase2', found '{value}'")
            }
            RowError::MissingSpectrums => write!(f, "no spectrum keys listed"),
            RowError::MissingOptions => write!(f, "no answer options listed"),
            RowError::MalformedOption(value) => {
                write!(f, "options must be 'label=weight' pairs, found '{value}'")
            }
        }
    }
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<Question>, super::BankImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut questions = Vec::new();

    for (position, record) in csv_reader.deserialize::<BankRow>().enumerate() {
        // Header occupies line 1 of the export.
        let line = position as u64 + 2;
        let row = record?;
        let question = row
            .into_question()
            .map_err(|error| super::BankImportError::Row {
                line,
                message: error.to_string(),
            })?;
        questions.push(question);
    }

    Ok(questions)
}

#[derive(Debug, Deserialize)]
struct BankRow {
    #[serde(rename = "Question ID")]
    question_id: String,
    #[serde(rename = "Phase")]
    phase: String,
    #[serde(rename = "Spectrums")]
    spectrums: String,
    #[serde(rename = "Prompt", default)]
    prompt: String,
    #[serde(rename = "Options")]
    options: String,
}

impl BankRow {
    fn into_question(self) -> Result<Question, RowError> {
        let id = normalize_label(&self.question_id);
        if id.is_empty() {
            return Err(RowError::MissingId);
        }

        let phase = parse_phase(&self.phase)?;

        let spectrums: Vec<SpectrumKey> = self
            .spectrums
            .split(';')
            .map(normalize_label)
            .filter(|key| !key.is_empty())
            .map(SpectrumKey)
            .collect();
        if spectrums.is_empty() {
            return Err(RowError::MissingSpectrums);
        }

        let options = parse_options(&self.options)?;

        Ok(Question {
            id: QuestionId(id),
            phase,
            spectrums,
            prompt: normalize_label(&self.prompt),
            options,
        })
    }
}

fn parse_phase(raw: &str) -> Result<Phase, RowError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "phase1" | "1" => Ok(Phase::One),
        "phase2" | "2" => Ok(Phase::Two),
        other => Err(RowError::UnknownPhase(other.to_string())),
    }
}

fn parse_options(raw: &str) -> Result<Vec<AnswerOption>, RowError> {
    let mut options = Vec::new();

    for pair in raw.split('|') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let (value, weight) = pair
            .rsplit_once('=')
            .ok_or_else(|| RowError::MalformedOption(pair.to_string()))?;
        let weight: u8 = weight
            .trim()
            .parse()
            .map_err(|_| RowError::MalformedOption(pair.to_string()))?;

        options.push(AnswerOption {
            value: normalize_label(value),
            weight,
        });
    }

    if options.is_empty() {
        return Err(RowError::MissingOptions);
    }

    Ok(options)
}

#[cfg(test)]
pub(crate) fn parse_phase_for_tests(raw: &str) -> Result<Phase, RowError> {
    parse_phase(raw)
}

#[cfg(test)]
pub(crate) fn parse_options_for_tests(raw: &str) -> Result<Vec<AnswerOption>, RowError> {
    parse_options(raw)
}
