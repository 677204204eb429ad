use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for latent trait dimensions ("Aandacht & Focus", etc.).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpectrumKey(pub String);

impl SpectrumKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl fmt::Display for SpectrumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for catalog questions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for assessment sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which half of the questionnaire a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "phase1")]
    One,
    #[serde(rename = "phase2")]
    Two,
}

impl Phase {
    pub const fn label(self) -> &'static str {
        match self {
            Phase::One => "phase1",
            Phase::Two => "phase2",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One selectable answer with the weight it contributes to tagged spectrums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub value: String,
    pub weight: u8,
}

/// Static catalog entry owned by the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub phase: Phase,
    pub spectrums: Vec<SpectrumKey>,
    pub prompt: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Whether `weight` matches one of the declared answer options.
    pub fn accepts_weight(&self, weight: u8) -> bool {
        self.options.iter().any(|option| option.weight == weight)
    }

    /// Display value of the option carrying `weight`, if declared.
    pub fn option_value(&self, weight: u8) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.weight == weight)
            .map(|option| option.value.as_str())
    }
}

/// Respondent input: the selected option weight for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: QuestionId,
    pub weight: u8,
}

/// Integrity errors raised while constructing a question bank.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("question bank contains no questions")]
    Empty,
    #[error("duplicate question id '{0}'")]
    DuplicateQuestion(QuestionId),
    #[error("question '{0}' declares no answer options")]
    MissingOptions(QuestionId),
    #[error("question '{0}' is not tagged with any spectrum")]
    MissingSpectrums(QuestionId),
}

/// Malformed respondent input. Always surfaced, never silently corrected.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("answer references unknown question '{0}'")]
    UnknownQuestion(QuestionId),
    #[error("question '{question_id}' belongs to {found}, expected {expected}")]
    PhaseMismatch {
        question_id: QuestionId,
        expected: Phase,
        found: Phase,
    },
    #[error("weight {weight} is not a declared option of question '{question_id}'")]
    UnknownWeight { question_id: QuestionId, weight: u8 },
    #[error("question '{0}' was answered more than once")]
    DuplicateAnswer(QuestionId),
    #[error("question '{0}' is not part of this session's phase-2 plan")]
    NotAllocated(QuestionId),
}

/// Read-only, validated snapshot of the question catalog.
///
/// The bank is supplied by an external provider and never mutated by the
/// engine; catalog order is preserved and drives allocation order.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    index: HashMap<QuestionId, usize>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        if questions.is_empty() {
            return Err(BankError::Empty);
        }

        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if question.options.is_empty() {
                return Err(BankError::MissingOptions(question.id.clone()));
            }
            if question.spectrums.is_empty() {
                return Err(BankError::MissingSpectrums(question.id.clone()));
            }
            if index.insert(question.id.clone(), position).is_some() {
                return Err(BankError::DuplicateQuestion(question.id.clone()));
            }
        }

        Ok(Self { questions, index })
    }

    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.index.get(id).map(|position| &self.questions[*position])
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn phase_questions(&self, phase: Phase) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(move |question| question.phase == phase)
    }

    /// Phase-2 questions tagged with `spectrum`, in catalog order.
    pub fn phase_two_for(&self, spectrum: &SpectrumKey) -> Vec<&Question> {
        self.phase_questions(Phase::Two)
            .filter(|question| question.spectrums.contains(spectrum))
            .collect()
    }

    /// Minimum and maximum option weight declared anywhere in the bank.
    pub fn weight_bounds(&self) -> (u8, u8) {
        let mut min = u8::MAX;
        let mut max = u8::MIN;
        for question in &self.questions {
            for option in &question.options {
                min = min.min(option.weight);
                max = max.max(option.weight);
            }
        }
        (min, max)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Resolve an answer against the bank, enforcing existence, phase, and
    /// declared weights.
    pub fn resolve(
        &self,
        answer: &Answer,
        expected_phase: Phase,
    ) -> Result<&Question, ValidationError> {
        let question = self
            .get(&answer.question_id)
            .ok_or_else(|| ValidationError::UnknownQuestion(answer.question_id.clone()))?;

        if question.phase != expected_phase {
            return Err(ValidationError::PhaseMismatch {
                question_id: question.id.clone(),
                expected: expected_phase,
                found: question.phase,
            });
        }

        if !question.accepts_weight(answer.weight) {
            return Err(ValidationError::UnknownWeight {
                question_id: question.id.clone(),
                weight: answer.weight,
            });
        }

        Ok(question)
    }
}
