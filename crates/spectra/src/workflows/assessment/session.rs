use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::domain::{Answer, Phase, QuestionBank, QuestionId, SpectrumKey, ValidationError};
use super::engine::{AllocationResult, ScreeningEngine};

/// Lifecycle stage of one respondent's assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    AwaitingPhaseOne,
    PhaseOneScored,
    PhaseTwoPrepared,
    AwaitingPhaseTwo,
    Complete,
}

impl SessionState {
    pub const fn label(self) -> &'static str {
        match self {
            SessionState::AwaitingPhaseOne => "awaiting_phase_one",
            SessionState::PhaseOneScored => "phase_one_scored",
            SessionState::PhaseTwoPrepared => "phase_two_prepared",
            SessionState::AwaitingPhaseTwo => "awaiting_phase_two",
            SessionState::Complete => "complete",
        }
    }
}

/// An operation was invoked while the session was in the wrong state.
#[derive(Debug, thiserror::Error)]
#[error("operation requires state '{}', session is '{}'", .expected.label(), .actual.label())]
pub struct StateError {
    pub expected: SessionState,
    pub actual: SessionState,
}

/// Session-level failures: wrong-state calls or malformed answers.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// One answered question in the finalize payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question_id: QuestionId,
    pub prompt: String,
    pub phase: Phase,
    pub spectrums: Vec<SpectrumKey>,
    pub weight: u8,
    pub value: String,
}

/// Handoff payload for the external report generator. The core makes no
/// assumptions about what happens to it after handoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentHandoff {
    pub scores: IndexMap<SpectrumKey, f64>,
    pub answered: Vec<AnsweredQuestion>,
}

/// State machine sequencing phase 1 -> scoring -> allocation -> phase 2.
///
/// Scores and the allocation result are fixed the moment their stage runs;
/// starting over requires a fresh session. Every call must receive the same
/// immutable bank snapshot the session started with. The machine owns no
/// external resources, so abandoning a session is just dropping it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentSession {
    state: SessionState,
    phase_one_answers: Vec<Answer>,
    scores: Option<IndexMap<SpectrumKey, f64>>,
    plan: Option<AllocationResult>,
    phase_two_answers: Vec<Answer>,
}

impl AssessmentSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::AwaitingPhaseOne,
            phase_one_answers: Vec::new(),
            scores: None,
            plan: None,
            phase_two_answers: Vec::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn scores(&self) -> Option<&IndexMap<SpectrumKey, f64>> {
        self.scores.as_ref()
    }

    pub fn plan(&self) -> Option<&AllocationResult> {
        self.plan.as_ref()
    }

    pub fn phase_two_answers(&self) -> &[Answer] {
        &self.phase_two_answers
    }

    fn require(&self, expected: SessionState) -> Result<(), StateError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(StateError {
                expected,
                actual: self.state,
            })
        }
    }

    /// Score the phase-1 submission, fixing the spectrum scores for this
    /// session.
    pub fn score_phase_one(
        &mut self,
        answers: Vec<Answer>,
        bank: &QuestionBank,
        engine: &ScreeningEngine,
    ) -> Result<&IndexMap<SpectrumKey, f64>, SessionError> {
        self.require(SessionState::AwaitingPhaseOne)?;

        let scores = engine.score_phase_one(&answers, bank)?;
        self.phase_one_answers = answers;
        self.scores = Some(scores);
        self.state = SessionState::PhaseOneScored;

        Ok(self.scores.as_ref().expect("scores just stored"))
    }

    /// Run relevance filtering and allocation, fixing the phase-2 question
    /// set presented to the respondent.
    pub fn prepare_phase_two(
        &mut self,
        bank: &QuestionBank,
        engine: &ScreeningEngine,
    ) -> Result<&AllocationResult, SessionError> {
        self.require(SessionState::PhaseOneScored)?;

        let scores = self.scores.as_ref().expect("scored before prepare");
        self.plan = Some(engine.plan(scores, bank));
        self.state = SessionState::PhaseTwoPrepared;

        Ok(self.plan.as_ref().expect("plan just stored"))
    }

    /// The respondent starts answering the allocated deep-dive questions.
    pub fn begin_phase_two(&mut self) -> Result<(), StateError> {
        self.require(SessionState::PhaseTwoPrepared)?;
        self.state = SessionState::AwaitingPhaseTwo;
        Ok(())
    }

    /// Record a (possibly partial) batch of phase-2 answers. Finalization
    /// waits for the caller's explicit completion signal.
    pub fn record_phase_two(
        &mut self,
        answers: Vec<Answer>,
        bank: &QuestionBank,
    ) -> Result<(), SessionError> {
        self.require(SessionState::AwaitingPhaseTwo)?;

        let plan = self.plan.as_ref().expect("prepared before phase 2");
        let mut seen: std::collections::HashSet<_> = self
            .phase_two_answers
            .iter()
            .map(|answer| answer.question_id.clone())
            .collect();
        for answer in &answers {
            bank.resolve(answer, Phase::Two)?;
            if !plan.contains(&answer.question_id) {
                return Err(ValidationError::NotAllocated(answer.question_id.clone()).into());
            }
            if !seen.insert(answer.question_id.clone()) {
                return Err(ValidationError::DuplicateAnswer(answer.question_id.clone()).into());
            }
        }

        self.phase_two_answers.extend(answers);
        Ok(())
    }

    /// Terminal transition: build the handoff payload for the external
    /// report generator.
    pub fn finalize(&mut self, bank: &QuestionBank) -> Result<AssessmentHandoff, SessionError> {
        self.require(SessionState::AwaitingPhaseTwo)?;

        let scores = self.scores.clone().expect("scored before finalize");
        let mut answered = Vec::with_capacity(
            self.phase_one_answers.len() + self.phase_two_answers.len(),
        );
        for answer in self.phase_one_answers.iter().chain(&self.phase_two_answers) {
            let question = bank
                .get(&answer.question_id)
                .expect("answers validated against this bank");
            answered.push(AnsweredQuestion {
                question_id: question.id.clone(),
                prompt: question.prompt.clone(),
                phase: question.phase,
                spectrums: question.spectrums.clone(),
                weight: answer.weight,
                value: question
                    .option_value(answer.weight)
                    .unwrap_or_default()
                    .to_string(),
            });
        }

        self.state = SessionState::Complete;
        Ok(AssessmentHandoff { scores, answered })
    }
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}
