use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use tracing::{info, warn};

use super::domain::{Answer, QuestionBank, SessionId, SpectrumKey};
use super::engine::{AllocationResult, ScreeningConfig, ScreeningEngine};
use super::repository::{
    AssessmentReportRequest, ReportError, ReportSink, RepositoryError, SessionRecord,
    SessionRepository,
};
use super::session::{AssessmentHandoff, AssessmentSession, SessionError, SessionState};

/// Service composing the question bank snapshot, screening engine, session
/// repository, and downstream report sink.
///
/// Sessions are independent; the bank is a shared immutable snapshot, so the
/// service needs no locking of its own.
pub struct ScreeningService<R, S> {
    bank: Arc<QuestionBank>,
    engine: Arc<ScreeningEngine>,
    repository: Arc<R>,
    reports: Arc<S>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

impl<R, S> ScreeningService<R, S>
where
    R: SessionRepository + 'static,
    S: ReportSink + 'static,
{
    pub fn new(
        bank: Arc<QuestionBank>,
        config: ScreeningConfig,
        repository: Arc<R>,
        reports: Arc<S>,
    ) -> Self {
        Self {
            bank,
            engine: Arc::new(ScreeningEngine::new(config)),
            repository,
            reports,
        }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Open a fresh session awaiting the phase-1 submission.
    pub fn start(&self) -> Result<SessionRecord, ScreeningServiceError> {
        let record = SessionRecord {
            session_id: next_session_id(),
            session: AssessmentSession::new(),
            started_at: Utc::now(),
            completed_at: None,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Score a phase-1 submission.
    ///
    /// Re-submitting after scoring restarts the session under the same id
    /// rather than patching the fixed scores.
    pub fn submit_phase_one(
        &self,
        session_id: &SessionId,
        answers: Vec<Answer>,
    ) -> Result<IndexMap<SpectrumKey, f64>, ScreeningServiceError> {
        let mut record = self.fetch(session_id)?;

        if record.session.state() != SessionState::AwaitingPhaseOne {
            warn!(session = %record.session_id, state = record.session.state().label(),
                "phase-1 resubmission, restarting session");
            record.session = AssessmentSession::new();
            record.started_at = Utc::now();
            record.completed_at = None;
        }

        let scores = record
            .session
            .score_phase_one(answers, &self.bank, &self.engine)?
            .clone();
        self.repository.update(record)?;
        Ok(scores)
    }

    /// Fix the phase-2 question set for this session.
    pub fn prepare_phase_two(
        &self,
        session_id: &SessionId,
    ) -> Result<AllocationResult, ScreeningServiceError> {
        let mut record = self.fetch(session_id)?;
        let plan = record
            .session
            .prepare_phase_two(&self.bank, &self.engine)?
            .clone();
        self.repository.update(record)?;
        Ok(plan)
    }

    /// The respondent starts the allocated deep-dive questions.
    pub fn begin_phase_two(&self, session_id: &SessionId) -> Result<(), ScreeningServiceError> {
        let mut record = self.fetch(session_id)?;
        record.session.begin_phase_two().map_err(SessionError::from)?;
        self.repository.update(record)?;
        Ok(())
    }

    /// Record a partial phase-2 answer batch.
    pub fn record_phase_two(
        &self,
        session_id: &SessionId,
        answers: Vec<Answer>,
    ) -> Result<SessionRecord, ScreeningServiceError> {
        let mut record = self.fetch(session_id)?;
        record.session.record_phase_two(answers, &self.bank)?;
        self.repository.update(record.clone())?;
        Ok(record)
    }

    /// Explicit completion signal: produce the handoff payload and publish
    /// it to the report generator.
    pub fn finalize(
        &self,
        session_id: &SessionId,
    ) -> Result<AssessmentHandoff, ScreeningServiceError> {
        let mut record = self.fetch(session_id)?;
        let handoff = record.session.finalize(&self.bank)?;
        record.completed_at = Some(Utc::now());
        self.repository.update(record)?;

        self.reports.publish(AssessmentReportRequest {
            session_id: session_id.clone(),
            handoff: handoff.clone(),
        })?;
        info!(session = %session_id, answered = handoff.answered.len(),
            "assessment handed off for report generation");

        Ok(handoff)
    }

    /// Fetch a session and current status for API responses.
    pub fn get(&self, session_id: &SessionId) -> Result<SessionRecord, ScreeningServiceError> {
        self.fetch(session_id)
    }

    fn fetch(&self, session_id: &SessionId) -> Result<SessionRecord, ScreeningServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Report(#[from] ReportError),
}
