use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::domain::{SessionId, SpectrumKey};
use super::session::{AssessmentHandoff, AssessmentSession};

/// Repository record for one assessment session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    pub session: AssessmentSession,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionRecord {
    pub fn status_view(&self) -> SessionStatusView {
        SessionStatusView {
            session_id: self.session_id.clone(),
            state: self.session.state().label(),
            scores: self.session.scores().cloned(),
            planned_questions: self.session.plan().map(|plan| plan.total_allocated()),
            phase_two_answered: self.session.phase_two_answers().len(),
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
    fn active(&self, limit: usize) -> Result<Vec<SessionRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook towards the report/analysis generator that turns the
/// handoff payload into narrative output.
pub trait ReportSink: Send + Sync {
    fn publish(&self, request: AssessmentReportRequest) -> Result<(), ReportError>;
}

/// Payload handed to the downstream report generator at finalize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReportRequest {
    pub session_id: SessionId,
    pub handoff: AssessmentHandoff,
}

/// Report dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a session's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusView {
    pub session_id: SessionId,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<IndexMap<SpectrumKey, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_questions: Option<usize>,
    pub phase_two_answered: usize,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}
