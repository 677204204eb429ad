//! Adaptive two-phase assessment: broad phase-1 screening, per-spectrum
//! scoring, threshold-based relevance filtering, and capacity-constrained
//! allocation of phase-2 deep-dive questions.
//!
//! The engine is a pure, synchronous computation over an immutable question
//! bank snapshot; all I/O (bank loading, persistence, report generation)
//! lives behind the traits in [`repository`].

pub mod domain;
pub(crate) mod engine;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use domain::{
    Answer, AnswerOption, BankError, Phase, Question, QuestionBank, QuestionId, SessionId,
    SpectrumKey, ValidationError,
};
pub use engine::{
    allocate, compute_scores, filter_relevant, AllocationResult, ScreeningConfig, ScreeningEngine,
    SpectrumAllocation,
};
pub use repository::{
    AssessmentReportRequest, ReportError, ReportSink, RepositoryError, SessionRecord,
    SessionRepository, SessionStatusView,
};
pub use router::assessment_router;
pub use service::{ScreeningService, ScreeningServiceError};
pub use session::{
    AnsweredQuestion, AssessmentHandoff, AssessmentSession, SessionError, SessionState, StateError,
};
