use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use crate::workflows::assessment::domain::{
    Answer, AnswerOption, Phase, Question, QuestionBank, QuestionId, SessionId, SpectrumKey,
};
use crate::workflows::assessment::engine::{ScreeningConfig, ScreeningEngine};
use crate::workflows::assessment::repository::{
    AssessmentReportRequest, ReportError, ReportSink, RepositoryError, SessionRecord,
    SessionRepository,
};
use crate::workflows::assessment::service::ScreeningService;
use crate::workflows::assessment::session::SessionState;

pub(super) const FOCUS: &str = "Aandacht & Focus";
pub(super) const SENSORY: &str = "Prikkelverwerking";
pub(super) const SOCIAL: &str = "Sociale Interactie";
pub(super) const EMOTION: &str = "Emotieregulatie";

pub(super) fn spectrum(key: &str) -> SpectrumKey {
    SpectrumKey::new(key)
}

pub(super) fn likert() -> Vec<AnswerOption> {
    vec![
        AnswerOption {
            value: "Nooit".to_string(),
            weight: 1,
        },
        AnswerOption {
            value: "Soms".to_string(),
            weight: 2,
        },
        AnswerOption {
            value: "Vaak".to_string(),
            weight: 3,
        },
        AnswerOption {
            value: "Altijd".to_string(),
            weight: 4,
        },
    ]
}

pub(super) fn question(id: &str, phase: Phase, spectrums: &[&str]) -> Question {
    Question {
        id: QuestionId::new(id),
        phase,
        spectrums: spectrums.iter().map(|key| spectrum(key)).collect(),
        prompt: format!("Prompt for {id}"),
        options: likert(),
    }
}

/// Standard fixture bank: four spectrums, two phase-1 items each, and
/// phase-2 pools sized for the documented capacity scenarios (Focus 4,
/// Social 3, Sensory 2, Emotion 2).
pub(super) fn bank() -> QuestionBank {
    QuestionBank::new(vec![
        question("p1-focus-1", Phase::One, &[FOCUS]),
        question("p1-focus-2", Phase::One, &[FOCUS]),
        question("p1-sensory-1", Phase::One, &[SENSORY]),
        question("p1-sensory-2", Phase::One, &[SENSORY]),
        question("p1-social-1", Phase::One, &[SOCIAL]),
        question("p1-social-2", Phase::One, &[SOCIAL]),
        question("p1-emotion-1", Phase::One, &[EMOTION]),
        question("p1-emotion-2", Phase::One, &[EMOTION]),
        question("p2-focus-1", Phase::Two, &[FOCUS]),
        question("p2-focus-2", Phase::Two, &[FOCUS]),
        question("p2-focus-3", Phase::Two, &[FOCUS]),
        question("p2-focus-4", Phase::Two, &[FOCUS]),
        question("p2-social-1", Phase::Two, &[SOCIAL]),
        question("p2-social-2", Phase::Two, &[SOCIAL]),
        question("p2-social-3", Phase::Two, &[SOCIAL]),
        question("p2-sensory-1", Phase::Two, &[SENSORY]),
        question("p2-sensory-2", Phase::Two, &[SENSORY]),
        question("p2-emotion-1", Phase::Two, &[EMOTION]),
        question("p2-emotion-2", Phase::Two, &[EMOTION]),
    ])
    .expect("fixture bank is valid")
}

pub(super) fn thresholds() -> BTreeMap<SpectrumKey, f64> {
    [FOCUS, SENSORY, SOCIAL, EMOTION]
        .into_iter()
        .map(|key| (spectrum(key), 2.5))
        .collect()
}

pub(super) fn config(cap: i32) -> ScreeningConfig {
    ScreeningConfig {
        thresholds: thresholds(),
        phase_two_cap: cap,
    }
}

pub(super) fn engine(cap: i32) -> ScreeningEngine {
    ScreeningEngine::new(config(cap))
}

pub(super) fn answer(id: &str, weight: u8) -> Answer {
    Answer {
        question_id: QuestionId::new(id),
        weight,
    }
}

/// Phase-1 submission yielding Focus 3.5, Sensory 2.0, Social 3.0 and no
/// Emotion score (both emotion items left unanswered).
pub(super) fn scenario_answers() -> Vec<Answer> {
    vec![
        answer("p1-focus-1", 3),
        answer("p1-focus-2", 4),
        answer("p1-sensory-1", 2),
        answer("p1-sensory-2", 2),
        answer("p1-social-1", 3),
        answer("p1-social-2", 3),
    ]
}

#[derive(Default, Clone)]
pub(super) struct MemorySessionRepository {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for MemorySessionRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.session_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.session_id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: SessionRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.session_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn active(&self, limit: usize) -> Result<Vec<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.session.state() != SessionState::Complete)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryReportSink {
    events: Arc<Mutex<Vec<AssessmentReportRequest>>>,
}

impl MemoryReportSink {
    pub(super) fn events(&self) -> Vec<AssessmentReportRequest> {
        self.events.lock().expect("sink mutex poisoned").clone()
    }
}

impl ReportSink for MemoryReportSink {
    fn publish(&self, request: AssessmentReportRequest) -> Result<(), ReportError> {
        self.events
            .lock()
            .expect("sink mutex poisoned")
            .push(request);
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn active(&self, _limit: usize) -> Result<Vec<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service(
    cap: i32,
) -> (
    Arc<ScreeningService<MemorySessionRepository, MemoryReportSink>>,
    Arc<MemorySessionRepository>,
    Arc<MemoryReportSink>,
) {
    let repository = Arc::new(MemorySessionRepository::default());
    let sink = Arc::new(MemoryReportSink::default());
    let service = Arc::new(ScreeningService::new(
        Arc::new(bank()),
        config(cap),
        repository.clone(),
        sink.clone(),
    ));
    (service, repository, sink)
}
