use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use spectra::workflows::assessment::{
    AnswerOption, AssessmentReportRequest, Phase, Question, QuestionBank, QuestionId, ReportError,
    ReportSink, RepositoryError, ScreeningConfig, SessionId, SessionRecord, SessionRepository,
    SessionState, SpectrumKey,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for InMemorySessionRepository {
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
        if guard.contains_key(&record.session_id) {
            guard.insert(record.session_id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
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
pub(crate) struct InMemoryReportSink {
    events: Arc<Mutex<Vec<AssessmentReportRequest>>>,
}

impl ReportSink for InMemoryReportSink {
    fn publish(&self, request: AssessmentReportRequest) -> Result<(), ReportError> {
        let mut guard = self.events.lock().expect("sink mutex poisoned");
        guard.push(request);
        Ok(())
    }
}

impl InMemoryReportSink {
    pub(crate) fn events(&self) -> Vec<AssessmentReportRequest> {
        self.events.lock().expect("sink mutex poisoned").clone()
    }
}

pub(crate) const SPECTRUMS: [&str; 5] = [
    "Aandacht & Focus",
    "Prikkelverwerking",
    "Sociale Interactie",
    "Emotieregulatie",
    "Plannen & Organiseren",
];

pub(crate) fn default_screening_config(phase_two_cap: i32) -> ScreeningConfig {
    let thresholds: BTreeMap<SpectrumKey, f64> = SPECTRUMS
        .into_iter()
        .map(|key| (SpectrumKey::new(key), 2.5))
        .collect();

    ScreeningConfig {
        thresholds,
        phase_two_cap,
    }
}

fn likert() -> Vec<AnswerOption> {
    [("Nooit", 1u8), ("Soms", 2), ("Vaak", 3), ("Altijd", 4)]
        .into_iter()
        .map(|(value, weight)| AnswerOption {
            value: value.to_string(),
            weight,
        })
        .collect()
}

fn question(id: &str, phase: Phase, spectrum: &str, prompt: &str) -> Question {
    Question {
        id: QuestionId::new(id),
        phase,
        spectrums: vec![SpectrumKey::new(spectrum)],
        prompt: prompt.to_string(),
        options: likert(),
    }
}

/// Fixed demonstration catalog used when no `APP_BANK_CSV` export is
/// configured: two broad screening items per spectrum, four deep-dive items
/// per spectrum.
pub(crate) fn builtin_question_bank() -> QuestionBank {
    let focus = SPECTRUMS[0];
    let sensory = SPECTRUMS[1];
    let social = SPECTRUMS[2];
    let emotion = SPECTRUMS[3];
    let planning = SPECTRUMS[4];

    QuestionBank::new(vec![
        question(
            "p1-focus-1",
            Phase::One,
            focus,
            "Ik raak snel afgeleid tijdens het lezen of werken",
        ),
        question(
            "p1-focus-2",
            Phase::One,
            focus,
            "Ik vind het moeilijk om lang mijn aandacht bij een taak te houden",
        ),
        question(
            "p1-sensory-1",
            Phase::One,
            sensory,
            "Geluiden, licht of drukte overweldigen mij snel",
        ),
        question(
            "p1-sensory-2",
            Phase::One,
            sensory,
            "Ik merk kleine prikkels op die anderen lijken te ontgaan",
        ),
        question(
            "p1-social-1",
            Phase::One,
            social,
            "Ik vind het lastig om te weten wat ik in een gesprek moet zeggen",
        ),
        question(
            "p1-social-2",
            Phase::One,
            social,
            "Sociale situaties kosten mij veel energie",
        ),
        question(
            "p1-emotion-1",
            Phase::One,
            emotion,
            "Mijn stemming kan snel omslaan",
        ),
        question(
            "p1-emotion-2",
            Phase::One,
            emotion,
            "Ik vind het moeilijk om kalm te blijven als iets tegenzit",
        ),
        question(
            "p1-planning-1",
            Phase::One,
            planning,
            "Ik stel taken uit tot het echt niet anders kan",
        ),
        question(
            "p1-planning-2",
            Phase::One,
            planning,
            "Ik verlies het overzicht bij taken met meerdere stappen",
        ),
        question(
            "p2-focus-1",
            Phase::Two,
            focus,
            "Ik verlies de draad tijdens gesprekken of vergaderingen",
        ),
        question(
            "p2-focus-2",
            Phase::Two,
            focus,
            "Ik begin aan iets nieuws voordat het vorige af is",
        ),
        question(
            "p2-focus-3",
            Phase::Two,
            focus,
            "Ik vergeet afspraken als ik ze niet direct noteer",
        ),
        question(
            "p2-focus-4",
            Phase::Two,
            focus,
            "Ik kan me urenlang verliezen in iets dat mij fascineert",
        ),
        question(
            "p2-sensory-1",
            Phase::Two,
            sensory,
            "Ik draag liever dezelfde vertrouwde kleding vanwege de stof",
        ),
        question(
            "p2-sensory-2",
            Phase::Two,
            sensory,
            "Fel licht of tl-verlichting is voor mij onaangenaam",
        ),
        question(
            "p2-sensory-3",
            Phase::Two,
            sensory,
            "In een drukke ruimte kan ik gesprekken moeilijk volgen",
        ),
        question(
            "p2-sensory-4",
            Phase::Two,
            sensory,
            "Na een prikkelrijke dag heb ik lang hersteltijd nodig",
        ),
        question(
            "p2-social-1",
            Phase::Two,
            social,
            "Ik neem uitdrukkingen vaak letterlijker dan ze bedoeld zijn",
        ),
        question(
            "p2-social-2",
            Phase::Two,
            social,
            "Oogcontact maken voelt voor mij ongemakkelijk",
        ),
        question(
            "p2-social-3",
            Phase::Two,
            social,
            "Ik oefen gesprekken vooraf in mijn hoofd",
        ),
        question(
            "p2-social-4",
            Phase::Two,
            social,
            "Onverwachte wijzigingen in plannen brengen mij uit balans",
        ),
        question(
            "p2-emotion-1",
            Phase::Two,
            emotion,
            "Kleine tegenslagen voelen voor mij als grote gebeurtenissen",
        ),
        question(
            "p2-emotion-2",
            Phase::Two,
            emotion,
            "Ik heb moeite om te benoemen wat ik precies voel",
        ),
        question(
            "p2-emotion-3",
            Phase::Two,
            emotion,
            "Na een conflict blijf ik er lang over piekeren",
        ),
        question(
            "p2-emotion-4",
            Phase::Two,
            emotion,
            "Ik reageer sterker op kritiek dan ik zou willen",
        ),
        question(
            "p2-planning-1",
            Phase::Two,
            planning,
            "Ik onderschat hoeveel tijd een taak mij gaat kosten",
        ),
        question(
            "p2-planning-2",
            Phase::Two,
            planning,
            "Deadlines halen lukt alleen met druk van buitenaf",
        ),
        question(
            "p2-planning-3",
            Phase::Two,
            planning,
            "Mijn werkplek of administratie raakt snel ongeorganiseerd",
        ),
        question(
            "p2-planning-4",
            Phase::Two,
            planning,
            "Ik vind het moeilijk om aan een grote taak te beginnen",
        ),
    ])
    .expect("builtin bank is valid")
}
