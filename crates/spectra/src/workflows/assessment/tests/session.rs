use super::common::*;
use crate::workflows::assessment::domain::{Phase, ValidationError};
use crate::workflows::assessment::session::{
    AssessmentSession, SessionError, SessionState,
};

fn prepared_session(cap: i32) -> AssessmentSession {
    let bank = bank();
    let engine = engine(cap);
    let mut session = AssessmentSession::new();
    session
        .score_phase_one(scenario_answers(), &bank, &engine)
        .expect("phase 1 scores");
    session
        .prepare_phase_two(&bank, &engine)
        .expect("plan prepared");
    session
}

#[test]
fn session_walks_the_full_lifecycle() {
    let bank = bank();
    let engine = engine(5);
    let mut session = AssessmentSession::new();
    assert_eq!(session.state(), SessionState::AwaitingPhaseOne);

    let scores = session
        .score_phase_one(scenario_answers(), &bank, &engine)
        .expect("phase 1 scores");
    assert_eq!(scores.get(&spectrum(FOCUS)), Some(&3.5));
    assert_eq!(session.state(), SessionState::PhaseOneScored);

    let plan = session
        .prepare_phase_two(&bank, &engine)
        .expect("plan prepared");
    assert_eq!(plan.total_allocated(), 5);
    assert_eq!(session.state(), SessionState::PhaseTwoPrepared);

    session.begin_phase_two().expect("phase 2 begins");
    assert_eq!(session.state(), SessionState::AwaitingPhaseTwo);

    session
        .record_phase_two(vec![answer("p2-focus-1", 3)], &bank)
        .expect("partial batch accepted");
    session
        .record_phase_two(vec![answer("p2-focus-2", 2), answer("p2-social-1", 4)], &bank)
        .expect("second batch accepted");
    assert_eq!(session.phase_two_answers().len(), 3);

    let handoff = session.finalize(&bank).expect("handoff produced");
    assert_eq!(session.state(), SessionState::Complete);
    assert_eq!(handoff.scores.len(), 3);
    assert_eq!(handoff.answered.len(), 9);
}

#[test]
fn wrong_state_calls_name_expected_and_actual() {
    let bank = bank();
    let engine = engine(5);
    let mut session = AssessmentSession::new();

    match session.prepare_phase_two(&bank, &engine) {
        Err(SessionError::State(error)) => {
            assert_eq!(error.expected, SessionState::PhaseOneScored);
            assert_eq!(error.actual, SessionState::AwaitingPhaseOne);
            assert!(error.to_string().contains("phase_one_scored"));
        }
        other => panic!("expected state error, got {other:?}"),
    }

    match session.finalize(&bank) {
        Err(SessionError::State(error)) => {
            assert_eq!(error.expected, SessionState::AwaitingPhaseTwo);
        }
        other => panic!("expected state error, got {other:?}"),
    }
}

#[test]
fn rescoring_a_scored_session_is_a_state_error() {
    let bank = bank();
    let engine = engine(5);
    let mut session = AssessmentSession::new();
    session
        .score_phase_one(scenario_answers(), &bank, &engine)
        .expect("phase 1 scores");

    match session.score_phase_one(scenario_answers(), &bank, &engine) {
        Err(SessionError::State(error)) => {
            assert_eq!(error.actual, SessionState::PhaseOneScored);
        }
        other => panic!("expected state error, got {other:?}"),
    }
}

#[test]
fn preparing_twice_is_a_state_error() {
    let bank = bank();
    let engine = engine(5);
    let mut session = prepared_session(5);

    match session.prepare_phase_two(&bank, &engine) {
        Err(SessionError::State(error)) => {
            assert_eq!(error.actual, SessionState::PhaseTwoPrepared);
        }
        other => panic!("expected state error, got {other:?}"),
    }
}

#[test]
fn phase_two_answers_must_come_from_the_plan() {
    let bank = bank();
    let mut session = prepared_session(5);
    session.begin_phase_two().expect("phase 2 begins");

    // Sensory scored 2.0 and never cleared its threshold.
    match session.record_phase_two(vec![answer("p2-sensory-1", 2)], &bank) {
        Err(SessionError::Validation(ValidationError::NotAllocated(id))) => {
            assert_eq!(id.0, "p2-sensory-1");
        }
        other => panic!("expected not-allocated error, got {other:?}"),
    }
}

#[test]
fn phase_one_answer_in_phase_two_batch_is_rejected() {
    let bank = bank();
    let mut session = prepared_session(5);
    session.begin_phase_two().expect("phase 2 begins");

    match session.record_phase_two(vec![answer("p1-focus-1", 2)], &bank) {
        Err(SessionError::Validation(ValidationError::PhaseMismatch {
            expected, found, ..
        })) => {
            assert_eq!(expected, Phase::Two);
            assert_eq!(found, Phase::One);
        }
        other => panic!("expected phase mismatch, got {other:?}"),
    }
}

#[test]
fn re_answering_across_batches_is_rejected() {
    let bank = bank();
    let mut session = prepared_session(5);
    session.begin_phase_two().expect("phase 2 begins");
    session
        .record_phase_two(vec![answer("p2-focus-1", 3)], &bank)
        .expect("first batch accepted");

    match session.record_phase_two(vec![answer("p2-focus-1", 4)], &bank) {
        Err(SessionError::Validation(ValidationError::DuplicateAnswer(id))) => {
            assert_eq!(id.0, "p2-focus-1");
        }
        other => panic!("expected duplicate answer error, got {other:?}"),
    }
    assert_eq!(session.phase_two_answers().len(), 1);
}

#[test]
fn finalize_with_no_phase_two_answers_is_allowed() {
    let bank = bank();
    let mut session = prepared_session(0);
    session.begin_phase_two().expect("phase 2 begins");

    let handoff = session.finalize(&bank).expect("handoff produced");
    assert_eq!(handoff.answered.len(), 6);
    assert!(handoff
        .answered
        .iter()
        .all(|answered| answered.phase == Phase::One));
}

#[test]
fn handoff_carries_prompts_values_and_spectrum_tags() {
    let bank = bank();
    let mut session = prepared_session(5);
    session.begin_phase_two().expect("phase 2 begins");
    session
        .record_phase_two(vec![answer("p2-focus-1", 4)], &bank)
        .expect("batch accepted");

    let handoff = session.finalize(&bank).expect("handoff produced");
    let deep_dive = handoff
        .answered
        .iter()
        .find(|answered| answered.question_id.0 == "p2-focus-1")
        .expect("deep dive answer present");

    assert_eq!(deep_dive.prompt, "Prompt for p2-focus-1");
    assert_eq!(deep_dive.weight, 4);
    assert_eq!(deep_dive.value, "Altijd");
    assert_eq!(deep_dive.spectrums, vec![spectrum(FOCUS)]);
}
