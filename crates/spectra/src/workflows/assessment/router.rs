use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{Answer, SessionId};
use super::repository::{ReportSink, RepositoryError, SessionRepository};
use super::service::{ScreeningService, ScreeningServiceError};
use super::session::SessionError;

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerBatch {
    pub(crate) answers: Vec<Answer>,
}

/// Router builder exposing HTTP endpoints for the assessment lifecycle.
pub fn assessment_router<R, S>(service: Arc<ScreeningService<R, S>>) -> Router
where
    R: SessionRepository + 'static,
    S: ReportSink + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(start_handler::<R, S>))
        .route(
            "/api/v1/assessments/:session_id",
            get(status_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:session_id/phase-one",
            post(phase_one_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:session_id/plan",
            post(plan_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:session_id/phase-two",
            post(begin_phase_two_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:session_id/phase-two/answers",
            post(phase_two_answers_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:session_id/finalize",
            post(finalize_handler::<R, S>),
        )
        .with_state(service)
}

pub(crate) async fn start_handler<R, S>(
    State(service): State<Arc<ScreeningService<R, S>>>,
) -> Response
where
    R: SessionRepository + 'static,
    S: ReportSink + 'static,
{
    match service.start() {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, S>(
    State(service): State<Arc<ScreeningService<R, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    S: ReportSink + 'static,
{
    match service.get(&SessionId(session_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn phase_one_handler<R, S>(
    State(service): State<Arc<ScreeningService<R, S>>>,
    Path(session_id): Path<String>,
    axum::Json(batch): axum::Json<AnswerBatch>,
) -> Response
where
    R: SessionRepository + 'static,
    S: ReportSink + 'static,
{
    match service.submit_phase_one(&SessionId(session_id), batch.answers) {
        Ok(scores) => (StatusCode::OK, axum::Json(json!({ "scores": scores }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn plan_handler<R, S>(
    State(service): State<Arc<ScreeningService<R, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    S: ReportSink + 'static,
{
    match service.prepare_phase_two(&SessionId(session_id)) {
        Ok(plan) => (StatusCode::OK, axum::Json(plan)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn begin_phase_two_handler<R, S>(
    State(service): State<Arc<ScreeningService<R, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    S: ReportSink + 'static,
{
    let session_id = SessionId(session_id);
    match service.begin_phase_two(&session_id) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({ "session_id": session_id.0, "state": "awaiting_phase_two" })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn phase_two_answers_handler<R, S>(
    State(service): State<Arc<ScreeningService<R, S>>>,
    Path(session_id): Path<String>,
    axum::Json(batch): axum::Json<AnswerBatch>,
) -> Response
where
    R: SessionRepository + 'static,
    S: ReportSink + 'static,
{
    match service.record_phase_two(&SessionId(session_id), batch.answers) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn finalize_handler<R, S>(
    State(service): State<Arc<ScreeningService<R, S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    S: ReportSink + 'static,
{
    match service.finalize(&SessionId(session_id)) {
        Ok(handoff) => (StatusCode::OK, axum::Json(handoff)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScreeningServiceError) -> Response {
    let status = match &error {
        ScreeningServiceError::Session(SessionError::Validation(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ScreeningServiceError::Session(SessionError::State(_)) => StatusCode::CONFLICT,
        ScreeningServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ScreeningServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ScreeningServiceError::Repository(RepositoryError::Unavailable(_))
        | ScreeningServiceError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
