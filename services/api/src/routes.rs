use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

use spectra::error::AppError;
use spectra::workflows::assessment::{
    assessment_router, Phase, QuestionBank, ReportSink, ScreeningService, SessionRepository,
};
use spectra::workflows::bank::QuestionBankImporter;

#[derive(Debug, Deserialize)]
pub(crate) struct BankReportRequest {
    pub(crate) bank_csv: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct BankReportResponse {
    pub(crate) questions: usize,
    pub(crate) phase_one: usize,
    pub(crate) phase_two: usize,
    pub(crate) weight_min: u8,
    pub(crate) weight_max: u8,
    pub(crate) spectrums: Vec<SpectrumSummary>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SpectrumSummary {
    pub(crate) spectrum: String,
    pub(crate) phase_one: usize,
    pub(crate) phase_two: usize,
}

pub(crate) fn with_assessment_routes<R, S>(service: Arc<ScreeningService<R, S>>) -> axum::Router
where
    R: SessionRepository + 'static,
    S: ReportSink + 'static,
{
    assessment_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/bank/report", axum::routing::post(bank_report_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn bank_report_endpoint(
    Json(payload): Json<BankReportRequest>,
) -> Result<Json<BankReportResponse>, AppError> {
    let reader = Cursor::new(payload.bank_csv.into_bytes());
    let bank = QuestionBankImporter::from_reader(reader)?;
    Ok(Json(summarize_bank(&bank)))
}

pub(crate) fn summarize_bank(bank: &QuestionBank) -> BankReportResponse {
    let (weight_min, weight_max) = bank.weight_bounds();
    let mut spectrums: Vec<SpectrumSummary> = Vec::new();

    for question in bank.questions() {
        for key in &question.spectrums {
            let entry = match spectrums.iter_mut().find(|entry| entry.spectrum == key.0) {
                Some(entry) => entry,
                None => {
                    spectrums.push(SpectrumSummary {
                        spectrum: key.0.clone(),
                        phase_one: 0,
                        phase_two: 0,
                    });
                    spectrums.last_mut().expect("just pushed")
                }
            };
            match question.phase {
                Phase::One => entry.phase_one += 1,
                Phase::Two => entry.phase_two += 1,
            }
        }
    }

    BankReportResponse {
        questions: bank.len(),
        phase_one: bank.phase_questions(Phase::One).count(),
        phase_two: bank.phase_questions(Phase::Two).count(),
        weight_min,
        weight_max,
        spectrums,
    }
}
