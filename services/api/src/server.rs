use crate::cli::ServeArgs;
use crate::infra::{
    builtin_question_bank, default_screening_config, AppState, InMemoryReportSink,
    InMemorySessionRepository,
};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use spectra::config::AppConfig;
use spectra::error::AppError;
use spectra::telemetry;
use spectra::workflows::assessment::ScreeningService;
use spectra::workflows::bank::QuestionBankImporter;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let bank = match &config.assessment.bank_csv {
        Some(path) => {
            info!(path = %path.display(), "loading question bank from CSV export");
            QuestionBankImporter::from_path(path)?
        }
        None => builtin_question_bank(),
    };

    let repository = Arc::new(InMemorySessionRepository::default());
    let reports = Arc::new(InMemoryReportSink::default());
    let screening_config = default_screening_config(config.assessment.phase_two_cap);
    let screening_service = Arc::new(ScreeningService::new(
        Arc::new(bank),
        screening_config,
        repository,
        reports,
    ));

    let app = with_assessment_routes(screening_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "adaptive screening service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
