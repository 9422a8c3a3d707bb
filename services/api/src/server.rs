use crate::cli::ServeArgs;
use crate::infra::{AppState, SurveyComponents};
use crate::routes::survey_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use esg_survey::config::AppConfig;
use esg_survey::error::AppError;
use esg_survey::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let components = SurveyComponents::from_config(&config)?;
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let narrative_enabled = components.narrative.is_enabled();
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        survey: components.survey,
        narrative: components.narrative,
        admin: components.admin,
    };

    let app = survey_routes()
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        narrative_enabled,
        "esg survey service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
