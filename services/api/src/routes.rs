use crate::infra::AppState;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use esg_survey::error::AppError;
use esg_survey::narrative::AnalysisResult;
use esg_survey::survey::scoring::{self, CategoryProfile, DashboardSummary};
use esg_survey::survey::{
    AnswerStore, AssessmentSession, Category, DashboardSession, PayloadAnswer, Participant,
    Question, QuestionId,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;

pub(crate) const PASSCODE_HEADER: &str = "x-admin-passcode";

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionRequest {
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) department: String,
    pub(crate) answers: BTreeMap<QuestionId, PayloadAnswer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswersRequest {
    #[serde(default)]
    pub(crate) answers: BTreeMap<QuestionId, PayloadAnswer>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CategoryCount {
    pub(crate) category: Category,
    pub(crate) label: &'static str,
    pub(crate) questions: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionsResponse {
    pub(crate) total: usize,
    pub(crate) categories: Vec<CategoryCount>,
    pub(crate) questions: Vec<Question>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) delivered: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProfileResponse {
    pub(crate) answered: usize,
    pub(crate) total: usize,
    pub(crate) profile: CategoryProfile,
}

#[derive(Debug, Serialize)]
pub(crate) struct DashboardResponse {
    pub(crate) fetched_at: Option<DateTime<Utc>>,
    pub(crate) degraded: bool,
    #[serde(flatten)]
    pub(crate) summary: DashboardSummary,
}

pub(crate) fn survey_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/survey/questions", get(questions_endpoint))
        .route("/api/v1/survey/submissions", post(submission_endpoint))
        .route("/api/v1/survey/profile", post(profile_endpoint))
        .route("/api/v1/survey/analysis", post(analysis_endpoint))
        .route("/api/v1/admin/dashboard", get(dashboard_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
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

pub(crate) async fn questions_endpoint(
    Extension(state): Extension<AppState>,
) -> Json<QuestionsResponse> {
    let catalog = state.catalog();
    let categories = Category::ordered()
        .into_iter()
        .map(|category| CategoryCount {
            category,
            label: category.label(),
            questions: catalog.count_for(category),
        })
        .collect();

    Json(QuestionsResponse {
        total: catalog.len(),
        categories,
        questions: catalog.questions().to_vec(),
    })
}

pub(crate) async fn submission_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<SubmissionRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let participant = Participant::new(&request.name, &request.department)?;
    let session = AssessmentSession::from_answers(
        participant,
        state.catalog().clone(),
        request.answers,
    )?;
    let delivered = state.survey.submit(session).await?;
    Ok((StatusCode::ACCEPTED, Json(SubmissionResponse { delivered })))
}

pub(crate) async fn profile_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<AnswersRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let catalog = state.catalog();
    let store = AnswerStore::from_payload(catalog, request.answers)?;
    Ok(Json(ProfileResponse {
        answered: store.answered_count(),
        total: catalog.len(),
        profile: scoring::category_profile(&store),
    }))
}

pub(crate) async fn analysis_endpoint(
    Extension(state): Extension<AppState>,
    Json(request): Json<AnswersRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    let store = AnswerStore::from_payload(state.catalog(), request.answers)?;
    Ok(Json(state.narrative.generate(&store).await))
}

pub(crate) async fn dashboard_endpoint(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, AppError> {
    let attempt = headers
        .get(PASSCODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let mut session =
        DashboardSession::open(&state.admin, attempt, state.gateway(), state.catalog().clone())?;
    session.refresh().await;

    Ok(Json(DashboardResponse {
        fetched_at: session.fetched_at(),
        degraded: session.is_degraded(),
        summary: session.summary(),
    }))
}
