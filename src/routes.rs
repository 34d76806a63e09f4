use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::Engine;
use bytes::Bytes;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    generator::{build_user_context, ContentGenerator, GenerateError, GenerationReport},
    models::{GeneratePlanRequest, PersonalizedContent, UserProfile},
    pdf::{self, RenderError},
    plans::PlanType,
    science::{annotate, science_for, AnnotatedRemedy, CategoryScience, RemedyRecord},
};

pub const FALLBACK_SECTIONS_HEADER: &str = "x-fallback-sections";

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ContentGenerator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/plans/pdf", post(plan_pdf))
        .route("/api/plans/pdf/base64", post(plan_pdf_base64))
        .route("/api/plans/content", post(plan_content))
        .route("/api/science/annotate", post(annotate_remedies))
        .route("/api/science/:category", get(category_science))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")] BadRequest(String),
    #[error(transparent)] Generate(#[from] GenerateError),
    #[error(transparent)] Render(#[from] RenderError),
    #[error("render task failed: {0}")] Task(#[from] tokio::task::JoinError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::BadRequest(_) | ApiError::Generate(_) => StatusCode::BAD_REQUEST,
            ApiError::Render(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("❌ Request failed: {}", self);
        } else {
            tracing::warn!("⚠️ Rejected request: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "service": env!("CARGO_PKG_NAME"), "version": env!("CARGO_PKG_VERSION") }))
}

struct BuiltPlan {
    filename: String,
    bytes: Vec<u8>,
    fallback_sections: usize,
}

async fn build_plan(state: &AppState, body: GeneratePlanRequest) -> Result<BuiltPlan, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("plan", %request_id, plan = %body.plan_type);
    async move {
        tracing::info!("🚀 Building {} plan for {}", body.plan_type, body.user_profile.display_name());
        let (content, report) = if PlanType::parse(&body.plan_type).is_some() {
            state
                .generator
                .generate_with_report(&body.plan_type, &body.user_profile, &body.questionnaire_answers)
                .await?
        } else {
            // The generic welcome page draws no section text.
            build_user_context(&body.user_profile, &body.questionnaire_answers)?;
            tracing::info!("📄 Unknown plan type {:?}, skipping generation", body.plan_type);
            (PersonalizedContent::default(), GenerationReport::default())
        };

        let filename = pdf_filename(&body.plan_type, &body.user_profile);
        let GeneratePlanRequest { plan_type, user_profile, .. } = body;
        let bytes = tokio::task::spawn_blocking(move || pdf::render(&plan_type, &user_profile, &content)).await??;

        tracing::info!("✅ {} ready ({} bytes, {} fallback sections)", filename, bytes.len(), report.fallback_count());
        Ok(BuiltPlan { filename, bytes, fallback_sections: report.fallback_count() })
    }
    .instrument(span)
    .await
}

pub async fn plan_pdf(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePlanRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload?;
    let plan = build_plan(&state, body).await?;
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", plan.filename)),
        (HeaderName::from_static(FALLBACK_SECTIONS_HEADER), plan.fallback_sections.to_string()),
    ];
    Ok((StatusCode::OK, headers, Bytes::from(plan.bytes)).into_response())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfBase64Response {
    pub filename: String,
    pub pdf_base64: String,
    pub fallback_sections: usize,
}

pub async fn plan_pdf_base64(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePlanRequest>, JsonRejection>,
) -> Result<Json<PdfBase64Response>, ApiError> {
    let Json(body) = payload?;
    let plan = build_plan(&state, body).await?;
    Ok(Json(PdfBase64Response {
        filename: plan.filename,
        pdf_base64: base64::engine::general_purpose::STANDARD.encode(&plan.bytes),
        fallback_sections: plan.fallback_sections,
    }))
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: PersonalizedContent,
    pub report: GenerationReport,
}

pub async fn plan_content(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePlanRequest>, JsonRejection>,
) -> Result<Json<ContentResponse>, ApiError> {
    let Json(body) = payload?;
    tracing::info!("📝 Previewing {} plan content for {}", body.plan_type, body.user_profile.display_name());
    let (content, report) = state
        .generator
        .generate_with_report(&body.plan_type, &body.user_profile, &body.questionnaire_answers)
        .await?;
    Ok(Json(ContentResponse { content, report }))
}

pub async fn category_science(Path(category): Path<String>) -> Json<&'static CategoryScience> {
    Json(science_for(&category))
}

pub async fn annotate_remedies(
    payload: Result<Json<Vec<RemedyRecord>>, JsonRejection>,
) -> Result<Json<Vec<AnnotatedRemedy>>, ApiError> {
    let Json(records) = payload?;
    tracing::info!("🔬 Annotating {} remedies", records.len());
    Ok(Json(annotate(records)))
}

/// `plantrx-{type}-plan-{name}.pdf` with both parts reduced to lowercase
/// ASCII slugs.
pub fn pdf_filename(plan_type: &str, profile: &UserProfile) -> String {
    let plan = slug(plan_type);
    let name = slug(profile.display_name());
    format!(
        "plantrx-{}-plan-{}.pdf",
        if plan.is_empty() { "custom" } else { &plan },
        if name.is_empty() { "friend" } else { &name },
    )
}

fn slug(text: &str) -> String {
    let mut out = String::new();
    for c in text.trim().chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_end_matches('-').to_string()
}
