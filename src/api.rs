use crate::analysis::{missing_terms, relevant_terms_per_category, TermCount};
use crate::document::{normalize_text, ScoredDocument, Source};
use crate::engine::{RankOutcome, RankRequest, ResumeRanker, Submission};
use crate::error::RankError;
use crate::loader::{self, CategoryFilter};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared, read-only server state
pub struct AppState {
    pub ranker: ResumeRanker,
    pub corpus_path: PathBuf,
}

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct RankResumeRequest {
    /// "all" or a comma-separated list
    pub categories: String,
    pub job_description: String,
    pub resume_text: String,
    #[serde(default)]
    pub resume_id: Option<String>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankResumeResponse {
    pub resumes: Vec<ScoredDocument>,
    pub total: usize,
    pub uploaded_resume_rank: Option<usize>,
    pub uploaded_resume_score: Option<f64>,
    pub missing_terms: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TermsRequest {
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    fn error_msg(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Error Handling ==========

struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<RankError>() {
            Some(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Some(RankError::Config(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = format!("{:#}", self.0);
        if status.is_server_error() {
            tracing::error!("API error: {}", message);
        } else {
            tracing::warn!("Rejected request: {}", message);
        }

        (status, Json(ApiResponse::<()>::error_msg(message))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// ========== Handlers ==========

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

async fn rank_resume(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RankResumeRequest>,
) -> Result<Response, AppError> {
    let categories: CategoryFilter = req.categories.parse()?;
    tracing::info!("Categories selected: {}", categories);

    let mut submission = Submission::new(req.resume_text);
    if let Some(id) = req.resume_id {
        submission = submission.with_id(id);
    }
    let uploaded_text = submission.text.clone();

    let request = RankRequest::new(req.job_description.clone())
        .with_categories(categories)
        .submit(submission);

    let ranking = match state.ranker.rank_csv_path(&state.corpus_path, request)? {
        RankOutcome::Ranked(ranking) => ranking,
        RankOutcome::NoDocuments => {
            return Ok(Json(ApiResponse::<()>::error_msg(
                "No resumes found for the specified categories.".to_string(),
            ))
            .into_response())
        }
    };

    let top_n = req.top_n.unwrap_or(state.ranker.config().top_n);
    let response = RankResumeResponse {
        resumes: ranking.top(top_n).to_vec(),
        total: ranking.ranked.len(),
        uploaded_resume_rank: ranking.focus.map(|p| p.rank),
        uploaded_resume_score: ranking.focus.map(|p| p.score),
        missing_terms: missing_terms(
            &req.job_description,
            &normalize_text(&uploaded_text),
            state.ranker.scorer().tokenizer(),
        ),
    };

    Ok(Json(ApiResponse::success(response)).into_response())
}

async fn relevant_terms(
    State(state): State<Arc<AppState>>,
    Query(req): Query<TermsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let categories: CategoryFilter = match req.categories.as_deref() {
        Some(raw) => raw.parse()?,
        None => state.ranker.config().categories.clone(),
    };
    let top_n = req.top_n.unwrap_or(state.ranker.config().top_n);

    let documents = loader::load_documents_from_path(&state.corpus_path, &categories, Source::Corpus)?;
    let terms: BTreeMap<String, Vec<TermCount>> =
        relevant_terms_per_category(&documents, state.ranker.scorer().tokenizer(), top_n);

    Ok(Json(ApiResponse::success(terms)))
}

// ========== Router ==========

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/rank", post(rank_resume))
        .route("/terms", get(relevant_terms))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
