//! HTTP routes for the VeriCore API service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use veri_engine::heuristic::{classify_with, RiskIndicator};
use veri_engine::history::DayBucket;
use veri_engine::lexicon::Lexicon;
use veri_engine::types::{
    AggregateStats, AnalysisRequest, AnalysisResult, DomainContext, HistorySummary,
};

use crate::ApiState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub mode: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistorySummary>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct HeatmapResponse {
    pub days: Vec<DayBucket>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    #[serde(alias = "answerText")]
    pub text: String,
    #[serde(alias = "contextType")]
    pub context: Option<DomainContext>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub indicator: RiskIndicator,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error wrapper mapping engine errors onto HTTP responses.
pub struct ApiError(veri_common::Error);

impl From<veri_common::Error> for ApiError {
    fn from(err: veri_common::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Health check endpoint
pub async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online".to_string(),
        service: "veri-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: state.engine.oracle_mode().to_string(),
    })
}

/// Analyze AI-generated content for trust and compliance risks
pub async fn analyze(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let result = state.engine.analyze(request).await?;
    Ok(Json(result))
}

/// Live heuristic classification, no oracle call
pub async fn classify(
    Json(request): Json<ClassifyRequest>,
) -> Json<ClassifyResponse> {
    let indicator = match request.context {
        Some(context) => classify_with(&Lexicon::for_context(context), &request.text),
        None => veri_engine::heuristic::classify(&request.text),
    };
    Json(ClassifyResponse { indicator })
}

/// Aggregate statistics snapshot
pub async fn get_stats(State(state): State<Arc<ApiState>>) -> Json<AggregateStats> {
    Json(state.engine.stats().await)
}

/// Recent analysis history summaries, most recent first
pub async fn get_history(State(state): State<Arc<ApiState>>) -> Json<HistoryResponse> {
    let history = state.engine.history_summaries().await;
    let count = history.len();
    Json(HistoryResponse { history, count })
}

/// Full result of one retained analysis
pub async fn get_history_detail(
    State(state): State<Arc<ApiState>>,
    Path(index): Path<usize>,
) -> Result<Json<AnalysisResult>, ApiError> {
    state
        .engine
        .history_detail(index)
        .await
        .map(Json)
        .ok_or_else(|| veri_common::Error::NotFound(format!("history entry {index}")).into())
}

/// Rendered plain-text report of one retained analysis
pub async fn get_history_report(
    State(state): State<Arc<ApiState>>,
    Path(index): Path<usize>,
) -> Result<String, ApiError> {
    state
        .engine
        .history_report(index)
        .await
        .ok_or_else(|| veri_common::Error::NotFound(format!("history entry {index}")).into())
}

/// Day-bucketed activity heatmap over the trailing window
pub async fn get_heatmap(State(state): State<Arc<ApiState>>) -> Json<HeatmapResponse> {
    Json(HeatmapResponse {
        days: state.engine.activity_heatmap().await,
    })
}
