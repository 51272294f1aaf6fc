//! Axum route handlers for the stateless Report API.

use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::report::ingest::ingest_model_output;
use crate::report::{normalize_report, AnalysisView, RawReport};

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub model_output: String,
    #[serde(default)]
    pub pages_detected: u32,
    #[serde(default)]
    pub raw_text: String,
}

/// POST /api/v1/reports/normalize
///
/// Normalizes a report of any generation. A report without `ai_feedback` is the
/// "no result" state and answers 404 `NO_RESULT`.
pub async fn handle_normalize(
    Json(report): Json<RawReport>,
) -> Result<Json<AnalysisView>, AppError> {
    normalize_report(report)
        .map(Json)
        .ok_or(AppError::NoResult)
}

/// POST /api/v1/reports/ingest
///
/// Repairs raw scoring-model output and normalizes it. Output that cannot be
/// repaired still produces a view, built from the fixed failure report.
pub async fn handle_ingest(
    Json(request): Json<IngestRequest>,
) -> Result<Json<AnalysisView>, AppError> {
    if request.model_output.trim().is_empty() {
        return Err(AppError::Validation("model_output cannot be empty".to_string()));
    }
    let report = ingest_model_output(
        &request.model_output,
        request.pages_detected,
        request.raw_text,
    );
    normalize_report(report)
        .map(Json)
        .ok_or(AppError::NoResult)
}
