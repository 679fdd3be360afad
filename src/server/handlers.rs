//! HTTP request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use super::routes::json_body_limit;
use super::AppState;
use crate::analyze::analyze_with_provider;
use crate::error::AnalyzerError;
use crate::output::{AnalysisResult, ErrorBody};
use crate::pipeline::upload::AnalyzeRequest;

/// An [`AnalyzerError`] rendered as the JSON error envelope.
pub struct ApiError(pub AnalyzerError);

impl From<AnalyzerError> for ApiError {
    fn from(e: AnalyzerError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AnalyzerError::RequestTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            e if e.is_validation() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Error in analyze-content: {}", self.0);
        }

        let body = ErrorBody {
            error: self.0.to_string(),
            details: self.0.details(),
        };
        (status, Json(body)).into_response()
    }
}

/// POST /analyze-content
pub async fn analyze_content(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    // A missing credential is reported even for an undecodable body.
    state.config.resolve_api_key()?;

    let Json(request) = payload.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AnalyzerError::RequestTooLarge {
                limit: json_body_limit(state.config.max_upload_bytes),
            }
        } else {
            AnalyzerError::InvalidRequest(e.body_text())
        }
    })?;

    let result = analyze_with_provider(state.provider.as_ref(), &request, &state.config).await?;
    Ok(Json(result))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "provider": state.provider.name(),
        "model": state.config.model,
        "configured": state.config.resolve_api_key().is_ok(),
    }))
}
