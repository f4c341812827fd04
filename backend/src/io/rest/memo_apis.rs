//! # REST API for parent memos

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info, warn};

use crate::domain::MemoError;
use crate::AppState;

pub async fn get_memo(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/reports/{}/memo", report_id);

    match state.memo_service.get_or_generate(&report_id).await {
        Ok(memo) => (StatusCode::OK, Json(memo)).into_response(),
        Err(MemoError::NotFound(id)) => {
            warn!("Memo requested for unknown report {}", id);
            (StatusCode::NOT_FOUND, "Report not found").into_response()
        }
        Err(e @ MemoError::Storage(_)) => {
            error!("Failed to load memo for {}: {}", report_id, e);
            (StatusCode::INTERNAL_SERVER_ERROR, MemoError::USER_MESSAGE).into_response()
        }
        Err(e) => {
            error!("Failed to generate memo for {}: {}", report_id, e);
            (StatusCode::BAD_GATEWAY, MemoError::USER_MESSAGE).into_response()
        }
    }
}
