//! # REST API for AI narrative review

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::{error, info};

use crate::AppState;
use shared::EnhancementRequest;

/// Send the draft's narratives for review.
///
/// Any webhook failure is a 502 whose body is the message staff should see.
pub async fn enhance_report(
    State(state): State<AppState>,
    Json(request): Json<EnhancementRequest>,
) -> impl IntoResponse {
    info!("POST /api/reports/enhance - child: {}", request.child_id);

    match state.enhancement_service.enhance(&request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => {
            error!("Enhancement failed: {}", e);
            (StatusCode::BAD_GATEWAY, e.user_message()).into_response()
        }
    }
}
