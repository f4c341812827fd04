//! # Frontend log forwarding
//!
//! The browser has no access to the server log, so the frontend posts its
//! notable events here and they land in the same tracing output.

use axum::{extract::Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub level: String,
    pub message: String,
    pub component: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub success: bool,
}

pub async fn log_message(Json(request): Json<LogRequest>) -> Result<Json<LogResponse>, StatusCode> {
    let component = request.component.as_deref().unwrap_or("frontend");

    match request.level.to_lowercase().as_str() {
        "debug" => debug!(target: "frontend", "[{}] {}", component, request.message),
        "warn" | "warning" => warn!(target: "frontend", "[{}] {}", component, request.message),
        "error" => error!(target: "frontend", "[{}] {}", component, request.message),
        _ => info!(target: "frontend", "[{}] {}", component, request.message),
    }

    Ok(Json(LogResponse { success: true }))
}
