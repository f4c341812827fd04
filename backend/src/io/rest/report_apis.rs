//! # REST API for injury reports
//!
//! Intake from the staff injury form plus the front-desk review and delivery steps.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::domain::ReportError;
use crate::AppState;
use shared::{MarkReportRequest, NewInjuryReport};

#[derive(Debug, Default, Deserialize)]
pub struct ReportListQuery {
    #[serde(default)]
    pub only_unreviewed: bool,
}

fn report_error_response(action: &str, e: ReportError) -> Response {
    match &e {
        ReportError::Validation(message) => {
            warn!("Rejected {}: {}", action, message);
            (StatusCode::BAD_REQUEST, message.clone()).into_response()
        }
        ReportError::NotFound(_) => {
            warn!("Failed to {}: {}", action, e);
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        ReportError::Storage(_) => {
            error!("Failed to {}: {}", action, e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Error trying to {}", action)).into_response()
        }
    }
}

/// List reports with display names, most recent injury first
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportListQuery>,
) -> impl IntoResponse {
    info!("GET /api/reports - only_unreviewed: {}", query.only_unreviewed);

    match state.report_service.list_reports(query.only_unreviewed).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => report_error_response("list reports", e),
    }
}

/// Get one report with display names
pub async fn get_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/reports/{}", report_id);

    match state.report_service.get_report(&report_id).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(e) => report_error_response("get report", e),
    }
}

/// Insert a submitted report
pub async fn create_report(
    State(state): State<AppState>,
    Json(request): Json<NewInjuryReport>,
) -> impl IntoResponse {
    info!("POST /api/reports - child: {}", request.child_id);

    match state.report_service.create_report(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => report_error_response("create report", e),
    }
}

pub async fn mark_reviewed(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Json(request): Json<MarkReportRequest>,
) -> impl IntoResponse {
    info!("POST /api/reports/{}/review - user: {}", report_id, request.user_id);

    match state.report_service.mark_reviewed(&report_id, &request.user_id).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(e) => report_error_response("mark report reviewed", e),
    }
}

pub async fn mark_delivered(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
    Json(request): Json<MarkReportRequest>,
) -> impl IntoResponse {
    info!("POST /api/reports/{}/deliver - user: {}", report_id, request.user_id);

    match state.report_service.mark_delivered(&report_id, &request.user_id).await {
        Ok(details) => (StatusCode::OK, Json(details)).into_response(),
        Err(e) => report_error_response("mark report delivered", e),
    }
}
