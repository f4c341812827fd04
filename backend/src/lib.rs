//! # Boo-boo report backend
//!
//! Everything that is not UI: configuration, persistence, the report
//! workflow and the AI webhook round trips, exposed over a JSON REST API.
//!
//! ```text
//! IO Layer (REST handlers)
//!     ↓
//! Domain Layer (services, webhook client)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::{ChildService, EnhancementService, InjuryReportService, MemoService, UserService};
use crate::io::rest::{child_apis, enhancement_apis, logging_apis, memo_apis, report_apis, user_apis};
use crate::storage::{ChildRepository, DbConnection, InjuryReportRepository, UserRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub child_service: ChildService,
    pub user_service: UserService,
    pub report_service: InjuryReportService,
    pub enhancement_service: EnhancementService,
    pub memo_service: MemoService,
}

impl AppState {
    /// Wire every service onto one database connection
    pub fn new(db: DbConnection, config: &AppConfig) -> Self {
        let children = Arc::new(ChildRepository::new(db.clone()));
        let users = Arc::new(UserRepository::new(db.clone()));
        let reports = Arc::new(InjuryReportRepository::new(db));

        Self {
            child_service: ChildService::new(children.clone()),
            user_service: UserService::new(users.clone()),
            report_service: InjuryReportService::new(reports.clone(), children.clone(), users),
            enhancement_service: EnhancementService::new(config.webhooks.clone(), children),
            memo_service: MemoService::new(config.webhooks.clone(), reports),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    if config.webhooks.mock_ai {
        warn!("MOCK_AI is on; AI webhooks will not be called");
    } else if config.webhooks.enhancement_url.is_none() || config.webhooks.memo_url.is_none() {
        warn!("A webhook URL is missing; the matching AI feature will report a connection failure");
    }

    info!("Setting up application state");
    Ok(AppState::new(db, config))
}

fn cors_layer(frontend_origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    match frontend_origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(_) => {
            warn!("FRONTEND_ORIGIN {:?} is not a valid header value, allowing any origin", frontend_origin);
            cors.allow_origin(Any)
        }
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Router {
    let api_routes = Router::new()
        .route("/children", get(child_apis::list_children).post(child_apis::create_child))
        .route("/users", get(user_apis::list_users).post(user_apis::create_user))
        .route("/reports", get(report_apis::list_reports).post(report_apis::create_report))
        .route("/reports/enhance", post(enhancement_apis::enhance_report))
        .route("/reports/:id", get(report_apis::get_report))
        .route("/reports/:id/review", post(report_apis::mark_reviewed))
        .route("/reports/:id/deliver", post(report_apis::mark_delivered))
        .route("/reports/:id/memo", get(memo_apis::get_memo))
        .route("/logs", post(logging_apis::log_message));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors_layer(&config.frontend_origin))
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WebhookConfig;
    use crate::storage::repositories::test_support::{seed, AVA_ID, BEN_ID, DESK_ID, TEACHER_ID};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use shared::{EnhancementResult, InjuryReportDetails, InjuryReportListResponse, MemoResponse, UserListResponse};
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = DbConnection::init_test().await.unwrap();
        seed(&db).await;
        let config = AppConfig {
            webhooks: WebhookConfig { mock_ai: true, ..WebhookConfig::default() },
            ..AppConfig::default()
        };
        create_router(AppState::new(db, &config), &config)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn report_body() -> Value {
        json!({
            "child_id": AVA_ID,
            "submitting_user_id": TEACHER_ID,
            "injury_timestamp": "2025-04-17T11:30:00-04:00",
            "location": "Playground",
            "incident_description": "Ava was bitten on the arm during block play",
            "injury_description": "Red mark on forearm",
            "action_taken": "Washed and applied ice",
            "is_bite": true,
            "biter_child_id": BEN_ID,
            "is_peer_aggression": false,
            "aggressor_child_id": null,
            "parent_narrative": null,
            "ai_validated": false,
            "ai_suggestions_count": 0,
            "ai_suggestions_accepted": 0
        })
    }

    #[tokio::test]
    async fn test_users_filtered_by_role() {
        let app = test_router().await;

        let (status, body) = send(&app, "GET", "/api/users?role=Front%20Desk", None).await;
        assert_eq!(status, StatusCode::OK);
        let users: UserListResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(users.users.len(), 1);
        assert_eq!(users.users[0].id, DESK_ID);

        let (status, _) = send(&app, "GET", "/api/users?role=Janitor", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_report_lifecycle_over_http() {
        let app = test_router().await;

        let (status, body) = send(&app, "POST", "/api/reports", Some(report_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        let created: Value = serde_json::from_slice(&body).unwrap();
        let id = created["report"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, "GET", "/api/reports?only_unreviewed=true", None).await;
        assert_eq!(status, StatusCode::OK);
        let list: InjuryReportListResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(list.reports.len(), 1);
        assert_eq!(list.reports[0].biter_name.as_deref(), Some("Ben Smith"));

        let review = json!({ "user_id": DESK_ID });
        let (status, body) = send(&app, "POST", &format!("/api/reports/{}/review", id), Some(review)).await;
        assert_eq!(status, StatusCode::OK);
        let reviewed: InjuryReportDetails = serde_json::from_slice(&body).unwrap();
        assert!(reviewed.report.is_reviewed);

        let (_, body) = send(&app, "GET", "/api/reports?only_unreviewed=true", None).await;
        let list: InjuryReportListResponse = serde_json::from_slice(&body).unwrap();
        assert!(list.reports.is_empty());

        let (status, body) = send(&app, "GET", &format!("/api/reports/{}/memo", id), None).await;
        assert_eq!(status, StatusCode::OK);
        let memo: MemoResponse = serde_json::from_slice(&body).unwrap();
        assert!(!memo.cached);

        let (_, body) = send(&app, "GET", &format!("/api/reports/{}/memo", id), None).await;
        let memo: MemoResponse = serde_json::from_slice(&body).unwrap();
        assert!(memo.cached);
    }

    #[tokio::test]
    async fn test_invalid_report_and_unknown_ids() {
        let app = test_router().await;

        let mut body = report_body();
        body["biter_child_id"] = Value::Null;
        let (status, message) = send(&app, "POST", "/api/reports", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(String::from_utf8(message).unwrap(), "Please select the child who bit");

        let (status, _) = send(&app, "GET", "/api/reports/report::ghost", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/api/reports/report::ghost/memo", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let review = json!({ "user_id": DESK_ID });
        let (status, _) = send(&app, "POST", "/api/reports/report::ghost/review", Some(review)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_enhance_with_mock_ai() {
        let app = test_router().await;
        let request = json!({
            "child_id": AVA_ID,
            "injury_timestamp": "2025-04-17T11:30:00-04:00",
            "location": "Playground",
            "incident_description": "fell",
            "injury_description": "scrape",
            "action_taken": "bandage",
            "is_bite": false,
            "biter_child_id": null,
            "is_peer_aggression": false,
            "aggressor_child_id": null
        });

        let (status, body) = send(&app, "POST", "/api/reports/enhance", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        let result: EnhancementResult = serde_json::from_slice(&body).unwrap();
        assert_eq!(result.evaluations.len(), 3);
        assert!(result.parent_narrative.is_some());
    }

    #[tokio::test]
    async fn test_enhance_failure_is_bad_gateway() {
        let db = DbConnection::init_test().await.unwrap();
        seed(&db).await;
        let config = AppConfig::default();
        let app = create_router(AppState::new(db, &config), &config);

        let request = json!({
            "child_id": AVA_ID,
            "injury_timestamp": "2025-04-17T11:30:00-04:00",
            "location": "Playground",
            "incident_description": "fell",
            "injury_description": "scrape",
            "action_taken": "bandage",
            "is_bite": false,
            "is_peer_aggression": false
        });
        let (status, body) = send(&app, "POST", "/api/reports/enhance", Some(request)).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            String::from_utf8(body).unwrap(),
            "Failed to connect to the validation service. Please try again or submit as is."
        );
    }

    #[tokio::test]
    async fn test_frontend_logs_are_accepted() {
        let app = test_router().await;
        let body = json!({ "level": "warn", "message": "validation retried", "component": "teacher_form" });

        let (status, body) = send(&app, "POST", "/api/logs", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap(), json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_cors_allows_only_get_and_post() {
        let app = test_router().await;
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/reports")
            .header("origin", "http://localhost:8080")
            .header("access-control-request-method", "DELETE")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let allowed = response
            .headers()
            .get("access-control-allow-methods")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(allowed.contains("GET") && allowed.contains("POST"), "got {allowed:?}");
        assert!(!allowed.contains("PUT") && !allowed.contains("DELETE"), "got {allowed:?}");
    }
}
