use gloo::net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::{
    ChildListResponse, EnhancementRequest, EnhancementResult, InjuryReportDetails, InjuryReportListResponse,
    InjuryReportResponse, MarkReportRequest, MemoResponse, NewInjuryReport, UserListResponse, UserRole,
};

/// Backend address used while the page comes from the `trunk serve` dev server
pub const API_BASE_URL: &str = "http://localhost:3000";
const DEV_SERVER_ORIGIN: &str = "http://localhost:8080";

/// Pick the backend base URL for a page loaded from `origin`.
///
/// When the backend serves the built frontend itself, API calls go back to
/// the same origin.
pub fn resolve_base_url(origin: Option<&str>) -> String {
    match origin.map(|o| o.trim_end_matches('/')) {
        Some(origin) if !origin.is_empty() && origin != "null" && origin != DEV_SERVER_ORIGIN => origin.to_string(),
        _ => API_BASE_URL.to_string(),
    }
}

/// Base URL for the page currently loaded in the browser
pub fn api_base_url() -> String {
    let origin = web_sys::window().and_then(|window| window.location().origin().ok());
    resolve_base_url(origin.as_deref())
}

/// API client for communicating with the backend server
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient {
    /// Create a new API client pointed at the backend for this page
    pub fn new() -> Self {
        Self {
            base_url: api_base_url(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    /// Parse a success body, or surface the server's plain-text error message
    async fn read<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, String> {
        if response.ok() {
            response
                .json::<T>()
                .await
                .map_err(|e| format!("Failed to parse {}: {}", what, e))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            if error_text.trim().is_empty() {
                Err(format!("Request failed with status {}", response.status()))
            } else {
                Err(error_text)
            }
        }
    }

    pub async fn list_children(&self) -> Result<ChildListResponse, String> {
        let response = Request::get(&self.url("/children"))
            .send()
            .await
            .map_err(|e| format!("Failed to fetch children: {}", e))?;
        Self::read(response, "children").await
    }

    /// Users holding `role`, or everyone
    pub async fn list_users(&self, role: Option<UserRole>) -> Result<UserListResponse, String> {
        let query = role
            .map(|r| format!("?role={}", r.as_str().replace(' ', "%20")))
            .unwrap_or_default();
        let response = Request::get(&self.url(&format!("/users{}", query)))
            .send()
            .await
            .map_err(|e| format!("Failed to fetch users: {}", e))?;
        Self::read(response, "users").await
    }

    pub async fn list_reports(&self, only_unreviewed: bool) -> Result<InjuryReportListResponse, String> {
        let response = Request::get(&self.url(&format!("/reports?only_unreviewed={}", only_unreviewed)))
            .send()
            .await
            .map_err(|e| format!("Failed to fetch reports: {}", e))?;
        Self::read(response, "reports").await
    }

    pub async fn get_report(&self, report_id: &str) -> Result<InjuryReportDetails, String> {
        let response = Request::get(&self.url(&format!("/reports/{}", report_id)))
            .send()
            .await
            .map_err(|e| format!("Failed to fetch report: {}", e))?;
        Self::read(response, "report").await
    }

    pub async fn create_report(&self, request: &NewInjuryReport) -> Result<InjuryReportResponse, String> {
        let response = Request::post(&self.url("/reports"))
            .json(request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        Self::read(response, "response").await
    }

    /// Ask the AI assistant to review the draft's narratives
    pub async fn enhance_report(&self, request: &EnhancementRequest) -> Result<EnhancementResult, String> {
        let response = Request::post(&self.url("/reports/enhance"))
            .json(request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
            .map_err(|_| "Failed to connect to the validation service. Please try again or submit as is.".to_string())?;
        Self::read(response, "suggestions").await
    }

    pub async fn mark_reviewed(&self, report_id: &str, user_id: &str) -> Result<InjuryReportDetails, String> {
        self.mark(report_id, "review", user_id).await
    }

    pub async fn mark_delivered(&self, report_id: &str, user_id: &str) -> Result<InjuryReportDetails, String> {
        self.mark(report_id, "deliver", user_id).await
    }

    async fn mark(&self, report_id: &str, action: &str, user_id: &str) -> Result<InjuryReportDetails, String> {
        let request = MarkReportRequest { user_id: user_id.to_string() };
        let response = Request::post(&self.url(&format!("/reports/{}/{}", report_id, action)))
            .json(&request)
            .map_err(|e| format!("Failed to serialize request: {}", e))?
            .send()
            .await
            .map_err(|e| format!("Network error: {}", e))?;
        Self::read(response, "report").await
    }

    pub async fn get_memo(&self, report_id: &str) -> Result<MemoResponse, String> {
        let response = Request::get(&self.url(&format!("/reports/{}/memo", report_id)))
            .send()
            .await
            .map_err(|_| "Failed to generate the memo. Please try again.".to_string())?;
        Self::read(response, "memo").await
    }
}
