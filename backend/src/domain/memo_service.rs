use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::WebhookConfig;
use crate::domain::enhancement::privacy::MemoPayload;
use crate::domain::enhancement::{mock, normalize, WebhookClient};
use crate::domain::error::{EnhancementError, MemoError};
use crate::storage::InjuryReportStorage;
use shared::MemoResponse;

/// Produces the parent-facing memo for a report, generating it at most once
#[derive(Clone)]
pub struct MemoService {
    reports: Arc<dyn InjuryReportStorage>,
    webhook: WebhookClient,
    config: WebhookConfig,
}

impl MemoService {
    pub fn new(config: WebhookConfig, reports: Arc<dyn InjuryReportStorage>) -> Self {
        Self {
            reports,
            webhook: WebhookClient::new(&config),
            config,
        }
    }

    /// Return the stored memo, or generate and store one on first request
    pub async fn get_or_generate(&self, report_id: &str) -> Result<MemoResponse, MemoError> {
        let details = self
            .reports
            .get_report(report_id)
            .await?
            .ok_or_else(|| MemoError::NotFound(report_id.to_string()))?;

        if let Some(memo) = details.report.memo_content.as_ref().filter(|m| !m.trim().is_empty()) {
            info!("Serving stored memo for report {}", report_id);
            return Ok(MemoResponse {
                report_id: report_id.to_string(),
                memo_content: memo.clone(),
                cached: true,
            });
        }

        let payload = MemoPayload::from_details(&details);
        let memo = if self.config.mock_ai {
            warn!("MOCK_AI is on, writing the memo locally");
            mock::memo(&payload)
        } else {
            let body = self
                .webhook
                .post_json(self.config.memo_url.as_deref(), &payload)
                .await
                .map_err(|e| {
                    error!("Memo webhook failed for report {}: {}", report_id, e);
                    e
                })?;
            normalize::decode_memo(&body).map_err(|e| {
                error!("Could not decode memo response: {} (body: {})", e, body);
                EnhancementError::from(e)
            })?
        };

        let now = Utc::now().to_rfc3339();
        if !self.reports.store_memo(report_id, &memo, &now).await? {
            return Err(MemoError::NotFound(report_id.to_string()));
        }

        info!("Generated memo for report {}", report_id);

        Ok(MemoResponse {
            report_id: report_id.to_string(),
            memo_content: memo,
            cached: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::enhancement::test_support::{spawn_stub, StubReply};
    use crate::storage::repositories::test_support::{report, seed};
    use crate::storage::{DbConnection, InjuryReportRepository};
    use axum::http::StatusCode;
    use serde_json::json;
    use std::time::Duration;

    async fn setup_test(memo_url: Option<String>, mock_ai: bool) -> (MemoService, Arc<InjuryReportRepository>) {
        let db = DbConnection::init_test().await.unwrap();
        seed(&db).await;
        let reports = Arc::new(InjuryReportRepository::new(db));
        reports
            .store_report(&report("report::1", "2025-04-17T11:30:00-04:00"))
            .await
            .unwrap();

        let config = WebhookConfig {
            enhancement_url: None,
            memo_url,
            timeout: Duration::from_secs(5),
            mock_ai,
        };
        (MemoService::new(config, reports.clone()), reports)
    }

    #[tokio::test]
    async fn test_memo_is_generated_once() {
        let stub = spawn_stub(StubReply::Body(
            StatusCode::OK,
            json!([{ "output": json!({ "memo_content": "Dear family, ..." }).to_string() }]).to_string(),
        ))
        .await;
        let (service, reports) = setup_test(Some(stub.url.clone()), false).await;

        let first = service.get_or_generate("report::1").await.unwrap();
        assert_eq!(first.memo_content, "Dear family, ...");
        assert!(!first.cached);

        let second = service.get_or_generate("report::1").await.unwrap();
        assert_eq!(second.memo_content, "Dear family, ...");
        assert!(second.cached);

        assert_eq!(stub.received.lock().unwrap().len(), 1);
        assert_eq!(stub.received.lock().unwrap()[0]["child_name"], "Ava Jones");

        let stored = reports.get_report("report::1").await.unwrap().unwrap();
        assert_eq!(stored.report.memo_content.as_deref(), Some("Dear family, ..."));
    }

    #[tokio::test]
    async fn test_plain_text_reply_is_the_memo() {
        let stub = spawn_stub(StubReply::Body(StatusCode::OK, "Dear Parent, all is well.".to_string())).await;
        let (service, _) = setup_test(Some(stub.url.clone()), false).await;

        let memo = service.get_or_generate("report::1").await.unwrap();
        assert_eq!(memo.memo_content, "Dear Parent, all is well.");
    }

    #[tokio::test]
    async fn test_failed_webhook_stores_nothing() {
        let stub = spawn_stub(StubReply::Body(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string())).await;
        let (service, reports) = setup_test(Some(stub.url.clone()), false).await;

        let err = service.get_or_generate("report::1").await.unwrap_err();
        assert!(matches!(err, MemoError::Webhook(EnhancementError::Status { status: 500, .. })));

        let stored = reports.get_report("report::1").await.unwrap().unwrap();
        assert_eq!(stored.report.memo_content, None);
    }

    #[tokio::test]
    async fn test_unknown_report_and_mock_mode() {
        let (service, _) = setup_test(None, true).await;

        assert!(matches!(
            service.get_or_generate("report::ghost").await,
            Err(MemoError::NotFound(_))
        ));

        let memo = service.get_or_generate("report::1").await.unwrap();
        assert!(memo.memo_content.starts_with("Dear Parent/Guardian,"));
        assert!(!memo.cached);
    }
}
