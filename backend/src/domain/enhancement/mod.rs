//! AI-assisted review of report narratives.
//!
//! [`EnhancementService`] resolves the child's name, strips anything that
//! identifies another child, posts the result to the enhancement webhook
//! and normalizes whatever comes back.

pub mod mock;
pub mod normalize;
pub mod privacy;

use std::sync::Arc;

use serde::Serialize;
use shared::{EnhancementRequest, EnhancementResult, NarrativeField};
use tracing::{error, info, warn};

use crate::config::WebhookConfig;
use crate::domain::error::EnhancementError;
use crate::storage::ChildStorage;

use privacy::EnhancementPayload;

/// Posts JSON to a webhook with a bounded timeout and returns the raw reply body
#[derive(Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
    timeout: std::time::Duration,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, timeout: config.timeout }
    }

    pub async fn post_json<T: Serialize + ?Sized>(&self, url: Option<&str>, payload: &T) -> Result<String, EnhancementError> {
        let url = url.ok_or(EnhancementError::NotConfigured)?;

        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            return Err(EnhancementError::Status { status: status.as_u16(), body });
        }

        Ok(body)
    }

    fn classify(&self, e: reqwest::Error) -> EnhancementError {
        if e.is_timeout() {
            EnhancementError::Timeout(self.timeout)
        } else {
            EnhancementError::Transport(e)
        }
    }
}

/// Service for the narrative enhancement round trip
#[derive(Clone)]
pub struct EnhancementService {
    webhook: WebhookClient,
    config: WebhookConfig,
    children: Arc<dyn ChildStorage>,
}

impl EnhancementService {
    pub fn new(config: WebhookConfig, children: Arc<dyn ChildStorage>) -> Self {
        Self {
            webhook: WebhookClient::new(&config),
            config,
            children,
        }
    }

    pub async fn enhance(&self, request: &EnhancementRequest) -> Result<EnhancementResult, EnhancementError> {
        info!(
            child_id = %request.child_id,
            is_bite = request.is_bite,
            is_peer_aggression = request.is_peer_aggression,
            "Requesting narrative enhancement"
        );

        let child_name = match self.children.get_child(&request.child_id).await {
            Ok(child) => child.map(|c| c.name),
            Err(e) => {
                warn!("Could not resolve child name for {}: {}", request.child_id, e);
                None
            }
        };

        if self.config.mock_ai {
            warn!("MOCK_AI is on, answering the enhancement request locally");
            return Ok(mock::enhancement(request, child_name.as_deref()));
        }

        let payload = EnhancementPayload::from_request(request, child_name);
        let body = self
            .webhook
            .post_json(self.config.enhancement_url.as_deref(), &payload)
            .await
            .map_err(|e| {
                error!("Enhancement webhook failed: {}", e);
                e
            })?;

        let mut result = normalize::decode_enhancement(&body).map_err(|e| {
            error!("Could not decode enhancement response: {} (body: {})", e, body);
            EnhancementError::from(e)
        })?;

        // Some shapes leave out the original text
        for evaluation in &mut result.evaluations {
            if evaluation.original.is_empty() {
                evaluation.original = original_text(request, evaluation.field).to_string();
            }
        }

        info!(
            evaluations = result.evaluations.len(),
            has_narrative = result.parent_narrative.is_some(),
            "Enhancement complete"
        );
        Ok(result)
    }
}

fn original_text(request: &EnhancementRequest, field: NarrativeField) -> &str {
    match field {
        NarrativeField::IncidentDescription => &request.incident_description,
        NarrativeField::InjuryDescription => &request.injury_description,
        NarrativeField::ActionTaken => &request.action_taken,
    }
}
