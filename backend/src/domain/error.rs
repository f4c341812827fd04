use std::time::Duration;

use super::enhancement::normalize::DecodeError;

/// Failures of report operations, mapped to HTTP status codes by the REST layer
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Failures talking to one of the AI webhooks
#[derive(Debug, thiserror::Error)]
pub enum EnhancementError {
    #[error("no webhook URL is configured")]
    NotConfigured,

    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook did not answer within {0:?}")]
    Timeout(Duration),

    #[error("webhook answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("the AI service reported an error: {0}")]
    Service(String),

    #[error(transparent)]
    Decode(DecodeError),
}

impl EnhancementError {
    /// Message shown to staff. Details stay in the server log.
    pub fn user_message(&self) -> String {
        match self {
            EnhancementError::Service(message) => message.clone(),
            EnhancementError::Decode(e) => e.to_string(),
            _ => "Failed to connect to the validation service. Please try again or submit as is.".to_string(),
        }
    }
}

impl From<DecodeError> for EnhancementError {
    fn from(e: DecodeError) -> Self {
        match e {
            DecodeError::ServiceReported(message) => EnhancementError::Service(message),
            other => EnhancementError::Decode(other),
        }
    }
}

/// Failures producing a parent memo
#[derive(Debug, thiserror::Error)]
pub enum MemoError {
    #[error("report {0} not found")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Storage(#[from] anyhow::Error),

    #[error(transparent)]
    Webhook(#[from] EnhancementError),
}

impl MemoError {
    pub const USER_MESSAGE: &'static str = "Failed to generate the memo. Please try again.";
}
