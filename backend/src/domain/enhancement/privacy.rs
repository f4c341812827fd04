//! What leaves the building. Payload types sent to the AI webhooks carry no
//! field for the other child's identity, and a note asks the service not to
//! name them.

use chrono::DateTime;
use serde::Serialize;
use shared::{EnhancementRequest, InjuryReportDetails};

pub const BITE_NOTE: &str =
    " (Note: This incident involved a bite, but please do not mention the other child by name in any communications.)";
pub const PEER_AGGRESSION_NOTE: &str =
    " (Note: This incident involved another child, but please do not mention the other child by name in any communications.)";

/// Append one privacy note per flag that is set
pub fn with_privacy_notes(incident_description: &str, is_bite: bool, is_peer_aggression: bool) -> String {
    let mut text = incident_description.to_string();
    if is_bite {
        text.push_str(BITE_NOTE);
    }
    if is_peer_aggression {
        text.push_str(PEER_AGGRESSION_NOTE);
    }
    text
}

/// Wall-clock time of the injury in the offset it was recorded with,
/// labelled with that offset, e.g. `2025-04-17 11:30 AM UTC-04:00`
pub fn format_local_time(injury_timestamp: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(injury_timestamp)
        .ok()
        .map(|ts| ts.format("%Y-%m-%d %I:%M %p UTC%:z").to_string())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Body posted to the enhancement webhook
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnhancementPayload {
    pub incident_description: String,
    pub injury_description: String,
    pub action_taken: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injury_time_eastern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl EnhancementPayload {
    pub fn from_request(request: &EnhancementRequest, child_name: Option<String>) -> Self {
        Self {
            incident_description: with_privacy_notes(
                &request.incident_description,
                request.is_bite,
                request.is_peer_aggression,
            ),
            injury_description: request.injury_description.clone(),
            action_taken: request.action_taken.clone(),
            child_name,
            injury_time_eastern: format_local_time(&request.injury_timestamp),
            location: non_empty(&request.location),
        }
    }
}

/// Body posted to the memo webhook
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoPayload {
    pub report_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub injury_time_eastern: Option<String>,
    pub location: String,
    pub incident_description: String,
    pub injury_description: String,
    pub action_taken: String,
    pub is_bite: bool,
    pub is_peer_aggression: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_narrative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
}

impl MemoPayload {
    pub fn from_details(details: &InjuryReportDetails) -> Self {
        let report = &details.report;
        Self {
            report_id: report.id.clone(),
            child_name: details.child_name.clone(),
            injury_time_eastern: format_local_time(&report.injury_timestamp),
            location: report.location.clone(),
            incident_description: with_privacy_notes(
                &report.incident_description,
                report.is_bite,
                report.is_peer_aggression,
            ),
            injury_description: report.injury_description.clone(),
            action_taken: report.action_taken.clone(),
            is_bite: report.is_bite,
            is_peer_aggression: report.is_peer_aggression,
            parent_narrative: report.parent_narrative.clone(),
            submitted_by: details.submitter_name.clone(),
        }
    }
}
