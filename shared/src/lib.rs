use serde::{Deserialize, Serialize};
use std::fmt;

pub mod submission;

pub use submission::*;

/// A child enrolled at the centre. Reference data for selection lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub name: String,
    pub created_at: String, // RFC 3339 timestamp
    pub updated_at: String, // RFC 3339 timestamp
}

/// Request for creating a new child
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateChildRequest {
    pub name: String,
}

/// Response after creating a child
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChildResponse {
    pub child: Child,
    pub success_message: String,
}

/// Response containing a list of children
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChildListResponse {
    pub children: Vec<Child>,
}

/// Staff role. Only used for attribution and for filtering selection lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "Teacher")]
    Teacher,
    #[serde(rename = "Front Desk")]
    FrontDesk,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Teacher => "Teacher",
            UserRole::FrontDesk => "Front Desk",
        }
    }

    /// Parse the stored role string
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Teacher" => Some(UserRole::Teacher),
            "Front Desk" => Some(UserRole::FrontDesk),
            _ => None,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A staff member. There is no authentication: users pick themselves from a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: String,
}

/// Request for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateUserRequest {
    pub name: String,
    pub role: UserRole,
}

/// Response after creating a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub user: User,
    pub success_message: String,
}

/// Response containing a list of users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

/// A persisted injury ("boo-boo") report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryReport {
    pub id: String,
    pub child_id: String,
    pub submitting_user_id: String,
    /// When the injury happened (RFC 3339, with the reporter's local offset)
    pub injury_timestamp: String,
    pub location: String,
    pub incident_description: String,
    pub injury_description: String,
    pub action_taken: String,
    pub is_bite: bool,
    pub biter_child_id: Option<String>,
    pub is_peer_aggression: bool,
    pub aggressor_child_id: Option<String>,
    pub is_reviewed: bool,
    pub reviewed_by_user_id: Option<String>,
    pub reviewed_timestamp: Option<String>,
    pub is_delivered_to_parent: bool,
    pub delivered_by_user_id: Option<String>,
    pub delivered_timestamp: Option<String>,
    /// AI-generated summary intended for parents
    pub parent_narrative: Option<String>,
    /// Cached parent memo
    pub memo_content: Option<String>,
    pub ai_validated: bool,
    pub ai_suggestions_count: u32,
    pub ai_suggestions_accepted: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl Child {
    /// Generate a child ID
    pub fn generate_id() -> String {
        format!("child::{}", uuid::Uuid::new_v4())
    }
}

impl User {
    /// Generate a user ID
    pub fn generate_id() -> String {
        format!("user::{}", uuid::Uuid::new_v4())
    }
}

impl InjuryReport {
    /// Generate a report ID
    pub fn generate_id() -> String {
        format!("report::{}", uuid::Uuid::new_v4())
    }
}

/// Request for inserting a new injury report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInjuryReport {
    pub child_id: String,
    pub submitting_user_id: String,
    pub injury_timestamp: String,
    pub location: String,
    pub incident_description: String,
    pub injury_description: String,
    pub action_taken: String,
    pub is_bite: bool,
    pub biter_child_id: Option<String>,
    pub is_peer_aggression: bool,
    pub aggressor_child_id: Option<String>,
    pub parent_narrative: Option<String>,
    pub ai_validated: bool,
    pub ai_suggestions_count: u32,
    pub ai_suggestions_accepted: u32,
}

/// A report joined with the display names of everyone it references
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryReportDetails {
    #[serde(flatten)]
    pub report: InjuryReport,
    pub child_name: Option<String>,
    pub submitter_name: Option<String>,
    pub reviewer_name: Option<String>,
    pub deliverer_name: Option<String>,
    pub biter_name: Option<String>,
    pub aggressor_name: Option<String>,
}

impl InjuryReportDetails {
    pub fn child_display_name(&self) -> &str {
        self.child_name.as_deref().unwrap_or("Name not retrieved")
    }

    pub fn submitter_display_name(&self) -> &str {
        self.submitter_name.as_deref().unwrap_or("Name not retrieved")
    }

    pub fn reviewer_display_name(&self) -> &str {
        self.reviewer_name.as_deref().unwrap_or("Not yet reviewed")
    }

    pub fn deliverer_display_name(&self) -> &str {
        self.deliverer_name.as_deref().unwrap_or("Not yet delivered")
    }
}

/// Response containing a list of joined reports
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InjuryReportListResponse {
    pub reports: Vec<InjuryReportDetails>,
}

/// Response after inserting a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InjuryReportResponse {
    pub report: InjuryReport,
    pub success_message: String,
}

/// Body for the review and delivery endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkReportRequest {
    pub user_id: String,
}

/// One of the three free-text narrative fields the enhancement service evaluates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrativeField {
    IncidentDescription,
    InjuryDescription,
    ActionTaken,
}

impl NarrativeField {
    pub const ALL: [NarrativeField; 3] = [
        NarrativeField::IncidentDescription,
        NarrativeField::InjuryDescription,
        NarrativeField::ActionTaken,
    ];

    /// Wire name used by the webhook and the database columns
    pub fn api_name(&self) -> &'static str {
        match self {
            NarrativeField::IncidentDescription => "incident_description",
            NarrativeField::InjuryDescription => "injury_description",
            NarrativeField::ActionTaken => "action_taken",
        }
    }

    /// Accepts both the snake_case wire name and the camelCase form name
    pub fn from_api_name(name: &str) -> Option<Self> {
        match name.trim() {
            "incident_description" | "incidentDescription" => Some(NarrativeField::IncidentDescription),
            "injury_description" | "injuryDescription" => Some(NarrativeField::InjuryDescription),
            "action_taken" | "actionTaken" => Some(NarrativeField::ActionTaken),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NarrativeField::IncidentDescription => "Incident Description",
            NarrativeField::InjuryDescription => "Injury Description",
            NarrativeField::ActionTaken => "Action Taken",
        }
    }
}

/// Verdict the enhancement service gives a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
    Sufficient,
    Insufficient,
}

impl EvaluationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationStatus::Sufficient => "sufficient",
            EvaluationStatus::Insufficient => "insufficient",
        }
    }
}

/// Normalized per-field suggestion, whichever response shape produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEvaluation {
    pub field: NarrativeField,
    pub original: String,
    /// Improved phrasing when sufficient, guidance text when insufficient
    pub suggestion: String,
    /// `None` for the legacy shape, which only carries a free-text reason
    pub status: Option<EvaluationStatus>,
    pub reason: String,
}

impl FieldEvaluation {
    pub fn is_insufficient(&self) -> bool {
        self.status == Some(EvaluationStatus::Insufficient)
    }
}

/// Fields sent to the backend for AI-assisted review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementRequest {
    pub child_id: String,
    pub injury_timestamp: String,
    pub location: String,
    pub incident_description: String,
    pub injury_description: String,
    pub action_taken: String,
    pub is_bite: bool,
    pub biter_child_id: Option<String>,
    pub is_peer_aggression: bool,
    pub aggressor_child_id: Option<String>,
}

/// Normalized result of one enhancement round trip
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnhancementResult {
    pub evaluations: Vec<FieldEvaluation>,
    /// `None` means "not yet generated", not an error
    pub parent_narrative: Option<String>,
}

/// Parent memo for a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoResponse {
    pub report_id: String,
    pub memo_content: String,
    /// True when served from the copy stored on the report
    pub cached: bool,
}

/// Actions front-desk staff can take on a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrontDeskAction {
    MarkReviewed,
    MarkDelivered,
}

impl FrontDeskAction {
    /// Actions the UI offers for a report in its current state.
    ///
    /// Review is only offered once, so at most one reviewer is recorded through
    /// the normal flow. Delivery is only offered after review; the data layer
    /// itself does not enforce that ordering.
    pub fn available_for(report: &InjuryReport) -> Vec<FrontDeskAction> {
        if !report.is_reviewed {
            vec![FrontDeskAction::MarkReviewed]
        } else if !report.is_delivered_to_parent {
            vec![FrontDeskAction::MarkDelivered]
        } else {
            Vec::new()
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FrontDeskAction::MarkReviewed => "Mark as Reviewed?",
            FrontDeskAction::MarkDelivered => "Mark as Delivered?",
        }
    }

    pub fn confirm_label(&self) -> &'static str {
        match self {
            FrontDeskAction::MarkReviewed => "Yes, Mark as Reviewed",
            FrontDeskAction::MarkDelivered => "Yes, Mark as Delivered",
        }
    }
}

/// Report status as shown in the front-desk table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    PendingReview,
    Reviewed,
    Delivered,
}

impl ReportStatus {
    pub fn of(report: &InjuryReport) -> Self {
        if report.is_delivered_to_parent {
            ReportStatus::Delivered
        } else if report.is_reviewed {
            ReportStatus::Reviewed
        } else {
            ReportStatus::PendingReview
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::PendingReview => "Pending Review",
            ReportStatus::Reviewed => "Reviewed",
            ReportStatus::Delivered => "Delivered",
        }
    }
}
