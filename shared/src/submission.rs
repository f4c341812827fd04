//! # Report Submission Workflow
//!
//! Pure state machine behind the staff injury form. It owns the draft
//! being edited and exactly one [`SubmissionState`], so combinations such as
//! "showing suggestions while submitting" cannot be represented.
//!
//! The workflow never performs I/O. Callers drive it:
//!
//! 1. `request_validation` checks the draft and hands back the
//!    [`EnhancementRequest`] to send.
//! 2. `validation_succeeded` / `validation_failed` record the outcome.
//! 3. `begin_submit` hands back the [`NewInjuryReport`] to persist.
//! 4. `submit_succeeded` / `submit_failed` record that outcome.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fmt;

use crate::{EnhancementRequest, EnhancementResult, FieldEvaluation, NarrativeField, NewInjuryReport};

/// Every input on the report form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DraftField {
    Child,
    InjuryDate,
    InjuryTime,
    Location,
    SubmittingUser,
    IncidentDescription,
    InjuryDescription,
    ActionTaken,
    BiterChild,
    AggressorChild,
}

impl DraftField {
    /// Fields that must be non-empty before validation
    pub const REQUIRED: [DraftField; 8] = [
        DraftField::Child,
        DraftField::InjuryDate,
        DraftField::InjuryTime,
        DraftField::Location,
        DraftField::SubmittingUser,
        DraftField::IncidentDescription,
        DraftField::InjuryDescription,
        DraftField::ActionTaken,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Child => "Child",
            DraftField::InjuryDate => "Date",
            DraftField::InjuryTime => "Time",
            DraftField::Location => "Location",
            DraftField::SubmittingUser => "Your Name",
            DraftField::IncidentDescription => "Incident Description",
            DraftField::InjuryDescription => "Injury Description",
            DraftField::ActionTaken => "Action Taken",
            DraftField::BiterChild => "Child Who Bit",
            DraftField::AggressorChild => "Other Child Involved",
        }
    }

    pub fn narrative(&self) -> Option<NarrativeField> {
        match self {
            DraftField::IncidentDescription => Some(NarrativeField::IncidentDescription),
            DraftField::InjuryDescription => Some(NarrativeField::InjuryDescription),
            DraftField::ActionTaken => Some(NarrativeField::ActionTaken),
            _ => None,
        }
    }
}

impl From<NarrativeField> for DraftField {
    fn from(field: NarrativeField) -> Self {
        match field {
            NarrativeField::IncidentDescription => DraftField::IncidentDescription,
            NarrativeField::InjuryDescription => DraftField::InjuryDescription,
            NarrativeField::ActionTaken => DraftField::ActionTaken,
        }
    }
}

/// Why a draft cannot be sent yet
#[derive(Debug, Clone, PartialEq)]
pub enum DraftError {
    MissingBiter,
    MissingAggressor,
    /// The biter or aggressor is the injured child
    SameChild(DraftField),
    MissingFields(Vec<DraftField>),
    InvalidTimestamp(String),
}

impl fmt::Display for DraftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DraftError::MissingBiter => write!(f, "Please select the child who bit"),
            DraftError::MissingAggressor => {
                write!(f, "Please select the other child involved in peer aggression")
            }
            DraftError::SameChild(DraftField::BiterChild) => {
                write!(f, "The child who bit cannot be the injured child")
            }
            DraftError::SameChild(_) => write!(f, "The other child involved cannot be the injured child"),
            DraftError::MissingFields(_) => write!(f, "Please fill in all required fields"),
            DraftError::InvalidTimestamp(detail) => {
                write!(f, "Invalid injury date or time: {}", detail)
            }
        }
    }
}

impl std::error::Error for DraftError {}

/// The editable form contents. Empty strings mean "not chosen yet".
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub child_id: String,
    /// `YYYY-MM-DD`
    pub injury_date: String,
    /// `HH:MM`, 24 hour
    pub injury_time: String,
    pub location: String,
    pub submitting_user_id: String,
    pub incident_description: String,
    pub injury_description: String,
    pub action_taken: String,
    pub is_bite: bool,
    pub biter_child_id: String,
    pub is_peer_aggression: bool,
    pub aggressor_child_id: String,
}

impl ReportDraft {
    /// A blank draft defaulted to the given date and time
    pub fn new(injury_date: impl Into<String>, injury_time: impl Into<String>) -> Self {
        Self {
            child_id: String::new(),
            injury_date: injury_date.into(),
            injury_time: injury_time.into(),
            location: String::new(),
            submitting_user_id: String::new(),
            incident_description: String::new(),
            injury_description: String::new(),
            action_taken: String::new(),
            is_bite: false,
            biter_child_id: String::new(),
            is_peer_aggression: false,
            aggressor_child_id: String::new(),
        }
    }

    pub fn value(&self, field: DraftField) -> &str {
        match field {
            DraftField::Child => &self.child_id,
            DraftField::InjuryDate => &self.injury_date,
            DraftField::InjuryTime => &self.injury_time,
            DraftField::Location => &self.location,
            DraftField::SubmittingUser => &self.submitting_user_id,
            DraftField::IncidentDescription => &self.incident_description,
            DraftField::InjuryDescription => &self.injury_description,
            DraftField::ActionTaken => &self.action_taken,
            DraftField::BiterChild => &self.biter_child_id,
            DraftField::AggressorChild => &self.aggressor_child_id,
        }
    }

    fn value_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Child => &mut self.child_id,
            DraftField::InjuryDate => &mut self.injury_date,
            DraftField::InjuryTime => &mut self.injury_time,
            DraftField::Location => &mut self.location,
            DraftField::SubmittingUser => &mut self.submitting_user_id,
            DraftField::IncidentDescription => &mut self.incident_description,
            DraftField::InjuryDescription => &mut self.injury_description,
            DraftField::ActionTaken => &mut self.action_taken,
            DraftField::BiterChild => &mut self.biter_child_id,
            DraftField::AggressorChild => &mut self.aggressor_child_id,
        }
    }

    pub fn narrative(&self, field: NarrativeField) -> &str {
        self.value(field.into())
    }

    /// Check the draft is complete enough to send anywhere.
    ///
    /// The conditional child selections are reported before the generic
    /// missing-fields error.
    pub fn check(&self) -> Result<(), DraftError> {
        if self.is_bite && self.biter_child_id.trim().is_empty() {
            return Err(DraftError::MissingBiter);
        }
        if self.is_peer_aggression && self.aggressor_child_id.trim().is_empty() {
            return Err(DraftError::MissingAggressor);
        }
        let injured = self.child_id.trim();
        if !injured.is_empty() {
            if self.flagged_biter().is_some_and(|id| id.trim() == injured) {
                return Err(DraftError::SameChild(DraftField::BiterChild));
            }
            if self.flagged_aggressor().is_some_and(|id| id.trim() == injured) {
                return Err(DraftError::SameChild(DraftField::AggressorChild));
            }
        }

        let missing: Vec<DraftField> = DraftField::REQUIRED
            .iter()
            .copied()
            .filter(|field| self.value(*field).trim().is_empty())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(DraftError::MissingFields(missing))
        }
    }

    /// Combine the date and time inputs into a timestamp in the given offset
    pub fn injury_timestamp(&self, offset: FixedOffset) -> Result<DateTime<FixedOffset>, DraftError> {
        let date = NaiveDate::parse_from_str(self.injury_date.trim(), "%Y-%m-%d")
            .map_err(|e| DraftError::InvalidTimestamp(format!("{} ({})", self.injury_date, e)))?;
        let time = NaiveTime::parse_from_str(self.injury_time.trim(), "%H:%M")
            .map_err(|e| DraftError::InvalidTimestamp(format!("{} ({})", self.injury_time, e)))?;

        offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .ok_or_else(|| DraftError::InvalidTimestamp(format!("{} {}", self.injury_date, self.injury_time)))
    }

    fn flagged_biter(&self) -> Option<String> {
        (self.is_bite && !self.biter_child_id.trim().is_empty()).then(|| self.biter_child_id.clone())
    }

    fn flagged_aggressor(&self) -> Option<String> {
        (self.is_peer_aggression && !self.aggressor_child_id.trim().is_empty())
            .then(|| self.aggressor_child_id.clone())
    }
}

/// How one narrative field came back from the enhancement service
#[derive(Debug, Clone, PartialEq)]
pub enum FieldReview {
    /// The field now holds the improved phrasing
    Suggested { evaluation: FieldEvaluation, accepted: bool },
    /// The field was cleared; the evaluation's suggestion is guidance for a rewrite
    NeedsRewrite { evaluation: FieldEvaluation },
}

impl FieldReview {
    pub fn evaluation(&self) -> &FieldEvaluation {
        match self {
            FieldReview::Suggested { evaluation, .. } | FieldReview::NeedsRewrite { evaluation } => evaluation,
        }
    }
}

/// Display hints carried back into drafting after suggestions were shown
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftHints {
    /// Text originally typed, keyed by field
    pub previous: BTreeMap<NarrativeField, String>,
    /// Guidance shown as the placeholder of a cleared field
    pub placeholders: BTreeMap<NarrativeField, String>,
}

/// Outcome of a successful enhancement round trip
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionReview {
    pub fields: BTreeMap<NarrativeField, FieldReview>,
    pub parent_narrative: Option<String>,
    pub suggestions_offered: u32,
}

impl SuggestionReview {
    /// Insufficient fields that have not been rewritten yet
    pub fn unresolved(&self, draft: &ReportDraft) -> Vec<NarrativeField> {
        self.fields
            .iter()
            .filter(|(field, review)| {
                matches!(review, FieldReview::NeedsRewrite { .. }) && draft.narrative(**field).trim().is_empty()
            })
            .map(|(field, _)| *field)
            .collect()
    }

    pub fn accepted_count(&self) -> u32 {
        self.fields
            .values()
            .filter(|review| matches!(review, FieldReview::Suggested { accepted: true, .. }))
            .count() as u32
    }

    pub fn is_accepted(&self, field: NarrativeField) -> bool {
        matches!(self.fields.get(&field), Some(FieldReview::Suggested { accepted: true, .. }))
    }

    pub fn hints(&self) -> DraftHints {
        let mut hints = DraftHints::default();
        for (field, review) in &self.fields {
            let evaluation = review.evaluation();
            if !evaluation.original.is_empty() && evaluation.original != evaluation.suggestion {
                hints.previous.insert(*field, evaluation.original.clone());
            }
            if let FieldReview::NeedsRewrite { evaluation } = review {
                let guidance = if evaluation.suggestion.trim().is_empty() {
                    evaluation.reason.clone()
                } else {
                    evaluation.suggestion.clone()
                };
                hints.placeholders.insert(*field, guidance);
            }
        }
        hints
    }
}

/// Where the submission currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    /// Editing. Keeps the last review, if any, so cleared fields stay tracked.
    /// `bypass` is set after a failed check so the draft can still be
    /// submitted as-is without calling the service again.
    Drafting { review: Option<SuggestionReview>, bypass: bool },
    Validating,
    SuggestionsReady(SuggestionReview),
    ValidationFailed { message: String },
    /// `enhancement` is `None` when submitting as-is
    Submitting { enhancement: Option<SuggestionReview> },
    Submitted { report_id: String },
    SubmitFailed { message: String, enhancement: Option<SuggestionReview> },
}

impl Default for SubmissionState {
    fn default() -> Self {
        SubmissionState::Drafting { review: None, bypass: false }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowError {
    Draft(DraftError),
    /// A request is in flight
    Busy,
    InvalidTransition(&'static str),
    UnresolvedInsufficient(Vec<NarrativeField>),
    NotAcceptable(NarrativeField),
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowError::Draft(e) => write!(f, "{}", e),
            WorkflowError::Busy => write!(f, "Please wait for the current request to finish"),
            WorkflowError::InvalidTransition(action) => write!(f, "Cannot {} right now", action),
            WorkflowError::UnresolvedInsufficient(fields) => {
                let labels: Vec<&str> = fields.iter().map(|field| field.label()).collect();
                write!(f, "Please add more detail to: {}", labels.join(", "))
            }
            WorkflowError::NotAcceptable(field) => {
                write!(f, "There is no suggestion to accept for {}", field.label())
            }
        }
    }
}

impl std::error::Error for WorkflowError {}

impl From<DraftError> for WorkflowError {
    fn from(e: DraftError) -> Self {
        WorkflowError::Draft(e)
    }
}

/// The draft plus its single submission state
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionWorkflow {
    draft: ReportDraft,
    state: SubmissionState,
    utc_offset: FixedOffset,
}

impl SubmissionWorkflow {
    /// Start drafting with the form defaulted to `injury_date`/`injury_time`,
    /// interpreted at `utc_offset_minutes` east of UTC.
    pub fn new(injury_date: impl Into<String>, injury_time: impl Into<String>, utc_offset_minutes: i32) -> Self {
        let utc_offset = FixedOffset::east_opt(utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix());
        Self {
            draft: ReportDraft::new(injury_date, injury_time),
            state: SubmissionState::default(),
            utc_offset,
        }
    }

    pub fn draft(&self) -> &ReportDraft {
        &self.draft
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, SubmissionState::Validating | SubmissionState::Submitting { .. })
    }

    /// The review currently in force, whether shown as a panel or carried into drafting
    pub fn review(&self) -> Option<&SuggestionReview> {
        match &self.state {
            SubmissionState::SuggestionsReady(review) => Some(review),
            SubmissionState::Drafting { review, .. } => review.as_ref(),
            SubmissionState::Submitting { enhancement } | SubmissionState::SubmitFailed { enhancement, .. } => {
                enhancement.as_ref()
            }
            _ => None,
        }
    }

    pub fn hints(&self) -> DraftHints {
        self.review().map(SuggestionReview::hints).unwrap_or_default()
    }

    pub fn edit_field(&mut self, field: DraftField, value: impl Into<String>) -> Result<(), WorkflowError> {
        self.ensure_editable()?;
        let value = value.into();

        if let Some(narrative) = field.narrative() {
            if let Some(FieldReview::Suggested { evaluation, accepted }) = self.review_mut().and_then(|r| r.fields.get_mut(&narrative)) {
                if value != evaluation.suggestion {
                    *accepted = false;
                }
            }
        }

        *self.draft.value_mut(field) = value;
        self.return_to_drafting();
        Ok(())
    }

    pub fn set_is_bite(&mut self, is_bite: bool) -> Result<(), WorkflowError> {
        self.ensure_editable()?;
        self.draft.is_bite = is_bite;
        if !is_bite {
            self.draft.biter_child_id.clear();
        }
        self.return_to_drafting();
        Ok(())
    }

    pub fn set_is_peer_aggression(&mut self, is_peer_aggression: bool) -> Result<(), WorkflowError> {
        self.ensure_editable()?;
        self.draft.is_peer_aggression = is_peer_aggression;
        if !is_peer_aggression {
            self.draft.aggressor_child_id.clear();
        }
        self.return_to_drafting();
        Ok(())
    }

    /// Check the draft and move to `Validating`, returning what to send.
    ///
    /// An incomplete draft leaves the state untouched.
    pub fn request_validation(&mut self) -> Result<EnhancementRequest, WorkflowError> {
        match self.state {
            SubmissionState::Drafting { .. } | SubmissionState::ValidationFailed { .. } => {}
            SubmissionState::Validating | SubmissionState::Submitting { .. } => return Err(WorkflowError::Busy),
            _ => return Err(WorkflowError::InvalidTransition("check with the assistant")),
        }

        self.draft.check()?;
        let timestamp = self.draft.injury_timestamp(self.utc_offset)?;

        let request = EnhancementRequest {
            child_id: self.draft.child_id.clone(),
            injury_timestamp: timestamp.to_rfc3339(),
            location: self.draft.location.trim().to_string(),
            incident_description: self.draft.incident_description.clone(),
            injury_description: self.draft.injury_description.clone(),
            action_taken: self.draft.action_taken.clone(),
            is_bite: self.draft.is_bite,
            biter_child_id: self.draft.flagged_biter(),
            is_peer_aggression: self.draft.is_peer_aggression,
            aggressor_child_id: self.draft.flagged_aggressor(),
        };

        self.state = SubmissionState::Validating;
        Ok(request)
    }

    /// Apply the service's evaluations to the draft
    pub fn validation_succeeded(&mut self, result: EnhancementResult) -> Result<(), WorkflowError> {
        if self.state != SubmissionState::Validating {
            return Err(WorkflowError::InvalidTransition("apply suggestions"));
        }

        let mut fields = BTreeMap::new();
        for evaluation in result.evaluations {
            let field = evaluation.field;
            let slot = self.draft.value_mut(field.into());
            let review = if evaluation.is_insufficient() {
                slot.clear();
                FieldReview::NeedsRewrite { evaluation }
            } else {
                if !evaluation.suggestion.trim().is_empty() {
                    *slot = evaluation.suggestion.clone();
                }
                FieldReview::Suggested { evaluation, accepted: false }
            };
            fields.insert(field, review);
        }

        let suggestions_offered = fields.len() as u32;
        self.state = SubmissionState::SuggestionsReady(SuggestionReview {
            fields,
            parent_narrative: result.parent_narrative,
            suggestions_offered,
        });
        Ok(())
    }

    pub fn validation_failed(&mut self, message: impl Into<String>) -> Result<(), WorkflowError> {
        if self.state != SubmissionState::Validating {
            return Err(WorkflowError::InvalidTransition("record a validation failure"));
        }
        self.state = SubmissionState::ValidationFailed { message: message.into() };
        Ok(())
    }

    pub fn accept_suggestion(&mut self, field: NarrativeField) -> Result<(), WorkflowError> {
        if self.is_busy() {
            return Err(WorkflowError::Busy);
        }
        let review = self
            .review_mut()
            .ok_or(WorkflowError::InvalidTransition("accept a suggestion"))?;

        match review.fields.get_mut(&field) {
            Some(FieldReview::Suggested { evaluation, accepted }) => {
                *accepted = true;
                let suggestion = evaluation.suggestion.clone();
                *self.draft.value_mut(field.into()) = suggestion;
                Ok(())
            }
            _ => Err(WorkflowError::NotAcceptable(field)),
        }
    }

    /// Accept every suggestion that carries replacement text
    pub fn accept_all_suggestions(&mut self) -> Result<u32, WorkflowError> {
        let acceptable: Vec<NarrativeField> = self
            .review()
            .ok_or(WorkflowError::InvalidTransition("accept suggestions"))?
            .fields
            .iter()
            .filter(|(_, review)| matches!(review, FieldReview::Suggested { .. }))
            .map(|(field, _)| *field)
            .collect();

        for field in &acceptable {
            self.accept_suggestion(*field)?;
        }
        Ok(acceptable.len() as u32)
    }

    pub fn unresolved_fields(&self) -> Vec<NarrativeField> {
        self.review().map(|review| review.unresolved(&self.draft)).unwrap_or_default()
    }

    pub fn can_submit(&self) -> bool {
        match &self.state {
            SubmissionState::SuggestionsReady(review) | SubmissionState::Drafting { review: Some(review), .. } => {
                review.unresolved(&self.draft).is_empty()
            }
            SubmissionState::ValidationFailed { .. }
            | SubmissionState::SubmitFailed { .. }
            | SubmissionState::Drafting { review: None, bypass: true } => true,
            _ => false,
        }
    }

    /// Move to `Submitting`, returning the record to persist.
    ///
    /// From `ValidationFailed`, or a draft edited after one, this is "submit
    /// as-is": the record is marked as not AI-validated with zero suggestion
    /// counts.
    pub fn begin_submit(&mut self) -> Result<NewInjuryReport, WorkflowError> {
        let enhancement = match &self.state {
            SubmissionState::SuggestionsReady(review) | SubmissionState::Drafting { review: Some(review), .. } => {
                let unresolved = review.unresolved(&self.draft);
                if !unresolved.is_empty() {
                    return Err(WorkflowError::UnresolvedInsufficient(unresolved));
                }
                Some(review.clone())
            }
            SubmissionState::ValidationFailed { .. } | SubmissionState::Drafting { review: None, bypass: true } => None,
            SubmissionState::SubmitFailed { enhancement, .. } => enhancement.clone(),
            SubmissionState::Validating | SubmissionState::Submitting { .. } => return Err(WorkflowError::Busy),
            _ => return Err(WorkflowError::InvalidTransition("submit")),
        };

        self.draft.check()?;
        let timestamp = self.draft.injury_timestamp(self.utc_offset)?;

        let report = NewInjuryReport {
            child_id: self.draft.child_id.clone(),
            submitting_user_id: self.draft.submitting_user_id.clone(),
            injury_timestamp: timestamp.to_rfc3339(),
            location: self.draft.location.trim().to_string(),
            incident_description: self.draft.incident_description.trim().to_string(),
            injury_description: self.draft.injury_description.trim().to_string(),
            action_taken: self.draft.action_taken.trim().to_string(),
            is_bite: self.draft.is_bite,
            biter_child_id: self.draft.flagged_biter(),
            is_peer_aggression: self.draft.is_peer_aggression,
            aggressor_child_id: self.draft.flagged_aggressor(),
            parent_narrative: enhancement.as_ref().and_then(|review| review.parent_narrative.clone()),
            ai_validated: enhancement.is_some(),
            ai_suggestions_count: enhancement.as_ref().map_or(0, |review| review.suggestions_offered),
            ai_suggestions_accepted: enhancement.as_ref().map_or(0, SuggestionReview::accepted_count),
        };

        self.state = SubmissionState::Submitting { enhancement };
        Ok(report)
    }

    /// Record the saved report and start over with a fresh draft
    pub fn submit_succeeded(
        &mut self,
        report_id: impl Into<String>,
        next_date: impl Into<String>,
        next_time: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        if !matches!(self.state, SubmissionState::Submitting { .. }) {
            return Err(WorkflowError::InvalidTransition("finish submitting"));
        }
        self.draft = ReportDraft::new(next_date, next_time);
        self.state = SubmissionState::Submitted { report_id: report_id.into() };
        Ok(())
    }

    /// Keep the draft as it was so the submission can be retried
    pub fn submit_failed(&mut self, message: impl Into<String>) -> Result<(), WorkflowError> {
        match std::mem::take(&mut self.state) {
            SubmissionState::Submitting { enhancement } => {
                self.state = SubmissionState::SubmitFailed { message: message.into(), enhancement };
                Ok(())
            }
            other => {
                self.state = other;
                Err(WorkflowError::InvalidTransition("record a submit failure"))
            }
        }
    }

    pub fn reset(&mut self, injury_date: impl Into<String>, injury_time: impl Into<String>) {
        self.draft = ReportDraft::new(injury_date, injury_time);
        self.state = SubmissionState::default();
    }

    fn ensure_editable(&self) -> Result<(), WorkflowError> {
        if self.is_busy() {
            Err(WorkflowError::Busy)
        } else {
            Ok(())
        }
    }

    fn review_mut(&mut self) -> Option<&mut SuggestionReview> {
        match &mut self.state {
            SubmissionState::SuggestionsReady(review) => Some(review),
            SubmissionState::Drafting { review, .. } => review.as_mut(),
            SubmissionState::SubmitFailed { enhancement, .. } => enhancement.as_mut(),
            _ => None,
        }
    }

    fn return_to_drafting(&mut self) {
        self.state = match std::mem::take(&mut self.state) {
            SubmissionState::SuggestionsReady(review) => SubmissionState::Drafting { review: Some(review), bypass: false },
            SubmissionState::SubmitFailed { enhancement, .. } => SubmissionState::Drafting {
                bypass: enhancement.is_none(),
                review: enhancement,
            },
            SubmissionState::ValidationFailed { .. } => SubmissionState::Drafting { review: None, bypass: true },
            SubmissionState::Drafting { review, bypass } => SubmissionState::Drafting { review, bypass },
            _ => SubmissionState::default(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EvaluationStatus;

    const EASTERN_DAYLIGHT: i32 = -4 * 60;

    fn workflow() -> SubmissionWorkflow {
        SubmissionWorkflow::new("2025-04-17", "11:30", EASTERN_DAYLIGHT)
    }

    fn filled_workflow() -> SubmissionWorkflow {
        let mut wf = workflow();
        wf.edit_field(DraftField::Child, "child::ava").unwrap();
        wf.edit_field(DraftField::Location, "Playground").unwrap();
        wf.edit_field(DraftField::SubmittingUser, "user::teacher").unwrap();
        wf.edit_field(DraftField::IncidentDescription, "x").unwrap();
        wf.edit_field(DraftField::InjuryDescription, "x").unwrap();
        wf.edit_field(DraftField::ActionTaken, "x").unwrap();
        wf
    }

    fn evaluation(field: NarrativeField, suggestion: &str, status: Option<EvaluationStatus>) -> FieldEvaluation {
        FieldEvaluation {
            field,
            original: "x".to_string(),
            suggestion: suggestion.to_string(),
            status,
            reason: status.map(|s| s.as_str().to_string()).unwrap_or_else(|| "More detail helps".to_string()),
        }
    }

    fn all_sufficient() -> EnhancementResult {
        EnhancementResult {
            evaluations: vec![
                evaluation(NarrativeField::IncidentDescription, "Ava slipped on the wet slide steps.", Some(EvaluationStatus::Sufficient)),
                evaluation(NarrativeField::InjuryDescription, "A small scrape on her left knee.", None),
                evaluation(NarrativeField::ActionTaken, "We cleaned it and applied a bandage.", Some(EvaluationStatus::Sufficient)),
            ],
            parent_narrative: Some("Ava had a small tumble today.".to_string()),
        }
    }

    #[test]
    fn test_any_missing_required_field_blocks_validation() {
        let complete = filled_workflow();

        for mask in 0u32..(1 << DraftField::REQUIRED.len()) - 1 {
            let mut wf = complete.clone();
            for (i, field) in DraftField::REQUIRED.iter().enumerate() {
                if mask & (1 << i) == 0 {
                    wf.edit_field(*field, "").unwrap();
                }
            }

            let err = wf.request_validation().unwrap_err();
            assert!(matches!(err, WorkflowError::Draft(DraftError::MissingFields(_))), "mask {mask:#b}");
            assert!(matches!(wf.state(), SubmissionState::Drafting { .. }));
        }
    }

    #[test]
    fn test_missing_fields_are_listed() {
        let mut wf = filled_workflow();
        wf.edit_field(DraftField::Location, "   ").unwrap();
        wf.edit_field(DraftField::ActionTaken, "").unwrap();

        assert_eq!(
            wf.request_validation(),
            Err(WorkflowError::Draft(DraftError::MissingFields(vec![
                DraftField::Location,
                DraftField::ActionTaken
            ])))
        );
    }

    #[test]
    fn test_missing_biter_blocks_before_other_fields() {
        let mut wf = workflow();
        wf.set_is_bite(true).unwrap();
        assert_eq!(wf.request_validation(), Err(WorkflowError::Draft(DraftError::MissingBiter)));

        let mut wf = filled_workflow();
        wf.set_is_bite(true).unwrap();
        assert_eq!(wf.request_validation(), Err(WorkflowError::Draft(DraftError::MissingBiter)));
        assert_eq!(wf.state(), &SubmissionState::Drafting { review: None, bypass: false });

        let mut wf = filled_workflow();
        wf.set_is_peer_aggression(true).unwrap();
        assert_eq!(wf.request_validation(), Err(WorkflowError::Draft(DraftError::MissingAggressor)));
    }

    #[test]
    fn test_unchecking_flag_clears_selection() {
        let mut wf = filled_workflow();
        wf.set_is_bite(true).unwrap();
        wf.edit_field(DraftField::BiterChild, "child::ben").unwrap();
        wf.set_is_bite(false).unwrap();
        assert!(wf.draft().biter_child_id.is_empty());
    }

    #[test]
    fn test_request_carries_flagged_ids_and_local_timestamp() {
        let mut wf = filled_workflow();
        wf.set_is_bite(true).unwrap();
        wf.edit_field(DraftField::BiterChild, "child::ben").unwrap();

        let request = wf.request_validation().unwrap();
        assert_eq!(request.biter_child_id.as_deref(), Some("child::ben"));
        assert_eq!(request.aggressor_child_id, None);
        assert_eq!(request.injury_timestamp, "2025-04-17T11:30:00-04:00");
        assert_eq!(wf.state(), &SubmissionState::Validating);
        assert!(wf.is_busy());
        assert_eq!(wf.edit_field(DraftField::Location, "Gym"), Err(WorkflowError::Busy));
    }

    #[test]
    fn test_accept_all_round_trip() {
        let mut wf = filled_workflow();
        wf.request_validation().unwrap();
        let result = all_sufficient();
        wf.validation_succeeded(result.clone()).unwrap();

        assert_eq!(wf.accept_all_suggestions().unwrap(), 3);
        for evaluation in &result.evaluations {
            assert_eq!(wf.draft().narrative(evaluation.field), evaluation.suggestion);
            assert!(wf.review().unwrap().is_accepted(evaluation.field));
        }

        let report = wf.begin_submit().unwrap();
        assert!(report.ai_validated);
        assert_eq!(report.ai_suggestions_count, 3);
        assert_eq!(report.ai_suggestions_accepted, 3);
        assert_eq!(report.parent_narrative.as_deref(), Some("Ava had a small tumble today."));
    }

    #[test]
    fn test_insufficient_field_is_cleared_until_rewritten() {
        let mut wf = filled_workflow();
        wf.request_validation().unwrap();
        wf.validation_succeeded(EnhancementResult {
            evaluations: vec![
                evaluation(
                    NarrativeField::IncidentDescription,
                    "Describe what Ava was doing and how she got hurt.",
                    Some(EvaluationStatus::Insufficient),
                ),
                evaluation(NarrativeField::InjuryDescription, "A scrape on her knee.", Some(EvaluationStatus::Sufficient)),
                evaluation(NarrativeField::ActionTaken, "Cleaned and bandaged.", Some(EvaluationStatus::Sufficient)),
            ],
            parent_narrative: None,
        })
        .unwrap();

        assert_eq!(wf.draft().incident_description, "");
        assert_eq!(wf.draft().injury_description, "A scrape on her knee.");
        assert_eq!(wf.draft().action_taken, "Cleaned and bandaged.");
        assert!(!wf.can_submit());
        assert_eq!(
            wf.begin_submit(),
            Err(WorkflowError::UnresolvedInsufficient(vec![NarrativeField::IncidentDescription]))
        );
        assert_eq!(
            wf.accept_suggestion(NarrativeField::IncidentDescription),
            Err(WorkflowError::NotAcceptable(NarrativeField::IncidentDescription))
        );

        let hints = wf.hints();
        assert_eq!(hints.previous.get(&NarrativeField::IncidentDescription).map(String::as_str), Some("x"));
        assert_eq!(
            hints.placeholders.get(&NarrativeField::IncidentDescription).map(String::as_str),
            Some("Describe what Ava was doing and how she got hurt.")
        );

        wf.edit_field(DraftField::IncidentDescription, "Ava slipped on the slide steps").unwrap();
        assert!(matches!(wf.state(), SubmissionState::Drafting { review: Some(_), .. }));
        assert!(wf.can_submit());

        let report = wf.begin_submit().unwrap();
        assert_eq!(report.incident_description, "Ava slipped on the slide steps");
        assert_eq!(report.ai_suggestions_count, 3);
        assert_eq!(report.ai_suggestions_accepted, 0);
    }

    #[test]
    fn test_zero_suggestions_allows_submit() {
        let mut wf = filled_workflow();
        wf.request_validation().unwrap();
        wf.validation_succeeded(EnhancementResult::default()).unwrap();

        assert!(wf.can_submit());
        let report = wf.begin_submit().unwrap();
        assert!(report.ai_validated);
        assert_eq!(report.ai_suggestions_count, 0);
    }

    #[test]
    fn test_submit_as_is_after_validation_failure() {
        let mut wf = filled_workflow();
        wf.set_is_peer_aggression(true).unwrap();
        wf.edit_field(DraftField::AggressorChild, "child::cal").unwrap();
        wf.request_validation().unwrap();
        wf.validation_failed("Failed to connect to the validation service").unwrap();
        assert!(wf.can_submit());

        let report = wf.begin_submit().unwrap();
        assert!(!report.ai_validated);
        assert_eq!(report.ai_suggestions_count, 0);
        assert_eq!(report.aggressor_child_id.as_deref(), Some("child::cal"));
        assert_eq!(report.biter_child_id, None);
    }

    #[test]
    fn test_retry_after_validation_failure() {
        let mut wf = filled_workflow();
        wf.request_validation().unwrap();
        wf.validation_failed("down").unwrap();

        let retry = wf.request_validation().unwrap();
        assert_eq!(retry.child_id, "child::ava");
        assert_eq!(wf.state(), &SubmissionState::Validating);

        wf.validation_succeeded(all_sufficient()).unwrap();
        assert!(matches!(wf.state(), SubmissionState::SuggestionsReady(_)));
        assert!(wf.begin_submit().unwrap().ai_validated);
    }

    #[test]
    fn test_edit_after_validation_failure_keeps_submit_as_is() {
        let mut wf = filled_workflow();
        wf.request_validation().unwrap();
        wf.validation_failed("down").unwrap();
        wf.edit_field(DraftField::Location, "Gym").unwrap();

        assert_eq!(wf.state(), &SubmissionState::Drafting { review: None, bypass: true });
        assert!(wf.can_submit());

        let report = wf.begin_submit().unwrap();
        assert!(!report.ai_validated);
        assert_eq!(report.location, "Gym");
        assert_eq!(report.ai_suggestions_count, 0);
    }

    #[test]
    fn test_edit_after_validation_failure_can_check_again() {
        let mut wf = filled_workflow();
        wf.request_validation().unwrap();
        wf.validation_failed("down").unwrap();
        wf.edit_field(DraftField::ActionTaken, "Ice pack for ten minutes").unwrap();

        let request = wf.request_validation().unwrap();
        assert_eq!(request.action_taken, "Ice pack for ten minutes");
        wf.validation_succeeded(all_sufficient()).unwrap();
        wf.edit_field(DraftField::Location, "Gym").unwrap();
        assert!(matches!(wf.state(), SubmissionState::Drafting { review: Some(_), bypass: false }));
    }

    #[test]
    fn test_injured_child_cannot_be_biter_or_aggressor() {
        let mut wf = filled_workflow();
        wf.set_is_bite(true).unwrap();
        wf.edit_field(DraftField::BiterChild, "child::ava").unwrap();
        assert_eq!(
            wf.request_validation(),
            Err(WorkflowError::Draft(DraftError::SameChild(DraftField::BiterChild)))
        );

        wf.edit_field(DraftField::BiterChild, "child::ben").unwrap();
        wf.set_is_peer_aggression(true).unwrap();
        wf.edit_field(DraftField::AggressorChild, "child::ava").unwrap();
        assert_eq!(
            wf.request_validation(),
            Err(WorkflowError::Draft(DraftError::SameChild(DraftField::AggressorChild)))
        );

        wf.edit_field(DraftField::AggressorChild, "child::cal").unwrap();
        assert!(wf.request_validation().is_ok());
    }

    #[test]
    fn test_submit_failure_keeps_draft_and_allows_retry() {
        let mut wf = filled_workflow();
        wf.request_validation().unwrap();
        wf.validation_succeeded(all_sufficient()).unwrap();
        wf.accept_suggestion(NarrativeField::ActionTaken).unwrap();
        let first = wf.begin_submit().unwrap();
        wf.submit_failed("database is locked").unwrap();

        assert!(matches!(wf.state(), SubmissionState::SubmitFailed { .. }));
        let retry = wf.begin_submit().unwrap();
        assert_eq!(first, retry);

        wf.submit_succeeded("report::1", "2025-04-18", "09:00").unwrap();
        assert_eq!(wf.state(), &SubmissionState::Submitted { report_id: "report::1".to_string() });
        assert_eq!(wf.draft(), &ReportDraft::new("2025-04-18", "09:00"));
    }

    #[test]
    fn test_typing_over_accepted_suggestion_unaccepts_it() {
        let mut wf = filled_workflow();
        wf.request_validation().unwrap();
        wf.validation_succeeded(all_sufficient()).unwrap();
        wf.accept_suggestion(NarrativeField::InjuryDescription).unwrap();
        wf.edit_field(DraftField::InjuryDescription, "Scraped knee, no bleeding").unwrap();

        assert!(!wf.review().unwrap().is_accepted(NarrativeField::InjuryDescription));
        assert_eq!(wf.begin_submit().unwrap().ai_suggestions_accepted, 0);
    }

    #[test]
    fn test_out_of_order_transitions_are_rejected() {
        let mut wf = filled_workflow();
        assert!(wf.begin_submit().is_err());
        assert!(wf.validation_succeeded(EnhancementResult::default()).is_err());
        assert!(wf.submit_failed("nope").is_err());
        assert_eq!(wf.state(), &SubmissionState::Drafting { review: None, bypass: false });
    }

    #[test]
    fn test_invalid_time_is_reported() {
        let mut wf = filled_workflow();
        wf.edit_field(DraftField::InjuryTime, "25:99").unwrap();
        assert!(matches!(
            wf.request_validation(),
            Err(WorkflowError::Draft(DraftError::InvalidTimestamp(_)))
        ));
    }
}
