//! Injury report persistence rules and the front-desk review/delivery steps.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::error::ReportError;
use crate::storage::{ChildStorage, InjuryReportStorage, UserStorage};
use shared::{InjuryReport, InjuryReportDetails, InjuryReportListResponse, InjuryReportResponse, NewInjuryReport};

#[derive(Clone)]
pub struct InjuryReportService {
    reports: Arc<dyn InjuryReportStorage>,
    children: Arc<dyn ChildStorage>,
    users: Arc<dyn UserStorage>,
}

impl InjuryReportService {
    pub fn new(
        reports: Arc<dyn InjuryReportStorage>,
        children: Arc<dyn ChildStorage>,
        users: Arc<dyn UserStorage>,
    ) -> Self {
        Self { reports, children, users }
    }

    /// Validate and insert a new report, initially unreviewed and undelivered
    pub async fn create_report(&self, request: NewInjuryReport) -> Result<InjuryReportResponse, ReportError> {
        info!(
            child_id = %request.child_id,
            submitting_user_id = %request.submitting_user_id,
            ai_validated = request.ai_validated,
            "Creating injury report"
        );

        validate_new_report(&request)?;

        if self.children.get_child(&request.child_id).await?.is_none() {
            return Err(ReportError::Validation(format!("Unknown child: {}", request.child_id)));
        }
        if self.users.get_user(&request.submitting_user_id).await?.is_none() {
            return Err(ReportError::Validation(format!("Unknown user: {}", request.submitting_user_id)));
        }
        let biter_child_id = request.biter_child_id.filter(|_| request.is_bite);
        let aggressor_child_id = request.aggressor_child_id.filter(|_| request.is_peer_aggression);
        for other in biter_child_id.iter().chain(aggressor_child_id.iter()) {
            if self.children.get_child(other).await?.is_none() {
                return Err(ReportError::Validation(format!("Unknown child: {}", other)));
            }
        }

        let now = Utc::now().to_rfc3339();
        let report = InjuryReport {
            id: InjuryReport::generate_id(),
            child_id: request.child_id,
            submitting_user_id: request.submitting_user_id,
            injury_timestamp: request.injury_timestamp,
            location: request.location.trim().to_string(),
            incident_description: request.incident_description.trim().to_string(),
            injury_description: request.injury_description.trim().to_string(),
            action_taken: request.action_taken.trim().to_string(),
            is_bite: request.is_bite,
            biter_child_id,
            is_peer_aggression: request.is_peer_aggression,
            aggressor_child_id,
            is_reviewed: false,
            reviewed_by_user_id: None,
            reviewed_timestamp: None,
            is_delivered_to_parent: false,
            delivered_by_user_id: None,
            delivered_timestamp: None,
            parent_narrative: request.parent_narrative.filter(|n| !n.trim().is_empty()),
            memo_content: None,
            ai_validated: request.ai_validated,
            ai_suggestions_count: request.ai_suggestions_count,
            ai_suggestions_accepted: request.ai_suggestions_accepted,
            created_at: now.clone(),
            updated_at: now,
        };

        self.reports.store_report(&report).await?;

        info!("Created injury report {}", report.id);

        Ok(InjuryReportResponse {
            report,
            success_message: "Injury report submitted successfully!".to_string(),
        })
    }

    pub async fn get_report(&self, report_id: &str) -> Result<InjuryReportDetails, ReportError> {
        self.reports
            .get_report(report_id)
            .await?
            .ok_or_else(|| ReportError::NotFound(format!("Report {}", report_id)))
    }

    /// Joined reports, most recent injury first
    pub async fn list_reports(&self, only_unreviewed: bool) -> Result<InjuryReportListResponse, ReportError> {
        let reports = self.reports.list_reports(only_unreviewed).await?;
        info!("Found {} reports (only_unreviewed: {})", reports.len(), only_unreviewed);
        Ok(InjuryReportListResponse { reports })
    }

    /// Record who reviewed the report and when.
    ///
    /// Front-desk staff choose themselves from a role-filtered list, so only
    /// the user's existence is checked here.
    pub async fn mark_reviewed(&self, report_id: &str, reviewer_id: &str) -> Result<InjuryReportDetails, ReportError> {
        info!("Marking report {} reviewed by {}", report_id, reviewer_id);
        self.ensure_user_exists(reviewer_id).await?;

        let now = Utc::now().to_rfc3339();
        if !self.reports.mark_reviewed(report_id, reviewer_id, &now).await? {
            return Err(ReportError::NotFound(format!("Report {}", report_id)));
        }
        self.get_report(report_id).await
    }

    /// Record who delivered the report to the parent and when.
    /// Review-before-delivery is left to the UI.
    pub async fn mark_delivered(&self, report_id: &str, deliverer_id: &str) -> Result<InjuryReportDetails, ReportError> {
        info!("Marking report {} delivered by {}", report_id, deliverer_id);
        self.ensure_user_exists(deliverer_id).await?;

        let existing = self.get_report(report_id).await?;
        if !existing.report.is_reviewed {
            warn!("Report {} is being delivered before review", report_id);
        }

        let now = Utc::now().to_rfc3339();
        if !self.reports.mark_delivered(report_id, deliverer_id, &now).await? {
            return Err(ReportError::NotFound(format!("Report {}", report_id)));
        }
        self.get_report(report_id).await
    }

    async fn ensure_user_exists(&self, user_id: &str) -> Result<(), ReportError> {
        if user_id.trim().is_empty() {
            return Err(ReportError::Validation("Please select a staff member".to_string()));
        }
        match self.users.get_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(ReportError::Validation(format!("Unknown user: {}", user_id))),
        }
    }
}

fn validate_new_report(request: &NewInjuryReport) -> Result<(), ReportError> {
    if request.is_bite && request.biter_child_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
        return Err(ReportError::Validation("Please select the child who bit".to_string()));
    }
    if request.is_peer_aggression && request.aggressor_child_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
        return Err(ReportError::Validation(
            "Please select the other child involved in peer aggression".to_string(),
        ));
    }

    let required = [
        ("child", &request.child_id),
        ("submitting user", &request.submitting_user_id),
        ("injury time", &request.injury_timestamp),
        ("location", &request.location),
        ("incident description", &request.incident_description),
        ("injury description", &request.injury_description),
        ("action taken", &request.action_taken),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::Validation(format!(
            "Please fill in all required fields (missing: {})",
            missing.join(", ")
        )));
    }

    if DateTime::parse_from_rfc3339(&request.injury_timestamp).is_err() {
        return Err(ReportError::Validation(format!(
            "Invalid injury timestamp: {}",
            request.injury_timestamp
        )));
    }

    let injured = request.child_id.trim();
    let involved = [
        (request.is_bite, &request.biter_child_id, "The child who bit cannot be the injured child"),
        (
            request.is_peer_aggression,
            &request.aggressor_child_id,
            "The other child involved cannot be the injured child",
        ),
    ];
    for (flagged, other_id, message) in involved {
        if flagged && other_id.as_deref().map(str::trim) == Some(injured) {
            return Err(ReportError::Validation(message.to_string()));
        }
    }

    if request.ai_suggestions_accepted > request.ai_suggestions_count {
        return Err(ReportError::Validation(
            "Accepted suggestions cannot exceed suggestions offered".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::repositories::test_support::{seed, AVA_ID, BEN_ID, DESK_ID, TEACHER_ID};
    use crate::storage::{ChildRepository, DbConnection, InjuryReportRepository, UserRepository};

    async fn setup_test() -> InjuryReportService {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        seed(&db).await;
        InjuryReportService::new(
            Arc::new(InjuryReportRepository::new(db.clone())),
            Arc::new(ChildRepository::new(db.clone())),
            Arc::new(UserRepository::new(db)),
        )
    }

    fn new_report() -> NewInjuryReport {
        NewInjuryReport {
            child_id: AVA_ID.to_string(),
            submitting_user_id: TEACHER_ID.to_string(),
            injury_timestamp: "2025-04-17T11:30:00-04:00".to_string(),
            location: "Playground".to_string(),
            incident_description: "Ava slipped on the slide steps".to_string(),
            injury_description: "Scraped left knee".to_string(),
            action_taken: "Cleaned and bandaged".to_string(),
            is_bite: false,
            biter_child_id: None,
            is_peer_aggression: false,
            aggressor_child_id: None,
            parent_narrative: Some("Ava had a small tumble.".to_string()),
            ai_validated: true,
            ai_suggestions_count: 3,
            ai_suggestions_accepted: 1,
        }
    }

    #[tokio::test]
    async fn test_create_report_starts_unreviewed() {
        let service = setup_test().await;
        let response = service.create_report(new_report()).await.unwrap();

        assert_eq!(response.success_message, "Injury report submitted successfully!");
        let report = response.report;
        assert!(report.id.starts_with("report::"));
        assert!(!report.is_reviewed);
        assert!(!report.is_delivered_to_parent);
        assert_eq!(report.parent_narrative.as_deref(), Some("Ava had a small tumble."));

        let details = service.get_report(&report.id).await.unwrap();
        assert_eq!(details.child_name.as_deref(), Some("Ava Jones"));
    }

    #[tokio::test]
    async fn test_flag_without_child_is_rejected() {
        let service = setup_test().await;

        let mut request = new_report();
        request.is_bite = true;
        let err = service.create_report(request).await.unwrap_err();
        assert!(matches!(err, ReportError::Validation(ref m) if m == "Please select the child who bit"));

        let mut request = new_report();
        request.is_peer_aggression = true;
        request.aggressor_child_id = Some(" ".to_string());
        assert!(matches!(service.create_report(request).await, Err(ReportError::Validation(_))));
    }

    #[tokio::test]
    async fn test_injured_child_cannot_be_the_other_child() {
        let service = setup_test().await;

        let mut request = new_report();
        request.is_bite = true;
        request.biter_child_id = Some(AVA_ID.to_string());
        let err = service.create_report(request).await.unwrap_err();
        assert!(matches!(err, ReportError::Validation(ref m) if m == "The child who bit cannot be the injured child"));

        let mut request = new_report();
        request.is_peer_aggression = true;
        request.aggressor_child_id = Some(AVA_ID.to_string());
        assert!(matches!(service.create_report(request).await, Err(ReportError::Validation(_))));

        let mut request = new_report();
        request.is_bite = true;
        request.biter_child_id = Some(BEN_ID.to_string());
        assert!(service.create_report(request).await.is_ok());
    }

    #[tokio::test]
    async fn test_unflagged_child_ids_are_dropped() {
        let service = setup_test().await;
        let mut request = new_report();
        request.biter_child_id = Some(BEN_ID.to_string());

        let report = service.create_report(request).await.unwrap().report;
        assert_eq!(report.biter_child_id, None);
    }

    #[tokio::test]
    async fn test_missing_fields_and_bad_references() {
        let service = setup_test().await;

        let mut request = new_report();
        request.location = "".to_string();
        assert!(matches!(service.create_report(request).await, Err(ReportError::Validation(_))));

        let mut request = new_report();
        request.injury_timestamp = "April 17th".to_string();
        assert!(matches!(service.create_report(request).await, Err(ReportError::Validation(_))));

        let mut request = new_report();
        request.child_id = "child::ghost".to_string();
        assert!(matches!(service.create_report(request).await, Err(ReportError::Validation(_))));

        let mut request = new_report();
        request.ai_suggestions_accepted = 4;
        assert!(matches!(service.create_report(request).await, Err(ReportError::Validation(_))));
    }

    #[tokio::test]
    async fn test_review_then_deliver() {
        let service = setup_test().await;
        let id = service.create_report(new_report()).await.unwrap().report.id;

        let reviewed = service.mark_reviewed(&id, DESK_ID).await.unwrap();
        assert!(reviewed.report.is_reviewed);
        assert_eq!(reviewed.reviewer_name.as_deref(), Some("Dana Cruz"));
        assert!(reviewed.report.reviewed_timestamp.is_some());

        let delivered = service.mark_delivered(&id, DESK_ID).await.unwrap();
        assert!(delivered.report.is_delivered_to_parent);
        assert_eq!(delivered.deliverer_name.as_deref(), Some("Dana Cruz"));

        assert!(service.list_reports(true).await.unwrap().reports.is_empty());
        assert_eq!(service.list_reports(false).await.unwrap().reports.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_actor_or_report() {
        let service = setup_test().await;
        let id = service.create_report(new_report()).await.unwrap().report.id;

        assert!(matches!(service.mark_reviewed(&id, "user::ghost").await, Err(ReportError::Validation(_))));
        assert!(matches!(service.mark_reviewed(&id, "").await, Err(ReportError::Validation(_))));
        assert!(matches!(
            service.mark_reviewed("report::ghost", DESK_ID).await,
            Err(ReportError::NotFound(_))
        ));
        assert!(matches!(
            service.mark_delivered("report::ghost", DESK_ID).await,
            Err(ReportError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delivery_before_review_is_not_blocked_here() {
        let service = setup_test().await;
        let id = service.create_report(new_report()).await.unwrap().report.id;

        let delivered = service.mark_delivered(&id, DESK_ID).await.unwrap();
        assert!(delivered.report.is_delivered_to_parent);
        assert!(!delivered.report.is_reviewed);
    }
}
