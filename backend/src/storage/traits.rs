//! # Storage Traits
//!
//! The data gateway seen by the domain layer. Services depend on these
//! traits, not on SQLite, so tests and future backends can swap the
//! implementation.

use anyhow::Result;
use async_trait::async_trait;
use shared::{Child, InjuryReport, InjuryReportDetails, User, UserRole};

/// Trait defining the interface for child storage operations
#[async_trait]
pub trait ChildStorage: Send + Sync {
    /// Store a new child
    async fn store_child(&self, child: &Child) -> Result<()>;

    /// Retrieve a specific child by ID
    async fn get_child(&self, child_id: &str) -> Result<Option<Child>>;

    /// List all children ordered by name
    async fn list_children(&self) -> Result<Vec<Child>>;
}

/// Trait defining the interface for staff user storage operations
#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn store_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// List users ordered by name, optionally restricted to one role
    async fn list_users(&self, role: Option<UserRole>) -> Result<Vec<User>>;
}

/// Trait defining the interface for injury report storage operations
#[async_trait]
pub trait InjuryReportStorage: Send + Sync {
    /// Insert a new report
    async fn store_report(&self, report: &InjuryReport) -> Result<()>;

    /// Retrieve one report joined with the names it references
    async fn get_report(&self, report_id: &str) -> Result<Option<InjuryReportDetails>>;

    /// List joined reports, most recent injury first
    async fn list_reports(&self, only_unreviewed: bool) -> Result<Vec<InjuryReportDetails>>;

    /// Set the reviewed flag, reviewer and timestamp.
    /// Returns false when no report has that ID.
    async fn mark_reviewed(&self, report_id: &str, reviewer_id: &str, timestamp: &str) -> Result<bool>;

    /// Set the delivered flag, deliverer and timestamp.
    /// Returns false when no report has that ID.
    async fn mark_delivered(&self, report_id: &str, deliverer_id: &str, timestamp: &str) -> Result<bool>;

    /// Cache the generated parent memo on the report
    async fn store_memo(&self, report_id: &str, memo_content: &str, timestamp: &str) -> Result<bool>;
}
