//! # Domain Module
//!
//! Business rules for the boo-boo report app.
//!
//! ## Module Organization
//!
//! - **child_service** / **user_service**: the reference lists staff pick from
//! - **injury_report_service**: report intake, review and delivery
//! - **enhancement**: the AI narrative review round trip, its response
//!   normalizer and the privacy filter on outgoing payloads
//! - **memo_service**: parent memos, generated once and then served from storage
//! - **error**: typed failures the REST layer maps to status codes
//!
//! ## Business Rules
//!
//! - A bite names the biter, peer aggression names the other child, and
//!   neither of those children is ever sent to an AI webhook
//! - Reports start unreviewed and undelivered; the front desk records who
//!   reviewed and delivered them and when
//! - A memo is generated at most once per report

pub mod child_service;
pub mod enhancement;
pub mod error;
pub mod injury_report_service;
pub mod memo_service;
pub mod user_service;

pub use child_service::ChildService;
pub use enhancement::{EnhancementService, WebhookClient};
pub use error::{EnhancementError, MemoError, ReportError};
pub use injury_report_service::InjuryReportService;
pub use memo_service::MemoService;
pub use user_service::UserService;
