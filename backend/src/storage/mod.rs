//! # Storage Module
//!
//! The data gateway: children, staff users and injury reports persisted in
//! SQLite through SQLx. Repositories return `anyhow::Result` and know
//! nothing about business rules; the domain layer talks to them through the
//! traits in [`traits`].

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::{ChildRepository, InjuryReportRepository, UserRepository};
pub use traits::{ChildStorage, InjuryReportStorage, UserStorage};
