pub mod child_repository;
pub mod injury_report_repository;
pub mod user_repository;

pub use child_repository::ChildRepository;
pub use injury_report_repository::InjuryReportRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub(crate) use injury_report_repository::test_support;
