//! Core domain logic for the student/group roster.
//! This crate is the single source of truth for roster invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::group::{Group, GroupId, NewGroup};
pub use model::student::{Student, StudentId};
pub use model::ValidationError;
pub use repo::group_repo::{GroupRepository, SqliteGroupRepository};
pub use repo::membership_repo::{MembershipRepository, SqliteMembershipRepository};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use repo::{ListQuery, RepoError, RepoResult};
pub use service::group_service::GroupService;
pub use service::membership_service::MembershipService;
pub use service::roster::Roster;
pub use service::student_service::StudentService;
pub use service::{ErrorKind, RosterError, RosterResult};

/// Minimal liveness probe.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
