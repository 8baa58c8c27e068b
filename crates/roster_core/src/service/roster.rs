//! Connection-scoped facade over the three roster services.

use crate::repo::group_repo::SqliteGroupRepository;
use crate::repo::membership_repo::SqliteMembershipRepository;
use crate::repo::student_repo::SqliteStudentRepository;
use crate::service::group_service::GroupService;
use crate::service::membership_service::MembershipService;
use crate::service::student_service::StudentService;
use crate::service::RosterResult;
use rusqlite::Connection;

/// All roster services bound to one migrated SQLite connection.
pub struct Roster<'conn> {
    students: StudentService<SqliteStudentRepository<'conn>>,
    groups: GroupService<SqliteGroupRepository<'conn>>,
    membership: MembershipService<SqliteMembershipRepository<'conn>>,
}

impl<'conn> Roster<'conn> {
    /// Builds every service, rejecting connections without the roster schema.
    pub fn try_new(conn: &'conn Connection) -> RosterResult<Self> {
        Ok(Self {
            students: StudentService::new(SqliteStudentRepository::try_new(conn)?),
            groups: GroupService::new(SqliteGroupRepository::try_new(conn)?),
            membership: MembershipService::new(SqliteMembershipRepository::try_new(conn)?),
        })
    }

    pub fn students(&self) -> &StudentService<SqliteStudentRepository<'conn>> {
        &self.students
    }

    pub fn groups(&self) -> &GroupService<SqliteGroupRepository<'conn>> {
        &self.groups
    }

    pub fn membership(&self) -> &MembershipService<SqliteMembershipRepository<'conn>> {
        &self.membership
    }
}
