//! Membership use-case service.
//!
//! # Responsibility
//! - Add, remove and transfer students between groups.
//! - Expose the derived `group.students` and `student.groups` views.
//!
//! # Invariants
//! - Repeating `add_student` on an existing pair is `AlreadyMember`, and
//!   repeating `remove_student` on an absent pair is `NotMember`; neither is
//!   a silent no-op.
//! - A failed transfer leaves both groups exactly as they were.

use crate::model::group::{Group, GroupId};
use crate::model::student::Student;
use crate::repo::membership_repo::MembershipRepository;
use crate::repo::RepoError;
use crate::service::{log_outcome, RosterError, RosterResult};

/// Use-case service wrapper for membership operations.
pub struct MembershipService<R: MembershipRepository> {
    repo: R,
}

impl<R: MembershipRepository> MembershipService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds one student to one group.
    pub fn add_student(&self, student_id: &str, group_id: GroupId) -> RosterResult<()> {
        let result = self
            .repo
            .add_member(student_id, group_id)
            .map_err(RosterError::from);
        log_outcome(
            "membership_add",
            &format!("student_id={student_id} group_id={group_id}"),
            result,
        )
    }

    /// Removes one student from one group.
    pub fn remove_student(&self, student_id: &str, group_id: GroupId) -> RosterResult<()> {
        let result = self
            .repo
            .remove_member(student_id, group_id)
            .map_err(RosterError::from);
        log_outcome(
            "membership_remove",
            &format!("student_id={student_id} group_id={group_id}"),
            result,
        )
    }

    /// Lists students of a group; fails `GroupNotFound` for unknown groups.
    pub fn list_members(&self, group_id: GroupId) -> RosterResult<Vec<Student>> {
        Ok(self.repo.list_members(group_id)?)
    }

    /// Lists groups of a student; fails `StudentNotFound` for unknown students.
    pub fn groups_of_student(&self, student_id: &str) -> RosterResult<Vec<Group>> {
        Ok(self.repo.list_student_groups(student_id)?)
    }

    /// Moves a student from `from_group_id` to `to_group_id` atomically.
    ///
    /// # Errors
    /// - `StudentNotFound` / `GroupNotFound` when any of the three is missing.
    /// - `NotInSourceGroup` when the student is not in `from_group_id`.
    /// - `AlreadyInTargetGroup` when the student is already in `to_group_id`.
    pub fn transfer_student(
        &self,
        student_id: &str,
        from_group_id: GroupId,
        to_group_id: GroupId,
    ) -> RosterResult<()> {
        let result = self
            .repo
            .transfer_member(student_id, from_group_id, to_group_id)
            .map_err(|err| match err {
                RepoError::MembershipMissing {
                    student_id,
                    group_id,
                } => RosterError::NotInSourceGroup {
                    student_id,
                    group_id,
                },
                RepoError::MembershipExists {
                    student_id,
                    group_id,
                } => RosterError::AlreadyInTargetGroup {
                    student_id,
                    group_id,
                },
                other => RosterError::from(other),
            });
        log_outcome(
            "membership_transfer",
            &format!("student_id={student_id} from_group_id={from_group_id} to_group_id={to_group_id}"),
            result,
        )
    }
}
