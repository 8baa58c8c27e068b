//! Group use-case service.

use crate::model::group::{Group, GroupId, NewGroup};
use crate::repo::group_repo::GroupRepository;
use crate::repo::ListQuery;
use crate::service::{log_outcome, RosterError, RosterResult};

/// Use-case service wrapper for group operations.
pub struct GroupService<R: GroupRepository> {
    repo: R,
}

impl<R: GroupRepository> GroupService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a group; the returned record carries the generated id.
    pub fn create_group(&self, group: NewGroup) -> RosterResult<Group> {
        let result = group
            .validate()
            .map_err(RosterError::from)
            .and_then(|()| self.repo.create_group(&group).map_err(RosterError::from));
        let context = match &result {
            Ok(created) => format!("group_id={}", created.id),
            Err(_) => "group_id=none".to_string(),
        };
        log_outcome("group_create", &context, result)
    }

    /// Loads one group. Absence is `Ok(None)`, not an error.
    pub fn get_group(&self, id: GroupId) -> RosterResult<Option<Group>> {
        Ok(self.repo.get_group(id)?)
    }

    /// Lists groups in creation order.
    pub fn list_groups(&self, query: &ListQuery) -> RosterResult<Vec<Group>> {
        Ok(self.repo.list_groups(query)?)
    }

    /// Deletes one group and every membership that references it.
    pub fn delete_group(&self, id: GroupId) -> RosterResult<Group> {
        let result = self.repo.delete_group(id).map_err(RosterError::from);
        log_outcome("group_delete", &format!("group_id={id}"), result)
    }
}
