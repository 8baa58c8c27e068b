//! HTTP error mapping.
//!
//! # Responsibility
//! - Turn tagged `RosterError`s into a status code plus `{"detail": ..}`.
//! - Apply the configured `ErrorExposure` policy.
//!
//! # Invariants
//! - Storage failure text never leaves the process under `Generic`.
//! - Under `Generic` every transfer failure is `404 Transfer failed`.

use crate::config::ErrorExposure;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use roster_core::{ErrorKind, RosterError};
use serde::Serialize;

/// Request surface operation that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    CreateStudent,
    GetStudent,
    ListStudents,
    DeleteStudent,
    StudentGroups,
    CreateGroup,
    GetGroup,
    ListGroups,
    DeleteGroup,
    AddMember,
    RemoveMember,
    ListMembers,
    Transfer,
}

impl Operation {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::CreateStudent => "create_student",
            Self::GetStudent => "get_student",
            Self::ListStudents => "list_students",
            Self::DeleteStudent => "delete_student",
            Self::StudentGroups => "student_groups",
            Self::CreateGroup => "create_group",
            Self::GetGroup => "get_group",
            Self::ListGroups => "list_groups",
            Self::DeleteGroup => "delete_group",
            Self::AddMember => "add_member",
            Self::RemoveMember => "remove_member",
            Self::ListMembers => "list_members",
            Self::Transfer => "transfer",
        }
    }

    fn touches_membership(self) -> bool {
        matches!(self, Self::AddMember | Self::RemoveMember)
    }
}

/// Error response returned by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    detail: &'a str,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    /// Failure outside the domain (worker panic, runtime shutdown).
    pub(crate) fn internal(operation: Operation) -> Self {
        let status = status_for(ErrorKind::Internal);
        Self::new(status, generic_internal_detail(operation))
    }

    pub(crate) fn from_roster(
        operation: Operation,
        err: &RosterError,
        exposure: ErrorExposure,
    ) -> Self {
        if err.kind() == ErrorKind::Internal {
            error!(
                "event=http_error module=http status=error operation={} error_code={} error={err}",
                operation.as_str(),
                err.code()
            );
        }

        match exposure {
            ErrorExposure::Detailed => Self::new(status_for(err.kind()), err.to_string()),
            ErrorExposure::Generic if operation == Operation::Transfer => {
                Self::new(StatusCode::NOT_FOUND, "Transfer failed")
            }
            ErrorExposure::Generic => {
                Self::new(status_for(err.kind()), generic_detail(operation, err))
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: &self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Conflict | ErrorKind::Internal => StatusCode::BAD_REQUEST,
    }
}

fn generic_detail(operation: Operation, err: &RosterError) -> String {
    let detail = match err {
        RosterError::Validation(inner) => return inner.to_string(),
        RosterError::StudentNotFound(_) | RosterError::GroupNotFound(_)
            if operation.touches_membership() =>
        {
            "Student or group not found"
        }
        RosterError::StudentNotFound(_) => "Student not found",
        RosterError::GroupNotFound(_) => "Group not found",
        RosterError::StudentIdTaken(_) => "Student ID already registered",
        RosterError::EmailTaken(_) => "Email already registered",
        RosterError::GroupNameTaken(_) => "Group name already exists",
        RosterError::AlreadyMember { .. } => "Student already in group",
        RosterError::NotMember { .. } => "Student not in group",
        RosterError::NotInSourceGroup { .. } => "Student not in source group",
        RosterError::AlreadyInTargetGroup { .. } => "Student already in target group",
        RosterError::Repo(_) => generic_internal_detail(operation),
    };
    detail.to_string()
}

fn generic_internal_detail(operation: Operation) -> &'static str {
    match operation {
        Operation::CreateStudent => "Failed to create student",
        Operation::DeleteStudent => "Failed to delete student",
        Operation::CreateGroup => "Failed to create group",
        Operation::DeleteGroup => "Failed to delete group",
        Operation::AddMember => "Failed to add student to group",
        Operation::RemoveMember => "Failed to remove student from group",
        Operation::Transfer => "Transfer failed",
        Operation::GetStudent
        | Operation::ListStudents
        | Operation::StudentGroups
        | Operation::GetGroup
        | Operation::ListGroups
        | Operation::ListMembers => "Request failed",
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiError, Operation};
    use crate::config::ErrorExposure;
    use axum::http::StatusCode;
    use roster_core::{RepoError, RosterError};

    #[test]
    fn generic_membership_lookup_hides_missing_side() {
        let err = RosterError::GroupNotFound(7);
        let api = ApiError::from_roster(Operation::AddMember, &err, ErrorExposure::Generic);
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
        assert_eq!(api.detail(), "Student or group not found");
    }

    #[test]
    fn generic_transfer_is_always_not_found() {
        let err = RosterError::AlreadyInTargetGroup {
            student_id: "s1".to_string(),
            group_id: 2,
        };
        let api = ApiError::from_roster(Operation::Transfer, &err, ErrorExposure::Generic);
        assert_eq!(api.status(), StatusCode::NOT_FOUND);
        assert_eq!(api.detail(), "Transfer failed");
    }

    #[test]
    fn detailed_transfer_follows_error_kind() {
        let err = RosterError::NotInSourceGroup {
            student_id: "s1".to_string(),
            group_id: 1,
        };
        let api = ApiError::from_roster(Operation::Transfer, &err, ErrorExposure::Detailed);
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.detail(), err.to_string());
    }

    #[test]
    fn generic_storage_failure_hides_cause() {
        let err = RosterError::Repo(RepoError::InvalidData("corrupt row".to_string()));
        let api = ApiError::from_roster(Operation::CreateGroup, &err, ErrorExposure::Generic);
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.detail(), "Failed to create group");
    }
}
