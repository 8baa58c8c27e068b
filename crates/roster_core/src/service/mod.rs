//! Roster use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Translate storage outcomes into the tagged `RosterError` taxonomy.
//! - Keep HTTP/CLI layers decoupled from storage details.
//!
//! # Invariants
//! - Every distinct precondition failure has its own `RosterError` variant;
//!   collapsing them is a boundary-layer policy, never done here.
//! - Service write APIs emit one `module=service` log event per call.

use crate::model::group::GroupId;
use crate::model::student::StudentId;
use crate::model::ValidationError;
use crate::repo::RepoError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod group_service;
pub mod membership_service;
pub mod roster;
pub mod student_service;

/// Coarse classification of a roster failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced entity does not exist.
    NotFound,
    /// Uniqueness or membership-state violation.
    Conflict,
    /// Malformed input.
    Validation,
    /// Storage or bootstrap failure unrelated to the request content.
    Internal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

/// Domain error returned by roster services.
#[derive(Debug)]
pub enum RosterError {
    Validation(ValidationError),
    StudentNotFound(StudentId),
    GroupNotFound(GroupId),
    StudentIdTaken(StudentId),
    EmailTaken(String),
    GroupNameTaken(String),
    AlreadyMember {
        student_id: StudentId,
        group_id: GroupId,
    },
    NotMember {
        student_id: StudentId,
        group_id: GroupId,
    },
    /// Transfer source group does not contain the student.
    NotInSourceGroup {
        student_id: StudentId,
        group_id: GroupId,
    },
    /// Transfer target group already contains the student.
    AlreadyInTargetGroup {
        student_id: StudentId,
        group_id: GroupId,
    },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl RosterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::StudentNotFound(_) | Self::GroupNotFound(_) => ErrorKind::NotFound,
            Self::StudentIdTaken(_)
            | Self::EmailTaken(_)
            | Self::GroupNameTaken(_)
            | Self::AlreadyMember { .. }
            | Self::NotMember { .. }
            | Self::NotInSourceGroup { .. }
            | Self::AlreadyInTargetGroup { .. } => ErrorKind::Conflict,
            Self::Repo(_) => ErrorKind::Internal,
        }
    }

    /// Stable machine-readable code, safe to log.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_failed",
            Self::StudentNotFound(_) => "student_not_found",
            Self::GroupNotFound(_) => "group_not_found",
            Self::StudentIdTaken(_) => "student_id_taken",
            Self::EmailTaken(_) => "email_taken",
            Self::GroupNameTaken(_) => "group_name_taken",
            Self::AlreadyMember { .. } => "already_member",
            Self::NotMember { .. } => "not_member",
            Self::NotInSourceGroup { .. } => "not_in_source_group",
            Self::AlreadyInTargetGroup { .. } => "already_in_target_group",
            Self::Repo(_) => "storage_failure",
        }
    }
}

impl Display for RosterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::StudentNotFound(id) => write!(f, "student not found: {id}"),
            Self::GroupNotFound(id) => write!(f, "group not found: {id}"),
            Self::StudentIdTaken(id) => write!(f, "student id already registered: {id}"),
            Self::EmailTaken(email) => write!(f, "student email already registered: {email}"),
            Self::GroupNameTaken(name) => write!(f, "group name already exists: {name}"),
            Self::AlreadyMember {
                student_id,
                group_id,
            } => write!(f, "student {student_id} is already in group {group_id}"),
            Self::NotMember {
                student_id,
                group_id,
            } => write!(f, "student {student_id} is not in group {group_id}"),
            Self::NotInSourceGroup {
                student_id,
                group_id,
            } => write!(
                f,
                "student {student_id} is not in source group {group_id}"
            ),
            Self::AlreadyInTargetGroup {
                student_id,
                group_id,
            } => write!(
                f,
                "student {student_id} is already in target group {group_id}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RosterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RosterError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for RosterError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::StudentNotFound(id) => Self::StudentNotFound(id),
            RepoError::GroupNotFound(id) => Self::GroupNotFound(id),
            RepoError::StudentIdTaken(id) => Self::StudentIdTaken(id),
            RepoError::EmailTaken(email) => Self::EmailTaken(email),
            RepoError::GroupNameTaken(name) => Self::GroupNameTaken(name),
            RepoError::MembershipExists {
                student_id,
                group_id,
            } => Self::AlreadyMember {
                student_id,
                group_id,
            },
            RepoError::MembershipMissing {
                student_id,
                group_id,
            } => Self::NotMember {
                student_id,
                group_id,
            },
            other => Self::Repo(other),
        }
    }
}

pub type RosterResult<T> = Result<T, RosterError>;

/// Emits the single outcome event for one service write call.
pub(crate) fn log_outcome<T>(
    event: &'static str,
    context: &str,
    result: RosterResult<T>,
) -> RosterResult<T> {
    match &result {
        Ok(_) => info!("event={event} module=service status=ok {context}"),
        Err(err) if err.kind() == ErrorKind::Internal => error!(
            "event={event} module=service status=error {context} error_code={} error={err}",
            err.code()
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected {context} error_code={}",
            err.code()
        ),
    }
    result
}
