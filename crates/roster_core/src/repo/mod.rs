//! Roster persistence: repository traits and their SQLite implementations.
//!
//! # Invariants
//! - Write paths validate input before any SQL mutation.
//! - Every write runs in one IMMEDIATE transaction: it commits fully or
//!   leaves storage untouched.
//! - Repository APIs return tagged errors (not-found, conflict) in addition
//!   to DB transport errors.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::group::GroupId;
use crate::model::student::StudentId;
use crate::model::ValidationError;
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod group_repo;
pub mod membership_repo;
pub mod student_repo;

pub type RepoResult<T> = Result<T, RepoError>;

const DEFAULT_LIST_LIMIT: i64 = 100;

/// Errors from roster repository operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Input failed field-presence validation.
    Validation(ValidationError),
    StudentNotFound(StudentId),
    GroupNotFound(GroupId),
    /// A student with this id already exists.
    StudentIdTaken(StudentId),
    /// Another student already uses this email.
    EmailTaken(String),
    /// Another group already uses this name.
    GroupNameTaken(String),
    /// The (student, group) pair is already present.
    MembershipExists {
        student_id: StudentId,
        group_id: GroupId,
    },
    /// The (student, group) pair is not present.
    MembershipMissing {
        student_id: StudentId,
        group_id: GroupId,
    },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::StudentNotFound(id) => write!(f, "student not found: {id}"),
            Self::GroupNotFound(id) => write!(f, "group not found: {id}"),
            Self::StudentIdTaken(id) => write!(f, "student id already registered: {id}"),
            Self::EmailTaken(email) => write!(f, "student email already registered: {email}"),
            Self::GroupNameTaken(name) => write!(f, "group name already exists: {name}"),
            Self::MembershipExists {
                student_id,
                group_id,
            } => write!(f, "student {student_id} is already in group {group_id}"),
            Self::MembershipMissing {
                student_id,
                group_id,
            } => write!(f, "student {student_id} is not in group {group_id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "roster repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "roster repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "roster repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid roster data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Offset/limit pagination for list operations.
///
/// Values are handed to SQLite unchanged: a negative `limit` means no
/// limit and a negative `skip` behaves like zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub skip: i64,
    pub limit: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl ListQuery {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

/// Returns the `table.column` list from a UNIQUE/PRIMARY KEY violation.
pub(crate) fn unique_violation_target(err: &rusqlite::Error) -> Option<&str> {
    match err {
        rusqlite::Error::SqliteFailure(failure, Some(message))
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            message.strip_prefix("UNIQUE constraint failed: ")
        }
        _ => None,
    }
}

/// Verifies the connection carries the migrated roster schema.
pub(crate) fn ensure_schema_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let present = column_names(conn, table)?;
    if present.is_empty() {
        return Err(RepoError::MissingRequiredTable(table));
    }
    match columns
        .iter()
        .find(|wanted| !present.iter().any(|name| name == *wanted))
    {
        Some(&column) => Err(RepoError::MissingRequiredColumn { table, column }),
        None => Ok(()),
    }
}

/// Column names of `table`; empty when the table does not exist.
fn column_names(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
