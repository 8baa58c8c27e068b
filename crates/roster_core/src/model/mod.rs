//! Roster domain model.
//!
//! # Responsibility
//! - Define the canonical Student and Group records.
//! - Provide field-presence validation shared by all write paths.
//!
//! # Invariants
//! - Student identity is caller-supplied; Group identity is store-generated.
//! - Membership is not a model type: it is a relation owned by storage and
//!   read through derived views (`groups_of`, `list_members`).

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod group;
pub mod student;

/// Field-presence validation failure for roster input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is empty or whitespace-only.
    BlankField {
        entity: &'static str,
        field: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { entity, field } => {
                write!(f, "{entity}.{field} must not be blank")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_present(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField { entity, field });
    }
    Ok(())
}
