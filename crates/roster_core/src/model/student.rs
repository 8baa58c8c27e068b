//! Student domain model.
//!
//! # Invariants
//! - `id` is assigned by the caller and never reused for another student.
//! - `email` is unique across all students (enforced by storage).

use super::{require_present, ValidationError};
use serde::{Deserialize, Serialize};

/// Caller-supplied student identifier.
pub type StudentId = String;

/// Canonical student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    /// Display label.
    pub name: String,
    pub email: String,
    /// Optional free-text notes about the student.
    #[serde(default)]
    pub information: Option<String>,
}

impl Student {
    /// Creates a student record without optional information.
    pub fn new(
        id: impl Into<StudentId>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            information: None,
        }
    }

    /// Attaches free-text information.
    pub fn with_information(mut self, information: impl Into<String>) -> Self {
        self.information = Some(information.into());
        self
    }

    /// Checks that every required field is present.
    ///
    /// Values are not trimmed or normalized; only blank input is rejected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_present("student", "id", &self.id)?;
        require_present("student", "name", &self.name)?;
        require_present("student", "email", &self.email)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Student;
    use crate::model::ValidationError;

    #[test]
    fn validate_rejects_blank_email() {
        let student = Student::new("s1", "Ann", "   ");
        assert_eq!(
            student.validate(),
            Err(ValidationError::BlankField {
                entity: "student",
                field: "email"
            })
        );
    }

    #[test]
    fn validate_accepts_missing_information() {
        let student = Student::new("s1", "Ann", "a@x.com");
        assert!(student.validate().is_ok());
        assert!(student.information.is_none());
    }

    #[test]
    fn deserializes_without_information_field() {
        let student: Student =
            serde_json::from_str(r#"{"id":"s1","name":"Ann","email":"a@x.com"}"#).unwrap();
        assert_eq!(student, Student::new("s1", "Ann", "a@x.com"));
    }
}
