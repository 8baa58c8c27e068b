//! Group domain model.
//!
//! # Invariants
//! - `id` is generated by storage on insert.
//! - `name` is unique across all groups (enforced by storage).

use super::{require_present, ValidationError};
use serde::{Deserialize, Serialize};

/// Store-generated group identifier.
pub type GroupId = i64;

/// Canonical group record as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
}

/// Creation input for a group. Carries no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_present("group", "name", &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::NewGroup;

    #[test]
    fn validate_rejects_blank_name() {
        assert!(NewGroup::new("").validate().is_err());
        assert!(NewGroup::new("Math").validate().is_ok());
    }

    #[test]
    fn creation_input_ignores_unknown_id_field() {
        let group: NewGroup = serde_json::from_str(r#"{"id":7,"name":"Math"}"#).unwrap();
        assert_eq!(group, NewGroup::new("Math"));
    }
}
