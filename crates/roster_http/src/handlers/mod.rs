//! Request handlers. Thin adapters from extracted input to roster services.

pub mod groups;
pub mod health;
pub mod students;

use roster_core::ListQuery;
use serde::{Deserialize, Serialize};

/// `?skip=&limit=` query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    ListQuery::default().limit
}

impl From<Pagination> for ListQuery {
    fn from(value: Pagination) -> Self {
        ListQuery::new(value.skip, value.limit)
    }
}

/// Confirmation body for writes that return no entity.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

impl MessageBody {
    pub(crate) fn new(message: &'static str) -> Self {
        Self { message }
    }
}
