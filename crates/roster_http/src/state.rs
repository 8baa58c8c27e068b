//! Shared handler state.
//!
//! Each request opens its own connection on the blocking pool. SQLite file
//! locking plus IMMEDIATE write transactions serialize concurrent writers.

use crate::config::{ErrorExposure, RosterConfig};
use crate::error::{ApiError, Operation};
use log::error;
use roster_core::db::open_db;
use roster_core::{RepoError, Roster, RosterResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppState {
    db_path: Arc<PathBuf>,
    exposure: ErrorExposure,
}

impl AppState {
    pub fn new(db_path: impl Into<PathBuf>, exposure: ErrorExposure) -> Self {
        Self {
            db_path: Arc::new(db_path.into()),
            exposure,
        }
    }

    pub fn from_config(config: &RosterConfig) -> Self {
        Self::new(config.database.path.clone(), config.errors.exposure)
    }

    pub fn db_path(&self) -> &Path {
        self.db_path.as_path()
    }

    /// Runs `work` against a fresh roster on the blocking pool.
    pub(crate) async fn run<T, F>(&self, operation: Operation, work: F) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&Roster<'_>) -> RosterResult<T> + Send + 'static,
    {
        let db_path = Arc::clone(&self.db_path);
        let outcome = tokio::task::spawn_blocking(move || -> RosterResult<T> {
            let conn = open_db(db_path.as_path()).map_err(RepoError::from)?;
            let roster = Roster::try_new(&conn)?;
            work(&roster)
        })
        .await;

        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(ApiError::from_roster(operation, &err, self.exposure)),
            Err(join_err) => {
                error!(
                    "event=http_error module=http status=error operation={} error={join_err}",
                    operation.as_str()
                );
                Err(ApiError::internal(operation))
            }
        }
    }
}
