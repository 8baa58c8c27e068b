use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub core: &'static str,
    pub version: &'static str,
}

/// Liveness probe. Does not touch the database.
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody {
        status: "up",
        core: roster_core::ping(),
        version: roster_core::core_version(),
    })
}
