//! Route table and request logging.

use crate::handlers::{groups, health, students};
use crate::state::AppState;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use log::{info, warn};
use std::time::Instant;

/// Builds the full roster router. Collection paths accept a trailing slash.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/students",
            post(students::create_student).get(students::list_students),
        )
        .route(
            "/students/",
            post(students::create_student).get(students::list_students),
        )
        .route(
            "/students/{student_id}",
            get(students::get_student).delete(students::delete_student),
        )
        .route(
            "/students/{student_id}/groups",
            get(students::student_groups),
        )
        .route(
            "/students/{student_id}/transfer",
            post(students::transfer_student),
        )
        .route(
            "/students/{student_id}/transfer/",
            post(students::transfer_student),
        )
        .route(
            "/groups",
            post(groups::create_group).get(groups::list_groups),
        )
        .route(
            "/groups/",
            post(groups::create_group).get(groups::list_groups),
        )
        .route(
            "/groups/{group_id}",
            get(groups::get_group).delete(groups::delete_group),
        )
        .route("/groups/{group_id}/students", get(groups::list_members))
        .route("/groups/{group_id}/students/", get(groups::list_members))
        .route(
            "/groups/{group_id}/students/{student_id}",
            post(groups::add_student).delete(groups::remove_student),
        )
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started_at = Instant::now();

    let response = next.run(request).await;

    let code = response.status();
    let elapsed_ms = started_at.elapsed().as_millis();
    if code.is_server_error() || code.is_client_error() {
        warn!(
            "event=http_request module=http status=error method={method} path={path} code={} duration_ms={elapsed_ms}",
            code.as_u16()
        );
    } else {
        info!(
            "event=http_request module=http status=ok method={method} path={path} code={} duration_ms={elapsed_ms}",
            code.as_u16()
        );
    }
    response
}
