//! HTTP surface for the roster service.
//!
//! # Responsibility
//! - Expose roster use-cases as JSON endpoints.
//! - Map domain errors to status codes per the configured exposure policy.
//! - Own server startup and graceful shutdown.
//!
//! # Invariants
//! - Handlers never touch SQL; every call goes through `roster_core::Roster`.
//! - Database work runs on the blocking pool, never on async workers.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod state;

pub use config::{load_config, ErrorExposure, RosterConfig};
pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;

use log::info;
use roster_core::db::open_db;
use std::io;

/// Binds the configured address and serves until ctrl-c or SIGTERM.
///
/// The database is opened and migrated once before the listener binds so
/// schema problems surface at startup.
///
/// # Errors
/// - Database bootstrap fails.
/// - The listener cannot bind or the server loop fails.
pub async fn serve(config: RosterConfig) -> io::Result<()> {
    let db_path = config.database.path.clone();
    tokio::task::spawn_blocking(move || open_db(db_path).map(drop))
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "event=server_start module=http status=ok address={addr} db={} exposure={:?}",
        config.database.path.display(),
        config.errors.exposure
    );

    let app = build_router(AppState::from_config(&config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=http status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("event=signal_install module=http status=error signal=ctrl_c error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                log::error!(
                    "event=signal_install module=http status=error signal=terminate error={err}"
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("event=server_shutdown module=http status=ok");
}
