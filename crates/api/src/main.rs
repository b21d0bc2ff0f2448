use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use grantboard_api::config::ServerConfig;
use grantboard_api::router::build_app_router;
use grantboard_api::state::AppState;
use grantboard_db::{DashboardStore, MemoryDashboardStore, PgDashboardStore};
use grantboard_events::{EventHooks, HookEvent, WILDCARD};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grantboard_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Store ---
    let store: Arc<dyn DashboardStore> = match &config.database_url {
        Some(database_url) => {
            let pool = grantboard_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            grantboard_db::health_check(&pool)
                .await
                .expect("Database health check failed");

            grantboard_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            Arc::new(PgDashboardStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; preferences are kept in memory only");
            Arc::new(MemoryDashboardStore::new())
        }
    };

    // --- Event hooks ---
    let hooks = Arc::new(EventHooks::new(config.hook_queue_capacity));
    hooks.subscribe(WILDCARD, audit_hook).await;
    hooks
        .start()
        .await
        .expect("Event hooks must start exactly once");

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        hooks: Arc::clone(&hooks),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, draining event hooks");

    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(drain, hooks.stop()).await.is_err() {
        tracing::warn!(timeout_secs = config.shutdown_timeout_secs, "Event hook drain timed out");
    }

    tracing::info!("Graceful shutdown complete");
}

/// Structured audit line for every dashboard lifecycle event.
fn audit_hook(event: &HookEvent) {
    tracing::info!(
        target: "grantboard_api::audit",
        event_type = %event.event_type,
        actor_user_id = ?event.actor_user_id,
        payload = %event.payload,
        "Dashboard event",
    );
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
