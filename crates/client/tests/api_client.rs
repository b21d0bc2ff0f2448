//! End-to-end tests: the REST client against the real router on an
//! ephemeral port, backed by the in-memory store.

use std::sync::Arc;

use assert_matches::assert_matches;
use grantboard_api::auth::jwt::{generate_access_token, JwtConfig};
use grantboard_api::config::ServerConfig;
use grantboard_api::router::build_app_router;
use grantboard_api::state::AppState;
use grantboard_client::{ClientConfig, ClientError, DashboardApi, DashboardLoader};
use grantboard_core::preferences::{Theme, UpdateDashboardPreferences};
use grantboard_core::session::SessionUser;
use grantboard_db::MemoryDashboardStore;
use grantboard_events::EventHooks;

const SECRET: &str = "client-test-secret-long-enough-for-hmac";

fn jwt() -> JwtConfig {
    JwtConfig {
        secret: SECRET.to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Serve the API on 127.0.0.1:0 and return its base URL.
async fn spawn_server() -> String {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        hook_queue_capacity: 64,
        database_url: None,
        jwt: jwt(),
    };
    let state = AppState {
        store: Arc::new(MemoryDashboardStore::new()),
        config: Arc::new(config.clone()),
        hooks: Arc::new(EventHooks::default()),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str, user_id: i64, role: &str, capabilities: &[&str]) -> DashboardApi {
    let token = generate_access_token(user_id, "Pat", role, capabilities, &jwt()).unwrap();
    DashboardApi::new(&ClientConfig::new(base_url).with_token(token)).unwrap()
}

#[tokio::test]
async fn preferences_round_trip_over_http() {
    let base = spawn_server().await;
    let api = client(&base, 5, "partner", &[]);

    let defaults = api.get_preferences().await.unwrap();
    assert_eq!(defaults.user_id, 5);
    assert_eq!(defaults.refresh_interval, 300);

    let updated = api
        .update_preferences(&UpdateDashboardPreferences {
            theme: Some(Theme::Dark),
            refresh_interval: Some(60),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(updated.theme, Theme::Dark);
    assert_eq!(api.get_preferences().await.unwrap(), updated);

    api.reset_preferences().await.unwrap();
    assert_eq!(api.get_preferences().await.unwrap().refresh_interval, 300);
}

#[tokio::test]
async fn missing_token_surfaces_api_error() {
    let base = spawn_server().await;
    let api = DashboardApi::new(&ClientConfig::new(&base)).unwrap();

    let err = api.get_preferences().await.unwrap_err();
    assert_matches!(err, ClientError::Api { status: 401, .. });
}

#[tokio::test]
async fn templates_and_default_follow_capabilities() {
    let base = spawn_server().await;
    let api = client(&base, 7, "program_manager", &["projects.view", "issues.view"]);

    let templates = api.list_templates().await.unwrap();
    let ids: Vec<_> = templates.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["operations", "partner"]);

    let default = api.get_default().await.unwrap();
    assert_eq!(default.id, "operations");
}

#[tokio::test]
async fn saved_config_is_fetched_by_id() {
    let base = spawn_server().await;
    let api = client(&base, 9, "finance_officer", &["budgets.view", "dashboard.customize"]);

    let mut config = api.get_config("finance").await.unwrap();
    config.id = "my finance".to_string();
    config.name = "My Finance".to_string();
    config.is_default = false;

    let saved = api.save_config(&config).await.unwrap();
    assert_eq!(saved, config);
    assert_eq!(api.get_config("my finance").await.unwrap(), config);

    let err = api.get_config("missing").await.unwrap_err();
    assert_matches!(err, ClientError::Api { status: 404, .. });
}

#[tokio::test]
async fn loader_uses_default_when_server_unreachable() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = DashboardApi::new(&ClientConfig::new(format!("http://{addr}"))).unwrap();
    let session = SessionUser::from_tokens(3, "Gil", "grants_manager", &["projects.view"])
        .unwrap()
        .into();
    let mut loader = DashboardLoader::new(api, session);

    let config = loader.load().await;
    assert_eq!(config.id, "grants");
    assert!(config.widgets.iter().all(|w| w.capability.is_some()));
    assert!(loader.preferences().is_none());
}

#[tokio::test]
async fn loader_applies_server_preferences() {
    let base = spawn_server().await;
    let tokens = ["budgets.view", "projects.view"];
    let api = client(&base, 11, "reviewer", &tokens);
    let session = SessionUser::from_tokens(11, "Pat", "reviewer", &tokens)
        .unwrap()
        .into();
    let mut loader = DashboardLoader::new(api, session);

    let config = loader
        .save(&UpdateDashboardPreferences {
            widget_order: Some(vec!["project-timeline".into()]),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(config.widgets[0].id, "project-timeline");

    // A fresh load reads the same preferences back from the server.
    let reloaded = loader.load().await;
    assert_eq!(reloaded, config);
}
