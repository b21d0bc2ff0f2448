//! PostgreSQL round-trips for the dashboard repositories.
//!
//! These need a live database (`DATABASE_URL`) and are ignored by default:
//! `cargo test -p grantboard-db -- --ignored`.

use grantboard_core::preferences::{Theme, UpdateDashboardPreferences, UserDashboardPreferences};
use grantboard_core::templates::dashboard_template;
use grantboard_db::repositories::{DashboardPreferenceRepo, SavedDashboardRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn upsert_creates_row_with_defaults(pool: PgPool) {
    let patch = UpdateDashboardPreferences {
        dashboard_id: Some("grants".into()),
        ..Default::default()
    };
    let row = DashboardPreferenceRepo::upsert(&pool, 10, &patch).await.unwrap();
    let prefs: UserDashboardPreferences = row.into();

    assert_eq!(prefs.user_id, 10);
    assert_eq!(prefs.dashboard_id.as_deref(), Some("grants"));
    assert_eq!(prefs.refresh_interval, 300);
    assert_eq!(prefs.theme, Theme::System);
    assert!(prefs.widget_order.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn upsert_only_changes_present_fields(pool: PgPool) {
    let first = UpdateDashboardPreferences {
        dashboard_id: Some("finance".into()),
        widget_order: Some(vec!["budget-kpi".into()]),
        ..Default::default()
    };
    DashboardPreferenceRepo::upsert(&pool, 11, &first).await.unwrap();

    let second = UpdateDashboardPreferences {
        theme: Some(Theme::Dark),
        refresh_interval: Some(60),
        ..Default::default()
    };
    let prefs: UserDashboardPreferences =
        DashboardPreferenceRepo::upsert(&pool, 11, &second).await.unwrap().into();

    assert_eq!(prefs.dashboard_id.as_deref(), Some("finance"));
    assert_eq!(prefs.widget_order, vec!["budget-kpi".to_string()]);
    assert_eq!(prefs.theme, Theme::Dark);
    assert_eq!(prefs.refresh_interval, 60);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn delete_removes_row(pool: PgPool) {
    DashboardPreferenceRepo::upsert(&pool, 12, &UpdateDashboardPreferences::default())
        .await
        .unwrap();
    assert!(DashboardPreferenceRepo::delete(&pool, 12).await.unwrap());
    assert!(!DashboardPreferenceRepo::delete(&pool, 12).await.unwrap());
    assert!(DashboardPreferenceRepo::find_by_user(&pool, 12).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn saved_dashboard_round_trip(pool: PgPool) {
    let mut config = dashboard_template("operations").unwrap().config;
    config.id = "ops-mine".into();
    config.is_default = false;

    SavedDashboardRepo::upsert(&pool, 13, &config).await.unwrap();
    let found = SavedDashboardRepo::find(&pool, 13, "ops-mine").await.unwrap().unwrap();
    assert_eq!(found.config.0, config);
    assert!(SavedDashboardRepo::find(&pool, 14, "ops-mine").await.unwrap().is_none());
}
