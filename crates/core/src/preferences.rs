//! Per-user dashboard preferences: defaults, partial-update merge, and
//! application of a user's ordering/visibility choices to a dashboard.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::layout::pack_widgets;
use crate::types::{DbId, Timestamp};
use crate::widget::{validate_widget, DashboardConfig, WidgetConfig, GRID_COLUMNS};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Refresh interval applied when the user has not chosen one (seconds).
pub const DEFAULT_REFRESH_INTERVAL_SECS: i32 = 300;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "system" => Some(Theme::System),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDashboardPreferences {
    pub user_id: DbId,
    #[serde(default)]
    pub dashboard_id: Option<String>,
    #[serde(default)]
    pub widget_order: Vec<String>,
    #[serde(default)]
    pub hidden_widgets: BTreeSet<String>,
    #[serde(default)]
    pub custom_widgets: Vec<WidgetConfig>,
    pub refresh_interval: i32,
    #[serde(default)]
    pub theme: Theme,
    pub updated_at: Timestamp,
}

impl UserDashboardPreferences {
    /// Preferences for a user who never saved any.
    pub fn defaults(user_id: DbId, now: Timestamp) -> Self {
        Self {
            user_id,
            dashboard_id: None,
            widget_order: Vec::new(),
            hidden_widgets: BTreeSet::new(),
            custom_widgets: Vec::new(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL_SECS,
            theme: Theme::default(),
            updated_at: now,
        }
    }

    fn is_customized(&self) -> bool {
        !self.widget_order.is_empty()
            || !self.hidden_widgets.is_empty()
            || !self.custom_widgets.is_empty()
    }
}

/// Partial update; absent fields keep their stored value.
///
/// Bounds: `refreshInterval` 10..=3600 seconds, at most 64 ordered or hidden
/// widget ids, at most 32 custom widgets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDashboardPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 64))]
    pub dashboard_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 64))]
    pub widget_order: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 64))]
    pub hidden_widgets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 32))]
    pub custom_widgets: Option<Vec<WidgetConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 10, max = 3600))]
    pub refresh_interval: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
}

impl UpdateDashboardPreferences {
    /// Run field validation and map failures to [`CoreError::Validation`].
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))?;

        if let Some(custom) = &self.custom_widgets {
            let mut seen = HashSet::new();
            for widget in custom {
                validate_widget(widget, GRID_COLUMNS)?;
                if !seen.insert(widget.id.as_str()) {
                    return Err(CoreError::Validation(format!(
                        "Duplicate custom widget id '{}'",
                        widget.id
                    )));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Apply `patch` on top of `existing` (or the defaults), last write wins.
pub fn merge_preferences(
    existing: Option<UserDashboardPreferences>,
    user_id: DbId,
    patch: &UpdateDashboardPreferences,
    now: Timestamp,
) -> UserDashboardPreferences {
    let mut prefs = existing.unwrap_or_else(|| UserDashboardPreferences::defaults(user_id, now));

    if let Some(id) = &patch.dashboard_id {
        prefs.dashboard_id = Some(id.clone());
    }
    if let Some(order) = &patch.widget_order {
        prefs.widget_order = order.clone();
    }
    if let Some(hidden) = &patch.hidden_widgets {
        prefs.hidden_widgets = hidden.iter().cloned().collect();
    }
    if let Some(custom) = &patch.custom_widgets {
        prefs.custom_widgets = custom.clone();
    }
    if let Some(interval) = patch.refresh_interval {
        prefs.refresh_interval = interval;
    }
    if let Some(theme) = patch.theme {
        prefs.theme = theme;
    }
    prefs.updated_at = now;
    prefs
}

// ---------------------------------------------------------------------------
// Apply to a dashboard
// ---------------------------------------------------------------------------

/// Produce a new dashboard reflecting the user's custom widgets, hidden
/// widgets and widget order.
///
/// Ordered ids come first in the given order; widgets not mentioned keep
/// their relative order after them. Unknown ids in `widget_order` are
/// ignored. When anything was customized the grid is reflowed; otherwise the
/// dashboard's own positions are kept.
pub fn apply_preferences(
    config: DashboardConfig,
    prefs: &UserDashboardPreferences,
) -> Result<DashboardConfig, CoreError> {
    if !prefs.is_customized() {
        return Ok(config);
    }

    let mut all: Vec<WidgetConfig> = config.widgets.clone();
    let mut seen: HashSet<String> = all.iter().map(|w| w.id.clone()).collect();
    for custom in &prefs.custom_widgets {
        if seen.insert(custom.id.clone()) {
            all.push(custom.clone());
        }
    }

    all.retain(|w| !prefs.hidden_widgets.contains(&w.id));

    let mut ordered = Vec::with_capacity(all.len());
    for id in &prefs.widget_order {
        if let Some(idx) = all.iter().position(|w| &w.id == id) {
            ordered.push(all.remove(idx));
        }
    }
    ordered.extend(all);

    let widgets = pack_widgets(ordered, config.columns)?;
    Ok(DashboardConfig { widgets, ..config })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::templates::dashboard_template;
    use crate::widget::{WidgetComponent, WidgetPosition, WidgetType, MAX_ID_LEN};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn ids(config: &DashboardConfig) -> Vec<&str> {
        config.widgets.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn defaults_are_uncustomized() {
        let prefs = UserDashboardPreferences::defaults(3, now());
        assert_eq!(prefs.refresh_interval, DEFAULT_REFRESH_INTERVAL_SECS);
        assert_eq!(prefs.theme, Theme::System);
        assert!(prefs.dashboard_id.is_none());
        assert!(!prefs.is_customized());
    }

    #[test]
    fn merge_only_touches_present_fields() {
        let mut existing = UserDashboardPreferences::defaults(3, now());
        existing.widget_order = vec!["a".into()];
        existing.theme = Theme::Dark;

        let patch = UpdateDashboardPreferences {
            refresh_interval: Some(60),
            ..Default::default()
        };
        let later = now() + chrono::Duration::minutes(5);
        let merged = merge_preferences(Some(existing), 3, &patch, later);

        assert_eq!(merged.refresh_interval, 60);
        assert_eq!(merged.widget_order, vec!["a".to_string()]);
        assert_eq!(merged.theme, Theme::Dark);
        assert_eq!(merged.updated_at, later);
    }

    #[test]
    fn merge_without_existing_starts_from_defaults() {
        let patch = UpdateDashboardPreferences {
            dashboard_id: Some("finance".into()),
            hidden_widgets: Some(vec!["x".into(), "x".into()]),
            ..Default::default()
        };
        let merged = merge_preferences(None, 9, &patch, now());
        assert_eq!(merged.user_id, 9);
        assert_eq!(merged.dashboard_id.as_deref(), Some("finance"));
        assert_eq!(merged.hidden_widgets.len(), 1);
    }

    #[test]
    fn patch_validation() {
        let bad_interval = UpdateDashboardPreferences {
            refresh_interval: Some(5),
            ..Default::default()
        };
        assert_matches!(bad_interval.check(), Err(CoreError::Validation(_)));

        let empty_id = UpdateDashboardPreferences {
            dashboard_id: Some(String::new()),
            ..Default::default()
        };
        assert_matches!(empty_id.check(), Err(CoreError::Validation(_)));

        let w = WidgetConfig::new("dup", WidgetType::Custom, WidgetComponent::QuickActions, None);
        let dup_custom = UpdateDashboardPreferences {
            custom_widgets: Some(vec![w.clone(), w]),
            ..Default::default()
        };
        assert_matches!(dup_custom.check(), Err(CoreError::Validation(msg)) if msg.contains("dup"));

        let too_wide = UpdateDashboardPreferences {
            custom_widgets: Some(vec![WidgetConfig::new(
                "wide",
                WidgetType::Custom,
                WidgetComponent::QuickActions,
                None,
            )
            .at(0, 0, 9)]),
            ..Default::default()
        };
        assert_matches!(too_wide.check(), Err(CoreError::Validation(msg)) if msg.contains("wide"));

        let far_column = UpdateDashboardPreferences {
            custom_widgets: Some(vec![WidgetConfig::new(
                "far",
                WidgetType::Custom,
                WidgetComponent::QuickActions,
                None,
            )
            .at(0, u32::MAX, 1)]),
            ..Default::default()
        };
        assert_matches!(far_column.check(), Err(CoreError::Validation(_)));

        let long_id = UpdateDashboardPreferences {
            custom_widgets: Some(vec![WidgetConfig::new(
                "x".repeat(MAX_ID_LEN + 1),
                WidgetType::Custom,
                WidgetComponent::QuickActions,
                None,
            )]),
            ..Default::default()
        };
        assert_matches!(long_id.check(), Err(CoreError::Validation(_)));

        let ok = UpdateDashboardPreferences {
            refresh_interval: Some(600),
            theme: Some(Theme::Light),
            ..Default::default()
        };
        assert!(ok.check().is_ok());
    }

    #[test]
    fn patch_deserializes_from_camel_case() {
        let patch: UpdateDashboardPreferences = serde_json::from_value(serde_json::json!({
            "widgetOrder": ["b", "a"],
            "refreshInterval": 120,
            "theme": "dark"
        }))
        .unwrap();
        assert_eq!(patch.widget_order, Some(vec!["b".to_string(), "a".to_string()]));
        assert_eq!(patch.refresh_interval, Some(120));
        assert_eq!(patch.theme, Some(Theme::Dark));
        assert!(patch.dashboard_id.is_none());
    }

    #[test]
    fn uncustomized_preferences_keep_template_positions() {
        let config = dashboard_template("grants").unwrap().config;
        let prefs = UserDashboardPreferences::defaults(1, now());
        let applied = apply_preferences(config.clone(), &prefs).unwrap();
        assert_eq!(applied, config);
    }

    #[test]
    fn order_hidden_and_custom_are_applied() {
        let config = dashboard_template("operations").unwrap().config;
        let mut prefs = UserDashboardPreferences::defaults(1, now());
        prefs.widget_order = vec!["recent-issues".into(), "missing".into(), "projects-kpi".into()];
        prefs.hidden_widgets = ["project-timeline".to_string()].into_iter().collect();
        prefs.custom_widgets = vec![WidgetConfig::new(
            "my-notes",
            WidgetType::Custom,
            WidgetComponent::QuickActions,
            None,
        )];

        let applied = apply_preferences(config, &prefs).unwrap();
        assert_eq!(
            ids(&applied),
            vec![
                "recent-issues",
                "projects-kpi",
                "approvals-kpi",
                "quick-actions",
                "upcoming-reports",
                "my-notes",
            ]
        );
        assert_eq!(applied.widgets[0].position, WidgetPosition::new(0, 0, 2));
        assert_eq!(applied.widgets[1].position, WidgetPosition::new(0, 2, 1));
        assert_eq!(applied.widgets[2].position, WidgetPosition::new(1, 0, 1));
    }

    #[test]
    fn custom_widget_with_existing_id_is_ignored() {
        let config = dashboard_template("partner").unwrap().config;
        let mut prefs = UserDashboardPreferences::defaults(1, now());
        prefs.custom_widgets = vec![WidgetConfig::new(
            "welcome",
            WidgetType::Custom,
            WidgetComponent::QuickActions,
            None,
        )];
        let applied = apply_preferences(config, &prefs).unwrap();
        let welcome: Vec<_> = applied.widgets.iter().filter(|w| w.id == "welcome").collect();
        assert_eq!(welcome.len(), 1);
        assert_eq!(welcome[0].component, "WelcomePanel");
    }

    #[test]
    fn oversized_custom_widget_is_an_error() {
        let config = dashboard_template("partner").unwrap().config;
        let mut prefs = UserDashboardPreferences::defaults(1, now());
        prefs.custom_widgets = vec![WidgetConfig::new(
            "huge",
            WidgetType::Custom,
            WidgetComponent::QuickActions,
            None,
        )
        .at(0, 0, 5)];
        assert_matches!(apply_preferences(config, &prefs), Err(CoreError::Validation(_)));
    }
}
