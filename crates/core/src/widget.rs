//! Dashboard and widget configuration types.
//!
//! These are the shapes exchanged with the frontend and persisted as JSON.
//! Field names are camelCase on the wire.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::error::CoreError;

/// Grid column count used by every catalog template and the generator.
pub const GRID_COLUMNS: u32 = 3;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    Kpi,
    Chart,
    List,
    Status,
    Action,
    Custom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardLayout {
    #[default]
    Grid,
    Flex,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardCategory {
    Executive,
    Operations,
    Finance,
    Custom,
}

/// Components the render layer knows how to draw.
///
/// Widgets reference components by name; a name outside this table is
/// skipped at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetComponent {
    BudgetKpi,
    ProjectsKpi,
    ApprovalsKpi,
    BudgetSummary,
    ProjectTimeline,
    ComplianceStatus,
    UpcomingReports,
    ApprovalQueue,
    RecentIssues,
    DisbursementTracker,
    PortfolioOverview,
    QuickActions,
    WelcomePanel,
}

impl WidgetComponent {
    pub const ALL: [WidgetComponent; 13] = [
        WidgetComponent::BudgetKpi,
        WidgetComponent::ProjectsKpi,
        WidgetComponent::ApprovalsKpi,
        WidgetComponent::BudgetSummary,
        WidgetComponent::ProjectTimeline,
        WidgetComponent::ComplianceStatus,
        WidgetComponent::UpcomingReports,
        WidgetComponent::ApprovalQueue,
        WidgetComponent::RecentIssues,
        WidgetComponent::DisbursementTracker,
        WidgetComponent::PortfolioOverview,
        WidgetComponent::QuickActions,
        WidgetComponent::WelcomePanel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WidgetComponent::BudgetKpi => "BudgetKpi",
            WidgetComponent::ProjectsKpi => "ProjectsKpi",
            WidgetComponent::ApprovalsKpi => "ApprovalsKpi",
            WidgetComponent::BudgetSummary => "BudgetSummary",
            WidgetComponent::ProjectTimeline => "ProjectTimeline",
            WidgetComponent::ComplianceStatus => "ComplianceStatus",
            WidgetComponent::UpcomingReports => "UpcomingReports",
            WidgetComponent::ApprovalQueue => "ApprovalQueue",
            WidgetComponent::RecentIssues => "RecentIssues",
            WidgetComponent::DisbursementTracker => "DisbursementTracker",
            WidgetComponent::PortfolioOverview => "PortfolioOverview",
            WidgetComponent::QuickActions => "QuickActions",
            WidgetComponent::WelcomePanel => "WelcomePanel",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

/// Grid placement of a widget. `span` counts columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub row: u32,
    pub col: u32,
    pub span: u32,
}

impl WidgetPosition {
    pub fn new(row: u32, col: u32, span: u32) -> Self {
        Self { row, col, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub component: String,
    pub position: WidgetPosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capability: Option<Capability>,
    #[serde(default = "empty_props")]
    pub props: serde_json::Value,
}

fn empty_props() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

impl WidgetConfig {
    /// A widget at the grid origin with a one-column span and no props.
    pub fn new(
        id: impl Into<String>,
        widget_type: WidgetType,
        component: WidgetComponent,
        capability: Option<Capability>,
    ) -> Self {
        Self {
            id: id.into(),
            widget_type,
            component: component.name().to_string(),
            position: WidgetPosition::new(0, 0, 1),
            capability,
            props: empty_props(),
        }
    }

    pub fn at(mut self, row: u32, col: u32, span: u32) -> Self {
        self.position = WidgetPosition::new(row, col, span);
        self
    }

    pub fn with_props(mut self, props: serde_json::Value) -> Self {
        self.props = props;
        self
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub layout: DashboardLayout,
    pub columns: u32,
    pub widgets: Vec<WidgetConfig>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_customizable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: DashboardCategory,
    pub required_capabilities: Vec<Capability>,
    pub config: DashboardConfig,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Maximum length of a dashboard or widget id.
pub const MAX_ID_LEN: usize = 64;

/// Validate a dashboard before it is stored.
///
/// Checks: non-empty ids within [`MAX_ID_LEN`], a positive column count,
/// unique widget ids, and every widget fitting inside its row.
pub fn validate_dashboard_config(config: &DashboardConfig) -> Result<(), CoreError> {
    validate_id("Dashboard", &config.id)?;
    if config.name.trim().is_empty() {
        return Err(CoreError::Validation("Dashboard name must not be empty".into()));
    }
    if config.columns == 0 {
        return Err(CoreError::Validation("Dashboard must have at least one column".into()));
    }

    let mut seen = HashSet::new();
    for widget in &config.widgets {
        validate_widget(widget, config.columns)?;
        if !seen.insert(widget.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate widget id '{}'",
                widget.id
            )));
        }
    }
    Ok(())
}

/// Validate one widget's id and check that it fits a `columns`-wide row.
pub fn validate_widget(widget: &WidgetConfig, columns: u32) -> Result<(), CoreError> {
    validate_id("Widget", &widget.id)?;
    let WidgetPosition { col, span, .. } = widget.position;
    if span == 0 || col >= columns || span > columns - col {
        return Err(CoreError::Validation(format!(
            "Widget '{}' at column {col} with span {span} does not fit in {columns} columns",
            widget.id
        )));
    }
    Ok(())
}

fn validate_id(kind: &str, id: &str) -> Result<(), CoreError> {
    if id.is_empty() || id.len() > MAX_ID_LEN {
        return Err(CoreError::Validation(format!(
            "{kind} id must be 1-{MAX_ID_LEN} characters"
        )));
    }
    Ok(())
}
