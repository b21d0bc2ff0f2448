//! Capability-driven dashboard generation.
//!
//! Used when a user's role has no curated template: each candidate widget is
//! guarded by one capability and the satisfied candidates are packed onto the
//! grid in a fixed priority order.

use std::cmp::Reverse;

use crate::capability::Capability;
use crate::error::CoreError;
use crate::layout::{pack_widgets, GridPacker};
use crate::session::SessionState;
use crate::templates::{curated_template_id, dashboard_template};
use crate::types::DbId;
use crate::widget::{
    DashboardConfig, DashboardLayout, WidgetComponent, WidgetConfig, WidgetType, GRID_COLUMNS,
};

/// Id of the placeholder emitted when no candidate is satisfied.
pub const WELCOME_WIDGET_ID: &str = "welcome";

/// A generator candidate: one widget bound to one guard capability.
struct Candidate {
    id: &'static str,
    capability: Capability,
    widget_type: WidgetType,
    component: WidgetComponent,
    span: u32,
}

/// Candidates in placement order. KPIs first, detail widgets after.
const CANDIDATES: &[Candidate] = &[
    Candidate {
        id: "budget-kpi",
        capability: Capability::BudgetsView,
        widget_type: WidgetType::Kpi,
        component: WidgetComponent::BudgetKpi,
        span: 1,
    },
    Candidate {
        id: "projects-kpi",
        capability: Capability::ProjectsView,
        widget_type: WidgetType::Kpi,
        component: WidgetComponent::ProjectsKpi,
        span: 1,
    },
    Candidate {
        id: "approvals-kpi",
        capability: Capability::ApprovalsView,
        widget_type: WidgetType::Kpi,
        component: WidgetComponent::ApprovalsKpi,
        span: 1,
    },
    Candidate {
        id: "budget-summary",
        capability: Capability::BudgetsView,
        widget_type: WidgetType::Chart,
        component: WidgetComponent::BudgetSummary,
        span: 2,
    },
    Candidate {
        id: "project-timeline",
        capability: Capability::ProjectsView,
        widget_type: WidgetType::Chart,
        component: WidgetComponent::ProjectTimeline,
        span: 1,
    },
    Candidate {
        id: "compliance-status",
        capability: Capability::ComplianceView,
        widget_type: WidgetType::Status,
        component: WidgetComponent::ComplianceStatus,
        span: 1,
    },
    Candidate {
        id: "upcoming-reports",
        capability: Capability::ReportsView,
        widget_type: WidgetType::List,
        component: WidgetComponent::UpcomingReports,
        span: 2,
    },
    Candidate {
        id: "approval-queue",
        capability: Capability::ApprovalsView,
        widget_type: WidgetType::List,
        component: WidgetComponent::ApprovalQueue,
        span: 2,
    },
    Candidate {
        id: "recent-issues",
        capability: Capability::IssuesView,
        widget_type: WidgetType::List,
        component: WidgetComponent::RecentIssues,
        span: 1,
    },
];

/// Layout priority per guard capability; higher sorts first.
const CAPABILITY_PRIORITY: &[(Capability, u32)] = &[
    (Capability::ExecutiveView, 100),
    (Capability::BudgetsView, 90),
    (Capability::ApprovalsView, 80),
    (Capability::ProjectsView, 70),
    (Capability::DisbursementsView, 65),
    (Capability::ComplianceView, 60),
    (Capability::ReportsView, 50),
    (Capability::IssuesView, 40),
];

/// Id of a generated dashboard for `user_id`.
pub fn generated_dashboard_id(user_id: DbId) -> String {
    format!("generated-{user_id}")
}

/// Synthesize a dashboard from the capabilities held by `session`.
pub fn generate_dashboard(
    session: &SessionState,
    user_id: DbId,
    display_name: &str,
) -> Result<DashboardConfig, CoreError> {
    let mut packer = GridPacker::new(GRID_COLUMNS);
    let mut widgets = Vec::new();

    for candidate in CANDIDATES {
        if !session.has_capability(candidate.capability) {
            continue;
        }
        let position = packer.place(candidate.span)?;
        let mut widget = WidgetConfig::new(
            candidate.id,
            candidate.widget_type,
            candidate.component,
            Some(candidate.capability),
        );
        widget.position = position;
        widgets.push(widget);
    }

    if widgets.is_empty() {
        widgets.push(
            WidgetConfig::new(
                WELCOME_WIDGET_ID,
                WidgetType::Custom,
                WidgetComponent::WelcomePanel,
                None,
            )
            .at(0, 0, GRID_COLUMNS)
            .with_props(serde_json::json!({ "userName": display_name })),
        );
    }

    Ok(DashboardConfig {
        id: generated_dashboard_id(user_id),
        name: format!("{display_name}'s Dashboard"),
        description: Some("Generated from your permissions".to_string()),
        layout: DashboardLayout::Grid,
        columns: GRID_COLUMNS,
        widgets,
        is_default: true,
        is_customizable: true,
    })
}

/// Display name used when generating for an anonymous session.
const GUEST_NAME: &str = "Guest";

/// The dashboard a session gets when it has no usable saved choice.
///
/// Roles with a curated template get that template; every other role (and
/// anonymous sessions) get a generated dashboard. The result is unfiltered.
pub fn default_dashboard(session: &SessionState) -> Result<DashboardConfig, CoreError> {
    let Some(user) = session.user() else {
        return generate_dashboard(session, 0, GUEST_NAME);
    };

    match curated_template_id(&user.role).and_then(dashboard_template) {
        Some(template) => Ok(template.config),
        None => generate_dashboard(session, user.user_id, &user.display_name),
    }
}

fn priority(widget: &WidgetConfig) -> u32 {
    widget
        .capability
        .and_then(|cap| {
            CAPABILITY_PRIORITY
                .iter()
                .find(|(c, _)| *c == cap)
                .map(|(_, p)| *p)
        })
        .unwrap_or(0)
}

/// Reorder `widgets` by capability priority (stable, descending) and reflow
/// their positions on the standard grid.
pub fn optimize_widget_layout(
    mut widgets: Vec<WidgetConfig>,
) -> Result<Vec<WidgetConfig>, CoreError> {
    widgets.sort_by_key(|w| Reverse(priority(w)));
    pack_widgets(widgets, GRID_COLUMNS)
}
