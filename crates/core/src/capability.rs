//! Capability vocabulary and capability sets.
//!
//! A capability is a dotted permission token (`"budgets.view"`) gating the
//! visibility of dashboard widgets and routes. The vocabulary is closed: a
//! token that does not name a [`Capability`] is rejected when a session is
//! built rather than silently never matching.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A single permission token.
///
/// Ordering follows declaration order, which keeps [`CapabilitySet`]
/// iteration stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "budgets.view")]
    BudgetsView,
    #[serde(rename = "budgets.manage")]
    BudgetsManage,
    #[serde(rename = "disbursements.view")]
    DisbursementsView,
    #[serde(rename = "disbursements.approve")]
    DisbursementsApprove,
    #[serde(rename = "projects.view")]
    ProjectsView,
    #[serde(rename = "projects.manage")]
    ProjectsManage,
    #[serde(rename = "approvals.view")]
    ApprovalsView,
    #[serde(rename = "approvals.manage")]
    ApprovalsManage,
    #[serde(rename = "compliance.view")]
    ComplianceView,
    #[serde(rename = "reports.view")]
    ReportsView,
    #[serde(rename = "reports.manage")]
    ReportsManage,
    #[serde(rename = "issues.view")]
    IssuesView,
    #[serde(rename = "executive.view")]
    ExecutiveView,
    #[serde(rename = "dashboard.customize")]
    DashboardCustomize,
    #[serde(rename = "users.manage")]
    UsersManage,
}

impl Capability {
    /// Every known capability, in declaration order.
    pub const ALL: [Capability; 15] = [
        Capability::BudgetsView,
        Capability::BudgetsManage,
        Capability::DisbursementsView,
        Capability::DisbursementsApprove,
        Capability::ProjectsView,
        Capability::ProjectsManage,
        Capability::ApprovalsView,
        Capability::ApprovalsManage,
        Capability::ComplianceView,
        Capability::ReportsView,
        Capability::ReportsManage,
        Capability::IssuesView,
        Capability::ExecutiveView,
        Capability::DashboardCustomize,
        Capability::UsersManage,
    ];

    /// The wire token for this capability.
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::BudgetsView => "budgets.view",
            Capability::BudgetsManage => "budgets.manage",
            Capability::DisbursementsView => "disbursements.view",
            Capability::DisbursementsApprove => "disbursements.approve",
            Capability::ProjectsView => "projects.view",
            Capability::ProjectsManage => "projects.manage",
            Capability::ApprovalsView => "approvals.view",
            Capability::ApprovalsManage => "approvals.manage",
            Capability::ComplianceView => "compliance.view",
            Capability::ReportsView => "reports.view",
            Capability::ReportsManage => "reports.manage",
            Capability::IssuesView => "issues.view",
            Capability::ExecutiveView => "executive.view",
            Capability::DashboardCustomize => "dashboard.customize",
            Capability::UsersManage => "users.manage",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = CoreError;

    /// Exact, case-sensitive match against the known vocabulary.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.as_str() == token)
            .ok_or_else(|| CoreError::Validation(format!("Unknown capability '{token}'")))
    }
}

// ---------------------------------------------------------------------------
// CapabilitySet
// ---------------------------------------------------------------------------

/// The effective set of capabilities a session holds.
///
/// Admin sessions hold [`CapabilitySet::all`], so every check (resolver and
/// widget filter alike) consults the same set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full vocabulary.
    pub fn all() -> Self {
        Capability::ALL.into_iter().collect()
    }

    /// Parse raw tokens. Fails on the first unknown token.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, CoreError> {
        tokens
            .iter()
            .map(|t| t.as_ref().parse::<Capability>())
            .collect()
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn insert(&mut self, capability: Capability) -> bool {
        self.0.insert(capability)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }

    /// Wire tokens in set order.
    pub fn tokens(&self) -> Vec<&'static str> {
        self.iter().map(Capability::as_str).collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Capability; N]> for CapabilitySet {
    fn from(caps: [Capability; N]) -> Self {
        caps.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn token_round_trips_through_from_str() {
        for cap in Capability::ALL {
            assert_eq!(cap.as_str().parse::<Capability>().unwrap(), cap);
        }
    }

    #[test]
    fn serde_uses_wire_token() {
        let json = serde_json::to_string(&Capability::BudgetsView).unwrap();
        assert_eq!(json, "\"budgets.view\"");
        let parsed: Capability = serde_json::from_str("\"approvals.manage\"").unwrap();
        assert_eq!(parsed, Capability::ApprovalsManage);
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert_matches!("Budgets.View".parse::<Capability>(), Err(CoreError::Validation(_)));
        assert_matches!(" budgets.view".parse::<Capability>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn set_parse_rejects_unknown_token() {
        let result = CapabilitySet::parse(&["budgets.view", "budgets.delete"]);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("budgets.delete"));
    }

    #[test]
    fn set_parse_deduplicates() {
        let set = CapabilitySet::parse(&["projects.view", "projects.view"]).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(Capability::ProjectsView));
    }

    #[test]
    fn all_contains_every_capability() {
        let all = CapabilitySet::all();
        assert_eq!(all.len(), Capability::ALL.len());
        assert!(Capability::ALL.iter().all(|c| all.contains(*c)));
    }

    #[test]
    fn set_serializes_as_token_array() {
        let set = CapabilitySet::from([Capability::ReportsView, Capability::BudgetsView]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json, serde_json::json!(["budgets.view", "reports.view"]));
    }
}
