//! Capability re-check applied to every assembled widget list.

use crate::capability::CapabilitySet;
use crate::widget::WidgetConfig;

/// Keep unguarded widgets and guarded widgets whose capability is held.
///
/// Pass the session's effective set (see
/// [`SessionState::capabilities`](crate::session::SessionState::capabilities));
/// for admins that is the whole vocabulary, so nothing is dropped.
pub fn filter_widgets_by_capabilities(
    widgets: Vec<WidgetConfig>,
    capabilities: &CapabilitySet,
) -> Vec<WidgetConfig> {
    widgets
        .into_iter()
        .filter(|w| w.capability.map_or(true, |cap| capabilities.contains(cap)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability;
    use crate::session::{SessionState, SessionUser};
    use crate::widget::{WidgetComponent, WidgetType};

    fn widgets() -> Vec<WidgetConfig> {
        vec![
            WidgetConfig::new("open", WidgetType::Action, WidgetComponent::QuickActions, None),
            WidgetConfig::new(
                "budget",
                WidgetType::Kpi,
                WidgetComponent::BudgetKpi,
                Some(Capability::BudgetsView),
            ),
            WidgetConfig::new(
                "users",
                WidgetType::Custom,
                WidgetComponent::PortfolioOverview,
                Some(Capability::UsersManage),
            ),
        ]
    }

    fn ids(widgets: &[WidgetConfig]) -> Vec<&str> {
        widgets.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn unguarded_widgets_always_kept() {
        let kept = filter_widgets_by_capabilities(widgets(), &CapabilitySet::new());
        assert_eq!(ids(&kept), vec!["open"]);
    }

    #[test]
    fn guarded_widgets_kept_iff_held() {
        let caps = CapabilitySet::from([Capability::BudgetsView]);
        let kept = filter_widgets_by_capabilities(widgets(), &caps);
        assert_eq!(ids(&kept), vec!["open", "budget"]);
    }

    #[test]
    fn admin_effective_set_keeps_admin_only_widgets() {
        let none: [&str; 0] = [];
        let admin: SessionState = SessionUser::from_tokens(1, "Ada", "admin", &none)
            .unwrap()
            .into();
        let kept = filter_widgets_by_capabilities(widgets(), &admin.capabilities());
        assert_eq!(ids(&kept), vec!["open", "budget", "users"]);
    }

    #[test]
    fn order_is_preserved() {
        let mut input = widgets();
        input.reverse();
        let kept = filter_widgets_by_capabilities(input, &CapabilitySet::all());
        assert_eq!(ids(&kept), vec!["users", "budget", "open"]);
    }
}
