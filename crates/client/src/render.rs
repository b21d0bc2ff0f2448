//! Resolve a dashboard's widgets to the components that draw them.

use grantboard_core::widget::{DashboardConfig, WidgetComponent, WidgetConfig};

/// One widget paired with its known component.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub component: WidgetComponent,
    pub widget: WidgetConfig,
}

/// Map each widget to its component, in dashboard order.
///
/// Widgets naming a component outside [`WidgetComponent`] are skipped with a
/// warning; the rest of the dashboard still renders.
pub fn resolve_render_plan(config: &DashboardConfig) -> Vec<RenderItem> {
    config
        .widgets
        .iter()
        .filter_map(|widget| match WidgetComponent::from_name(&widget.component) {
            Some(component) => Some(RenderItem {
                component,
                widget: widget.clone(),
            }),
            None => {
                tracing::warn!(
                    dashboard_id = %config.id,
                    widget_id = %widget.id,
                    component = %widget.component,
                    "Skipping widget with unknown component",
                );
                None
            }
        })
        .collect()
}
