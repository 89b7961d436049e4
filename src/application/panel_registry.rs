// Panel registry - turn dashboard configuration into immutable panels
use crate::domain::dashboard::Dashboard;
use crate::domain::error::ConfigurationError;
use crate::domain::panel::{
    CounterAgg, CounterPanel, DashboardPanel, PanelId, PanelKind, PlotPanel, PlotType,
};
use crate::infrastructure::config::{DashboardsConfig, PanelConfig, PanelKindConfig};
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct PanelRegistry {
    dashboards: Vec<Dashboard>,
}

impl PanelRegistry {
    /// Build every configured dashboard, assigning panel ids up front.
    ///
    /// A panel without an explicit id gets `{dashboard}-{index}`. Ids must be
    /// unique across the registry.
    pub fn from_config(config: DashboardsConfig) -> Result<Self, ConfigurationError> {
        let mut seen = HashSet::new();
        let mut dashboards = Vec::with_capacity(config.dashboards.len());

        for dashboard in config.dashboards {
            let mut panels = Vec::with_capacity(dashboard.panels.len());
            for (index, panel_config) in dashboard.panels.into_iter().enumerate() {
                let id = panel_config
                    .id
                    .clone()
                    .unwrap_or_else(|| format!("{}-{}", dashboard.id, index));
                if !seen.insert(id.clone()) {
                    return Err(ConfigurationError::DuplicatePanelId(id));
                }
                panels.push(build_panel(PanelId::new(id), panel_config)?);
            }

            tracing::debug!("Registered dashboard {} with {} panels", dashboard.id, panels.len());
            dashboards.push(Dashboard::new(dashboard.id, dashboard.name, panels));
        }

        Ok(Self { dashboards })
    }

    pub fn dashboards(&self) -> &[Dashboard] {
        &self.dashboards
    }

    pub fn dashboard(&self, id: &str) -> Option<&Dashboard> {
        self.dashboards.iter().find(|d| d.id == id)
    }

    pub fn panel(&self, id: &str) -> Option<&DashboardPanel> {
        self.dashboards
            .iter()
            .flat_map(|d| d.panels.iter())
            .find(|p| p.id.as_str() == id)
    }
}

fn build_panel(id: PanelId, config: PanelConfig) -> Result<DashboardPanel, ConfigurationError> {
    let kind = match config.kind {
        PanelKindConfig::Plot => {
            let plot_type: PlotType = config.plot_type.as_deref().unwrap_or("line").parse()?;
            PanelKind::Plot(PlotPanel {
                values: config.values,
                plot_type,
            })
        }
        PanelKindConfig::Counter => {
            let agg: CounterAgg = config.agg.as_deref().unwrap_or("none").parse()?;
            PanelKind::Counter(CounterPanel {
                agg,
                value: config.value,
                text: config.text,
            })
        }
    };

    Ok(DashboardPanel::new(id, config.title, kind)
        .with_filter(config.filter)
        .with_size(config.size))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> DashboardsConfig {
        toml::from_str(raw).unwrap()
    }

    #[test]
    fn test_ids_are_assigned_explicitly() {
        let config = parse(
            r#"
            [[dashboards]]
            id = "main"
            name = "Main"

            [[dashboards.panels]]
            title = "Status"
            kind = "counter"
            text = "Ready"

            [[dashboards.panels]]
            id = "rows"
            title = "Rows"
            kind = "plot"
            plot_type = "bar"
            "#,
        );

        let registry = PanelRegistry::from_config(config).unwrap();
        let dashboard = registry.dashboard("main").unwrap();

        assert_eq!(dashboard.panels[0].id, PanelId::new("main-0"));
        assert_eq!(dashboard.panels[1].id, PanelId::new("rows"));
        assert!(matches!(
            &registry.panel("rows").unwrap().kind,
            PanelKind::Plot(PlotPanel { plot_type: PlotType::Bar, .. })
        ));
        assert!(matches!(
            &registry.panel("main-0").unwrap().kind,
            PanelKind::Counter(CounterPanel { agg: CounterAgg::None, .. })
        ));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let config = parse(
            r#"
            [[dashboards]]
            id = "a"
            name = "A"
            [[dashboards.panels]]
            id = "x"
            title = "X"
            kind = "counter"

            [[dashboards]]
            id = "b"
            name = "B"
            [[dashboards.panels]]
            id = "x"
            title = "X again"
            kind = "counter"
            "#,
        );

        assert!(matches!(
            PanelRegistry::from_config(config),
            Err(ConfigurationError::DuplicatePanelId(id)) if id == "x"
        ));
    }

    #[test]
    fn test_unknown_plot_type_is_rejected() {
        let config = parse(
            r#"
            [[dashboards]]
            id = "a"
            name = "A"
            [[dashboards.panels]]
            title = "Pie"
            kind = "plot"
            plot_type = "pie"
            "#,
        );

        assert!(matches!(
            PanelRegistry::from_config(config),
            Err(ConfigurationError::UnsupportedPlotType(_))
        ));
    }

    #[test]
    fn test_unknown_aggregation_is_rejected() {
        let config = parse(
            r#"
            [[dashboards]]
            id = "a"
            name = "A"
            [[dashboards.panels]]
            title = "Avg"
            kind = "counter"
            agg = "mean"
            "#,
        );

        assert!(matches!(
            PanelRegistry::from_config(config),
            Err(ConfigurationError::UnsupportedAggregation(agg)) if agg == "mean"
        ));
    }
}
