// Dashboard service - Use case for building dashboards
use crate::application::panel_builder::PanelBuilder;
use crate::application::panel_registry::PanelRegistry;
use crate::domain::dashboard::{DashboardSummary, PanelOutcome, RenderedDashboard};
use crate::domain::error::PanelError;
use crate::domain::payload::VisualizationPayload;
use crate::domain::telemetry::{ProjectId, TimeWindow};
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Dashboard '{0}' not found")]
    DashboardNotFound(String),
    #[error("Panel '{0}' not found")]
    PanelNotFound(String),
    #[error(transparent)]
    Panel(#[from] PanelError),
}

#[derive(Clone)]
pub struct DashboardService {
    registry: Arc<PanelRegistry>,
    builder: PanelBuilder,
}

impl DashboardService {
    pub fn new(registry: Arc<PanelRegistry>, builder: PanelBuilder) -> Self {
        Self { registry, builder }
    }

    pub fn list(&self) -> Vec<DashboardSummary> {
        self.registry.dashboards().iter().map(|d| d.summary()).collect()
    }

    /// Build every panel of a dashboard concurrently.
    ///
    /// Outcomes keep declaration order. A failing panel is reported in place
    /// and does not hide the others.
    pub async fn render(
        &self,
        project: &ProjectId,
        dashboard_id: &str,
        window: &TimeWindow,
    ) -> Result<RenderedDashboard, ServiceError> {
        let dashboard = self
            .registry
            .dashboard(dashboard_id)
            .ok_or_else(|| ServiceError::DashboardNotFound(dashboard_id.to_string()))?;

        let builds = dashboard
            .panels
            .iter()
            .map(|panel| self.builder.build(panel, project, window));
        let results = join_all(builds).await;

        let panels = dashboard
            .panels
            .iter()
            .zip(results)
            .map(|(panel, result)| match result {
                Ok(payload) => PanelOutcome::Ready { payload },
                Err(e) => {
                    tracing::error!("Error building panel {} for {}: {}", panel.id, project, e);
                    PanelOutcome::Failed {
                        id: panel.id.clone(),
                        title: panel.title.clone(),
                        error: e.to_string(),
                    }
                }
            })
            .collect();

        Ok(RenderedDashboard {
            id: dashboard.id.clone(),
            name: dashboard.name.clone(),
            panels,
        })
    }

    pub async fn render_panel(
        &self,
        project: &ProjectId,
        panel_id: &str,
        window: &TimeWindow,
    ) -> Result<VisualizationPayload, ServiceError> {
        let panel = self
            .registry
            .panel(panel_id)
            .ok_or_else(|| ServiceError::PanelNotFound(panel_id.to_string()))?;

        Ok(self.builder.build(panel, project, window).await?)
    }
}
