// Dashboard domain model
use super::panel::{DashboardPanel, PanelId};
use super::payload::VisualizationPayload;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub id: String,
    pub name: String,
    pub panels: Vec<DashboardPanel>,
}

impl Dashboard {
    pub fn new(id: String, name: String, panels: Vec<DashboardPanel>) -> Self {
        Self { id, name, panels }
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            panel_count: self.panels.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub id: String,
    pub name: String,
    pub panel_count: usize,
}

/// Result of building one panel as part of a dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PanelOutcome {
    Ready {
        #[serde(flatten)]
        payload: VisualizationPayload,
    },
    Failed {
        id: PanelId,
        title: String,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderedDashboard {
    pub id: String,
    pub name: String,
    pub panels: Vec<PanelOutcome>,
}
