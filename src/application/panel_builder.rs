// Panel builder - query points once and turn them into a payload
use crate::application::aggregator::{aggregate, format_counter};
use crate::application::hover::HoverProvider;
use crate::application::point_storage::PointStorage;
use crate::application::series_builder::build_traces;
use crate::domain::error::{ConfigurationError, PanelError};
use crate::domain::panel::{CounterAgg, CounterPanel, DashboardPanel, PanelKind, PanelValue, PlotPanel};
use crate::domain::payload::{CounterData, VisualizationPayload};
use crate::domain::telemetry::{ProjectId, QueryResult, TimeWindow};
use std::sync::Arc;

#[derive(Clone)]
pub struct PanelBuilder {
    storage: Arc<dyn PointStorage>,
    hover: Arc<dyn HoverProvider>,
}

impl PanelBuilder {
    pub fn new(storage: Arc<dyn PointStorage>, hover: Arc<dyn HoverProvider>) -> Self {
        Self { storage, hover }
    }

    pub async fn build(
        &self,
        panel: &DashboardPanel,
        project: &ProjectId,
        window: &TimeWindow,
    ) -> Result<VisualizationPayload, PanelError> {
        match &panel.kind {
            PanelKind::Plot(plot) => self.build_plot(panel, plot, project, window).await,
            PanelKind::Counter(counter) => self.build_counter(panel, counter, project, window).await,
        }
    }

    async fn build_plot(
        &self,
        panel: &DashboardPanel,
        plot: &PlotPanel,
        project: &ProjectId,
        window: &TimeWindow,
    ) -> Result<VisualizationPayload, PanelError> {
        let points = self.load(panel, &plot.values, project, window).await?;

        let mut traces = Vec::new();
        for (value, metric_points) in plot.values.iter().zip(points.iter()) {
            if metric_points.is_empty() {
                tracing::warn!(
                    "Panel {}: value '{}' matched no metrics",
                    panel.id, value.legend
                );
                continue;
            }
            traces.extend(build_traces(
                plot.plot_type,
                value,
                metric_points,
                self.hover.as_ref(),
            ));
        }

        tracing::debug!("Built panel {} with {} traces", panel.id, traces.len());

        Ok(VisualizationPayload::Figure {
            id: panel.id.clone(),
            title: panel.title.clone(),
            size: panel.size,
            traces,
        })
    }

    async fn build_counter(
        &self,
        panel: &DashboardPanel,
        counter: &CounterPanel,
        project: &ProjectId,
        window: &TimeWindow,
    ) -> Result<VisualizationPayload, PanelError> {
        let label = counter.text.clone().unwrap_or_default();

        if counter.agg == CounterAgg::None {
            return Ok(VisualizationPayload::Counter {
                id: panel.id.clone(),
                title: panel.title.clone(),
                size: panel.size,
                counters: vec![CounterData::text(panel.title.clone(), label)],
            });
        }

        let value = counter
            .value
            .as_ref()
            .ok_or(ConfigurationError::MissingCounterValue)?;

        let mut points = self
            .load(panel, std::slice::from_ref(value), project, window)
            .await?;
        let metric_points = points.swap_remove(0);
        let aggregated = aggregate(counter.agg, &metric_points)?;

        tracing::debug!(
            "Panel {}: {} over {} metrics = {}",
            panel.id,
            counter.agg,
            metric_points.len(),
            aggregated
        );

        Ok(VisualizationPayload::Counter {
            id: panel.id.clone(),
            title: panel.title.clone(),
            size: panel.size,
            counters: vec![format_counter(label, aggregated)],
        })
    }

    async fn load(
        &self,
        panel: &DashboardPanel,
        values: &[PanelValue],
        project: &ProjectId,
        window: &TimeWindow,
    ) -> Result<QueryResult, PanelError> {
        let points = self
            .storage
            .load_points(project, &panel.filter, values, window)
            .await
            .map_err(PanelError::UpstreamQuery)?;

        if points.len() != values.len() {
            return Err(PanelError::UpstreamQuery(anyhow::anyhow!(
                "storage returned {} point sets for {} values",
                points.len(),
                values.len()
            )));
        }

        Ok(points)
    }
}
