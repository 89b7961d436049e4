// Hover text templates for plotted traces
use crate::domain::panel::PanelValue;
use crate::domain::telemetry::MetricKey;

pub trait HoverProvider: Send + Sync {
    /// Hover template describing one (metric, value) combination
    fn metric_hover(&self, metric: &MetricKey, value: &PanelValue) -> String;
}

/// Lists the metric name, its labels in key order, and the field path
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricHover;

impl HoverProvider for MetricHover {
    fn metric_hover(&self, metric: &MetricKey, value: &PanelValue) -> String {
        let mut lines = vec![
            "<b>Timestamp: %{x}</b>".to_string(),
            "<b>Value: %{y}</b>".to_string(),
            metric.name.clone(),
        ];
        lines.extend(metric.labels.iter().map(|(k, v)| format!("{}: {}", k, v)));
        lines.push(format!(".{}", value.field));
        lines.join("<br>")
    }
}
