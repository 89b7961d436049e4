// Series builder - shape one value's points into plot traces
use crate::application::hover::HoverProvider;
use crate::domain::panel::{PanelValue, PlotType};
use crate::domain::payload::{Trace, TraceMode, TraceType, TraceX};
use crate::domain::telemetry::{MetricPointSet, Point};

/// Emit one trace per matched metric, in metric order.
///
/// Each metric's points are sorted by timestamp on a copy; the stored
/// points are left as they are. An empty set yields no traces.
pub fn build_traces(
    plot_type: PlotType,
    value: &PanelValue,
    points: &MetricPointSet,
    hover: &dyn HoverProvider,
) -> Vec<Trace> {
    points
        .iter()
        .map(|(metric, metric_points)| {
            let mut sorted: Vec<Point> = metric_points.to_vec();
            sorted.sort_by_key(|p| p.timestamp);

            let hover_template = hover.metric_hover(metric, value);
            trace_for(plot_type, value, &sorted, hover_template)
        })
        .collect()
}

fn trace_for(plot_type: PlotType, value: &PanelValue, points: &[Point], hover_template: String) -> Trace {
    let values: Vec<Option<f64>> = points.iter().map(|p| p.value).collect();

    let (trace_type, mode) = match plot_type {
        PlotType::Histogram => {
            return Trace {
                trace_type: TraceType::Histogram,
                mode: None,
                name: value.legend.clone(),
                legend_group: value.legend.clone(),
                hover_template,
                x: TraceX::Values(values),
                y: None,
            };
        }
        PlotType::Scatter => (TraceType::Scatter, Some(TraceMode::Markers)),
        PlotType::Line => (TraceType::Scatter, Some(TraceMode::Lines)),
        PlotType::Bar => (TraceType::Bar, None),
    };

    Trace {
        trace_type,
        mode,
        name: value.legend.clone(),
        legend_group: value.legend.clone(),
        hover_template,
        x: TraceX::Timestamps(points.iter().map(|p| p.timestamp).collect()),
        y: Some(values),
    }
}
