// Visualization payloads handed to the rendering backend
use super::panel::{PanelId, PanelSize};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VisualizationPayload {
    Figure {
        id: PanelId,
        title: String,
        size: PanelSize,
        traces: Vec<Trace>,
    },
    Counter {
        id: PanelId,
        title: String,
        size: PanelSize,
        counters: Vec<CounterData>,
    },
}

impl VisualizationPayload {
    pub fn traces(&self) -> &[Trace] {
        match self {
            VisualizationPayload::Figure { traces, .. } => traces,
            VisualizationPayload::Counter { .. } => &[],
        }
    }

    pub fn counters(&self) -> &[CounterData] {
        match self {
            VisualizationPayload::Figure { .. } => &[],
            VisualizationPayload::Counter { counters, .. } => counters,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceType {
    Histogram,
    Scatter,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Markers,
    Lines,
}

/// Horizontal axis data: raw values for histograms, timestamps otherwise
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TraceX {
    Values(Vec<Option<f64>>),
    Timestamps(Vec<DateTime<Utc>>),
}

/// One drawable series within a figure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub trace_type: TraceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TraceMode>,
    pub name: String,
    #[serde(rename = "legendgroup")]
    pub legend_group: String,
    #[serde(rename = "hovertemplate")]
    pub hover_template: String,
    pub x: TraceX,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterData {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl CounterData {
    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            precision: None,
        }
    }

    pub fn int(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
            precision: None,
        }
    }

    pub fn float(label: impl Into<String>, value: f64, precision: u32) -> Self {
        Self {
            label: label.into(),
            value: format!("{:.*}", precision as usize, value),
            precision: Some(precision),
        }
    }
}
