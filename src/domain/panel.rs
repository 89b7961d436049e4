// Panel domain model - declarative description of one dashboard visualization
use super::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Identity of a panel, assigned by the registry before any build
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(pub String);

impl PanelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One requested data series within a panel
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PanelValue {
    /// Metric type to match (an Influx measurement)
    pub metric: String,
    /// Field path read from every matched metric
    pub field: String,
    /// Label equalities a metric must carry to match
    #[serde(default)]
    pub metric_args: BTreeMap<String, String>,
    pub legend: String,
}

impl PanelValue {
    pub fn new(metric: impl Into<String>, field: impl Into<String>, legend: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            field: field.into(),
            metric_args: BTreeMap::new(),
            legend: legend.into(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metric_args.insert(key.into(), value.into());
        self
    }
}

/// Label filter applied by storage to every value of a panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PanelFilter {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelSize {
    Half,
    #[default]
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotType {
    Histogram,
    Scatter,
    Bar,
    Line,
}

impl FromStr for PlotType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "histogram" => Ok(PlotType::Histogram),
            "scatter" => Ok(PlotType::Scatter),
            "bar" => Ok(PlotType::Bar),
            "line" => Ok(PlotType::Line),
            _ => Err(ConfigurationError::UnsupportedPlotType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterAgg {
    None,
    Last,
    Sum,
}

impl FromStr for CounterAgg {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(CounterAgg::None),
            "last" => Ok(CounterAgg::Last),
            "sum" => Ok(CounterAgg::Sum),
            _ => Err(ConfigurationError::UnsupportedAggregation(s.to_string())),
        }
    }
}

impl fmt::Display for CounterAgg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CounterAgg::None => "none",
            CounterAgg::Last => "last",
            CounterAgg::Sum => "sum",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotPanel {
    /// Declaration order is legend and trace order
    pub values: Vec<PanelValue>,
    pub plot_type: PlotType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CounterPanel {
    pub agg: CounterAgg,
    pub value: Option<PanelValue>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelKind {
    Plot(PlotPanel),
    Counter(CounterPanel),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardPanel {
    pub id: PanelId,
    pub title: String,
    pub filter: PanelFilter,
    pub size: PanelSize,
    pub kind: PanelKind,
}

impl DashboardPanel {
    pub fn new(id: PanelId, title: impl Into<String>, kind: PanelKind) -> Self {
        Self {
            id,
            title: title.into(),
            filter: PanelFilter::default(),
            size: PanelSize::default(),
            kind,
        }
    }

    pub fn with_filter(mut self, filter: PanelFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_size(mut self, size: PanelSize) -> Self {
        self.size = size;
        self
    }
}
