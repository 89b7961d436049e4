// Panel build errors
use super::panel::CounterAgg;
use thiserror::Error;

/// Panel specification is self-contradictory; never retried
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Counters with an aggregation must declare a value")]
    MissingCounterValue,
    #[error("Unsupported plot type '{0}'")]
    UnsupportedPlotType(String),
    #[error("Unsupported counter aggregation '{0}'")]
    UnsupportedAggregation(String),
    #[error("Aggregation '{0}' does not reduce points")]
    NotAggregatable(CounterAgg),
    #[error("Panel id '{0}' is declared more than once")]
    DuplicatePanelId(String),
}

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("Point query failed: {0:#}")]
    UpstreamQuery(#[source] anyhow::Error),
}
