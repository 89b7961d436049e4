// Storage port for time-series points
use crate::domain::panel::{PanelFilter, PanelValue};
use crate::domain::telemetry::{ProjectId, QueryResult, TimeWindow};
use async_trait::async_trait;

#[async_trait]
pub trait PointStorage: Send + Sync {
    /// Load the points for every requested value in a single query.
    ///
    /// The result holds one point set per value, in the same order as
    /// `values`. A value that matches no metric yields an empty set.
    async fn load_points(
        &self,
        project: &ProjectId,
        filter: &PanelFilter,
        values: &[PanelValue],
        window: &TimeWindow,
    ) -> anyhow::Result<QueryResult>;
}
