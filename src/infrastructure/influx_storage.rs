// InfluxDB point storage implementation
use crate::application::point_storage::PointStorage;
use crate::domain::panel::{PanelFilter, PanelValue};
use crate::domain::telemetry::{MetricKey, MetricPointSet, Point, ProjectId, QueryResult, TimeWindow};
use crate::infrastructure::config::{prepare_query, InfluxSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

const STATEMENT_TEMPLATE: &str =
    "SELECT \"${field}\" AS \"value\" FROM \"${metric}\" WHERE ${conditions} GROUP BY *";

#[derive(Debug, Clone)]
pub struct InfluxPointStorage {
    host: String,
    token: String,
    database: String,
    retention_policy: String,
    project_tag: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResponse {
    #[serde(default)]
    results: Vec<InfluxQLResult>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLResult {
    #[serde(default)]
    statement_id: Option<usize>,
    #[serde(default)]
    series: Option<Vec<InfluxQLSeries>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluxQLSeries {
    name: String,
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
    #[serde(default)]
    tags: Option<BTreeMap<String, String>>,
}

impl InfluxPointStorage {
    pub fn new(settings: InfluxSettings) -> Self {
        Self {
            host: settings.host.trim_end_matches('/').to_string(),
            token: settings.token,
            database: settings.database,
            retention_policy: settings.retention_policy,
            project_tag: settings.project_tag,
            client: reqwest::Client::new(),
        }
    }

    fn build_query_url(&self, query: &str) -> String {
        let encoded_query = urlencoding::encode(query);
        format!(
            "{}/query?db={}&rp={}&q={}",
            self.host, self.database, self.retention_policy, encoded_query
        )
    }

    /// One SELECT per value; every matched series is one metric
    fn build_statement(
        &self,
        project: &ProjectId,
        filter: &PanelFilter,
        value: &PanelValue,
        window: &TimeWindow,
    ) -> String {
        let mut conditions = vec![equals(&self.project_tag, project.as_str())];
        conditions.extend(
            filter
                .labels
                .iter()
                .chain(value.metric_args.iter())
                .map(|(k, v)| equals(k, v)),
        );
        if let Some(start) = window.start {
            conditions.push(format!("time >= '{}'", rfc3339(start)));
        }
        if let Some(end) = window.end {
            conditions.push(format!("time <= '{}'", rfc3339(end)));
        }

        let mut vars = HashMap::new();
        vars.insert("field".to_string(), escape_identifier(&value.field));
        vars.insert("metric".to_string(), escape_identifier(&value.metric));
        vars.insert("conditions".to_string(), conditions.join(" AND "));
        prepare_query(STATEMENT_TEMPLATE, &vars)
    }

    async fn execute_query(&self, query: &str) -> Result<String> {
        let url = self.build_query_url(query);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to InfluxDB")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("InfluxDB query failed with status {}: {}", status, body);
        }

        response
            .text()
            .await
            .context("Failed to read InfluxDB response")
    }
}

#[async_trait]
impl PointStorage for InfluxPointStorage {
    async fn load_points(
        &self,
        project: &ProjectId,
        filter: &PanelFilter,
        values: &[PanelValue],
        window: &TimeWindow,
    ) -> Result<QueryResult> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let query = values
            .iter()
            .map(|value| self.build_statement(project, filter, value, window))
            .collect::<Vec<_>>()
            .join("; ");

        tracing::debug!("Executing point query for {}: {}", project, query);
        let body = self.execute_query(&query).await?;
        let points = parse_response(&body, values.len())?;

        tracing::debug!(
            "Loaded {} metrics for {} values of {}",
            points.iter().map(MetricPointSet::len).sum::<usize>(),
            values.len(),
            project
        );
        Ok(points)
    }
}

/// Split a multi-statement response into one point set per statement
fn parse_response(body: &str, statements: usize) -> Result<QueryResult> {
    let response: InfluxQLResponse =
        serde_json::from_str(body).context("Failed to parse InfluxDB response")?;

    let mut sets = vec![MetricPointSet::new(); statements];
    for (position, result) in response.results.into_iter().enumerate() {
        let index = result.statement_id.unwrap_or(position);
        if let Some(error) = result.error {
            anyhow::bail!("InfluxDB statement {} failed: {}", index, error);
        }
        let set = sets
            .get_mut(index)
            .with_context(|| format!("InfluxDB returned unknown statement {}", index))?;

        for series in result.series.unwrap_or_default() {
            let time_idx = series.columns.iter().position(|c| c == "time");
            let value_idx = series.columns.iter().position(|c| c == "value");
            let (Some(time_idx), Some(value_idx)) = (time_idx, value_idx) else {
                tracing::warn!(
                    "Skipping series {} of statement {}: columns {:?} lack time or value",
                    series.name, index, series.columns
                );
                continue;
            };

            let points = series
                .values
                .iter()
                .filter_map(|row| {
                    let time = row.get(time_idx)?.as_str()?;
                    let timestamp = DateTime::parse_from_rfc3339(time).ok()?.with_timezone(&Utc);
                    let value = row.get(value_idx).and_then(serde_json::Value::as_f64);
                    Some(Point::new(timestamp, value))
                })
                .collect();

            set.push(MetricKey::new(series.name, series.tags.unwrap_or_default()), points);
        }
    }

    Ok(sets)
}

fn rfc3339(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn escape_identifier(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

fn equals(tag: &str, value: &str) -> String {
    format!(
        "\"{}\" = '{}'",
        escape_identifier(tag),
        value.replace('\\', "\\\\").replace('\'', "\\'")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn storage() -> InfluxPointStorage {
        InfluxPointStorage::new(InfluxSettings {
            host: "http://influx:8086/".to_string(),
            token: "secret".to_string(),
            database: "metrics".to_string(),
            retention_policy: "autogen".to_string(),
            project_tag: "project".to_string(),
        })
    }

    #[test]
    fn test_build_statement() {
        let mut filter = PanelFilter::default();
        filter.labels.insert("dataset".to_string(), "current".to_string());
        let value = PanelValue::new("drift", "share", "Drift").with_arg("column", "o'brien");
        let window = TimeWindow::new(Some(Utc.timestamp_opt(0, 0).unwrap()), None);

        let statement = storage().build_statement(&ProjectId::new("p1"), &filter, &value, &window);

        assert_eq!(
            statement,
            "SELECT \"share\" AS \"value\" FROM \"drift\" WHERE \"project\" = 'p1' AND \"dataset\" = 'current' AND \"column\" = 'o\\'brien' AND time >= '1970-01-01T00:00:00Z' GROUP BY *"
        );
    }

    #[test]
    fn test_build_statement_keeps_placeholder_like_labels() {
        let value = PanelValue::new("drift", "share", "Drift").with_arg("note", "${field}");
        let expected = "SELECT \"share\" AS \"value\" FROM \"drift\" WHERE \"project\" = 'p1' AND \"note\" = '${field}' GROUP BY *";

        for _ in 0..50 {
            let statement = storage().build_statement(
                &ProjectId::new("p1"),
                &PanelFilter::default(),
                &value,
                &TimeWindow::unbounded(),
            );
            assert_eq!(statement, expected);
        }
    }

    #[test]
    fn test_build_query_url_trims_host() {
        let url = storage().build_query_url("SELECT 1");
        assert_eq!(url, "http://influx:8086/query?db=metrics&rp=autogen&q=SELECT%201");
    }

    #[test]
    fn test_parse_response_aligns_statements() {
        let body = r#"{
            "results": [
                {"statement_id": 0, "series": [
                    {"name": "drift", "tags": {"column": "age"}, "columns": ["time", "value"],
                     "values": [["2024-01-01T00:00:10Z", 0.5], ["2024-01-01T00:00:00Z", null]]},
                    {"name": "drift", "tags": {"column": "sex"}, "columns": ["time", "value"],
                     "values": [["not a time", 1.0], ["2024-01-01T00:00:00Z", 0.2]]}
                ]},
                {"statement_id": 1}
            ]
        }"#;

        let sets = parse_response(body, 2).unwrap();

        assert_eq!(sets.len(), 2);
        assert!(sets[1].is_empty());

        let metrics: Vec<(&MetricKey, &[Point])> = sets[0].iter().collect();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].0.labels["column"], "age");
        assert_eq!(metrics[0].1.len(), 2);
        assert_eq!(metrics[0].1[1].value, None);
        assert_eq!(metrics[1].1.len(), 1);
        assert_eq!(metrics[1].1[0].value, Some(0.2));
    }

    #[test]
    fn test_parse_response_skips_series_without_value_column() {
        let body = r#"{
            "results": [
                {"statement_id": 0, "series": [
                    {"name": "drift", "columns": ["time", "share"],
                     "values": [["2024-01-01T00:00:00Z", 0.5]]},
                    {"name": "rows", "columns": ["value"], "values": [[3.0]]},
                    {"name": "drift", "tags": {"column": "age"}, "columns": ["time", "value"],
                     "values": [["2024-01-01T00:00:00Z", 0.7]]}
                ]}
            ]
        }"#;

        let sets = parse_response(body, 1).unwrap();

        let metrics: Vec<(&MetricKey, &[Point])> = sets[0].iter().collect();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].0.labels["column"], "age");
        assert_eq!(metrics[0].1[0].value, Some(0.7));
    }

    #[test]
    fn test_parse_response_surfaces_statement_errors() {
        let body = r#"{"results": [{"statement_id": 0, "error": "field not found"}]}"#;
        let err = parse_response(body, 1).unwrap_err();
        assert!(err.to_string().contains("field not found"));
    }

    #[tokio::test]
    async fn test_no_values_skips_http() {
        let points = storage()
            .load_points(
                &ProjectId::new("p1"),
                &PanelFilter::default(),
                &[],
                &TimeWindow::unbounded(),
            )
            .await
            .unwrap();
        assert!(points.is_empty());
    }
}
