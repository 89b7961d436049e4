// Telemetry data domain models
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Project whose points are queried
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

impl Point {
    pub fn new(timestamp: DateTime<Utc>, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }
}

/// Identity of one matched metric: its name plus the labels that tell it apart
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricKey {
    pub name: String,
    pub labels: BTreeMap<String, String>,
}

impl MetricKey {
    pub fn new(name: impl Into<String>, labels: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            labels,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, BTreeMap::new())
    }
}

/// Points returned for one panel value, grouped by matched metric.
///
/// Entries keep the order storage produced them in; that order is the
/// metric iteration order used when emitting traces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricPointSet {
    entries: Vec<(MetricKey, Vec<Point>)>,
}

impl MetricPointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append points for a metric, merging into an existing entry for the same key
    pub fn push(&mut self, metric: MetricKey, points: Vec<Point>) {
        match self.entries.iter_mut().find(|(key, _)| *key == metric) {
            Some((_, existing)) => existing.extend(points),
            None => self.entries.push((metric, points)),
        }
    }

    pub fn with_metric(mut self, metric: MetricKey, points: Vec<Point>) -> Self {
        self.push(metric, points);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MetricKey, &[Point])> {
        self.entries.iter().map(|(key, points)| (key, points.as_slice()))
    }

    /// Every point of every metric, metric order first, then storage order
    pub fn all_points(&self) -> impl Iterator<Item = &Point> {
        self.entries.iter().flat_map(|(_, points)| points.iter())
    }
}

/// One point set per requested value, positionally aligned with the request
pub type QueryResult = Vec<MetricPointSet>;

/// Inclusive time window; a missing bound leaves that side open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    pub fn unbounded() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_push_merges_same_metric() {
        let mut set = MetricPointSet::new();
        set.push(MetricKey::named("cpu"), vec![Point::new(at(1), Some(1.0))]);
        set.push(MetricKey::named("mem"), vec![Point::new(at(1), Some(2.0))]);
        set.push(MetricKey::named("cpu"), vec![Point::new(at(2), Some(3.0))]);

        assert_eq!(set.len(), 2);
        let names: Vec<&str> = set.iter().map(|(k, _)| k.name.as_str()).collect();
        assert_eq!(names, vec!["cpu", "mem"]);
        assert_eq!(set.iter().next().unwrap().1.len(), 2);
        assert_eq!(set.all_points().count(), 3);
    }
}
