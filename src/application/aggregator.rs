// Counter aggregation - reduce a point set to one number
use crate::domain::error::ConfigurationError;
use crate::domain::panel::CounterAgg;
use crate::domain::payload::CounterData;
use crate::domain::telemetry::{MetricPointSet, Point};

const FLOAT_PRECISION: u32 = 3;

/// Reduce every point of every metric in `points` under `agg`.
///
/// `Last` picks the value with the greatest timestamp; on a tie the first
/// such point in metric order wins. Missing values count as 0 and an empty
/// set reduces to 0.
pub fn aggregate(agg: CounterAgg, points: &MetricPointSet) -> Result<f64, ConfigurationError> {
    match agg {
        CounterAgg::Last => Ok(last_value(points)),
        CounterAgg::Sum => Ok(points.all_points().map(|p| p.value.unwrap_or(0.0)).sum()),
        CounterAgg::None => Err(ConfigurationError::NotAggregatable(agg)),
    }
}

fn last_value(points: &MetricPointSet) -> f64 {
    let mut latest: Option<&Point> = None;
    for point in points.all_points() {
        match latest {
            Some(current) if point.timestamp <= current.timestamp => {}
            _ => latest = Some(point),
        }
    }
    latest.and_then(|p| p.value).unwrap_or(0.0)
}

/// Integers render without decimals, anything else with three
pub fn format_counter(label: impl Into<String>, value: f64) -> CounterData {
    if !value.is_finite() || value.fract() != 0.0 {
        return CounterData::float(label, value, FLOAT_PRECISION);
    }
    if value.abs() < i64::MAX as f64 {
        CounterData::int(label, value as i64)
    } else {
        // past i64 range, still an integer
        CounterData::text(label, format!("{:.0}", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::telemetry::MetricKey;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_sum_treats_null_as_zero() {
        let set = MetricPointSet::new().with_metric(
            MetricKey::named("rows"),
            vec![
                Point::new(at(1), Some(5.0)),
                Point::new(at(2), None),
                Point::new(at(3), Some(3.0)),
            ],
        );
        assert_eq!(aggregate(CounterAgg::Sum, &set).unwrap(), 8.0);
    }

    #[test]
    fn test_sum_spans_metrics() {
        let set = MetricPointSet::new()
            .with_metric(MetricKey::named("a"), vec![Point::new(at(1), Some(1.5))])
            .with_metric(MetricKey::named("b"), vec![Point::new(at(1), Some(2.5))]);
        assert_eq!(aggregate(CounterAgg::Sum, &set).unwrap(), 4.0);
    }

    #[test]
    fn test_last_across_metrics() {
        let set = MetricPointSet::new()
            .with_metric(MetricKey::named("m1"), vec![Point::new(at(1), Some(5.0))])
            .with_metric(MetricKey::named("m2"), vec![Point::new(at(2), Some(9.0))]);
        assert_eq!(aggregate(CounterAgg::Last, &set).unwrap(), 9.0);
    }

    #[test]
    fn test_last_ignores_storage_order() {
        let set = MetricPointSet::new().with_metric(
            MetricKey::named("m1"),
            vec![
                Point::new(at(10), Some(7.0)),
                Point::new(at(3), Some(1.0)),
            ],
        );
        assert_eq!(aggregate(CounterAgg::Last, &set).unwrap(), 7.0);
    }

    #[test]
    fn test_last_tie_keeps_first_in_metric_order() {
        let set = MetricPointSet::new()
            .with_metric(MetricKey::named("m1"), vec![Point::new(at(5), Some(1.0))])
            .with_metric(MetricKey::named("m2"), vec![Point::new(at(5), Some(2.0))]);
        assert_eq!(aggregate(CounterAgg::Last, &set).unwrap(), 1.0);
    }

    #[test]
    fn test_empty_sets_reduce_to_zero() {
        let empty = MetricPointSet::new();
        assert_eq!(aggregate(CounterAgg::Last, &empty).unwrap(), 0.0);
        assert_eq!(aggregate(CounterAgg::Sum, &empty).unwrap(), 0.0);

        let no_points = MetricPointSet::new().with_metric(MetricKey::named("m1"), vec![]);
        assert_eq!(aggregate(CounterAgg::Last, &no_points).unwrap(), 0.0);
    }

    #[test]
    fn test_none_is_rejected() {
        let result = aggregate(CounterAgg::None, &MetricPointSet::new());
        assert!(matches!(
            result,
            Err(ConfigurationError::NotAggregatable(CounterAgg::None))
        ));
    }

    #[test]
    fn test_format_counter() {
        assert_eq!(format_counter("rows", 4.0), CounterData::int("rows", 4));
        assert_eq!(format_counter("rows", 4.0).value, "4");

        let float = format_counter("share", 4.2857);
        assert_eq!(float.value, "4.286");
        assert_eq!(float.precision, Some(3));

        assert_eq!(format_counter("neg", -2.0).value, "-2");
    }

    #[test]
    fn test_format_counter_beyond_i64_stays_integer() {
        let huge = format_counter("events", 1e19);
        assert_eq!(huge.value, "10000000000000000000");
        assert_eq!(huge.precision, None);

        assert_eq!(format_counter("events", -1e19).value, "-10000000000000000000");
    }
}
