use chrono::{DateTime, SecondsFormat, Utc};

use crate::backend::{Metric, MetricKind, Point, TimeInterval, TimeSeries, TypedValue};

/// RFC3339 rendering used for every interval timestamp the reporter emits.
pub fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Joins non-empty path segments with `/`. An empty sub-measurement leaves
/// no trailing separator, so a plain gauge exports as `<prefix>/<name>`.
pub fn metric_type(prefix: &str, name: &str, sub: &str) -> String {
    let mut out = String::new();
    for part in [prefix, name, sub] {
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(part);
    }
    out
}

/// Builds one single-point series. CUMULATIVE series carry the reporter's
/// fixed window start in their interval; GAUGE intervals are end-time only.
/// Pure over its inputs.
pub fn time_series(
    prefix: &str,
    name: &str,
    sub: &str,
    kind: MetricKind,
    value: TypedValue,
    start_time: &str,
    end_time: &str,
) -> TimeSeries {
    let start_time = match kind {
        MetricKind::Cumulative => Some(start_time.to_string()),
        MetricKind::Gauge => None,
    };
    TimeSeries {
        metric: Metric {
            metric_type: metric_type(prefix, name, sub),
        },
        metric_kind: kind,
        points: vec![Point {
            interval: TimeInterval {
                start_time,
                end_time: end_time.to_string(),
            },
            value,
        }],
    }
}
