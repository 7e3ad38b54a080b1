//! Wire model for the Monitoring v3 `timeSeries.create` call.
//!
//! Only the fields this reporter writes are modeled; serialization follows
//! the backend's camelCase JSON surface.

use serde::Serialize;

/// Metric kind as the backend understands it. CUMULATIVE series must carry
/// the reporter's fixed window start in their interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricKind {
    Gauge,
    Cumulative,
}

/// The two point value types this reporter produces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TypedValue {
    Int64Value(i64),
    DoubleValue(f64),
}

/// RFC3339 interval. `start_time` is set only on CUMULATIVE series and is
/// omitted from the payload otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub interval: TimeInterval,
    pub value: TypedValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    /// Hierarchical type path, e.g. `custom.googleapis.com/dw/requests/p99`.
    #[serde(rename = "type")]
    pub metric_type: String,
}

/// One exported series. The reporter always writes exactly one point per
/// series per cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    pub metric: Metric,
    pub metric_kind: MetricKind,
    pub points: Vec<Point>,
}

/// Body of one `timeSeries.create` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeSeriesRequest {
    pub time_series: Vec<TimeSeries>,
}
