use std::collections::BTreeMap;

use rust_decimal::Decimal;

/// A single gauge reading. Gauges are user supplied, so the registry cannot
/// guarantee a numeric payload; `Text` carries whatever non-numeric value the
/// gauge produced and is skipped by the reporter.
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    /// Big-integer readings, exported as a double with precision loss past
    /// 2^53 accepted.
    I128(i128),
    /// Fixed-point decimal readings, exported as a double with precision
    /// loss accepted.
    Decimal(Decimal),
    Text(String),
}

impl From<i64> for GaugeValue {
    fn from(v: i64) -> Self {
        GaugeValue::I64(v)
    }
}

impl From<f64> for GaugeValue {
    fn from(v: f64) -> Self {
        GaugeValue::F64(v)
    }
}

impl From<Decimal> for GaugeValue {
    fn from(v: Decimal) -> Self {
        GaugeValue::Decimal(v)
    }
}

impl From<&str> for GaugeValue {
    fn from(v: &str) -> Self {
        GaugeValue::Text(v.to_string())
    }
}

/// Monotonic counter state at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub count: i64,
}

/// Statistical summary of a distribution's recently observed samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HistogramSnapshot {
    /// Total observations since the histogram was created.
    pub count: i64,
    pub max: i64,
    pub mean: f64,
    pub min: i64,
    pub stddev: f64,
    pub median: f64,
    pub p75: f64,
    pub p95: f64,
    pub p98: f64,
    pub p99: f64,
    pub p999: f64,
}

/// Rolling event rates plus the lifetime event count of a meter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeterSnapshot {
    /// Total events since the meter was created.
    pub count: i64,
    pub m1_rate: f64,
    pub m5_rate: f64,
    pub m15_rate: f64,
    pub mean_rate: f64,
}

/// A timer is a histogram over observed durations combined with a meter over
/// the call events.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimerSnapshot {
    pub histogram: HistogramSnapshot,
    pub meter: MeterSnapshot,
}

/// A point-in-time, read-only view of the registry, captured once per export
/// cycle and discarded afterwards. Metric names are unique within their kind
/// and never empty; `BTreeMap` keys give the lexical iteration order that
/// keeps exports reproducible.
#[derive(Debug, Clone, Default)]
pub struct MetricSnapshot {
    pub gauges: BTreeMap<String, GaugeValue>,
    pub counters: BTreeMap<String, CounterSnapshot>,
    pub histograms: BTreeMap<String, HistogramSnapshot>,
    pub meters: BTreeMap<String, MeterSnapshot>,
    pub timers: BTreeMap<String, TimerSnapshot>,
}

impl MetricSnapshot {
    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
            && self.counters.is_empty()
            && self.histograms.is_empty()
            && self.meters.is_empty()
            && self.timers.is_empty()
    }
}

/// The registry collaborator seam: hands the reporter a fresh snapshot when
/// a scheduled cycle fires.
pub trait MetricSource: Send + Sync {
    fn snapshot(&self) -> MetricSnapshot;
}
