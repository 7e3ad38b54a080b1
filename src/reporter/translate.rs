//! Per-kind translators expanding one named metric into its fixed set of
//! sub-measurement time series.

use tracing::warn;

use crate::backend::{MetricKind, TimeSeries, TypedValue};
use crate::registry::{
    CounterSnapshot, GaugeValue, HistogramSnapshot, MeterSnapshot, MetricSnapshot, TimerSnapshot,
};

use super::series::time_series;
use super::value::typed_value;

/// Per-cycle translation context: the namespace prefix, the reporter's fixed
/// cumulative window start and the cycle's end timestamp.
#[derive(Debug, Clone, Copy)]
pub struct TranslateCtx<'a> {
    pub prefix: &'a str,
    pub start_time: &'a str,
    pub end_time: &'a str,
}

impl TranslateCtx<'_> {
    fn series(&self, name: &str, sub: &str, kind: MetricKind, value: TypedValue) -> TimeSeries {
        time_series(
            self.prefix,
            name,
            sub,
            kind,
            value,
            self.start_time,
            self.end_time,
        )
    }
}

/// One GAUGE entry with an empty sub-measurement, or nothing at all when the
/// reading has no numeric representation. One malformed gauge must never
/// abort the batch.
pub fn translate_gauge(ctx: &TranslateCtx<'_>, name: &str, value: &GaugeValue) -> Vec<TimeSeries> {
    match typed_value(value) {
        Some(v) => vec![ctx.series(name, "", MetricKind::Gauge, v)],
        None => {
            warn!(
                metric = name,
                "Gauge reading has no numeric representation, skipping"
            );
            Vec::new()
        }
    }
}

/// One CUMULATIVE `count` entry.
pub fn translate_counter(
    ctx: &TranslateCtx<'_>,
    name: &str,
    counter: &CounterSnapshot,
) -> Vec<TimeSeries> {
    vec![ctx.series(
        name,
        "count",
        MetricKind::Cumulative,
        TypedValue::Int64Value(counter.count),
    )]
}

/// Eleven entries: `count` CUMULATIVE, then the statistical summary as
/// GAUGE series.
pub fn translate_histogram(
    ctx: &TranslateCtx<'_>,
    name: &str,
    h: &HistogramSnapshot,
) -> Vec<TimeSeries> {
    vec![
        ctx.series(
            name,
            "count",
            MetricKind::Cumulative,
            TypedValue::Int64Value(h.count),
        ),
        ctx.series(name, "max", MetricKind::Gauge, TypedValue::Int64Value(h.max)),
        ctx.series(name, "mean", MetricKind::Gauge, TypedValue::DoubleValue(h.mean)),
        ctx.series(name, "min", MetricKind::Gauge, TypedValue::Int64Value(h.min)),
        ctx.series(
            name,
            "stddev",
            MetricKind::Gauge,
            TypedValue::DoubleValue(h.stddev),
        ),
        ctx.series(name, "p50", MetricKind::Gauge, TypedValue::DoubleValue(h.median)),
        ctx.series(name, "p75", MetricKind::Gauge, TypedValue::DoubleValue(h.p75)),
        ctx.series(name, "p95", MetricKind::Gauge, TypedValue::DoubleValue(h.p95)),
        ctx.series(name, "p98", MetricKind::Gauge, TypedValue::DoubleValue(h.p98)),
        ctx.series(name, "p99", MetricKind::Gauge, TypedValue::DoubleValue(h.p99)),
        ctx.series(name, "p999", MetricKind::Gauge, TypedValue::DoubleValue(h.p999)),
    ]
}

/// Five entries: `count` CUMULATIVE plus the four rolling rates as GAUGE
/// series.
pub fn translate_meter(ctx: &TranslateCtx<'_>, name: &str, m: &MeterSnapshot) -> Vec<TimeSeries> {
    vec![
        ctx.series(
            name,
            "count",
            MetricKind::Cumulative,
            TypedValue::Int64Value(m.count),
        ),
        ctx.series(
            name,
            "m1_rate",
            MetricKind::Gauge,
            TypedValue::DoubleValue(m.m1_rate),
        ),
        ctx.series(
            name,
            "m5_rate",
            MetricKind::Gauge,
            TypedValue::DoubleValue(m.m5_rate),
        ),
        ctx.series(
            name,
            "m15_rate",
            MetricKind::Gauge,
            TypedValue::DoubleValue(m.m15_rate),
        ),
        ctx.series(
            name,
            "mean_rate",
            MetricKind::Gauge,
            TypedValue::DoubleValue(m.mean_rate),
        ),
    ]
}

/// Sixteen entries per timer: the eleven histogram series over duration
/// samples first, then the five meter series over call events.
pub fn translate_timer(ctx: &TranslateCtx<'_>, name: &str, t: &TimerSnapshot) -> Vec<TimeSeries> {
    let mut series = translate_histogram(ctx, name, &t.histogram);
    series.extend(translate_meter(ctx, name, &t.meter));
    series
}

/// Expands a whole snapshot in the fixed export order: gauges, counters,
/// histograms, meters, timers; lexical by name within each kind. Names
/// failing the filter are not translated.
pub fn translate_snapshot(
    ctx: &TranslateCtx<'_>,
    snapshot: &MetricSnapshot,
    filter: &(dyn Fn(&str) -> bool + Send + Sync),
) -> Vec<TimeSeries> {
    let mut series = Vec::new();
    for (name, value) in &snapshot.gauges {
        if filter(name) {
            series.extend(translate_gauge(ctx, name, value));
        }
    }
    for (name, counter) in &snapshot.counters {
        if filter(name) {
            series.extend(translate_counter(ctx, name, counter));
        }
    }
    for (name, histogram) in &snapshot.histograms {
        if filter(name) {
            series.extend(translate_histogram(ctx, name, histogram));
        }
    }
    for (name, meter) in &snapshot.meters {
        if filter(name) {
            series.extend(translate_meter(ctx, name, meter));
        }
    }
    for (name, timer) in &snapshot.timers {
        if filter(name) {
            series.extend(translate_timer(ctx, name, timer));
        }
    }
    series
}
