//! Full export-cycle tests against a recording fake backend.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::watch;

use stackdriver_reporter::backend::{
    BackendError, MetricKind, MonitoringClient, TimeSeries, TypedValue,
};
use stackdriver_reporter::config::{Clock, ReporterConfig};
use stackdriver_reporter::registry::{
    CounterSnapshot, GaugeValue, HistogramSnapshot, MeterSnapshot, MetricSnapshot, MetricSource,
    TimerSnapshot,
};
use stackdriver_reporter::reporter::{rfc3339, StackdriverReporter};

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn export_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
}

fn fixed_config() -> ReporterConfig {
    ReporterConfig {
        clock: Arc::new(FixedClock(export_epoch())),
        ..ReporterConfig::default()
    }
}

/// Records every create call it receives.
#[derive(Default)]
struct RecordingClient {
    calls: Mutex<Vec<Vec<TimeSeries>>>,
}

impl RecordingClient {
    fn calls(&self) -> Vec<Vec<TimeSeries>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MonitoringClient for RecordingClient {
    fn resource_name(&self) -> &str {
        "projects/test-project"
    }

    async fn create_time_series(&self, series: &[TimeSeries]) -> Result<(), BackendError> {
        self.calls.lock().unwrap().push(series.to_vec());
        Ok(())
    }
}

fn counters(n: usize) -> BTreeMap<String, CounterSnapshot> {
    (0..n)
        .map(|i| (format!("c{:03}", i), CounterSnapshot { count: i as i64 }))
        .collect()
}

#[tokio::test]
async fn one_cycle_covers_every_metric_kind() {
    let client = Arc::new(RecordingClient::default());
    let reporter = StackdriverReporter::new(client.clone(), fixed_config());

    let mut snapshot = MetricSnapshot::default();
    snapshot
        .gauges
        .insert("queue.depth".to_string(), GaugeValue::I64(42));
    snapshot
        .gauges
        .insert("build.version".to_string(), GaugeValue::Text("1.2.3".into()));
    snapshot
        .counters
        .insert("requests".to_string(), CounterSnapshot { count: 100 });
    snapshot.histograms.insert(
        "payload.size".to_string(),
        HistogramSnapshot {
            count: 1,
            max: 2,
            mean: 3.0,
            min: 4,
            stddev: 5.0,
            median: 6.0,
            p75: 7.0,
            p95: 8.0,
            p98: 9.0,
            p99: 10.0,
            p999: 11.0,
        },
    );
    snapshot.meters.insert(
        "events".to_string(),
        MeterSnapshot {
            count: 1,
            m1_rate: 2.0,
            m5_rate: 3.0,
            m15_rate: 4.0,
            mean_rate: 5.0,
        },
    );
    snapshot
        .timers
        .insert("handler".to_string(), TimerSnapshot::default());

    reporter.report_now(&snapshot).await;

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    // 1 numeric gauge (the textual one is skipped) + 1 counter + 11
    // histogram + 5 meter + 16 timer entries.
    let series = &calls[0];
    assert_eq!(series.len(), 34);

    // The textual gauge must not appear anywhere in the output.
    assert!(series
        .iter()
        .all(|s| !s.metric.metric_type.contains("build.version")));

    // Counter: name/count, CUMULATIVE, value 100, fixed window start.
    let counter = series
        .iter()
        .find(|s| s.metric.metric_type == "custom.googleapis.com/dw/requests/count")
        .expect("counter series missing");
    assert_eq!(counter.metric_kind, MetricKind::Cumulative);
    assert_eq!(counter.points[0].value, TypedValue::Int64Value(100));
    assert_eq!(
        counter.points[0].interval.start_time.as_deref(),
        Some(rfc3339(export_epoch()).as_str())
    );

    // Gauge: bare type path, GAUGE, interval without a start.
    let gauge = series
        .iter()
        .find(|s| s.metric.metric_type == "custom.googleapis.com/dw/queue.depth")
        .expect("gauge series missing");
    assert_eq!(gauge.metric_kind, MetricKind::Gauge);
    assert!(gauge.points[0].interval.start_time.is_none());

    // Timer: sixteen series under its name.
    let timer_count = series
        .iter()
        .filter(|s| {
            s.metric
                .metric_type
                .starts_with("custom.googleapis.com/dw/handler")
        })
        .count();
    assert_eq!(timer_count, 16);
}

#[tokio::test]
async fn oversized_cycle_partitions_into_ordered_chunks() {
    let client = Arc::new(RecordingClient::default());
    let reporter = StackdriverReporter::new(client.clone(), fixed_config());

    let snapshot = MetricSnapshot {
        counters: counters(450),
        ..MetricSnapshot::default()
    };
    reporter.report_now(&snapshot).await;

    let calls = client.calls();
    let sizes: Vec<usize> = calls.iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![200, 200, 50]);

    // Original lexical order is preserved across the chunk boundary.
    assert_eq!(
        calls[0][0].metric.metric_type,
        "custom.googleapis.com/dw/c000/count"
    );
    assert_eq!(
        calls[1][0].metric.metric_type,
        "custom.googleapis.com/dw/c200/count"
    );
    assert_eq!(
        calls[2][49].metric.metric_type,
        "custom.googleapis.com/dw/c449/count"
    );
}

#[tokio::test]
async fn empty_snapshot_makes_no_backend_call() {
    let client = Arc::new(RecordingClient::default());
    let reporter = StackdriverReporter::new(client.clone(), fixed_config());

    reporter.report_now(&MetricSnapshot::default()).await;
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn repeated_cycles_with_fixed_inputs_are_byte_identical() {
    let client = Arc::new(RecordingClient::default());
    let reporter = StackdriverReporter::new(client.clone(), fixed_config());

    let mut snapshot = MetricSnapshot::default();
    snapshot
        .gauges
        .insert("queue.depth".to_string(), GaugeValue::F64(4.5));
    snapshot
        .timers
        .insert("handler".to_string(), TimerSnapshot::default());
    snapshot
        .counters
        .insert("requests".to_string(), CounterSnapshot { count: 7 });

    reporter.report_now(&snapshot).await;
    reporter.report_now(&snapshot).await;

    let calls = client.calls();
    assert_eq!(calls.len(), 2);
    let first = serde_json::to_string(&calls[0]).unwrap();
    let second = serde_json::to_string(&calls[1]).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn filtered_metrics_are_not_translated() {
    let client = Arc::new(RecordingClient::default());
    let config = ReporterConfig {
        filter: Arc::new(|name: &str| !name.starts_with("internal.")),
        ..fixed_config()
    };
    let reporter = StackdriverReporter::new(client.clone(), config);

    let mut snapshot = MetricSnapshot::default();
    snapshot
        .counters
        .insert("internal.ticks".to_string(), CounterSnapshot { count: 3 });
    snapshot
        .counters
        .insert("requests".to_string(), CounterSnapshot { count: 9 });

    reporter.report_now(&snapshot).await;

    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 1);
    assert_eq!(
        calls[0][0].metric.metric_type,
        "custom.googleapis.com/dw/requests/count"
    );
}

#[tokio::test]
async fn scheduled_reporting_runs_until_shutdown() {
    struct StaticSource;

    impl MetricSource for StaticSource {
        fn snapshot(&self) -> MetricSnapshot {
            let mut snapshot = MetricSnapshot::default();
            snapshot
                .counters
                .insert("ticks".to_string(), CounterSnapshot { count: 1 });
            snapshot
        }
    }

    let client = Arc::new(RecordingClient::default());
    let config = ReporterConfig {
        interval: Duration::from_millis(20),
        ..fixed_config()
    };
    let reporter = Arc::new(StackdriverReporter::new(client.clone(), config));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = reporter.start(Arc::new(StaticSource), shutdown_rx);

    tokio::time::sleep(Duration::from_millis(90)).await;
    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();

    let cycles = client.calls().len();
    assert!(cycles >= 2, "expected at least two cycles, got {}", cycles);
}
