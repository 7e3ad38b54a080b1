use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Metric type prefix used when none is configured. Exported series live
/// under `custom.googleapis.com/dw/<metric>[/<sub>]`.
pub const DEFAULT_METRIC_PREFIX: &str = "custom.googleapis.com/dw";

/// Default reporting period.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Time units for the rate/duration configuration surface. The reporter
/// records these at construction; translated values are the registry's raw
/// snapshot readings, exactly as the backend dashboards expect them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Nanoseconds => "nanoseconds",
            TimeUnit::Microseconds => "microseconds",
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
        };
        write!(f, "{}", name)
    }
}

/// Clock seam so tests can pin every timestamp the reporter emits.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used outside of tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Predicate deciding which metric names are eligible for export.
pub type MetricFilter = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Immutable reporter configuration, assembled once before the reporter is
/// built.
#[derive(Clone)]
pub struct ReporterConfig {
    /// Namespace prepended to every exported metric type.
    pub metric_prefix: String,
    /// Unit meter rates are understood to be in.
    pub rate_unit: TimeUnit,
    /// Unit timer durations are understood to be in.
    pub duration_unit: TimeUnit,
    /// Metrics whose name fails this predicate are not translated.
    pub filter: MetricFilter,
    /// Source of the interval timestamps, including the fixed cumulative
    /// window start captured at reporter construction.
    pub clock: Arc<dyn Clock>,
    /// Period between scheduled export cycles.
    pub interval: Duration,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            metric_prefix: DEFAULT_METRIC_PREFIX.to_string(),
            rate_unit: TimeUnit::Seconds,
            duration_unit: TimeUnit::Milliseconds,
            filter: Arc::new(|_: &str| true),
            clock: Arc::new(SystemClock),
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl fmt::Debug for ReporterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterConfig")
            .field("metric_prefix", &self.metric_prefix)
            .field("rate_unit", &self.rate_unit)
            .field("duration_unit", &self.duration_unit)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
