//! The scheduled reporter: snapshot translation, batching submission and
//! the per-chunk failure diagnostics.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::{BackendError, MonitoringClient, TimeSeries};
use crate::config::ReporterConfig;
use crate::registry::{MetricSnapshot, MetricSource};
use crate::utils::log_throttle::LogThrottle;

use super::series::rfc3339;
use super::translate::{translate_snapshot, TranslateCtx};

/// The backend caps one `timeSeries.create` call at this many series; larger
/// exports are split into contiguous chunks.
pub const MAX_SERIES_PER_CALL: usize = 200;

const SUBMIT_WARN_WINDOW: Duration = Duration::from_secs(60);

/// Exports registry snapshots to a Stackdriver-style monitoring backend.
///
/// One instance owns one cumulative window: the start timestamp for every
/// CUMULATIVE series is fixed at construction and never changes for the
/// lifetime of the reporter.
pub struct StackdriverReporter {
    client: Arc<dyn MonitoringClient>,
    config: ReporterConfig,
    start_time: String,
    throttle: LogThrottle,
}

impl StackdriverReporter {
    pub fn new(client: Arc<dyn MonitoringClient>, config: ReporterConfig) -> Self {
        let start_time = rfc3339(config.clock.now());
        info!(
            resource = client.resource_name(),
            prefix = config.metric_prefix.as_str(),
            rate_unit = %config.rate_unit,
            duration_unit = %config.duration_unit,
            start_time = start_time.as_str(),
            "Creating Stackdriver reporter"
        );
        Self {
            client,
            config,
            start_time,
            throttle: LogThrottle::new(),
        }
    }

    /// The fixed window start every CUMULATIVE series is reported against.
    pub fn window_start(&self) -> &str {
        &self.start_time
    }

    /// Runs one export cycle over the given snapshot. Submission failures
    /// are logged and swallowed here; the next scheduled cycle re-sends
    /// fresh point-in-time data, lost points are not backfilled.
    pub async fn report_now(&self, snapshot: &MetricSnapshot) {
        let end_time = rfc3339(self.config.clock.now());
        let ctx = TranslateCtx {
            prefix: &self.config.metric_prefix,
            start_time: &self.start_time,
            end_time: &end_time,
        };
        let series = translate_snapshot(&ctx, snapshot, self.config.filter.as_ref());

        if let Err(e) = self.submit(&series).await {
            if let Some(suppressed) = self
                .throttle
                .should_emit("reporter.submit.failure", SUBMIT_WARN_WINDOW)
            {
                warn!(suppressed, "Unable to report to the monitoring backend: {}", e);
            }
        }
    }

    /// Submits one cycle's series: nothing at all for an empty set, a single
    /// call for up to [`MAX_SERIES_PER_CALL`] entries, otherwise contiguous
    /// chunks in original order. A structured rejection of one chunk is
    /// diagnosed and the remaining chunks are still attempted; a transport
    /// failure aborts the rest of the cycle.
    pub async fn submit(&self, series: &[TimeSeries]) -> Result<(), BackendError> {
        if series.is_empty() {
            debug!("No time series to report this cycle");
            return Ok(());
        }

        for chunk in series.chunks(MAX_SERIES_PER_CALL) {
            match self.client.create_time_series(chunk).await {
                Ok(()) => {
                    debug!("Batch (size={}) sent to the monitoring backend", chunk.len());
                }
                Err(e @ BackendError::Transport(_)) => return Err(e),
                Err(BackendError::Api { code, message }) => {
                    warn!(
                        code,
                        "Error sending batch (size={}) to the monitoring backend: {}",
                        chunk.len(),
                        message
                    );
                    log_rejected_entry(chunk, &message);
                }
            }
        }
        Ok(())
    }

    /// Drives `report_now` on the configured period until `shutdown_rx`
    /// flips to true. An overrunning cycle delays the next tick rather than
    /// running concurrently with it.
    pub fn start(
        self: Arc<Self>,
        source: Arc<dyn MetricSource>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let period = self.config.interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // An interval's first tick fires immediately; consume it so the
            // first report happens one full period in.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            debug!("Reporter received shutdown");
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        let snapshot = source.snapshot();
                        self.report_now(&snapshot).await;
                    }
                }
            }
        })
    }
}

static SERIES_INDEX: OnceLock<Regex> = OnceLock::new();

fn series_index_pattern() -> &'static Regex {
    SERIES_INDEX
        .get_or_init(|| Regex::new(r"timeSeries\[(\d+)\]").expect("invalid series index pattern"))
}

/// Pulls the `timeSeries[<N>]` item index out of a backend error message.
fn parse_series_index(message: &str) -> Option<usize> {
    series_index_pattern()
        .captures(message)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok())
}

/// Best-effort postmortem help: logs the entry the backend pointed at along
/// with its immediate neighbors. Falls back to a generic line when the index
/// is missing, unparsable or out of range; never panics past this boundary.
fn log_rejected_entry(chunk: &[TimeSeries], message: &str) {
    let Some(index) = parse_series_index(message) else {
        debug!(
            "Could not find the problematic time series in a batch of {}",
            chunk.len()
        );
        return;
    };
    if index >= chunk.len() {
        debug!(
            index,
            "Backend reported an out-of-range time series index for a batch of {}",
            chunk.len()
        );
        return;
    }

    let last = chunk.len() - 1;
    for i in index.saturating_sub(1)..=(index + 1).min(last) {
        match serde_json::to_string(&chunk[i]) {
            Ok(body) => debug!("Time series at index {}: {}", i, body),
            Err(e) => debug!("Time series at index {} could not be rendered: {}", i, e),
        }
    }
}
