//! Suppression windows for repetitive warn logs. A reporter whose backend is
//! down would otherwise emit an identical warning on every period tick.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Window {
    opened_at: Instant,
    suppressed: u64,
}

/// Tracks, per key, when a log line was last allowed through and how many
/// identical ones were suppressed since.
#[derive(Debug, Default)]
pub struct LogThrottle {
    windows: Mutex<HashMap<&'static str, Window>>,
}

impl LogThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Some(suppressed_count)` when a log for `key` should be
    /// emitted, otherwise `None` and the event is counted as suppressed for
    /// the active window.
    pub fn should_emit(&self, key: &'static str, interval: Duration) -> Option<u64> {
        let mut windows = self.windows.lock().expect("log throttle mutex poisoned");
        let now = Instant::now();

        match windows.get_mut(key) {
            Some(window) if now.duration_since(window.opened_at) >= interval => {
                let suppressed = window.suppressed;
                window.opened_at = now;
                window.suppressed = 0;
                Some(suppressed)
            }
            Some(window) => {
                window.suppressed += 1;
                None
            }
            None => {
                windows.insert(
                    key,
                    Window {
                        opened_at: now,
                        suppressed: 0,
                    },
                );
                Some(0)
            }
        }
    }
}
