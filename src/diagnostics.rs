use chrono::{DateTime, Utc};
use tracing::debug;

/// Wall-clock start marker for [`log_perf`]. `std::time::Instant` is not
/// available in the browser, so timings go through chrono.
#[inline]
pub fn perf_start() -> DateTime<Utc> {
    Utc::now()
}

#[inline]
pub fn log_perf(scope: &str, started_at: DateTime<Utc>, details: &str) {
    let elapsed_ms = (Utc::now() - started_at).num_milliseconds().max(0);
    if details.trim().is_empty() {
        debug!(target: "perf", "{scope} took {elapsed_ms}ms");
    } else {
        debug!(target: "perf", "{scope} took {elapsed_ms}ms | {details}");
    }
}
