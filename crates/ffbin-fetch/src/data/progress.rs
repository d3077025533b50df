use std::time::Duration;

use serde::Serialize;

use super::source::Source;

/// Outcome of probing one source. A failed probe has zero throughput.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub source: Source,
    /// Observed bytes per second over the whole reference body.
    pub throughput_bps: f64,
    pub succeeded: bool,
}

impl ProbeResult {
    pub fn failed(source: Source) -> Self {
        Self {
            source,
            throughput_bps: 0.0,
            succeeded: false,
        }
    }

    /// Whether this result may be chosen as a download source.
    pub fn is_usable(&self) -> bool {
        self.succeeded && self.throughput_bps > 0.0
    }
}

/// Snapshot of a download in flight.
///
/// Only emitted when the server announced the total size.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadProgress {
    pub downloaded: u64,
    pub total: u64,
    /// Average bytes per second since the request was sent.
    pub speed_bps: f64,
}

impl DownloadProgress {
    pub fn percentage(&self) -> Option<f64> {
        (self.total > 0).then(|| self.downloaded as f64 / self.total as f64 * 100.0)
    }

    /// Remaining time at the average speed so far.
    pub fn eta(&self) -> Option<Duration> {
        if self.speed_bps <= 0.0 || self.downloaded >= self.total {
            return None;
        }
        let remaining = (self.total - self.downloaded) as f64;
        Some(Duration::from_secs_f64(remaining / self.speed_bps))
    }
}
