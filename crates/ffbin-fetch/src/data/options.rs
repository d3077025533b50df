use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::progress::DownloadProgress;

/// Configuration for a single speed probe.
///
/// # Examples
///
/// ```
/// use ffbin_fetch::ProbeOptions;
/// use std::time::Duration;
///
/// let options = ProbeOptions::default().timeout(Duration::from_secs(5));
/// ```
#[derive(Clone, Debug)]
pub struct ProbeOptions {
    /// Deadline covering connect and the full body read.
    ///
    /// Default: 10s
    pub timeout: Duration,

    /// Extra headers sent with the probe request.
    pub headers: Arc<[(String, String)]>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            headers: Arc::new([]),
        }
    }
}

impl ProbeOptions {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers = push_header(&self.headers, key.into(), value.into());
        self
    }
}

/// Configuration for streaming an archive to disk.
///
/// # Examples
///
/// ```
/// use ffbin_fetch::DownloadOptions;
/// use std::sync::Arc;
///
/// let options = DownloadOptions::default().on_progress(Arc::new(|progress| {
///     if let Some(pct) = progress.percentage() {
///         println!("{pct:.1}%");
///     }
/// }));
/// ```
#[derive(Clone)]
pub struct DownloadOptions {
    /// Longest wait for the next body chunk before the download is
    /// abandoned as stalled. Slow transfers that keep moving are never cut.
    ///
    /// Default: 60s
    pub stall_timeout: Duration,

    /// Extra headers sent with the download request.
    pub headers: Arc<[(String, String)]>,

    /// Invoked after each written chunk when the total size is known.
    pub on_progress: Option<Arc<dyn Fn(&DownloadProgress) + Send + Sync>>,
}

impl fmt::Debug for DownloadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadOptions")
            .field("stall_timeout", &self.stall_timeout)
            .field("headers", &self.headers)
            .field("on_progress", &"{ ... }")
            .finish()
    }
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            stall_timeout: Duration::from_secs(60),
            headers: Arc::new([]),
            on_progress: None,
        }
    }
}

impl DownloadOptions {
    #[must_use]
    pub fn stall_timeout(mut self, stall_timeout: Duration) -> Self {
        self.stall_timeout = stall_timeout;
        self
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers = push_header(&self.headers, key.into(), value.into());
        self
    }

    #[must_use]
    pub fn on_progress(
        mut self,
        on_progress: Arc<dyn Fn(&DownloadProgress) + Send + Sync>,
    ) -> Self {
        self.on_progress = Some(on_progress);
        self
    }
}

fn push_header(
    headers: &[(String, String)],
    key: String,
    value: String,
) -> Arc<[(String, String)]> {
    let mut headers: Vec<_> = headers.to_vec();
    headers.push((key, value));
    Arc::from(headers)
}
