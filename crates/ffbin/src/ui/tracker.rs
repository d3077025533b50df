use ffbin_fetch::DownloadProgress;
use indicatif::{ProgressBar, ProgressStyle};
use once_cell::sync::Lazy;

pub trait TrackerBuilder<T> {
    fn build(self) -> T;
}

pub trait Tracker<Inc> {
    fn step(&self, step: Inc) -> &Self;
}

const BYTES_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta}) {msg}";

const COUNT_STYLE: &str = "{spinner:.blue} {prefix:>12.cyan.bold} [{elapsed_precise}] {wide_bar:.cyan/blue} {pos}/{len} {wide_msg}";

const TICK: &str = "⠁⠂⠄⡀⢀⠠⠐⠈ ";

const PB_CHARS: &str = "█▓▒░  ";

fn template(pattern: &str) -> Option<ProgressStyle> {
    ProgressStyle::with_template(pattern)
        .ok()
        .map(|style| style.tick_chars(TICK).progress_chars(PB_CHARS))
}

static BYTES_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| template(BYTES_STYLE));

static COUNT_TEMPLATE: Lazy<Option<ProgressStyle>> = Lazy::new(|| template(COUNT_STYLE));

#[derive(Debug, Clone, Copy, Default)]
pub enum Unit {
    #[default]
    Bytes,
    Count,
}

/// A progress bar shared between callbacks; clones draw to the same bar.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    pb: ProgressBar,
    finish: Option<String>,
}

impl ProgressTracker {
    pub fn message(&self, msg: impl Into<String>) {
        self.pb.set_message(msg.into());
    }

    pub fn abandon(&self) {
        self.pb.abandon();
    }

    pub fn finish(&self) {
        match &self.finish {
            Some(msg) => self.pb.finish_with_message(msg.clone()),
            None => self.pb.finish(),
        }
    }

    /// Finish once the position reaches a known length.
    pub fn finish_if_done(&self) {
        if self.pb.length().is_some_and(|len| self.pb.position() >= len) {
            self.finish();
        }
    }
}

impl Tracker<u64> for ProgressTracker {
    fn step(&self, len: u64) -> &Self {
        self.pb.inc(len);
        self
    }
}

impl Tracker<&DownloadProgress> for ProgressTracker {
    fn step(&self, progress: &DownloadProgress) -> &Self {
        if self.pb.length() != Some(progress.total) {
            self.pb.set_length(progress.total);
        }
        self.pb.set_position(progress.downloaded);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressTrackerBuilder {
    len: Option<u64>,
    prefix: Option<String>,
    finish: Option<String>,
    unit: Unit,
}

impl ProgressTrackerBuilder {
    pub fn with_len(mut self, len: u64) -> Self {
        self.len = Some(len);
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }

    pub fn with_finish(mut self, finish: &str) -> Self {
        self.finish = Some(finish.to_string());
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }
}

impl TrackerBuilder<ProgressTracker> for ProgressTrackerBuilder {
    fn build(self) -> ProgressTracker {
        let pb = ProgressBar::new(self.len.unwrap_or(0));
        let style = match self.unit {
            Unit::Bytes => BYTES_TEMPLATE.as_ref(),
            Unit::Count => COUNT_TEMPLATE.as_ref(),
        };
        let pb = match style {
            Some(style) => pb.with_style(style.clone()),
            None => pb,
        };

        if let Some(prefix) = self.prefix {
            pb.set_prefix(prefix);
        }
        ProgressTracker {
            pb,
            finish: self.finish,
        }
    }
}
