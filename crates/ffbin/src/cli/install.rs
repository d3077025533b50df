use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use clap::Args;
use console::style;
use ffbin_fetch::{
    DownloadOptions, DownloadProgress, ProbeResult, ProbeSelector, Selection, format_speed,
};
use ffbin_install::{
    AcquireError, AcquireEvent, AcquireOptions, Acquirer, SourceChoice, ToolPaths,
    resolve_existing_paths_async,
};
use ffbin_platform::{SystemIdentity, Tool};
use indicatif::HumanBytes;
use tracing::debug;

use super::{GlobalArgs, client, source_list};
use crate::ui::table::selection_report;
use crate::ui::tracker::{ProgressTracker, ProgressTrackerBuilder, Tracker, TrackerBuilder, Unit};
use crate::ui::{self, DIM, HEADING};

#[derive(Debug, Clone, Args)]
pub struct InstallArg {
    /// Source to use: 0 = direct only, 1..=N = that source first, unset = fastest
    #[arg(short, long, global = true, env = "FFMPEG_PROXY_INDEX", value_name = "INDEX")]
    pub source: Option<String>,

    /// Seconds without received data before a download is abandoned
    #[arg(
        long,
        global = true,
        default_value_t = 60,
        value_name = "SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub stall_timeout: u64,
}

impl InstallArg {
    /// The requested source index. Values that are not a non-negative
    /// integer fall back to automatic selection.
    pub fn source_index(&self) -> Option<usize> {
        self.source.as_deref().and_then(|raw| raw.trim().parse().ok())
    }

    /// Never fails: problems are reported on the terminal instead.
    pub async fn run(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        if let Err(error) = self.install(global).await {
            report_failure(&error);
        }
        Ok(())
    }

    async fn install(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let identity = global.identity();
        let dir = global.install_dir()?;

        let existing = resolve_existing_paths_async(&dir, &identity).await;
        if existing.is_complete() {
            println!("{}", ui::ok("FFmpeg is already installed"));
            print_paths(&existing);
            return Ok(());
        }

        let index = self.source_index();
        let sources = source_list();
        let choice = SourceChoice::from_index(index, sources.len());
        print_system_info(&identity, &dir, choice);

        let client = client()?;
        let mut selector = ProbeSelector::new(client.clone());
        if choice.needs_selection() {
            let tracker = ProgressTrackerBuilder::default()
                .with_len(sources.len() as u64)
                .with_prefix("speed test")
                .with_unit(Unit::Count)
                .build();
            selector = selector.on_probe(Arc::new(move |result: &ProbeResult| {
                tracker
                    .step(1u64)
                    .message(format!("{} {}", result.source.name, format_speed(result.throughput_bps)));
                tracker.finish_if_done();
            }));
            selector = selector.on_selection(Arc::new(|selection: &Selection| {
                println!("{}", selection_report(selection));
                if let Some(best) = &selection.best {
                    println!("{}", ui::ok(format!("using {best}")));
                }
            }));
        }

        let view = Arc::new(DownloadView::default());
        let progress = view.clone();
        let download = DownloadOptions::default()
            .stall_timeout(Duration::from_secs(self.stall_timeout))
            .on_progress(Arc::new(move |p: &DownloadProgress| progress.step(p)));
        let options = AcquireOptions::default()
            .download(download)
            .on_event(Arc::new(move |event: &AcquireEvent<'_>| view.on_event(event)));

        let acquirer = Acquirer::new(client, selector).sources(sources).options(options);
        let paths = acquirer.acquire(&identity, &dir, index).await?;

        println!("{}", ui::separator());
        println!("{}", style("FFmpeg installed").green().bold());
        print_paths(&paths);
        println!("{}", ui::separator());
        Ok(())
    }
}

/// The bar of the download currently in flight.
#[derive(Default)]
struct DownloadView {
    current: Mutex<Option<ProgressTracker>>,
}

impl DownloadView {
    fn step(&self, progress: &DownloadProgress) {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tracker) = current.as_ref() {
            tracker.step(progress);
        }
    }

    fn on_event(&self, event: &AcquireEvent<'_>) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        match event {
            AcquireEvent::Attempting { source, attempt, of } => {
                debug!(source = %source.name, attempt, of, "starting download");
                *current = Some(
                    ProgressTrackerBuilder::default()
                        .with_prefix(&source.name)
                        .with_finish("done")
                        .build(),
                );
            }
            AcquireEvent::AttemptFailed { source, error } => {
                if let Some(tracker) = current.take() {
                    tracker.message(format!("failed: {error}"));
                    tracker.abandon();
                }
                eprintln!("{}", ui::fail(format!("{}: {error}", source.name)));
            }
            AcquireEvent::Downloaded {
                source,
                bytes,
                elapsed,
            } => {
                if let Some(tracker) = current.take() {
                    tracker.finish();
                }
                println!("{}", ui::ok(download_summary(&source.name, *bytes, *elapsed)));
            }
            AcquireEvent::Installed { .. } => {
                if let Some(tracker) = current.take() {
                    tracker.finish();
                }
            }
        }
    }
}

fn download_summary(source: &str, bytes: u64, elapsed: Duration) -> String {
    let average = bytes as f64 / elapsed.as_secs_f64().max(1e-6);
    format!(
        "{source}: {} in {:.1}s, average {}",
        HumanBytes(bytes),
        elapsed.as_secs_f64(),
        format_speed(average)
    )
}

fn print_system_info(identity: &SystemIdentity, dir: &std::path::Path, choice: SourceChoice) {
    println!("{}", ui::separator());
    println!("{}", HEADING.apply_to("System"));
    println!("{}", DIM.apply_to(format!("  platform: {}", identity.platform)));
    println!("{}", DIM.apply_to(format!("  arch:     {}", identity.arch)));
    println!("{}", DIM.apply_to(format!("  dir:      {}", dir.display())));
    let mode = match choice {
        SourceChoice::DirectOnly => style("  source:   direct (index 0)".to_string()).yellow(),
        SourceChoice::Pinned(index) => style(format!("  source:   pinned (index {index})")).yellow(),
        SourceChoice::Auto => style("  source:   fastest".to_string()).dim(),
    };
    println!("{mode}");
    println!("{}", ui::separator());
}

fn print_paths(paths: &ToolPaths) {
    for tool in Tool::ALL {
        if let Some(path) = paths.get(tool) {
            println!("  {}", ui::ok(format!("{:<8} {}", format!("{tool}:"), path.display())));
        }
    }
}

fn report_failure(error: &anyhow::Error) {
    eprintln!("{}", ui::separator());
    eprintln!("{}", ui::fail(style("FFmpeg installation failed").red().bold()));
    eprintln!("{}", HEADING.apply_to("Error"));
    eprintln!("{}", DIM.apply_to(format!("  {error:#}")));

    if let Some(AcquireError::AllSourcesExhausted { attempts }) = error.downcast_ref::<AcquireError>() {
        for attempt in attempts {
            eprintln!("{}", DIM.apply_to(format!("    {attempt}")));
        }
    }

    eprintln!("{}", HEADING.apply_to("Suggestions"));
    eprintln!("{}", DIM.apply_to("  1. check the network connection"));
    eprintln!("{}", DIM.apply_to("  2. run `ffbin install` again"));
    eprintln!("{}", DIM.apply_to("  3. pick a source: FFMPEG_PROXY_INDEX=<n> ffbin (see `ffbin sources`)"));
    eprintln!("{}", ui::separator());
}
