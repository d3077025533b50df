use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use ffbin_fetch::{ProbeOptions, ProbeResult, ProbeSelector};

use super::{client, source_list};
use crate::ui::table::selection_report;
use crate::ui::tracker::{ProgressTrackerBuilder, Tracker, TrackerBuilder, Unit};

#[derive(Debug, Clone, Args)]
pub struct ProbeArg {
    /// Per-source time limit in seconds
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub timeout: u64,

    /// Print the results as JSON
    #[arg(long)]
    pub json: bool,
}

impl ProbeArg {
    pub async fn run(&self) -> anyhow::Result<()> {
        let sources = source_list();
        let mut selector = ProbeSelector::new(client()?)
            .options(ProbeOptions::default().timeout(Duration::from_secs(self.timeout)));

        if !self.json {
            let tracker = ProgressTrackerBuilder::default()
                .with_len(sources.len() as u64)
                .with_prefix("speed test")
                .with_unit(Unit::Count)
                .build();
            selector = selector.on_probe(Arc::new(move |result: &ProbeResult| {
                tracker.step(1u64).message(result.source.name.clone());
                tracker.finish_if_done();
            }));
        }

        let selection = selector.select_best(&sources).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&selection)?);
            return Ok(());
        }

        println!("{}", selection_report(&selection));
        Ok(())
    }
}
