use std::path::Path;

use anyhow::Context;
use clap::Args;
use ffbin_install::{ToolCache, ToolPaths};
use ffbin_platform::{SystemIdentity, Tool};
use serde::Serialize;

use super::GlobalArgs;
use crate::ui;

#[derive(Debug, Clone, Args)]
pub struct PathsArg {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct PathsReport<'a> {
    dir: &'a Path,
    identity: &'a SystemIdentity,
    complete: bool,
    #[serde(flatten)]
    paths: &'a ToolPaths,
}

impl PathsArg {
    pub fn run(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let cache = ToolCache::new(global.install_dir()?, global.identity());
        let paths = cache.get();

        if self.json {
            let report = PathsReport {
                dir: cache.dir(),
                identity: cache.identity(),
                complete: paths.is_complete(),
                paths: &paths,
            };
            let json = serde_json::to_string_pretty(&report).context("could not encode paths")?;
            println!("{json}");
            return Ok(());
        }

        for tool in Tool::ALL {
            let line = match cache.path(tool) {
                Some(path) => ui::ok(format!("{tool}: {}", path.display())),
                None => ui::fail(format!("{tool}: missing")),
            };
            println!("{line}");
        }
        if !paths.is_complete() {
            println!("Run `ffbin install` to download FFmpeg into {}", cache.dir().display());
        }
        Ok(())
    }
}
