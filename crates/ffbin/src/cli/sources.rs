use clap::Args;

use super::source_list;
use crate::ui::table::{Formatter, SourceRow};

const FOOTER: &str = "Try one first with `--source <#>` or FFMPEG_PROXY_INDEX=<#>; the rest follow as fallback.\n`--source 0` downloads from github only, with no fallback.";

#[derive(Debug, Clone, Args)]
pub struct SourcesArg {
    /// Omit the column names
    #[arg(long)]
    pub bare: bool,
}

impl SourcesArg {
    pub fn run(&self) -> anyhow::Result<()> {
        let sources = source_list();
        let table = Formatter {
            footer: Some(FOOTER.to_string()),
            hide_columns: self.bare,
            ..Default::default()
        }
        .build(SourceRow::rows(&sources));
        println!("{table}");
        Ok(())
    }
}
