use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use ffbin_fetch::{ReqwestClient, SourceList};
use ffbin_platform::{Arch, Platform, SystemIdentity, dir};

pub mod install;
pub mod paths;
pub mod probe;
pub mod sources;

#[derive(Debug, Parser)]
#[command(
    name = "ffbin",
    version,
    about,
    long_about = None,
    propagate_version = true
)]
pub struct App {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// Options for `install`, which also runs when no subcommand is given.
    #[command(flatten, next_help_heading = "Install options")]
    pub install: install::InstallArg,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the executables
    #[arg(long, global = true, env = "FFBIN_DIR", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    #[arg(long, global = true, hide = true)]
    pub platform: Option<Platform>,

    #[arg(long, global = true, hide = true)]
    pub arch: Option<Arch>,
}

impl GlobalArgs {
    /// The detected host, with any hidden overrides applied.
    pub fn identity(&self) -> SystemIdentity {
        let detected = SystemIdentity::detect();
        SystemIdentity::new(
            self.platform.unwrap_or(detected.platform),
            self.arch.unwrap_or(detected.arch),
        )
    }

    pub fn install_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => dir::default_install_dir().context("could not determine a default install directory"),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    #[command(alias = "i", name = "install", about = "Download and unpack the executables if missing")]
    Install,
    #[command(alias = "ls", name = "sources", about = "List download sources with their indices")]
    Sources(sources::SourcesArg),
    #[command(alias = "p", name = "probe", about = "Speed-test every source without downloading")]
    Probe(probe::ProbeArg),
    #[command(name = "paths", about = "Print where the executables are")]
    Paths(paths::PathsArg),
}

pub async fn run(app: App) -> anyhow::Result<()> {
    let global = app.global;
    match app.cmd.unwrap_or(Commands::Install) {
        Commands::Install => app.install.run(&global).await,
        Commands::Sources(arg) => arg.run(),
        Commands::Probe(arg) => arg.run().await,
        Commands::Paths(arg) => arg.run(&global),
    }
}

pub(crate) fn client() -> anyhow::Result<ReqwestClient> {
    ReqwestClient::new().context("could not build the HTTP client")
}

pub(crate) fn source_list() -> SourceList {
    SourceList::default()
}
