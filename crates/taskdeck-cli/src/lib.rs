pub mod cli;
pub mod commands;
pub mod config;
pub mod http;
pub mod store;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use taskdeck_core::TaskdeckClient;
use tracing::{debug, info};

use crate::cli::{Command, GlobalCli};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let cli = GlobalCli::parse_from(raw_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(
        verbose = cli.verbose,
        quiet = cli.quiet,
        "starting taskdeck CLI"
    );

    let mut cfg = config::Config::load(cli.config.as_deref())?;
    cfg.apply_api_url(cli.api_url.as_deref());
    debug!(api_url = %cfg.api_url, loaded = ?cfg.loaded_file, "configuration resolved");

    let data_dir = config::resolve_data_dir(&cfg, cli.data.as_deref())
        .context("failed to resolve data directory")?;

    let store = store::FileStore::open(&data_dir)
        .with_context(|| format!("failed to open store at {}", data_dir.display()))?;
    let transport = http::HttpTransport::new(&cfg.api_url)?;
    let client = TaskdeckClient::new(transport, store);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let command = cli.command.unwrap_or(Command::List);
    let mut stdout = std::io::stdout().lock();
    runtime.block_on(commands::dispatch(&client, command, &mut stdout))?;

    info!("done");
    Ok(())
}
