//! cli
//!
//! The `forge-state` binary.
//!
//! # Responsibilities
//!
//! - Parse arguments and initialise logging
//! - Load the config file and apply `--token`
//! - Find the remote URL (from `--url` or the repository)
//! - Run one aggregation and print the result as JSON
//!
//! A remote that no supported forge serves is not an error: a note goes to
//! stderr and the exit status is 0.

pub mod args;

pub use args::Cli;

use anyhow::{Context, Result};
use log::{debug, LevelFilter};
use std::path::Path;

use crate::config::{Config, ForgeConfig};
use crate::forge::{self, resolve_remote};
use crate::git::Git;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let loaded = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(path) = &loaded.path {
        debug!("using config {}", path.display());
    }

    let url = match &cli.url {
        Some(url) => url.clone(),
        None => {
            let cwd = cli.cwd.as_deref().unwrap_or_else(|| Path::new("."));
            Git::open(cwd)?.resolve_remote_url(cli.remote.as_deref())?
        }
    };

    let config = apply_token(loaded.config, &url, cli.token);

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    match runtime.block_on(forge::aggregate(&url, &config)) {
        Ok(state) => {
            println!("{}", serde_json::to_string_pretty(&state)?);
            Ok(())
        }
        Err(e) if e.is_unsupported_remote() => {
            eprintln!("No forge integration for remote {}", url);
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("failed to aggregate {}", url)),
    }
}

/// `--debug` wins over `RUST_LOG`; without either only warnings are shown.
fn init_logging(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.format_timestamp_millis().try_init();
}

/// Set `token` for the forge `url` resolves to. Unresolvable URLs are left
/// for the aggregation to report.
fn apply_token(config: ForgeConfig, url: &str, token: Option<String>) -> ForgeConfig {
    match (token, resolve_remote(url, &config)) {
        (Some(token), Some(identity)) => config.with_token(identity.provider, token),
        _ => config,
    }
}
