//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Flags
//!
//! - `--url <url>`: Aggregate this remote URL instead of reading one from git
//! - `--remote <name>`: Remote to read from the repository (default: `origin`,
//!   else the first remote)
//! - `--cwd <path>`: Run as if started in this directory
//! - `--config <path>`: Config file to use instead of the default locations
//! - `--token <token>`: Access token for the forge the remote resolves to
//! - `--debug`: Enable debug logging

use clap::Parser;
use std::path::PathBuf;

/// Print the open pull requests and issues of a git remote as JSON
#[derive(Parser, Debug)]
#[command(name = "forge-state")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Remote URL to aggregate (skips the repository lookup)
    #[arg(long, conflicts_with = "remote")]
    pub url: Option<String>,

    /// Name of the repository remote to aggregate
    #[arg(long)]
    pub remote: Option<String>,

    /// Run as if forge-state was started in this directory
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Access token, overriding the configured one
    #[arg(long)]
    pub token: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_url_and_token() {
        let cli = Cli::try_parse_from([
            "forge-state",
            "--url",
            "git@gitlab.com:acme/widget.git",
            "--token",
            "T",
            "--debug",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("git@gitlab.com:acme/widget.git"));
        assert_eq!(cli.token.as_deref(), Some("T"));
        assert!(cli.debug);
        assert!(cli.remote.is_none());
    }

    #[test]
    fn url_conflicts_with_remote() {
        let result = Cli::try_parse_from([
            "forge-state",
            "--url",
            "git@gitlab.com:acme/widget.git",
            "--remote",
            "upstream",
        ]);
        assert!(result.is_err());
    }
}
