// Copyright 2026 Sitegrab Contributors
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code, unused_imports)]

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

mod capture;
mod cli;
mod cloner;
mod fetch;
mod output;
mod progress;
mod renderer;

#[derive(Parser)]
#[command(
    name = "sitegrab",
    about = "Sitegrab — clone a rendered web page into a self-contained local copy",
    version,
    after_help = "Run 'sitegrab <command> --help' for details on each command.\nRun 'sitegrab' with no command to be prompted for a URL."
)]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a page in headless Chromium and save a local copy
    Clone {
        /// Page to clone (e.g. "example.com"); prompted for when omitted
        url: Option<String>,
        /// Output directory (defaults to cloned_<host> in the working directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Navigation timeout in milliseconds
        #[arg(long, default_value = "60000")]
        timeout: u64,
        /// Parallel asset downloads
        #[arg(long, default_value = "4")]
        concurrency: usize,
        /// Browser viewport as WIDTHxHEIGHT
        #[arg(long, default_value = "1920x1080", value_parser = parse_viewport)]
        viewport: (u32, u32),
        /// Milliseconds to wait after scrolling for lazy content to load
        #[arg(long, default_value = "2000")]
        settle: u64,
    },
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

/// Parse "1920x1080" into a (width, height) pair.
fn parse_viewport(raw: &str) -> Result<(u32, u32), String> {
    let lower = raw.to_ascii_lowercase();
    let (w, h) = lower
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{raw}`"))?;
    let width = w
        .trim()
        .parse()
        .map_err(|_| format!("bad width in `{raw}`"))?;
    let height = h
        .trim()
        .parse()
        .map_err(|_| format!("bad height in `{raw}`"))?;
    Ok((width, height))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.quiet {
        std::env::set_var("SITEGRAB_QUIET", "1");
    }
    if cli.verbose {
        std::env::set_var("SITEGRAB_VERBOSE", "1");
    }

    init_tracing(cli.verbose);

    let result = match cli.command {
        // No subcommand → prompt for a URL and clone with defaults
        None => {
            cli::clone_cmd::run(
                None,
                None,
                cloner::DEFAULT_NAV_TIMEOUT_MS,
                cloner::DEFAULT_FETCH_CONCURRENCY,
                cloner::DEFAULT_VIEWPORT,
                cloner::DEFAULT_SETTLE_MS,
            )
            .await
        }
        Some(Commands::Clone {
            url,
            output,
            timeout,
            concurrency,
            viewport,
            settle,
        }) => cli::clone_cmd::run(url, output, timeout, concurrency, viewport, settle).await,
        Some(Commands::Doctor) => cli::doctor::run().await,
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "sitegrab", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if !cli::output::is_quiet() {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("sitegrab=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
