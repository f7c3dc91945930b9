//! `sitegrab clone <url>` — clone a rendered page into a local folder.

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tokio::task::JoinHandle;

use crate::cli::output;
use crate::cloner::{normalize_target, CloneReport, CloneRequest, Cloner};
use crate::progress::{self, CloneEvent, ProgressReceiver, ProgressSender};
use crate::renderer::chromium::ChromiumSession;

/// Run the clone command.
pub async fn run(
    url: Option<String>,
    output_dir: Option<PathBuf>,
    timeout_ms: u64,
    concurrency: usize,
    viewport: (u32, u32),
    settle_ms: u64,
) -> Result<()> {
    let url = match url {
        Some(u) if !u.trim().is_empty() => u,
        _ => prompt_for_url()?,
    };

    // Reject bad targets before any browser starts.
    normalize_target(&url)?;

    let mut request = CloneRequest::new(url);
    request.output = output_dir;
    request.nav_timeout_ms = timeout_ms;
    request.fetch_concurrency = concurrency;
    request.viewport = viewport;
    request.settle_ms = settle_ms;

    let (tx, rx) = progress::channel();
    let printer: Option<JoinHandle<()>> = if output::is_quiet() {
        drop(rx);
        None
    } else {
        Some(tokio::spawn(print_events(rx)))
    };

    // run_pipeline owns the sender, so the printer drains and exits once
    // the pipeline finishes either way.
    let result = run_pipeline(&request, tx).await;
    if let Some(printer) = printer {
        let _ = printer.await;
    }
    let report = result?;

    if !output::is_quiet() {
        println!();
        println!("Done! Site cloned to: {}", report.output_root.display());
        println!(
            "Assets: {} downloaded, {} failed",
            report.assets_fetched, report.assets_failed
        );
    }

    Ok(())
}

async fn run_pipeline(request: &CloneRequest, tx: ProgressSender) -> Result<CloneReport> {
    let session = ChromiumSession::launch(request.viewport)
        .await
        .context("could not start the browser (try `sitegrab doctor`)")?;
    Cloner::with_progress(tx)
        .run(request, Box::new(session))
        .await
}

async fn print_events(mut rx: ProgressReceiver) {
    loop {
        match rx.recv().await {
            Ok(event) => print_event(&event),
            Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn print_event(event: &CloneEvent) {
    match event {
        CloneEvent::PhaseStarted { message, .. } => println!("{message}"),
        CloneEvent::Warning { message } => println!("Warning: {message}"),
        CloneEvent::AssetFetched {
            index,
            total,
            local_path,
            bytes,
        } => {
            let kb = *bytes as f64 / 1024.0;
            println!("  [{index}/{total}] OK  {local_path} ({kb:.1} KB)");
        }
        CloneEvent::AssetFailed {
            index,
            total,
            url,
            reason,
        } => {
            println!("  [{index}/{total}] FAIL ({reason}): {url}");
        }
        CloneEvent::OutputSaved { path } => println!("Saved {path}"),
    }
}

fn prompt_for_url() -> Result<String> {
    print!("Enter URL to clone: ");
    std::io::stdout().flush().context("could not flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("could not read URL from stdin")?;

    let url = line.trim().to_string();
    if url.is_empty() {
        bail!("no URL provided");
    }
    Ok(url)
}
