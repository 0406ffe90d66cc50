use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cidhaul_engine::{Engine, ProgressSet, Store};
use cidhaul_fetch::{GatewayFetcher, GatewayOptions, ReqwestClient};

mod source;

/// Recursive backup of content-addressed assets listed in a CSV
/// export: every identifier is fetched through the configured
/// gateways, classified by magic bytes, and stored under
/// `<output>/files`; JSON and HTML documents are walked for nested
/// identifiers, which are fetched in turn. Re-running is safe and
/// cheap.
#[derive(Debug, Parser)]
#[command(name = "cidhaul", version, about, long_about = None)]
struct App {
    /// CSV work list. Rows need a `cid` column, or a
    /// `metadata_url` field to extract one from.
    csv: PathBuf,

    /// Output directory; content lands in `<output>/files` next to
    /// the progress file.
    #[arg(short, long, default_value = "ipfs_backup")]
    output: PathBuf,

    /// Number of parallel workers (1 is safest).
    #[arg(long, default_value_t = 1)]
    workers: usize,

    /// Gateway base URL; repeat for fallbacks. Defaults to the
    /// public gateway list.
    #[arg(long = "gateway")]
    gateways: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let app = App::parse();

    let items = source::read_work_list(&app.csv)
        .with_context(|| format!("reading work list {}", app.csv.display()))?;

    let files_dir = app.output.join("files");
    let store = Store::open(&files_dir)
        .with_context(|| format!("creating output directory {}", files_dir.display()))?;
    let progress = ProgressSet::load(app.output.join("download_progress.json"));

    let gateways = if app.gateways.is_empty() {
        GatewayOptions::public_gateways()
    } else {
        app.gateways
    };
    let fetcher = GatewayFetcher::new(
        ReqwestClient::new()?,
        GatewayOptions::default().gateways(gateways),
    )?;

    let engine = Arc::new(Engine::new(fetcher, store, progress));
    let summary = engine.run(items, app.workers).await?;

    println!(
        "All done - {} of {} items materialized ({} failed)",
        summary.completed, summary.attempted, summary.failed
    );
    println!("  total unique files: {}", summary.total_unique);
    println!("  folder: {}", files_dir.display());
    Ok(())
}
