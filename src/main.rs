//! Tallyweb main entry point

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tallyweb_api::start_server;
use tallyweb_config::Config;
use tallyweb_core::{Journal, JsonSnapshotSource};
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "tallyweb")]
#[command(author = "Tallyweb Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight small-business accounting and invoicing web backend", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let rt = Runtime::new()?;

    rt.block_on(async {
        let config = Config::load(args.config.clone()).expect("Failed to load configuration");

        log::info!(
            "Config loaded: data path={}, snapshot_file={}",
            config.data.path.to_string_lossy(),
            config.data.snapshot_file
        );

        let source = Arc::new(JsonSnapshotSource);
        let journal = Arc::new(RwLock::new(Journal::new(config.clone(), source)));

        // Seed the journal if a snapshot has already been exported
        let snapshot_path = config.snapshot_path();
        if snapshot_path.exists() {
            let mut journal_guard = journal.write().await;
            match journal_guard.load(snapshot_path).await {
                Ok(_) => log::info!("Snapshot loaded successfully"),
                Err(e) => log::error!("Failed to load snapshot: {}", e.to_details()),
            }
        } else {
            log::warn!("Snapshot file not found: {}", snapshot_path.display());
        }

        start_server(config, journal).await
    });

    Ok(())
}
