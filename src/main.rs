//! Phish Scan - CLI Entry Point
//!
//! `phish-scan <url> [html-file]` prints the scan report as JSON.

use anyhow::{bail, Context, Result};

use phish_scan_core::constants;
use phish_scan_core::{EngineConfig, ScanService};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", constants::APP_NAME, constants::APP_VERSION);

    let mut args = std::env::args().skip(1);
    let url = match args.next() {
        Some(url) => url,
        None => bail!("usage: {} <url> [html-file]", constants::APP_NAME),
    };
    let html = match args.next() {
        Some(path) => Some(
            std::fs::read_to_string(&path).with_context(|| format!("reading markup from {}", path))?,
        ),
        None => None,
    };

    let config = EngineConfig::from_env();
    log::info!("Model dir: {}", config.model_dir.display());
    let service = ScanService::new(config);

    if service.should_skip(&url) {
        log::info!("Trusted or internal URL, not scanning: {}", url);
        println!("{}", serde_json::json!({ "url": url, "skipped": true }));
        return Ok(());
    }

    let report = service
        .scan_with_timeout(&url, html.as_deref())
        .await
        .with_context(|| format!("scanning {}", url))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
