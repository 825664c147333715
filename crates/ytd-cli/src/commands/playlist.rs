use anyhow::Result;
use std::path::Path;
use tracing::error;

use ytd_core::{
    config::Config,
    downloader::YtDlp,
    MediaFetcher,
};

pub async fn run(url: &str, output: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    let dest_dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.playlist_dir());

    let fetcher = MediaFetcher::new(
        config.output_layout(),
        YtDlp::new(config.yt_dlp_path()?),
        // playlist entries are downloaded as video and never transcoded
        super::download::transformer(&config, false)?,
    );

    let report = match fetcher.download_playlist(url, &dest_dir).await {
        Ok(report) => report,
        Err(e) => {
            error!("Could not read playlist {}: {}", url, e);
            return Ok(());
        }
    };

    // Summary
    println!("\n=== Playlist Complete ===");
    println!("Downloaded: {}", report.downloaded.len());
    println!("Skipped: {}", report.skipped.len());
    println!("Failed: {}", report.failed.len());

    if !report.failed.is_empty() {
        println!("\nFailed videos:");
        for (label, e) in &report.failed {
            println!("  {} - {}", label, e);
        }
    }

    Ok(())
}
