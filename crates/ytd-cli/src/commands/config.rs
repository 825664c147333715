use anyhow::Result;
use std::path::Path;
use ytd_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("ytd configuration\n");
    print!("{}", config.to_toml()?);

    if config.paths.yt_dlp.is_none() {
        println!("# paths.yt_dlp: (auto-detect)");
    }
    if config.paths.ffmpeg.is_none() {
        println!("# paths.ffmpeg: (auto-detect)");
    }
    if config.output.playlist_dir.is_none() {
        println!("# output.playlist_dir: (same as output.video_dir)");
    }

    // Show config file locations
    println!("\nConfig sources (later ones override earlier ones):");
    if let Some(config_dir) = dirs::config_dir() {
        println!("  1. {}/ytd/config.toml", config_dir.display());
    }
    if let Some(p) = config_path {
        println!("  2. {} (specified)", p.display());
    }
    println!("  3. Environment variables (YTD_<SECTION>__<KEY>)");

    Ok(())
}
