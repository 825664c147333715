use anyhow::Result;
use std::path::{Path, PathBuf};

use ytd_core::{
    config::Config,
    downloader::YtDlp,
    transformer::Ffmpeg,
    BassBoostLevel, MediaFetcher, TransformRequest,
};

#[derive(Debug, Clone, Copy)]
pub struct DownloadOptions {
    pub audio: bool,
    pub change_frequency: bool,
    pub bass_boost: Option<BassBoostLevel>,
}

pub async fn run(url: &str, options: &DownloadOptions, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    let request = to_request(options);

    let fetcher = MediaFetcher::new(
        config.output_layout(),
        YtDlp::new(config.yt_dlp_path()?),
        transformer(&config, options.audio)?,
    );

    // Failures are logged by the fetcher; the process still exits cleanly
    let report = fetcher.download(url, &request).await;

    for path in &report.created {
        println!("Created: {}", path.display());
    }
    for path in &report.removed {
        println!("Removed: {}", path.display());
    }

    Ok(())
}

/// FFmpeg is only required when the run transcodes. Video-only runs never
/// invoke it, so a missing binary is not an error there.
pub fn transformer(config: &Config, transcodes: bool) -> Result<Ffmpeg> {
    let path = if transcodes {
        config.ffmpeg_path()?
    } else {
        config
            .paths
            .ffmpeg
            .clone()
            .unwrap_or_else(|| PathBuf::from("ffmpeg"))
    };
    Ok(Ffmpeg::new(path))
}

fn to_request(options: &DownloadOptions) -> TransformRequest {
    TransformRequest {
        audio_only: options.audio,
        change_frequency: options.change_frequency,
        bass_boost: options.bass_boost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_request() {
        let request = to_request(&DownloadOptions {
            audio: true,
            change_frequency: true,
            bass_boost: BassBoostLevel::new(7),
        });
        assert!(request.audio_only);
        assert!(request.change_frequency);
        assert_eq!(request.bass_boost.map(BassBoostLevel::get), Some(7));

        let request = to_request(&DownloadOptions {
            audio: false,
            change_frequency: false,
            bass_boost: None,
        });
        assert!(!request.audio_only);
        assert!(request.bass_boost.is_none());
    }

    #[test]
    fn test_video_only_runs_do_not_require_ffmpeg() {
        let mut config = Config::default();
        config.paths.ffmpeg = None;
        // no PATH lookup happens, so this holds on machines without ffmpeg
        assert!(transformer(&config, false).is_ok());

        config.paths.ffmpeg = Some(PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert!(transformer(&config, true).is_ok());
    }
}
