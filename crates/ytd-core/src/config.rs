//! Configuration management for ytd

use crate::error::ConfigError;
use crate::layout::OutputLayout;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub tuning: TuningConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to yt-dlp binary (auto-detected if not set)
    pub yt_dlp: Option<PathBuf>,
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root for mp3 downloads and the retuned subfolders
    pub audio_dir: PathBuf,
    /// Root for mp4 downloads
    pub video_dir: PathBuf,
    /// Playlist target directory (falls back to `video_dir`)
    pub playlist_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TuningConfig {
    /// Subfolder of `audio_dir` for 432Hz output
    pub dir_432: String,
    /// Subfolder of `audio_dir` for 444Hz output
    pub dir_444: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig {
                yt_dlp: None,
                ffmpeg: None,
            },
            output: OutputConfig {
                audio_dir: default_root(dirs::audio_dir()),
                video_dir: default_root(dirs::video_dir()),
                playlist_dir: None,
            },
            tuning: TuningConfig {
                dir_432: "432".to_string(),
                dir_444: "444".to_string(),
            },
        }
    }
}

fn default_root(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from("."))
        .join("youtube_downloads")
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(config_dir) = dirs::config_dir() {
            let default_config = config_dir.join("ytd/config.toml");
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::LoadError(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        // Double underscore so keys like `audio_dir` survive: YTD_OUTPUT__AUDIO_DIR
        figment = figment.merge(Env::prefixed("YTD_").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::LoadError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (key, dir) in [
            ("tuning.dir_432", &self.tuning.dir_432),
            ("tuning.dir_444", &self.tuning.dir_444),
        ] {
            if dir.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!("{key} must not be empty")));
            }
        }
        if self.tuning.dir_432 == self.tuning.dir_444 {
            return Err(ConfigError::InvalidValue(
                "tuning.dir_432 and tuning.dir_444 must differ".to_string(),
            ));
        }
        Ok(())
    }

    /// Get yt-dlp path, auto-detecting if not configured
    pub fn yt_dlp_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.yt_dlp {
            Ok(path.clone())
        } else {
            which::which("yt-dlp").map_err(|_| ConfigError::ToolNotFound("yt-dlp"))
        }
    }

    /// Get FFmpeg path, auto-detecting if not configured
    pub fn ffmpeg_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(ref path) = self.paths.ffmpeg {
            Ok(path.clone())
        } else {
            which::which("ffmpeg").map_err(|_| ConfigError::ToolNotFound("ffmpeg"))
        }
    }

    pub fn output_layout(&self) -> OutputLayout {
        OutputLayout::new(
            self.output.audio_dir.clone(),
            self.output.video_dir.clone(),
            self.tuning.dir_432.clone(),
            self.tuning.dir_444.clone(),
        )
    }

    /// Directory playlist videos land in
    pub fn playlist_dir(&self) -> PathBuf {
        self.output
            .playlist_dir
            .clone()
            .unwrap_or_else(|| self.output.video_dir.clone())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}
