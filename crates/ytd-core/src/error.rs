//! Error types for ytd-core

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Could not resolve video: {0}")]
    Resolve(#[source] SourceError),

    #[error("Download failed: {0}")]
    Download(#[source] SourceError),

    #[error("No {0} stream available")]
    NoStream(&'static str),

    #[error("Transform failed: {0}")]
    Transform(#[from] TransformError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("yt-dlp failed with exit code {0:?}: {1}")]
    ToolFailed(Option<i32>, String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Video unavailable or private: {0}")]
    VideoUnavailable(String),

    #[error("Failed to parse metadata: {0}")]
    MetadataParse(String),

    #[error("yt-dlp reported success but wrote no file: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("FFmpeg {step} failed with exit code {code:?}: {stderr}")]
    ToolFailed {
        step: &'static str,
        code: Option<i32>,
        stderr: String,
    },

    #[error("FFmpeg reported success but produced no output: {}", .0.display())]
    MissingOutput(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),

    #[error("{0} not found in PATH")]
    ToolNotFound(&'static str),
}
