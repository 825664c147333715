//! ytd-core: YouTube video/audio downloads with 432Hz/444Hz retuning and bass boost

pub mod config;
pub mod downloader;
pub mod error;
pub mod fetcher;
pub mod layout;
pub mod media;
pub mod naming;
pub mod transformer;
pub mod tuning;

pub use config::Config;
pub use error::{FetchError, Result};
pub use fetcher::{DownloadReport, MediaFetcher, PlaylistReport, TransformRequest};
pub use tuning::{BassBoostLevel, Tuning};
