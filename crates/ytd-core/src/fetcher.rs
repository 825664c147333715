//! Download orchestration for single videos and playlists
//!
//! Everything runs strictly in sequence: resolve, prepare directories, name,
//! download, retune, boost, clean up. Existing files at the target paths are
//! treated as finished work and skipped.

use crate::error::{FetchError, Result};
use crate::layout::{video_in, OutputLayout};
use crate::media::{MediaSource, PlaylistEntry, VideoRef};
use crate::naming::file_stem;
use crate::transformer::AudioTransformer;
use crate::tuning::{BassBoostLevel, Tuning};

use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Per-invocation options for the audio pipeline
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformRequest {
    pub audio_only: bool,
    /// Produce 432Hz and 444Hz copies (audio only)
    pub change_frequency: bool,
    /// Bass boost the retuned copies (requires `change_frequency`)
    pub bass_boost: Option<BassBoostLevel>,
}

/// What a single-video download did.
#[derive(Debug, Default)]
pub struct DownloadReport {
    pub name: Option<String>,
    pub created: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
    pub error: Option<FetchError>,
}

impl DownloadReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct PlaylistReport {
    pub downloaded: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    /// Entry label (title or id) and the error that stopped it
    pub failed: Vec<(String, FetchError)>,
}

enum Fetched {
    Downloaded(PathBuf),
    Existing(PathBuf),
}

pub struct MediaFetcher<S, T> {
    layout: OutputLayout,
    source: S,
    transformer: T,
}

impl<S: MediaSource, T: AudioTransformer> MediaFetcher<S, T> {
    pub fn new(layout: OutputLayout, source: S, transformer: T) -> Self {
        Self {
            layout,
            source,
            transformer,
        }
    }

    /// Download one video (or its audio) and apply the requested transforms.
    ///
    /// Never fails: resolution, download and tool errors are logged and left
    /// in the returned report.
    pub async fn download(&self, url: &str, request: &TransformRequest) -> DownloadReport {
        let mut report = DownloadReport::default();

        match self.run(url, request, &mut report).await {
            Ok(()) => info!("Download complete!"),
            Err(e @ FetchError::Resolve(_)) => {
                error!("Connection error: {}", e);
                report.error = Some(e);
            }
            Err(e) => {
                error!("{}: {}", url, e);
                report.error = Some(e);
            }
        }

        report
    }

    async fn run(
        &self,
        url: &str,
        request: &TransformRequest,
        report: &mut DownloadReport,
    ) -> Result<()> {
        let video = self.source.resolve(url).await.map_err(FetchError::Resolve)?;

        self.layout.ensure_dirs().await?;

        let name = file_stem(&video.title, &video.id);
        debug!("Normalized \"{}\" to {}", video.title, name);
        report.name = Some(name.clone());

        if request.audio_only {
            return self.fetch_audio(&video, &name, request, report).await;
        }

        if request.change_frequency || request.bass_boost.is_some() {
            warn!("Frequency change and bass boost only apply with --audio; ignoring");
        }

        match self
            .fetch_video(&video, &self.layout.video_path(&name))
            .await?
        {
            Fetched::Downloaded(path) => report.created.push(path),
            Fetched::Existing(path) => report.skipped.push(path),
        }
        Ok(())
    }

    async fn fetch_video(&self, video: &VideoRef, target: &Path) -> Result<Fetched> {
        if target.exists() {
            info!("File ({}) already exists! Skipping download...", display_name(target));
            return Ok(Fetched::Existing(target.to_path_buf()));
        }

        let stream = video
            .best_progressive()
            .ok_or(FetchError::NoStream("audio+video"))?;

        info!("Downloading video: {}", video.title);
        self.source
            .download(video, stream, target)
            .await
            .map_err(FetchError::Download)?;

        Ok(Fetched::Downloaded(target.to_path_buf()))
    }

    async fn fetch_audio(
        &self,
        video: &VideoRef,
        name: &str,
        request: &TransformRequest,
        report: &mut DownloadReport,
    ) -> Result<()> {
        let base = self.layout.audio_path(name);

        if !request.change_frequency {
            if request.bass_boost.is_some() {
                warn!("Bass boost only applies with --change_frequency; ignoring");
            }
            if base.exists() {
                info!("File ({}) already exists! Skipping download...", display_name(&base));
                report.skipped.push(base);
            } else {
                self.download_mp3(video, &base).await?;
                report.created.push(base);
            }
            return Ok(());
        }

        let pending: Vec<Tuning> = Tuning::ALL
            .into_iter()
            .filter(|t| !self.layout.tuned_path(name, *t).exists())
            .collect();

        for tuning in Tuning::ALL.into_iter().filter(|t| !pending.contains(t)) {
            let tuned = self.layout.tuned_path(name, tuning);
            info!("File ({}) already exists! Skipping...", display_name(&tuned));
            report.skipped.push(tuned);
        }

        if !pending.is_empty() {
            if base.exists() {
                info!("File ({}) already exists! Skipping download...", display_name(&base));
                report.skipped.push(base.clone());
            } else {
                self.download_mp3(video, &base).await?;
            }

            info!("Converting frequency of {}...", video.title);
            for tuning in pending {
                let tuned = self.layout.tuned_path(name, tuning);
                self.transformer
                    .pitch_shift(&base, &tuned, tuning.pitch_ratio())
                    .await?;
                report.created.push(tuned);
            }
        }

        // The plain mp3 is only an intermediate once retuning is requested,
        // including one left over from an earlier audio-only run
        if base.exists() {
            tokio::fs::remove_file(&base).await?;
            debug!("Removed intermediate {}", base.display());
            report.skipped.retain(|p| p != &base);
            report.removed.push(base);
        }

        if let Some(level) = request.bass_boost {
            self.boost_tuned(video, name, level, report).await?;
        }

        Ok(())
    }

    async fn boost_tuned(
        &self,
        video: &VideoRef,
        name: &str,
        level: BassBoostLevel,
        report: &mut DownloadReport,
    ) -> Result<()> {
        let mut announced = false;

        for tuning in Tuning::ALL {
            let boosted = self.layout.boosted_path(name, tuning);
            if boosted.exists() {
                info!("File ({}) already exists! Skipping...", display_name(&boosted));
                report.skipped.push(boosted);
                continue;
            }

            if !announced {
                info!("Applying bass boost to {}...", video.title);
                announced = true;
            }

            let tuned = self.layout.tuned_path(name, tuning);
            self.transformer.bass_boost(&tuned, &boosted, level).await?;
            info!("Bass boost applied to {}", boosted.display());
            report.created.push(boosted);
        }

        Ok(())
    }

    /// Download the best audio-only stream and encode it to mp3 at `target`.
    async fn download_mp3(&self, video: &VideoRef, target: &Path) -> Result<()> {
        let stream = video
            .best_audio()
            .ok_or(FetchError::NoStream("audio-only"))?;

        info!("Downloading audio: {}", video.title);

        let temp_dir = tempfile::tempdir()?;
        let ext = if stream.ext.is_empty() { "audio" } else { stream.ext.as_str() };
        let raw = temp_dir.path().join(format!("source.{}", ext));

        self.source
            .download(video, stream, &raw)
            .await
            .map_err(FetchError::Download)?;
        self.transformer.encode_mp3(&raw, target).await?;

        Ok(())
    }

    /// Download every video of a playlist into `dest_dir`, one at a time.
    ///
    /// Only listing the playlist can fail; a failing entry is logged, recorded
    /// in the report and the next entry is processed.
    pub async fn download_playlist(&self, url: &str, dest_dir: &Path) -> Result<PlaylistReport> {
        let entries = self
            .source
            .playlist(url)
            .await
            .map_err(FetchError::Resolve)?;

        tokio::fs::create_dir_all(dest_dir).await?;

        let total = entries.len();
        info!("Playlist has {} videos", total);

        let mut report = PlaylistReport::default();
        for (idx, entry) in entries.iter().enumerate() {
            debug!("[{}/{}] {}", idx + 1, total, entry.url);

            match self.fetch_playlist_entry(entry, dest_dir).await {
                Ok(Fetched::Downloaded(path)) => report.downloaded.push(path),
                Ok(Fetched::Existing(path)) => report.skipped.push(path),
                Err(e) => {
                    error!("Error downloading video {}: {}", entry.label(), e);
                    report.failed.push((entry.label().to_string(), e));
                }
            }
        }

        Ok(report)
    }

    async fn fetch_playlist_entry(&self, entry: &PlaylistEntry, dest_dir: &Path) -> Result<Fetched> {
        let video = self
            .source
            .resolve(&entry.url)
            .await
            .map_err(FetchError::Resolve)?;
        let name = file_stem(&video.title, &video.id);
        self.fetch_video(&video, &video_in(dest_dir, &name)).await
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
