//! YouTube access through the yt-dlp executable

use crate::error::SourceError;
use crate::media::{MediaSource, PlaylistEntry, StreamDescriptor, VideoRef};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug)]
pub struct YtDlp {
    yt_dlp_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct VideoMetadata {
    id: String,
    title: String,
    #[serde(default)]
    webpage_url: Option<String>,
    #[serde(default)]
    formats: Vec<FormatMetadata>,
}

#[derive(Debug, Deserialize)]
struct FormatMetadata {
    format_id: String,
    #[serde(default)]
    ext: String,
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    acodec: Option<String>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    abr: Option<f64>,
    #[serde(default)]
    tbr: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FlatEntry {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl YtDlp {
    pub fn new(yt_dlp_path: PathBuf) -> Self {
        Self { yt_dlp_path }
    }

    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, SourceError> {
        debug!("yt-dlp {}", args.join(" "));

        let output = Command::new(&self.yt_dlp_path).args(args).output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(classify_failure(
                args.last().copied().unwrap_or_default(),
                output.status.code(),
                &stderr,
            ));
        }

        Ok(output.stdout)
    }
}

impl MediaSource for YtDlp {
    async fn resolve(&self, url: &str) -> Result<VideoRef, SourceError> {
        info!("Resolving: {}", url);
        let stdout = self
            .run(&["-J", "--no-playlist", "--no-warnings", url])
            .await?;
        parse_video(&stdout, url)
    }

    async fn playlist(&self, url: &str) -> Result<Vec<PlaylistEntry>, SourceError> {
        info!("Listing playlist: {}", url);
        let stdout = self
            .run(&["--flat-playlist", "--dump-json", "--no-warnings", url])
            .await?;
        parse_playlist(&String::from_utf8_lossy(&stdout))
    }

    async fn download(
        &self,
        video: &VideoRef,
        stream: &StreamDescriptor,
        dest: &Path,
    ) -> Result<(), SourceError> {
        info!(
            "Downloading format {} ({}) of: {}",
            stream.format_id, stream.ext, video.title
        );

        let template = output_template(dest);
        self.run(&[
            "-f",
            stream.format_id.as_str(),
            "-o",
            template.as_str(),
            "--no-playlist",
            "--no-warnings",
            "--quiet",
            "--force-overwrites",
            video.url.as_str(),
        ])
        .await?;

        if !dest.exists() {
            return Err(SourceError::MissingOutput(dest.to_path_buf()));
        }

        debug!("Downloaded to: {}", dest.display());
        Ok(())
    }
}

fn classify_failure(url: &str, code: Option<i32>, stderr: &str) -> SourceError {
    if stderr.contains("Video unavailable") || stderr.contains("Private video") {
        return SourceError::VideoUnavailable(url.to_string());
    }
    if stderr.contains("is not a valid URL") || stderr.contains("Unsupported URL") {
        return SourceError::InvalidUrl(url.to_string());
    }
    SourceError::ToolFailed(code, stderr.trim().to_string())
}

/// yt-dlp expands `%(field)s` in `-o`, so literal percent signs are doubled.
fn output_template(dest: &Path) -> String {
    dest.to_string_lossy().replace('%', "%%")
}

fn parse_video(json: &[u8], requested_url: &str) -> Result<VideoRef, SourceError> {
    let metadata: VideoMetadata =
        serde_json::from_slice(json).map_err(|e| SourceError::MetadataParse(e.to_string()))?;

    let streams = metadata
        .formats
        .into_iter()
        .map(|f| StreamDescriptor {
            has_audio: codec_present(f.acodec.as_deref()),
            has_video: codec_present(f.vcodec.as_deref()),
            abr: f.abr.or(f.tbr),
            format_id: f.format_id,
            ext: f.ext,
            height: f.height,
        })
        .collect();

    Ok(VideoRef {
        url: metadata
            .webpage_url
            .unwrap_or_else(|| requested_url.to_string()),
        id: metadata.id,
        title: metadata.title,
        streams,
    })
}

fn codec_present(codec: Option<&str>) -> bool {
    matches!(codec, Some(c) if c != "none")
}

fn parse_playlist(stdout: &str) -> Result<Vec<PlaylistEntry>, SourceError> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let entry: FlatEntry = serde_json::from_str(line)
                .map_err(|e| SourceError::MetadataParse(e.to_string()))?;
            Ok(PlaylistEntry {
                url: entry
                    .url
                    .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={}", entry.id)),
                id: entry.id,
                title: entry.title,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIDEO_JSON: &str = r#"{
        "id": "dQw4w9WgXcQ",
        "title": "Rick Astley - Never Gonna Give You Up",
        "webpage_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "formats": [
            {"format_id": "sb0", "ext": "mhtml", "vcodec": "none", "acodec": "none"},
            {"format_id": "140", "ext": "m4a", "vcodec": "none", "acodec": "mp4a.40.2", "abr": 129.5},
            {"format_id": "251", "ext": "webm", "vcodec": "none", "acodec": "opus", "tbr": 135.9},
            {"format_id": "18", "ext": "mp4", "vcodec": "avc1.42001E", "acodec": "mp4a.40.2", "height": 360},
            {"format_id": "137", "ext": "mp4", "vcodec": "avc1.640028", "acodec": "none", "height": 1080}
        ]
    }"#;

    #[test]
    fn test_parse_video() {
        let video = parse_video(VIDEO_JSON.as_bytes(), "https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(video.id, "dQw4w9WgXcQ");
        assert_eq!(video.url, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(video.streams.len(), 5);

        let storyboard = &video.streams[0];
        assert!(!storyboard.has_audio && !storyboard.has_video);

        assert_eq!(video.best_progressive().unwrap().format_id, "18");
        // tbr stands in when abr is missing
        assert_eq!(video.best_audio().unwrap().format_id, "251");
    }

    #[test]
    fn test_parse_video_without_formats() {
        let video = parse_video(br#"{"id": "x", "title": "t"}"#, "https://youtu.be/x").unwrap();
        assert_eq!(video.url, "https://youtu.be/x");
        assert!(video.streams.is_empty());
    }

    #[test]
    fn test_parse_video_rejects_garbage() {
        let result = parse_video(b"not json", "u");
        assert!(matches!(result, Err(SourceError::MetadataParse(_))));
    }

    #[test]
    fn test_parse_playlist() {
        let stdout = concat!(
            r#"{"id": "aaa", "url": "https://www.youtube.com/watch?v=aaa", "title": "First"}"#,
            "\n\n",
            r#"{"id": "bbb", "title": null}"#,
            "\n"
        );
        let entries = parse_playlist(stdout).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label(), "First");
        assert_eq!(entries[1].url, "https://www.youtube.com/watch?v=bbb");
        assert_eq!(entries[1].label(), "bbb");
    }

    #[test]
    fn test_classify_failure() {
        assert!(matches!(
            classify_failure("u", Some(1), "ERROR: [youtube] x: Video unavailable"),
            SourceError::VideoUnavailable(_)
        ));
        assert!(matches!(
            classify_failure("u", Some(1), "ERROR: 'u' is not a valid URL"),
            SourceError::InvalidUrl(_)
        ));
        assert!(matches!(
            classify_failure("u", Some(1), "ERROR: Unable to download webpage"),
            SourceError::ToolFailed(Some(1), _)
        ));
    }

    #[test]
    fn test_output_template_escapes_percent() {
        assert_eq!(
            output_template(Path::new("/videos/100%/song.mp4")),
            "/videos/100%%/song.mp4"
        );
    }
}
