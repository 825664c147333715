//! Resolved video metadata and the download backend seam

use crate::error::SourceError;
use std::path::Path;

/// One downloadable encoding of a video.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamDescriptor {
    pub format_id: String,
    pub ext: String,
    /// Vertical resolution, absent for audio-only streams
    pub height: Option<u32>,
    /// Average audio bitrate in kbps
    pub abr: Option<f64>,
    pub has_audio: bool,
    pub has_video: bool,
}

impl StreamDescriptor {
    pub fn is_progressive(&self) -> bool {
        self.has_audio && self.has_video
    }

    pub fn is_audio_only(&self) -> bool {
        self.has_audio && !self.has_video
    }
}

/// A resolved video: identity, title and available streams.
#[derive(Debug, Clone)]
pub struct VideoRef {
    pub id: String,
    pub url: String,
    pub title: String,
    pub streams: Vec<StreamDescriptor>,
}

impl VideoRef {
    /// Highest resolution stream carrying both audio and video.
    pub fn best_progressive(&self) -> Option<&StreamDescriptor> {
        self.streams
            .iter()
            .filter(|s| s.is_progressive())
            .max_by_key(|s| s.height.unwrap_or(0))
    }

    /// Highest bitrate audio-only stream.
    pub fn best_audio(&self) -> Option<&StreamDescriptor> {
        self.streams
            .iter()
            .filter(|s| s.is_audio_only())
            .max_by(|a, b| a.abr.unwrap_or(0.0).total_cmp(&b.abr.unwrap_or(0.0)))
    }
}

/// Flat playlist item, resolved on demand.
#[derive(Debug, Clone)]
pub struct PlaylistEntry {
    pub id: String,
    pub url: String,
    pub title: Option<String>,
}

impl PlaylistEntry {
    /// Best-effort identity for log lines
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// Video platform backend.
#[allow(async_fn_in_trait)]
pub trait MediaSource {
    /// Fetch title and stream list for a single video.
    async fn resolve(&self, url: &str) -> Result<VideoRef, SourceError>;

    /// List a playlist's entries in platform order.
    async fn playlist(&self, url: &str) -> Result<Vec<PlaylistEntry>, SourceError>;

    /// Download one stream of `video` to exactly `dest`.
    async fn download(
        &self,
        video: &VideoRef,
        stream: &StreamDescriptor,
        dest: &Path,
    ) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(id: &str, height: Option<u32>, abr: Option<f64>, audio: bool, video: bool) -> StreamDescriptor {
        StreamDescriptor {
            format_id: id.to_string(),
            ext: if video { "mp4" } else { "m4a" }.to_string(),
            height,
            abr,
            has_audio: audio,
            has_video: video,
        }
    }

    fn video(streams: Vec<StreamDescriptor>) -> VideoRef {
        VideoRef {
            id: "abc".to_string(),
            url: "https://www.youtube.com/watch?v=abc".to_string(),
            title: "Title".to_string(),
            streams,
        }
    }

    #[test]
    fn test_best_progressive_prefers_height() {
        let v = video(vec![
            stream("18", Some(360), None, true, true),
            stream("137", Some(1080), None, false, true),
            stream("22", Some(720), None, true, true),
            stream("140", None, Some(129.5), true, false),
        ]);
        assert_eq!(v.best_progressive().map(|s| s.format_id.as_str()), Some("22"));
    }

    #[test]
    fn test_best_audio_prefers_bitrate() {
        let v = video(vec![
            stream("18", Some(360), Some(96.0), true, true),
            stream("139", None, Some(48.8), true, false),
            stream("251", None, Some(135.2), true, false),
            stream("140", None, Some(129.5), true, false),
        ]);
        assert_eq!(v.best_audio().map(|s| s.format_id.as_str()), Some("251"));
    }

    #[test]
    fn test_no_matching_stream() {
        let v = video(vec![stream("137", Some(1080), None, false, true)]);
        assert!(v.best_progressive().is_none());
        assert!(v.best_audio().is_none());
    }

    #[test]
    fn test_entry_label() {
        let mut entry = PlaylistEntry {
            id: "xyz".to_string(),
            url: "https://www.youtube.com/watch?v=xyz".to_string(),
            title: None,
        };
        assert_eq!(entry.label(), "xyz");
        entry.title = Some("Named".to_string());
        assert_eq!(entry.label(), "Named");
    }
}
