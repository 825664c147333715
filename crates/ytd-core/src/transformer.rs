//! Audio transcoding, retuning and bass boost using FFmpeg

use crate::error::TransformError;
use crate::tuning::BassBoostLevel;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Media processing backend.
#[allow(async_fn_in_trait)]
pub trait AudioTransformer {
    /// Re-encode any audio input to mp3.
    async fn encode_mp3(&self, input: &Path, output: &Path) -> Result<(), TransformError>;

    /// Shift pitch by `ratio` without changing tempo.
    async fn pitch_shift(&self, input: &Path, output: &Path, ratio: f64)
        -> Result<(), TransformError>;

    /// Bass shelf gain followed by compression and limiting.
    async fn bass_boost(
        &self,
        input: &Path,
        output: &Path,
        level: BassBoostLevel,
    ) -> Result<(), TransformError>;
}

#[derive(Debug)]
pub struct Ffmpeg {
    ffmpeg_path: PathBuf,
}

impl Ffmpeg {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    async fn run(
        &self,
        step: &'static str,
        input: &Path,
        output: &Path,
        filter_args: &[String],
    ) -> Result<(), TransformError> {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(["-hide_banner", "-loglevel", "error"]);
        cmd.arg("-i").arg(input);
        cmd.args(["-vn"]);
        cmd.args(filter_args);
        cmd.args(mp3_codec_args());
        cmd.arg("-y").arg(output);

        debug!("ffmpeg {}: {} -> {}", step, input.display(), output.display());
        let result = cmd.output().await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            discard_partial(output).await;
            return Err(TransformError::ToolFailed {
                step,
                code: result.status.code(),
                stderr,
            });
        }

        if !output.exists() {
            return Err(TransformError::MissingOutput(output.to_path_buf()));
        }

        Ok(())
    }
}

impl AudioTransformer for Ffmpeg {
    async fn encode_mp3(&self, input: &Path, output: &Path) -> Result<(), TransformError> {
        info!("Encoding to MP3: {}", output.display());
        self.run("encode", input, output, &[]).await
    }

    async fn pitch_shift(
        &self,
        input: &Path,
        output: &Path,
        ratio: f64,
    ) -> Result<(), TransformError> {
        info!("Pitch shifting by {:.6}: {}", ratio, output.display());
        self.run("pitch shift", input, output, &pitch_filter(ratio))
            .await
    }

    async fn bass_boost(
        &self,
        input: &Path,
        output: &Path,
        level: BassBoostLevel,
    ) -> Result<(), TransformError> {
        info!("Bass boost (g={}): {}", level, output.display());
        self.run("bass boost", input, output, &bass_filter(level))
            .await
    }
}

fn mp3_codec_args() -> [&'static str; 4] {
    [
        "-c:a", "libmp3lame",
        "-q:a", "0", // VBR highest quality (~245 kbps)
    ]
}

fn pitch_filter(ratio: f64) -> Vec<String> {
    vec!["-af".to_string(), format!("rubberband=pitch={}", ratio)]
}

fn bass_filter(level: BassBoostLevel) -> Vec<String> {
    vec![
        "-af".to_string(),
        format!("bass=g={},acompressor,alimiter", level),
    ]
}

/// Remove whatever a failed run left behind so the next run does not mistake
/// it for a finished artifact.
async fn discard_partial(output: &Path) {
    if output.exists() {
        if let Err(e) = tokio::fs::remove_file(output).await {
            warn!("Could not remove partial output {}: {}", output.display(), e);
        }
    }
}
