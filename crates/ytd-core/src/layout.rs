//! Output directory layout
//!
//! The layout doubles as the idempotency ledger: an existing file at one of
//! these paths is taken as a finished artifact. Nothing checks its content and
//! concurrent runs against the same roots may race between the check and the
//! write.

use crate::tuning::Tuning;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct OutputLayout {
    audio_root: PathBuf,
    video_root: PathBuf,
    dir_432: String,
    dir_444: String,
}

impl OutputLayout {
    pub fn new(audio_root: PathBuf, video_root: PathBuf, dir_432: String, dir_444: String) -> Self {
        Self {
            audio_root,
            video_root,
            dir_432,
            dir_444,
        }
    }

    pub fn audio_root(&self) -> &Path {
        &self.audio_root
    }

    pub fn video_root(&self) -> &Path {
        &self.video_root
    }

    pub fn tuning_dir(&self, tuning: Tuning) -> PathBuf {
        let sub = match tuning {
            Tuning::Hz432 => &self.dir_432,
            Tuning::Hz444 => &self.dir_444,
        };
        self.audio_root.join(sub)
    }

    /// `{audio_root}/{name}.mp3`
    pub fn audio_path(&self, name: &str) -> PathBuf {
        self.audio_root.join(format!("{}.mp3", name))
    }

    /// `{video_root}/{name}.mp4`
    pub fn video_path(&self, name: &str) -> PathBuf {
        video_in(&self.video_root, name)
    }

    /// `{tuning_dir}/{name}_{432hz|444hz}.mp3`
    pub fn tuned_path(&self, name: &str, tuning: Tuning) -> PathBuf {
        self.tuning_dir(tuning)
            .join(format!("{}_{}.mp3", name, tuning.suffix()))
    }

    /// `{tuning_dir}/{name}_{432hz|444hz}_bass_boosted.mp3`
    pub fn boosted_path(&self, name: &str, tuning: Tuning) -> PathBuf {
        self.tuning_dir(tuning)
            .join(format!("{}_{}_bass_boosted.mp3", name, tuning.suffix()))
    }

    /// Create the audio root, video root and both tuning folders.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.audio_root).await?;
        tokio::fs::create_dir_all(&self.video_root).await?;
        for tuning in Tuning::ALL {
            tokio::fs::create_dir_all(self.tuning_dir(tuning)).await?;
        }
        Ok(())
    }
}

/// `{dir}/{name}.mp4`, shared with playlist mode.
pub fn video_in(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.mp4", name))
}
