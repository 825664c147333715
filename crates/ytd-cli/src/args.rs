use clap::{Parser, Subcommand};
use std::path::PathBuf;
use ytd_core::BassBoostLevel;

#[derive(Parser)]
#[command(name = "ytd")]
#[command(
    author,
    version,
    about = "Download YouTube videos and audio with optional frequency conversion and bass boost"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// URL of the YouTube video
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    /// Download audio only (mp3)
    #[arg(short, long)]
    pub audio: bool,

    /// Also produce 432Hz and 444Hz versions of the audio (requires --audio)
    #[arg(short = 'f', long = "change_frequency")]
    pub change_frequency: bool,

    /// Apply bass boost to the retuned audio (1-20)
    #[arg(
        short = 'b',
        long = "bass_boost",
        value_name = "LEVEL",
        value_parser = parse_bass_level
    )]
    pub bass_boost: Option<BassBoostLevel>,

    /// Verbose output (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download every video of a playlist (video only)
    Playlist {
        /// YouTube playlist URL
        url: String,

        /// Target directory (defaults to output.playlist_dir, then output.video_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check external dependencies
    Doctor,

    /// Show configuration
    Config,
}

fn parse_bass_level(s: &str) -> Result<BassBoostLevel, String> {
    let level: u8 = s
        .parse()
        .map_err(|_| format!("`{s}` is not a whole number"))?;
    BassBoostLevel::new(level).ok_or_else(|| {
        format!(
            "{level} is not in {}..={}",
            BassBoostLevel::MIN,
            BassBoostLevel::MAX
        )
    })
}
