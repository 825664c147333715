use anyhow::Result;
use std::path::Path;
use std::process::Command;
use ytd_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("ytd dependency check\n");

    let mut all_ok = true;

    // Check yt-dlp
    print!("yt-dlp:        ");
    match config.yt_dlp_path() {
        Ok(path) => {
            let version = Command::new(&path).arg("--version").output();
            match version {
                Ok(out) => {
                    let v = String::from_utf8_lossy(&out.stdout);
                    println!("OK ({})", v.trim());
                }
                Err(_) => {
                    println!("FOUND but failed to get version");
                    all_ok = false;
                }
            }
        }
        Err(_) => {
            println!("NOT FOUND");
            println!("               Install with: pip install yt-dlp");
            all_ok = false;
        }
    }

    // Check FFmpeg
    print!("ffmpeg:        ");
    let ffmpeg = match config.ffmpeg_path() {
        Ok(path) => {
            let version = Command::new(&path).args(["-version"]).output();
            match version {
                Ok(out) => {
                    let first_line = String::from_utf8_lossy(&out.stdout)
                        .lines()
                        .next()
                        .unwrap_or("")
                        .to_string();
                    println!("OK ({})", version_from_banner(&first_line));
                    Some(path)
                }
                Err(_) => {
                    println!("FOUND but failed to get version");
                    all_ok = false;
                    None
                }
            }
        }
        Err(_) => {
            println!("NOT FOUND");
            println!("               Install with: apt install ffmpeg");
            all_ok = false;
            None
        }
    };

    if let Some(ffmpeg) = ffmpeg {
        // Retuning needs librubberband, mp3 output needs libmp3lame
        print!("  rubberband:  ");
        all_ok &= report(ffmpeg_lists(&ffmpeg, "-filters", "rubberband"), "needed for --change_frequency");

        print!("  bass:        ");
        all_ok &= report(ffmpeg_lists(&ffmpeg, "-filters", " bass "), "needed for --bass_boost");

        print!("  libmp3lame:  ");
        all_ok &= report(ffmpeg_lists(&ffmpeg, "-encoders", "libmp3lame"), "needed for --audio");
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}

fn ffmpeg_lists(ffmpeg: &Path, listing: &str, needle: &str) -> bool {
    Command::new(ffmpeg)
        .args(["-hide_banner", listing])
        .output()
        .map(|out| String::from_utf8_lossy(&out.stdout).contains(needle))
        .unwrap_or(false)
}

fn report(available: bool, hint: &str) -> bool {
    if available {
        println!("OK");
    } else {
        println!("MISSING ({})", hint);
    }
    available
}

/// "ffmpeg version 6.1.1-3ubuntu5 Copyright ..." -> "6.1.1-3ubuntu5"
fn version_from_banner(line: &str) -> &str {
    line.split_whitespace().nth(2).unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_banner() {
        assert_eq!(
            version_from_banner("ffmpeg version 6.1.1-3ubuntu5 Copyright (c) 2000-2023"),
            "6.1.1-3ubuntu5"
        );
        assert_eq!(version_from_banner(""), "unknown");
    }
}
