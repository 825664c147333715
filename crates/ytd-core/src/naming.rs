//! Filesystem-safe names derived from video titles

use regex::Regex;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("separator pattern is valid"));

/// Normalize a title into a stable file stem.
///
/// Every run of characters outside `[A-Za-z0-9]` (whitespace, punctuation,
/// underscores, non-ASCII) becomes a single `_`, underscores at either end
/// are dropped and the result is lowercased. The output always matches
/// `^[a-z0-9_]*$` and never contains `__`, so the same title maps to the
/// same file name in both single-video and playlist mode.
pub fn normalize_title(title: &str) -> String {
    SEPARATORS
        .replace_all(title, "_")
        .trim_matches('_')
        .to_ascii_lowercase()
}

/// File stem for a video, falling back to its id when the title has no
/// usable characters.
pub fn file_stem(title: &str, id: &str) -> String {
    let name = normalize_title(title);
    if name.is_empty() {
        normalize_title(id)
    } else {
        name
    }
}
