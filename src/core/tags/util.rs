//! core/tags/util.rs
//! Small parsing helpers shared by tag reading/writing.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// One trailing `[...]` block, plus the whitespace before it.
/// yt-dlp names files `%(title)s [%(id)s].%(ext)s`.
static TRAILING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[[^\[\]]*\]\s*$").expect("valid regex"));

/// `Artist - Title`
static ARTIST_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?)\s*-\s*(.+)$").expect("valid regex"));

/// Parse strings like:
/// - "3" -> (Some(3), None)
/// - "3/12" -> (Some(3), Some(12))
pub(crate) fn parse_slash_pair_u32(s: Option<&str>) -> (Option<u32>, Option<u32>) {
    let Some(s) = s else { return (None, None) };
    let s = s.trim();
    if s.is_empty() {
        return (None, None);
    }

    let mut parts = s.split('/');
    let a = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    let b = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    (a, b)
}

/// Format TRCK as "n" or "n/total".
pub(crate) fn format_slash_pair(n: u32, total: Option<u32>) -> String {
    match total {
        Some(t) => format!("{n}/{t}"),
        None => n.to_string(),
    }
}

/// File stem with one trailing bracketed id removed.
///
/// - `Song Title [abc123].mp3` -> `Song Title`
/// - `Song Title.mp3` -> `Song Title`
/// - `[abc123].mp3` -> `[abc123]` (stripping would leave nothing)
pub fn title_from_filename(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let stripped = TRAILING_ID.replace(stem, "");
    let stripped = stripped.trim();

    if stripped.is_empty() {
        let stem = stem.trim();
        return (!stem.is_empty()).then(|| stem.to_string());
    }
    Some(stripped.to_string())
}

/// `Artist - Title [id].mp3` -> ("Artist", "Title").
pub fn artist_title_from_filename(path: &Path) -> Option<(String, String)> {
    let stem = title_from_filename(path)?;
    let caps = ARTIST_TITLE.captures(&stem)?;
    let artist = caps.get(1)?.as_str().trim();
    let title = caps.get(2)?.as_str().trim();
    if artist.is_empty() || title.is_empty() {
        return None;
    }
    Some((artist.to_string(), title.to_string()))
}

/// First four characters of a date string if they look like a year.
pub(crate) fn year_of(date: &str) -> Option<&str> {
    let y = date.trim().get(..4)?;
    y.bytes().all(|b| b.is_ascii_digit()).then_some(y)
}
