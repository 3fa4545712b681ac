//! core/types.rs
//! Plain data shared between the tag layer, the lookup layer and the CLI.
//!
//! Rule of thumb:
//! - These structs should be "boring bags of data"
//! - No filesystem code
//! - No HTTP
//! - No tag parsing code
//!
//! `AudioTags` represents ONE audio file on disk plus the handful of fields
//! these tools actually read or write.

use std::fmt;
use std::path::PathBuf;

/// Tag fields for one audio file.
///
/// Everything is `Option` because plenty of files come out of a downloader
/// with half-filled (or no) tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioTags {
    /// Full file path on disk. The only thing we always have.
    pub path: PathBuf,

    /// TIT2
    pub title: Option<String>,
    /// TPE1, falling back to TPE2 (album artist)
    pub artist: Option<String>,
    /// TALB
    pub album: Option<String>,
    /// TDRC, falling back to TYER
    pub date: Option<String>,
    /// TCON
    pub genre: Option<String>,

    pub track_no: Option<u32>,
    pub track_total: Option<u32>,

    /// Number of embedded picture frames (APIC).
    pub picture_count: usize,
}

impl AudioTags {
    pub fn has_cover(&self) -> bool {
        self.picture_count > 0
    }

    /// True if none of the fields a lookup could use are set.
    pub fn is_blank(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.album.is_none()
    }

    /// Build a lookup query. Needs BOTH title and artist.
    pub fn query(&self) -> Option<TrackQuery> {
        let artist = non_empty(self.artist.as_deref())?;
        let title = non_empty(self.title.as_deref())?;
        Some(TrackQuery {
            artist: artist.to_string(),
            title: title.to_string(),
            album: non_empty(self.album.as_deref()).map(str::to_string),
        })
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

/// What we ask the cover sources for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackQuery {
    pub artist: String,
    pub title: String,
    pub album: Option<String>,
}

impl TrackQuery {
    /// "<artist> <title>"
    pub fn search_term(&self) -> String {
        format!("{} {}", self.artist, self.title)
    }
}

/// One image URL offered by a cover source, before we have downloaded it.
///
/// The metadata fields ride along so the finder can optionally write
/// artist/title/album/year/genre/track from the same hit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverCandidate {
    pub url: String,
    /// Human label, ex: "iTunes 1200px", "CoverArtArchive"
    pub source: String,
    /// Size the source claims (square edge, px). Not trusted for selection.
    pub size_hint: Option<u32>,

    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    /// YYYY, YYYY-MM or YYYY-MM-DD
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub track_no: Option<u32>,
    pub track_total: Option<u32>,
}

/// Image bytes we actually hold, with measured dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub data: Vec<u8>,
    /// ex: "image/jpeg"
    pub mime: String,
    pub width: u32,
    pub height: u32,
    /// URL or file path the bytes came from.
    pub origin: String,
}

impl CoverImage {
    /// Both edges must reach the threshold.
    pub fn meets_min_resolution(&self, min: u32) -> bool {
        self.width >= min && self.height >= min
    }
}

/// Result for one file in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// File was rewritten. Detail says what changed.
    Updated(String),
    /// Nothing to do (ex: unlink on a file with no cover).
    Unchanged,
    /// Dry-run: would have written this.
    Found(String),
    /// Not processed: unreadable, missing tags, already has art...
    Skipped(String),
    /// Looked, found nothing usable.
    Missed(String),
    /// Something broke while processing this file.
    Failed(String),
}

impl Outcome {
    fn label(&self) -> &'static str {
        match self {
            Outcome::Updated(_) => "OK",
            Outcome::Unchanged => "UNCHANGED",
            Outcome::Found(_) => "FOUND",
            Outcome::Skipped(_) => "SKIP",
            Outcome::Missed(_) => "MISS",
            Outcome::Failed(_) => "ERR",
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            Outcome::Updated(d)
            | Outcome::Found(d)
            | Outcome::Skipped(d)
            | Outcome::Missed(d)
            | Outcome::Failed(d) => Some(d),
            Outcome::Unchanged => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub outcome: Outcome,
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.outcome.label(), self.path.display())?;
        if let Some(d) = self.outcome.detail() {
            write!(f, " ({d})")?;
        }
        Ok(())
    }
}

/// Everything that happened during one pass over a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub files: Vec<FileOutcome>,
}

impl RunReport {
    pub fn push(&mut self, path: PathBuf, outcome: Outcome) {
        self.files.push(FileOutcome { path, outcome });
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }

    /// Updated, or found in a dry-run.
    pub fn ok(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Updated(_) | Outcome::Found(_)))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unchanged))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    pub fn missed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Missed(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    /// Some files did not get the treatment.
    pub fn is_partial(&self) -> bool {
        self.skipped() + self.missed() + self.failed() > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "ok={} unchanged={} skip={} miss={} err={} of {}",
            self.ok(),
            self.unchanged(),
            self.skipped(),
            self.missed(),
            self.failed(),
            self.files.len()
        )
    }
}
