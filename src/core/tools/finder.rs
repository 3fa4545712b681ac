//! core/tools/finder.rs
//! `find-covers`: look each track up online and embed the first cover that
//! is big enough, optionally filling artist/title/album/year/genre/track from
//! the same hit.
//!
//! Per file:
//!   open tag -> build query -> maybe skip -> resolve -> edit in memory -> one save

use std::path::Path;

use id3::Tag;

use super::super::error::Result;
use super::super::lookup::{resolve_cover, CoverSource, ImageFetcher, Resolved, Selection};
use super::super::scan_root;
use super::super::tags::{
    artist_title_from_filename, audio_tags_from_tag, open_for_edit, replace_cover, save_tag,
    set_text_if, set_track_if, set_year_if, Version, FRONT_COVER_DESC,
};
use super::super::types::{AudioTags, Outcome, RunReport, TrackQuery};
use super::{record, skipped};

/// Which frames to fill from the chosen candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetadataUpdates {
    pub artist: bool,
    pub title: bool,
    pub album: bool,
    pub year: bool,
    pub genre: bool,
    pub track: bool,
}

impl MetadataUpdates {
    pub fn any(&self) -> bool {
        self.artist || self.title || self.album || self.year || self.genre || self.track
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FinderOptions {
    pub recursive: bool,
    /// Replace existing art; overwrite existing metadata frames.
    pub force: bool,
    pub dry_run: bool,
    pub version: Version,
    pub min_resolution: u32,
    pub updates: MetadataUpdates,
    /// Untagged files: try `Artist - Title` from the file name.
    pub guess_from_filename: bool,
}

pub fn run(
    root: &Path,
    opts: &FinderOptions,
    sources: &[Box<dyn CoverSource>],
    fetcher: &dyn ImageFetcher,
) -> Result<RunReport> {
    let files = scan_root(root, opts.recursive)?;
    let mut report = RunReport::default();

    for path in files {
        let outcome = find_one(&path, opts, sources, fetcher);
        record(&mut report, path, outcome);
    }
    Ok(report)
}

fn find_one(
    path: &Path,
    opts: &FinderOptions,
    sources: &[Box<dyn CoverSource>],
    fetcher: &dyn ImageFetcher,
) -> Outcome {
    let mut tag = match open_for_edit(path) {
        Ok(t) => t,
        Err(e) => return skipped(e),
    };
    let current = audio_tags_from_tag(path.to_path_buf(), &tag);

    let Some(query) = build_query(&current, opts.guess_from_filename) else {
        return Outcome::Skipped("missing title/artist tags".to_string());
    };

    let embed_art = !current.has_cover() || opts.force;
    if !embed_art && !opts.updates.any() {
        return Outcome::Skipped("already has art".to_string());
    }

    let selection = Selection {
        min_resolution: opts.min_resolution,
        prefer_numbered: opts.updates.track,
    };
    let resolved = match resolve_cover(sources, fetcher, &query, selection) {
        Ok(Some(r)) => r,
        Ok(None) => {
            return Outcome::Missed(format!(
                "no cover of at least {0}x{0} for \"{1}\"",
                opts.min_resolution,
                query.search_term()
            ))
        }
        Err(e) => return Outcome::Failed(format!("lookup failed: {e}")),
    };

    let changes = apply(&mut tag, &query, &resolved, embed_art, opts);
    if changes.is_empty() {
        return Outcome::Unchanged;
    }
    let detail = changes.join(", ");

    if opts.dry_run {
        return Outcome::Found(detail);
    }
    match save_tag(path, &tag, opts.version) {
        Ok(()) => Outcome::Updated(detail),
        Err(e) => Outcome::Failed(e.to_string()),
    }
}

/// Tags first; the file name only when the file carries no tags at all.
fn build_query(current: &AudioTags, guess_from_filename: bool) -> Option<TrackQuery> {
    if let Some(q) = current.query() {
        return Some(q);
    }
    if !guess_from_filename || !current.is_blank() {
        return None;
    }
    let (artist, title) = artist_title_from_filename(&current.path)?;
    Some(TrackQuery {
        artist,
        title,
        album: None,
    })
}

/// Edit `tag` in memory; returns a short description per change.
///
/// Artist and title fall back to the query, so a guessed `Artist - Title`
/// can be written even when the hit has no names of its own.
fn apply(
    tag: &mut Tag,
    query: &TrackQuery,
    resolved: &Resolved,
    embed_art: bool,
    opts: &FinderOptions,
) -> Vec<String> {
    let mut changes = Vec::new();
    let hit = &resolved.candidate;
    let force = opts.force;

    if embed_art {
        replace_cover(tag, &resolved.image, FRONT_COVER_DESC);
        changes.push(format!(
            "cover {}x{} from {}",
            resolved.image.width, resolved.image.height, hit.source
        ));
    }

    if opts.updates.artist {
        let artist = hit.artist.as_deref().unwrap_or(query.artist.as_str());
        if set_text_if(tag, "TPE1", artist, force) {
            changes.push(format!("artist = {artist}"));
        }
    }
    if opts.updates.title {
        let title = hit.title.as_deref().unwrap_or(query.title.as_str());
        if set_text_if(tag, "TIT2", title, force) {
            changes.push(format!("title = {title}"));
        }
    }
    if opts.updates.album {
        if let Some(album) = &hit.album {
            if set_text_if(tag, "TALB", album, force) {
                changes.push(format!("album = {album}"));
            }
        }
    }
    if opts.updates.year {
        if let Some(date) = &hit.release_date {
            if set_year_if(tag, date, opts.version, force) {
                changes.push(format!("year from {date}"));
            }
        }
    }
    if opts.updates.genre {
        if let Some(genre) = &hit.genre {
            if set_text_if(tag, "TCON", genre, force) {
                changes.push(format!("genre = {genre}"));
            }
        }
    }
    if opts.updates.track {
        if let Some(n) = hit.track_no {
            if set_track_if(tag, n, hit.track_total, force) {
                changes.push(format!("track = {n}"));
            }
        }
    }

    changes
}
