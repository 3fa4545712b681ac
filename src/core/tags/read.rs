//! core/tags/read.rs
//! Read ID3 tags from an MP3 and convert them into `AudioTags`.

use std::path::{Path, PathBuf};

use id3::frame::Content;
use id3::{ErrorKind, Tag, TagLike};

use super::super::error::{Error, Result};
use super::super::types::AudioTags;
use super::util::parse_slash_pair_u32;

/// Load the raw tag.
/// - `Ok(None)` = file has no ID3 tag yet (not an error for us)
/// - `Err(..)` = file missing, or the tag is there but broken
pub fn load_tag(path: &Path) -> Result<Option<Tag>> {
    match Tag::read_from_path(path) {
        Ok(tag) => Ok(Some(tag)),
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => Ok(None),
        Err(e) => Err(Error::Tag {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Project an already-loaded tag onto `AudioTags`.
pub fn audio_tags_from_tag(path: PathBuf, tag: &Tag) -> AudioTags {
    let (track_no_from_text, track_total) =
        parse_slash_pair_u32(text_frame(tag, "TRCK").as_deref());

    AudioTags {
        path,

        title: tag
            .title()
            .map(str::to_owned)
            .or_else(|| text_frame(tag, "TIT2")),
        artist: tag
            .artist()
            .map(str::to_owned)
            .or_else(|| text_frame(tag, "TPE2")),
        album: tag.album().map(str::to_owned),
        date: text_frame(tag, "TDRC").or_else(|| text_frame(tag, "TYER")),
        genre: text_frame(tag, "TCON"),

        track_no: tag.track().or(track_no_from_text),
        track_total: tag.total_tracks().or(track_total),

        picture_count: tag.pictures().count(),
    }
}

/// First plain-text value of a frame, trimmed; empty counts as missing.
pub(crate) fn text_frame(tag: &Tag, id: &str) -> Option<String> {
    let frame = tag.get(id)?;
    match frame.content() {
        Content::Text(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        _ => None,
    }
}
