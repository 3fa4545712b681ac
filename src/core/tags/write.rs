//! core/tags/write.rs
//! Edit helpers on an in-memory `id3::Tag`, plus open/save.
//!
//! The tools open a tag once, apply whatever edits they need, and save once.
//! Every helper here returns whether it actually changed something so the
//! caller can skip the write entirely when nothing did.

use std::path::Path;

use id3::frame::{Picture, PictureType};
use id3::{Tag, TagLike, Version};

use super::super::error::{Error, Result};
use super::super::probe::probe_audio;
use super::super::types::CoverImage;
use super::read::{load_tag, text_frame};
use super::util::{format_slash_pair, year_of};

/// Description used for covers found online.
pub const FRONT_COVER_DESC: &str = "Front cover";

/// Check the file is audio, then load its tag (or start an empty one).
pub fn open_for_edit(path: &Path) -> Result<Tag> {
    probe_audio(path)?;
    Ok(load_tag(path)?.unwrap_or_else(Tag::new))
}

pub fn save_tag(path: &Path, tag: &Tag, version: Version) -> Result<()> {
    tag.write_to_path(path, version).map_err(|e| Error::Tag {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Set a plain text frame when it is missing (or always, with `force`).
/// Empty values never overwrite anything.
pub fn set_text_if(tag: &mut Tag, id: &str, value: &str, force: bool) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return false;
    }
    match text_frame(tag, id) {
        Some(existing) if existing == value => false,
        Some(_) if !force => false,
        _ => {
            tag.set_text(id, value);
            true
        }
    }
}

/// Year goes to TYER for v2.3 and TDRC for v2.4.
pub fn set_year_if(tag: &mut Tag, date: &str, version: Version, force: bool) -> bool {
    let Some(year) = year_of(date) else {
        return false;
    };
    let has_year = text_frame(tag, "TDRC").is_some() || text_frame(tag, "TYER").is_some();
    if has_year && !force {
        return false;
    }
    match version {
        Version::Id3v24 => {
            tag.remove("TYER");
            set_text_if(tag, "TDRC", year, true)
        }
        _ => {
            tag.remove("TDRC");
            set_text_if(tag, "TYER", year, true)
        }
    }
}

pub fn set_track_if(tag: &mut Tag, n: u32, total: Option<u32>, force: bool) -> bool {
    set_text_if(tag, "TRCK", &format_slash_pair(n, total), force)
}

/// Drop every picture frame and add `cover` as the one front cover.
pub fn replace_cover(tag: &mut Tag, cover: &CoverImage, description: &str) {
    tag.remove_all_pictures();
    tag.add_frame(Picture {
        mime_type: cover.mime.clone(),
        picture_type: PictureType::CoverFront,
        description: description.to_string(),
        data: cover.data.clone(),
    });
}

/// Returns how many picture frames were removed.
pub fn remove_cover(tag: &mut Tag) -> usize {
    let n = tag.pictures().count();
    if n > 0 {
        tag.remove_all_pictures();
    }
    n
}

pub fn remove_album(tag: &mut Tag) -> bool {
    !tag.remove("TALB").is_empty()
}
