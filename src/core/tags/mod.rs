//! core/tags/mod.rs
//!
//! ID3 tag read/write utilities.
//! Public API:
//! - [`audio_tags_from_tag`] projects a loaded tag onto
//!   [`AudioTags`](super::types::AudioTags).
//! - [`open_for_edit`] / [`save_tag`] bracket a single in-place edit.
//! - The `set_*_if` / `*_cover` helpers mutate a loaded tag.

mod art;
mod read;
mod util;
mod write;

pub use id3::Version;

pub use art::{count_pictures, read_embedded_art};
pub use read::{audio_tags_from_tag, load_tag};
pub use util::{artist_title_from_filename, title_from_filename};
pub use write::{
    open_for_edit, remove_album, remove_cover, replace_cover, save_tag, set_text_if,
    set_track_if, set_year_if, FRONT_COVER_DESC,
};
