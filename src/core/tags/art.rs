use std::path::Path;

use id3::frame::Content;

use super::super::error::Result;
use super::read::load_tag;

/// Returns (image_bytes, mime) for the first embedded picture (APIC/PIC).
pub fn read_embedded_art(path: &Path) -> Result<Option<(Vec<u8>, String)>> {
    let Some(tag) = load_tag(path)? else {
        return Ok(None);
    };

    for f in tag.frames() {
        if f.id() != "APIC" && f.id() != "PIC" {
            continue;
        }
        if let Content::Picture(p) = f.content() {
            return Ok(Some((p.data.clone(), p.mime_type.clone())));
        }
    }

    Ok(None)
}

/// Number of picture frames currently on disk.
pub fn count_pictures(path: &Path) -> Result<usize> {
    Ok(load_tag(path)?.map_or(0, |t| t.pictures().count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tags::write::{replace_cover, save_tag};
    use crate::core::test_support::write_mp3;
    use crate::core::types::CoverImage;
    use id3::{Tag, Version};
    use tempfile::TempDir;

    #[test]
    fn reads_back_what_was_embedded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.mp3");
        write_mp3(&path);
        assert_eq!(read_embedded_art(&path).unwrap(), None);
        assert_eq!(count_pictures(&path).unwrap(), 0);

        let mut tag = Tag::new();
        let cover = CoverImage {
            data: vec![1, 2, 3],
            mime: "image/jpeg".into(),
            width: 1,
            height: 1,
            origin: "t".into(),
        };
        replace_cover(&mut tag, &cover, "Cover");
        save_tag(&path, &tag, Version::Id3v23).unwrap();

        assert_eq!(
            read_embedded_art(&path).unwrap(),
            Some((vec![1, 2, 3], "image/jpeg".to_string()))
        );
        assert_eq!(count_pictures(&path).unwrap(), 1);
    }
}
