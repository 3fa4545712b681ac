//! core/tools/unlink.rs
//! `unlink`: strip embedded pictures (and optionally TALB), nothing else.

use std::path::Path;

use super::super::error::Result;
use super::super::probe::probe_audio;
use super::super::resolve_targets;
use super::super::tags::{load_tag, remove_album, remove_cover, save_tag, Version};
use super::super::types::{Outcome, RunReport};
use super::{record, skipped};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnlinkOptions {
    pub recursive: bool,
    pub clear_album: bool,
}

/// `target` may be one file or a folder.
pub fn run(target: &Path, opts: &UnlinkOptions) -> Result<RunReport> {
    let files = resolve_targets(target, opts.recursive)?;
    let mut report = RunReport::default();

    for path in files {
        let outcome = unlink_one(&path, opts);
        record(&mut report, path, outcome);
    }
    Ok(report)
}

fn unlink_one(path: &Path, opts: &UnlinkOptions) -> Outcome {
    if let Err(e) = probe_audio(path) {
        return skipped(e);
    }
    let mut tag = match load_tag(path) {
        Ok(Some(t)) => t,
        Ok(None) => return Outcome::Unchanged,
        Err(e) => return skipped(e),
    };

    let pictures = remove_cover(&mut tag);
    let album = opts.clear_album && remove_album(&mut tag);
    if pictures == 0 && !album {
        return Outcome::Unchanged;
    }

    // Keep the version on disk; v2.2 can't be written back.
    let version = match tag.version() {
        Version::Id3v22 => Version::Id3v23,
        v => v,
    };
    if let Err(e) = save_tag(path, &tag, version) {
        return Outcome::Failed(e.to_string());
    }

    let mut detail = format!("removed {pictures} picture(s)");
    if album {
        detail.push_str(", album");
    }
    Outcome::Updated(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tags::replace_cover;
    use crate::core::test_support::{read_audio_tags, write_mp3};
    use crate::core::types::CoverImage;
    use id3::{Tag, TagLike};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn with_cover(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        write_mp3(&path);
        let mut tag = Tag::new();
        tag.set_title("Keep Me");
        tag.set_album("Album");
        let cover = CoverImage {
            data: vec![9; 64],
            mime: "image/jpeg".into(),
            width: 1,
            height: 1,
            origin: "t".into(),
        };
        replace_cover(&mut tag, &cover, "Cover");
        tag.write_to_path(&path, Version::Id3v24).unwrap();
        path
    }

    #[test]
    fn removes_pictures_keeps_everything_else() {
        let dir = TempDir::new().unwrap();
        let path = with_cover(dir.path(), "a.mp3");

        let report = run(&path, &UnlinkOptions::default()).unwrap();
        assert_eq!(report.ok(), 1);

        let tags = read_audio_tags(path.clone()).unwrap();
        assert_eq!(tags.picture_count, 0);
        assert_eq!(tags.title.as_deref(), Some("Keep Me"));
        assert_eq!(tags.album.as_deref(), Some("Album"));
        assert_eq!(Tag::read_from_path(&path).unwrap().version(), Version::Id3v24);
    }

    #[test]
    fn idempotent() {
        let dir = TempDir::new().unwrap();
        let path = with_cover(dir.path(), "a.mp3");

        run(dir.path(), &UnlinkOptions::default()).unwrap();
        let after_first = fs::read(&path).unwrap();

        let report = run(dir.path(), &UnlinkOptions::default()).unwrap();
        assert_eq!(report.unchanged(), 1);
        assert_eq!(fs::read(&path).unwrap(), after_first);
    }

    #[test]
    fn untagged_file_is_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain.mp3");
        write_mp3(&path);
        let before = fs::read(&path).unwrap();

        let report = run(dir.path(), &UnlinkOptions::default()).unwrap();
        assert_eq!(report.unchanged(), 1);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn clear_album_also_drops_talb() {
        let dir = TempDir::new().unwrap();
        let path = with_cover(dir.path(), "a.mp3");

        let opts = UnlinkOptions {
            clear_album: true,
            ..UnlinkOptions::default()
        };
        run(&path, &opts).unwrap();

        let tags = read_audio_tags(path).unwrap();
        assert_eq!(tags.album, None);
        assert_eq!(tags.title.as_deref(), Some("Keep Me"));
        assert_eq!(tags.picture_count, 0);
    }

    #[test]
    fn missing_target_is_fatal() {
        let dir = TempDir::new().unwrap();
        assert!(run(&dir.path().join("nope"), &UnlinkOptions::default()).is_err());
    }
}
