//! core/tools/same_cover.rs
//! `same-cover`: one image file becomes the only cover of every track in a folder.

use std::path::Path;

use tracing::{debug, info};

use super::super::artwork::{load_cover_file, Normalize};
use super::super::error::Result;
use super::super::scan_root;
use super::super::tags::{
    count_pictures, open_for_edit, read_embedded_art, replace_cover, save_tag, Version,
};
use super::super::types::{CoverImage, Outcome, RunReport};
use super::{record, skipped};

pub const COVER_DESC: &str = "Cover";

#[derive(Debug, Clone, Copy)]
pub struct SameCoverOptions {
    pub recursive: bool,
    /// `None` embeds the file's bytes unchanged.
    pub normalize: Option<Normalize>,
    pub version: Version,
}

pub fn run(folder: &Path, cover_path: &Path, opts: &SameCoverOptions) -> Result<RunReport> {
    let files = scan_root(folder, opts.recursive)?;
    let cover = load_cover_file(cover_path, opts.normalize)?;
    info!(
        cover = %cover_path.display(),
        width = cover.width,
        height = cover.height,
        mime = %cover.mime,
        bytes = cover.data.len(),
        "loaded cover"
    );

    let mut report = RunReport::default();
    for path in files {
        let outcome = apply_one(&path, &cover, opts.version);
        record(&mut report, path, outcome);
    }
    Ok(report)
}

fn apply_one(path: &Path, cover: &CoverImage, version: Version) -> Outcome {
    let mut tag = match open_for_edit(path) {
        Ok(t) => t,
        Err(e) => return skipped(e),
    };

    replace_cover(&mut tag, cover, COVER_DESC);
    if let Err(e) = save_tag(path, &tag, version) {
        return Outcome::Failed(e.to_string());
    }

    match verify(path, cover) {
        Ok(()) => {
            debug!(path = %path.display(), pictures = 1, "verified");
            Outcome::Updated(format!("cover {}x{}", cover.width, cover.height))
        }
        Err(why) => Outcome::Failed(why),
    }
}

/// Re-read from disk: exactly one picture, holding exactly the cover's bytes.
fn verify(path: &Path, cover: &CoverImage) -> std::result::Result<(), String> {
    match count_pictures(path) {
        Ok(1) => {}
        Ok(n) => return Err(format!("expected 1 picture after write, found {n}")),
        Err(e) => return Err(format!("re-read failed: {e}")),
    }
    match read_embedded_art(path) {
        Ok(Some((data, _))) if data == cover.data => Ok(()),
        Ok(Some(_)) => Err("embedded picture differs from the cover file".to_string()),
        Ok(None) => Err("picture vanished after write".to_string()),
        Err(e) => Err(format!("re-read failed: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::core::test_support::{mp3_bytes, write_mp3, write_png};
    use id3::Tag;
    use std::fs;
    use tempfile::TempDir;

    fn opts() -> SameCoverOptions {
        SameCoverOptions {
            recursive: true,
            normalize: None,
            version: Version::Id3v23,
        }
    }

    #[test]
    fn every_file_gets_identical_bytes() {
        let dir = TempDir::new().unwrap();
        let music = dir.path().join("album");
        let disc2 = music.join("disc2");
        fs::create_dir_all(&disc2).unwrap();
        let files = [music.join("1.mp3"), music.join("2.mp3"), disc2.join("3.mp3")];
        for f in &files {
            write_mp3(f);
        }
        let cover = dir.path().join("cover.png");
        write_png(&cover, 300, 300);
        let source = fs::read(&cover).unwrap();

        let report = run(&music, &cover, &opts()).unwrap();
        assert_eq!(report.ok(), 3);

        for f in &files {
            let (data, mime) = read_embedded_art(f).unwrap().unwrap();
            assert_eq!(data, source);
            assert_eq!(mime, "image/png");
            let tag = Tag::read_from_path(f).unwrap();
            assert_eq!(tag.pictures().count(), 1);
            assert_eq!(tag.pictures().next().unwrap().description, COVER_DESC);
        }
    }

    #[test]
    fn replaces_all_previous_pictures() {
        let dir = TempDir::new().unwrap();
        let song = dir.path().join("1.mp3");
        write_mp3(&song);
        let old = dir.path().join("old.png");
        write_png(&old, 10, 10);

        run(dir.path(), &old, &opts()).unwrap();
        let new = dir.path().join("new.png");
        write_png(&new, 20, 20);
        run(dir.path(), &new, &opts()).unwrap();

        let (data, _) = read_embedded_art(&song).unwrap().unwrap();
        assert_eq!(data, fs::read(&new).unwrap());
        assert_eq!(Tag::read_from_path(&song).unwrap().pictures().count(), 1);
    }

    #[test]
    fn normalized_cover_is_jpeg() {
        let dir = TempDir::new().unwrap();
        let song = dir.path().join("1.mp3");
        write_mp3(&song);
        let cover = dir.path().join("big.png");
        write_png(&cover, 1500, 1500);

        let o = SameCoverOptions {
            normalize: Some(Normalize {
                max_side: 1000,
                quality: 85,
            }),
            ..opts()
        };
        run(dir.path(), &cover, &o).unwrap();
        let (data, mime) = read_embedded_art(&song).unwrap().unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn bad_cover_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_mp3(&dir.path().join("1.mp3"));
        let missing = dir.path().join("nope.jpg");
        assert!(matches!(
            run(dir.path(), &missing, &opts()),
            Err(Error::Io { .. })
        ));

        let junk = dir.path().join("junk.jpg");
        fs::write(&junk, b"not an image").unwrap();
        assert!(run(dir.path(), &junk, &opts()).is_err());
    }

    #[test]
    fn non_audio_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.mp3"), b"nope").unwrap();
        write_mp3(&dir.path().join("good.mp3"));
        let cover = dir.path().join("c.png");
        write_png(&cover, 10, 10);

        let report = run(dir.path(), &cover, &opts()).unwrap();
        assert_eq!(report.ok(), 1);
        assert_eq!(report.skipped(), 1);
    }

    #[test]
    fn verify_compares_bytes_not_just_count() {
        let dir = TempDir::new().unwrap();
        let song = dir.path().join("1.mp3");
        write_mp3(&song);
        let png = dir.path().join("c.png");
        write_png(&png, 10, 10);
        let cover = load_cover_file(&png, None).unwrap();

        assert!(matches!(apply_one(&song, &cover, Version::Id3v23), Outcome::Updated(_)));
        assert_eq!(verify(&song, &cover), Ok(()));

        let other = CoverImage {
            data: vec![1, 2, 3],
            ..cover.clone()
        };
        assert!(verify(&song, &other).unwrap_err().contains("differs"));

        fs::write(&song, mp3_bytes()).unwrap();
        assert!(verify(&song, &cover).unwrap_err().contains("found 0"));
    }
}
