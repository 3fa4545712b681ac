//! core/tools/title.rs
//! `title`: TIT2 := filename stem without the trailing `[id]`.

use std::path::Path;

use id3::TagLike;

use super::super::error::Result;
use super::super::scan_root;
use super::super::tags::{open_for_edit, save_tag, title_from_filename, Version};
use super::super::types::{Outcome, RunReport};
use super::{record, skipped};

#[derive(Debug, Clone, Copy)]
pub struct TitleOptions {
    pub recursive: bool,
    pub dry_run: bool,
    pub version: Version,
}

pub fn run(root: &Path, opts: &TitleOptions) -> Result<RunReport> {
    let files = scan_root(root, opts.recursive)?;
    let mut report = RunReport::default();

    for path in files {
        let outcome = title_one(&path, opts);
        record(&mut report, path, outcome);
    }
    Ok(report)
}

fn title_one(path: &Path, opts: &TitleOptions) -> Outcome {
    let Some(title) = title_from_filename(path) else {
        return Outcome::Skipped("no usable file name".to_string());
    };

    let mut tag = match open_for_edit(path) {
        Ok(t) => t,
        Err(e) => return skipped(e),
    };

    if tag.title() == Some(title.as_str()) {
        return Outcome::Unchanged;
    }
    if opts.dry_run {
        return Outcome::Found(format!("title -> {title}"));
    }

    tag.set_title(title.as_str());
    match save_tag(path, &tag, opts.version) {
        Ok(()) => Outcome::Updated(format!("title = {title}")),
        Err(e) => Outcome::Failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{read_audio_tags, write_mp3};
    use std::fs;
    use tempfile::TempDir;

    fn opts() -> TitleOptions {
        TitleOptions {
            recursive: false,
            dry_run: false,
            version: Version::Id3v23,
        }
    }

    fn title_of(path: &Path) -> Option<String> {
        read_audio_tags(path.to_path_buf()).unwrap().title
    }

    #[test]
    fn titles_from_filenames_and_skips_corrupt() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("Song Title [abc123].mp3");
        let b = dir.path().join("Other Song.mp3");
        let bad = dir.path().join("Broken [zzz].mp3");
        write_mp3(&a);
        write_mp3(&b);
        fs::write(&bad, b"this is not an mp3").unwrap();

        let report = run(dir.path(), &opts()).unwrap();
        assert_eq!(report.ok(), 2);
        assert_eq!(report.skipped(), 1);
        assert!(report.is_partial());

        assert_eq!(title_of(&a).as_deref(), Some("Song Title"));
        assert_eq!(title_of(&b).as_deref(), Some("Other Song"));
        // untouched
        assert_eq!(fs::read(&bad).unwrap(), b"this is not an mp3");
    }

    #[test]
    fn overwrites_existing_title_then_is_stable() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("Right Name [id].mp3");
        write_mp3(&a);

        let mut tag = id3::Tag::new();
        tag.set_title("Wrong Name");
        tag.write_to_path(&a, Version::Id3v23).unwrap();

        let first = run(dir.path(), &opts()).unwrap();
        assert_eq!(first.ok(), 1);
        assert_eq!(title_of(&a).as_deref(), Some("Right Name"));

        let second = run(dir.path(), &opts()).unwrap();
        assert_eq!(second.unchanged(), 1);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("Song [x].mp3");
        write_mp3(&a);

        let report = run(
            dir.path(),
            &TitleOptions {
                dry_run: true,
                ..opts()
            },
        )
        .unwrap();
        assert!(matches!(report.files[0].outcome, Outcome::Found(_)));
        assert_eq!(title_of(&a), None);
    }

    #[test]
    fn recursive_toggle() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        write_mp3(&sub.join("Deep [1].mp3"));

        assert_eq!(run(dir.path(), &opts()).unwrap().files.len(), 0);

        let report = run(
            dir.path(),
            &TitleOptions {
                recursive: true,
                ..opts()
            },
        )
        .unwrap();
        assert_eq!(report.ok(), 1);
        assert_eq!(title_of(&sub.join("Deep [1].mp3")).as_deref(), Some("Deep"));
    }
}
