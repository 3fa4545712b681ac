//! core/library.rs
//! Find MP3 files under a folder.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// All `.mp3` files under `root`, sorted by path.
///
/// - `recursive == false` only looks at the folder's direct children.
/// - Unreadable directory entries are logged and skipped.
pub fn scan_mp3s(root: &Path, recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut out: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                tracing::warn!("skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_mp3(e.path()))
        .map(|e| e.into_path())
        .collect();

    out.sort();
    out
}

pub fn is_mp3(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("mp3"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn recursive_flag_controls_depth() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.mp3"), b"x").unwrap();
        fs::write(dir.path().join("a.MP3"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.mp3"), b"x").unwrap();

        let flat = scan_mp3s(dir.path(), false);
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.MP3", "b.mp3"]);

        let deep = scan_mp3s(dir.path(), true);
        assert_eq!(deep.len(), 3);
        assert!(deep.iter().any(|p| p.ends_with("sub/c.mp3")));
    }

    #[test]
    fn folder_named_like_mp3_is_ignored() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("album.mp3")).unwrap();
        assert!(scan_mp3s(dir.path(), true).is_empty());
    }
}
