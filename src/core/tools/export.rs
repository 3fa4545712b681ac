//! core/tools/export.rs
//! `export`: move (or copy) finished MP3s from a working folder to the
//! library folder. Never overwrites unless asked.

use std::fs;
use std::path::Path;

use super::super::error::{Error, Result};
use super::super::scan_root;
use super::super::types::{Outcome, RunReport};
use super::record;

#[derive(Debug, Clone, Copy, Default)]
pub struct ExportOptions {
    pub copy: bool,
    pub overwrite: bool,
}

/// Only files directly inside `source` are exported.
pub fn run(source: &Path, destination: &Path, opts: &ExportOptions) -> Result<RunReport> {
    let files = scan_root(source, false)?;
    fs::create_dir_all(destination).map_err(|e| Error::io(destination, e))?;

    let mut report = RunReport::default();
    for path in files {
        let outcome = export_one(&path, destination, opts);
        record(&mut report, path, outcome);
    }
    Ok(report)
}

fn export_one(path: &Path, destination: &Path, opts: &ExportOptions) -> Outcome {
    let Some(name) = path.file_name() else {
        return Outcome::Skipped("no file name".to_string());
    };
    let target = destination.join(name);

    if target.exists() && !opts.overwrite {
        return Outcome::Skipped(format!("{} already exists", target.display()));
    }

    let result = if opts.copy {
        fs::copy(path, &target).map(|_| "copied")
    } else {
        move_file(path, &target).map(|_| "moved")
    };

    match result {
        Ok(verb) => Outcome::Updated(format!("{verb} to {}", target.display())),
        Err(e) => Outcome::Failed(e.to_string()),
    }
}

/// `rename`, falling back to copy + delete across filesystems.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}
