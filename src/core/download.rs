//! core/download.rs
//! yt-dlp wrapper: build the argument list, run it, report its exit code.
//!
//! We never parse yt-dlp output. Its stdout/stderr go straight to the
//! terminal and its exit status is the result.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use super::error::{Error, Result};

/// Filename pattern handed to yt-dlp. The title tool strips the ` [id]` again.
pub const OUTPUT_TEMPLATE: &str = "%(title)s [%(id)s].%(ext)s";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub urls: Vec<String>,
    pub outdir: PathBuf,
    /// `--audio-quality <kbps>K`
    pub kbps: u32,
    pub no_playlist: bool,
    pub embed_thumbnail: bool,
    /// `--extractor-args youtube:player_client=<client>`
    pub player_client: Option<String>,
    pub quiet: bool,
}

impl DownloadRequest {
    pub fn output_template(&self) -> String {
        self.outdir.join(OUTPUT_TEMPLATE).display().to_string()
    }

    pub fn to_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "-x".into(),
            "--audio-format".into(),
            "mp3".into(),
            "--audio-quality".into(),
            format!("{}K", self.kbps),
            "--embed-metadata".into(),
        ];
        if self.embed_thumbnail {
            args.push("--embed-thumbnail".into());
        }
        if self.no_playlist {
            args.push("--no-playlist".into());
        }
        if let Some(client) = self.player_client.as_deref().filter(|c| !c.is_empty()) {
            args.push("--extractor-args".into());
            args.push(format!("youtube:player_client={client}"));
        }
        args.extend([
            "--no-overwrites".into(),
            "--restrict-filenames".into(),
            "-o".into(),
            self.output_template(),
        ]);
        if self.quiet {
            args.push("--quiet".into());
        }
        // URLs from a file may start with '-'
        args.push("--".into());
        args.extend(self.urls.iter().cloned());
        args
    }
}

pub trait Downloader {
    /// Run to completion. `Ok(code)` is the tool's own exit status.
    fn run(&self, request: &DownloadRequest) -> Result<i32>;
}

/// The real thing: spawn `program` (normally `yt-dlp`).
pub struct YtDlp {
    program: String,
}

impl YtDlp {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Downloader for YtDlp {
    fn run(&self, request: &DownloadRequest) -> Result<i32> {
        let args = request.to_args();
        debug!(program = %self.program, ?args, "spawning downloader");

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::Download(format!(
                    "`{}` not found; install it or set [download] tool",
                    self.program
                )),
                _ => Error::Download(format!("failed to start `{}`: {e}", self.program)),
            })?;

        // Killed by a signal: no code, treat as a generic failure.
        Ok(status.code().unwrap_or(1))
    }
}

/// Positional URLs first, then the file's (one per line, `#` comments).
pub fn load_urls(direct: &[String], from_file: Option<&Path>) -> Result<Vec<String>> {
    let mut urls: Vec<String> = direct
        .iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect();

    if let Some(path) = from_file {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        urls.extend(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(str::to_string),
        );
    }

    if urls.is_empty() {
        return Err(Error::Download("no URLs given".to_string()));
    }
    Ok(urls)
}

/// Make sure the output folder exists, then hand over to the downloader.
pub fn download(request: &DownloadRequest, downloader: &dyn Downloader) -> Result<i32> {
    std::fs::create_dir_all(&request.outdir).map_err(|e| Error::io(&request.outdir, e))?;
    info!(
        count = request.urls.len(),
        outdir = %request.outdir.display(),
        "downloading"
    );

    let code = downloader.run(request)?;
    if code == 0 {
        info!("download finished");
    } else {
        info!(code, "download finished with errors");
    }
    Ok(code)
}
