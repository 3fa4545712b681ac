//! cli/mod.rs
//! Command-line surface. Parsing only; `run` turns parsed args plus the
//! config file into calls into `core::tools`.

pub mod run;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tagsmith")]
#[command(version, about = "Download, title and cover-tag MP3 files", long_about = None)]
pub struct Cli {
    /// Config file (default: ./tagsmith.toml, then the user config dir)
    #[arg(long, global = true, env = "TAGSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace). RUST_LOG wins if set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set each file's title tag from its file name
    Title(TitleArgs),
    /// Look up and embed cover art (iTunes, MusicBrainz/Cover Art Archive)
    FindCovers(FindCoversArgs),
    /// Embed one image as the cover of every file in a folder
    SameCover(SameCoverArgs),
    /// Remove embedded cover art
    Unlink(UnlinkArgs),
    /// Download audio as MP3 with yt-dlp
    Download(DownloadArgs),
    /// Move or copy finished MP3s into the library folder
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct TitleArgs {
    /// Folder to process
    #[arg(short, long)]
    pub path: PathBuf,

    /// Include subfolders
    #[arg(short, long)]
    pub recursive: bool,

    /// Report only, write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Save as ID3v2.4 instead of the configured version
    #[arg(long)]
    pub id3v24: bool,
}

#[derive(Debug, Args)]
pub struct FindCoversArgs {
    /// Folder to process
    #[arg(short, long)]
    pub path: PathBuf,

    /// Include subfolders
    #[arg(short, long)]
    pub recursive: bool,

    /// Replace existing art and overwrite existing metadata
    #[arg(long)]
    pub force: bool,

    /// Report only, write nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Save as ID3v2.4 instead of the configured version
    #[arg(long)]
    pub id3v24: bool,

    /// Minimum width AND height of an accepted cover, px
    #[arg(long, value_name = "PX")]
    pub min_resolution: Option<u32>,

    /// Fill TPE1 from the matched track
    #[arg(long)]
    pub update_artist: bool,

    /// Fill TIT2 from the matched track
    #[arg(long)]
    pub update_title: bool,

    /// Fill TALB from the matched release
    #[arg(long)]
    pub update_album: bool,

    /// Fill the year from the matched release
    #[arg(long)]
    pub update_year: bool,

    /// Fill TCON from the matched release
    #[arg(long)]
    pub update_genre: bool,

    /// Fill TRCK from the matched track
    #[arg(long)]
    pub update_track: bool,

    /// For untagged files, read "Artist - Title" from the file name
    #[arg(long)]
    pub guess_from_filename: bool,
}

#[derive(Debug, Args)]
pub struct SameCoverArgs {
    /// Folder to process (default: [same_cover] folder)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Image file (default: [same_cover] cover)
    #[arg(short, long)]
    pub cover: Option<PathBuf>,

    /// Re-encode as JPEG, longest side capped
    #[arg(long)]
    pub normalize: bool,

    /// Only the folder itself, not subfolders
    #[arg(long)]
    pub no_recursive: bool,

    /// Save as ID3v2.4 instead of the configured version
    #[arg(long)]
    pub id3v24: bool,
}

#[derive(Debug, Args)]
pub struct UnlinkArgs {
    /// File or folder (default: [unlink] target)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Include subfolders
    #[arg(short, long)]
    pub recursive: bool,

    /// Also remove the album tag
    #[arg(long)]
    pub clear_album: bool,
}

#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Video or playlist URLs
    pub urls: Vec<String>,

    /// Read more URLs from a file, one per line
    #[arg(short, long, value_name = "FILE")]
    pub from_file: Option<PathBuf>,

    /// Output folder (default: [download] outdir)
    #[arg(short, long)]
    pub outdir: Option<PathBuf>,

    /// Audio bitrate
    #[arg(short, long)]
    pub kbps: Option<u32>,

    /// Only the video, not the playlist it belongs to
    #[arg(long)]
    pub no_playlist: bool,

    /// Don't embed the thumbnail as cover art
    #[arg(long)]
    pub no_thumb: bool,

    /// YouTube player client passed to yt-dlp's extractor
    #[arg(long)]
    pub player_client: Option<String>,

    /// Quiet yt-dlp output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Working folder (default: [export] source)
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Library folder (default: [export] destination)
    #[arg(long)]
    pub to: Option<PathBuf>,

    /// Copy instead of move
    #[arg(long)]
    pub copy: bool,

    /// Replace files that already exist at the destination
    #[arg(long)]
    pub overwrite: bool,
}
