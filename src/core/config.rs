//! core/config.rs
//! `tagsmith.toml`: defaults for every subcommand.
//!
//! Every section is optional and every key has a default, so an empty file
//! (or no file at all) is a valid config. CLI flags override these values.
//!
//! Lookup order:
//! 1. `--config <path>` (must exist)
//! 2. `./tagsmith.toml`
//! 3. `<platform config dir>/tagsmith/config.toml`

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::artwork::Normalize;
use super::error::{Error, Result};
use super::tags::Version;

pub const LOCAL_FILE: &str = "tagsmith.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub exit_policy: ExitPolicy,
    pub scan: ScanConfig,
    pub tags: TagsConfig,
    pub lookup: LookupConfig,
    pub same_cover: SameCoverConfig,
    pub unlink: UnlinkConfig,
    pub download: DownloadConfig,
    pub export: ExportConfig,
}

/// What a run with some skipped/missed/failed files exits with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitPolicy {
    /// 0
    #[default]
    Lenient,
    /// 2
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub recursive: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TagVersion {
    #[default]
    #[serde(rename = "2.3")]
    V23,
    #[serde(rename = "2.4")]
    V24,
}

impl TagVersion {
    pub fn id3(self) -> Version {
        match self {
            TagVersion::V23 => Version::Id3v23,
            TagVersion::V24 => Version::Id3v24,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TagsConfig {
    pub id3_version: TagVersion,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupConfig {
    /// Both edges, px.
    pub min_resolution: u32,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub itunes: bool,
    pub musicbrainz: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            min_resolution: 600,
            timeout_secs: 30,
            user_agent: concat!(
                "tagsmith/",
                env!("CARGO_PKG_VERSION"),
                " ( https://github.com/tagsmith/tagsmith )"
            )
            .to_string(),
            itunes: true,
            musicbrainz: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SameCoverConfig {
    pub folder: Option<PathBuf>,
    pub cover: Option<PathBuf>,
    pub recursive: bool,
    pub normalize: bool,
    pub max_side: u32,
    pub jpeg_quality: u8,
}

impl Default for SameCoverConfig {
    fn default() -> Self {
        Self {
            folder: None,
            cover: None,
            recursive: true,
            normalize: false,
            max_side: 1000,
            jpeg_quality: 85,
        }
    }
}

impl SameCoverConfig {
    pub fn normalize_settings(&self) -> Normalize {
        Normalize {
            max_side: self.max_side,
            quality: self.jpeg_quality,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UnlinkConfig {
    /// One file or a folder.
    pub target: Option<PathBuf>,
    pub clear_album: bool,
    pub recursive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DownloadConfig {
    /// Program name or path.
    pub tool: String,
    pub outdir: PathBuf,
    pub kbps: u32,
    pub player_client: Option<String>,
    pub embed_thumbnail: bool,
    pub no_playlist: bool,
    pub from_file: Option<PathBuf>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            tool: "yt-dlp".to_string(),
            outdir: PathBuf::from("Downloads/MP3"),
            kbps: 192,
            player_client: None,
            embed_thumbnail: true,
            no_playlist: false,
            from_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("Music"),
            destination: PathBuf::from("All Music"),
        }
    }
}

impl Config {
    /// Find and parse the config. `explicit` must exist; the others may not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Error::Config {
                    path: path.to_path_buf(),
                    message: "file not found".to_string(),
                });
            }
            return Self::load_from_file(path);
        }

        for path in default_locations() {
            if path.is_file() {
                return Self::load_from_file(&path);
            }
        }

        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let cfg = Self::parse(&text).map_err(|message| Error::Config {
            path: path.to_path_buf(),
            message,
        })?;
        debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut out = vec![PathBuf::from(LOCAL_FILE)];
    if let Some(dirs) = directories::ProjectDirs::from("", "", "tagsmith") {
        out.push(dirs.config_dir().join("config.toml"));
    }
    out
}
