//! cli/run.rs
//! Merge CLI flags over the config file, call the tool, pick the exit code.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::{info, warn};

use crate::core::artwork::Normalize;
use crate::core::config::{Config, ExitPolicy, LookupConfig};
use crate::core::download::{self, DownloadRequest, YtDlp};
use crate::core::lookup::{CoverSource, HttpClient, ItunesSource, MusicBrainzSource};
use crate::core::tags::Version;
use crate::core::tools::export::{self, ExportOptions};
use crate::core::tools::finder::{self, FinderOptions, MetadataUpdates};
use crate::core::tools::same_cover::{self, SameCoverOptions};
use crate::core::tools::title::{self, TitleOptions};
use crate::core::tools::unlink::{self, UnlinkOptions};
use crate::core::types::RunReport;

use super::{
    Command, DownloadArgs, ExportArgs, FindCoversArgs, SameCoverArgs, TitleArgs, UnlinkArgs,
};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FATAL: u8 = 1;
pub const EXIT_PARTIAL: u8 = 2;

/// Run one subcommand to completion. `Err` means nothing useful happened.
pub fn execute(command: &Command, cfg: &Config) -> Result<u8> {
    match command {
        Command::Title(args) => finish(run_title(args, cfg)?, cfg.exit_policy),
        Command::FindCovers(args) => finish(run_find_covers(args, cfg)?, cfg.exit_policy),
        Command::SameCover(args) => finish(run_same_cover(args, cfg)?, cfg.exit_policy),
        Command::Unlink(args) => finish(run_unlink(args, cfg)?, cfg.exit_policy),
        Command::Export(args) => finish(run_export(args, cfg)?, cfg.exit_policy),
        Command::Download(args) => {
            let code = run_download(args, cfg)?;
            Ok(exit_code(code != 0, cfg.exit_policy))
        }
    }
}

fn finish(report: RunReport, policy: ExitPolicy) -> Result<u8> {
    info!("{}", report.summary());
    Ok(exit_code(report.is_partial(), policy))
}

pub fn exit_code(partial: bool, policy: ExitPolicy) -> u8 {
    match (partial, policy) {
        (true, ExitPolicy::Strict) => EXIT_PARTIAL,
        _ => EXIT_OK,
    }
}

fn version(id3v24: bool, cfg: &Config) -> Version {
    if id3v24 {
        Version::Id3v24
    } else {
        cfg.tags.id3_version.id3()
    }
}

fn run_title(args: &TitleArgs, cfg: &Config) -> Result<RunReport> {
    let opts = TitleOptions {
        recursive: args.recursive || cfg.scan.recursive,
        dry_run: args.dry_run,
        version: version(args.id3v24, cfg),
    };
    Ok(title::run(&args.path, &opts)?)
}

fn run_find_covers(args: &FindCoversArgs, cfg: &Config) -> Result<RunReport> {
    let opts = FinderOptions {
        recursive: args.recursive || cfg.scan.recursive,
        force: args.force,
        dry_run: args.dry_run,
        version: version(args.id3v24, cfg),
        min_resolution: args.min_resolution.unwrap_or(cfg.lookup.min_resolution),
        updates: MetadataUpdates {
            artist: args.update_artist,
            title: args.update_title,
            album: args.update_album,
            year: args.update_year,
            genre: args.update_genre,
            track: args.update_track,
        },
        guess_from_filename: args.guess_from_filename,
    };

    let http = HttpClient::new(
        &cfg.lookup.user_agent,
        Duration::from_secs(cfg.lookup.timeout_secs),
    )
    .context("building HTTP client")?;
    let sources = cover_sources(&cfg.lookup, &http);
    if sources.is_empty() {
        warn!("all cover sources are disabled in [lookup]; nothing will be found");
    }

    Ok(finder::run(&args.path, &opts, &sources, &http)?)
}

fn cover_sources(cfg: &LookupConfig, http: &HttpClient) -> Vec<Box<dyn CoverSource>> {
    let mut sources: Vec<Box<dyn CoverSource>> = Vec::new();
    if cfg.itunes {
        sources.push(Box::new(ItunesSource::new(http.clone())));
    }
    if cfg.musicbrainz {
        sources.push(Box::new(MusicBrainzSource::new(http.clone())));
    }
    sources
}

fn run_same_cover(args: &SameCoverArgs, cfg: &Config) -> Result<RunReport> {
    let sc = &cfg.same_cover;
    let folder = pick(&args.path, &sc.folder, "--path", "[same_cover] folder")?;
    let cover = pick(&args.cover, &sc.cover, "--cover", "[same_cover] cover")?;

    let normalize: Option<Normalize> =
        (args.normalize || sc.normalize).then(|| sc.normalize_settings());
    let opts = SameCoverOptions {
        recursive: sc.recursive && !args.no_recursive,
        normalize,
        version: version(args.id3v24, cfg),
    };
    Ok(same_cover::run(&folder, &cover, &opts)?)
}

fn run_unlink(args: &UnlinkArgs, cfg: &Config) -> Result<RunReport> {
    let target = pick(&args.path, &cfg.unlink.target, "--path", "[unlink] target")?;
    let opts = UnlinkOptions {
        recursive: args.recursive || cfg.unlink.recursive,
        clear_album: args.clear_album || cfg.unlink.clear_album,
    };
    Ok(unlink::run(&target, &opts)?)
}

fn run_export(args: &ExportArgs, cfg: &Config) -> Result<RunReport> {
    let from = args.from.clone().unwrap_or_else(|| cfg.export.source.clone());
    let to = args.to.clone().unwrap_or_else(|| cfg.export.destination.clone());
    let opts = ExportOptions {
        copy: args.copy,
        overwrite: args.overwrite,
    };
    Ok(export::run(&from, &to, &opts)?)
}

fn run_download(args: &DownloadArgs, cfg: &Config) -> Result<i32> {
    let dl = &cfg.download;
    let from_file = args.from_file.as_deref().or(dl.from_file.as_deref());
    let request = DownloadRequest {
        urls: download::load_urls(&args.urls, from_file)?,
        outdir: args.outdir.clone().unwrap_or_else(|| dl.outdir.clone()),
        kbps: args.kbps.unwrap_or(dl.kbps),
        no_playlist: args.no_playlist || dl.no_playlist,
        embed_thumbnail: dl.embed_thumbnail && !args.no_thumb,
        player_client: args.player_client.clone().or_else(|| dl.player_client.clone()),
        quiet: args.quiet,
    };
    Ok(download::download(&request, &YtDlp::new(dl.tool.as_str()))?)
}

/// CLI value, else config value, else a startup error naming both.
fn pick(
    flag: &Option<PathBuf>,
    configured: &Option<PathBuf>,
    flag_name: &str,
    config_key: &str,
) -> Result<PathBuf> {
    flag.clone()
        .or_else(|| configured.clone())
        .ok_or_else(|| anyhow!("no location given: pass {flag_name} or set {config_key}"))
}
