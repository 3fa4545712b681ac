//! core/tools/mod.rs
//! One module per subcommand. Each exposes an options struct and a `run`
//! that returns a `RunReport`; only a bad root (or a bad input like the
//! `same-cover` image) is an `Err`.

pub mod export;
pub mod finder;
pub mod same_cover;
pub mod title;
pub mod unlink;

use std::path::PathBuf;

use tracing::{error, info, warn};

use super::error::Error;
use super::types::{FileOutcome, Outcome, RunReport};

/// Log the per-file line, then add it to the report.
pub(crate) fn record(report: &mut RunReport, path: PathBuf, outcome: Outcome) {
    let line = FileOutcome { path, outcome };
    match &line.outcome {
        Outcome::Skipped(_) | Outcome::Missed(_) => warn!("{line}"),
        Outcome::Failed(_) => error!("{line}"),
        _ => info!("{line}"),
    }
    report.push(line.path, line.outcome);
}

/// Reading a file went wrong: that file is skipped, the run goes on.
pub(crate) fn skipped(e: Error) -> Outcome {
    Outcome::Skipped(e.to_string())
}
