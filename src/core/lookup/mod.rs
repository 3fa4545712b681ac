//! core/lookup/mod.rs
//!
//! Online cover search.
//!
//! Two seams, so the finder can run against fakes:
//! - [`CoverSource`]: turn a `TrackQuery` into an ordered list of candidate URLs
//! - [`ImageFetcher`]: turn a URL into bytes
//!
//! [`resolve_cover`] walks sources and candidates in order and returns the
//! first image that is big enough. With [`Selection::prefer_numbered`] a
//! source's hits that carry a track number are tried before the rest.

pub mod http;
pub mod itunes;
pub mod musicbrainz;

use thiserror::Error;
use tracing::{debug, warn};

use super::artwork::cover_from_bytes;
use super::types::{CoverCandidate, CoverImage, TrackQuery};

pub use http::HttpClient;
pub use itunes::ItunesSource;
pub use musicbrainz::MusicBrainzSource;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("not an image ({content_type}) at {url}")]
    NotAnImage { content_type: String, url: String },

    #[error("body larger than {limit} bytes at {url}")]
    TooLarge { limit: u64, url: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Raw download result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
}

pub trait CoverSource {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Candidates, best first. An empty list means "no match".
    fn search(&self, query: &TrackQuery) -> Result<Vec<CoverCandidate>, LookupError>;
}

pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedImage, LookupError>;
}

/// The accepted image plus the candidate it came from (for metadata).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub image: CoverImage,
    pub candidate: CoverCandidate,
}

/// What makes a candidate acceptable, and which ones to try first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Both edges must reach this, px.
    pub min_resolution: u32,
    /// Song-level hits (with a track number) before album-level ones.
    pub prefer_numbered: bool,
}

/// First candidate (source order, then candidate order) whose image has both
/// edges >= `selection.min_resolution`.
///
/// - `Ok(None)`: at least one source answered, nothing qualified
/// - `Err(..)`: every source failed
pub fn resolve_cover(
    sources: &[Box<dyn CoverSource>],
    fetcher: &dyn ImageFetcher,
    query: &TrackQuery,
    selection: Selection,
) -> Result<Option<Resolved>, LookupError> {
    let min_resolution = selection.min_resolution;
    let mut answered = false;
    let mut last_err = None;

    for source in sources {
        let mut candidates = match source.search(query) {
            Ok(c) => c,
            Err(e) => {
                warn!(source = source.name(), error = %e, "cover search failed");
                last_err = Some(e);
                continue;
            }
        };
        answered = true;
        debug!(source = source.name(), count = candidates.len(), "cover candidates");

        if selection.prefer_numbered {
            // stable: keeps source order within each group
            candidates.sort_by_key(|c| c.track_no.is_none());
        }

        for candidate in candidates {
            let fetched = match fetcher.fetch(&candidate.url) {
                Ok(f) => f,
                Err(e) => {
                    debug!(url = %candidate.url, error = %e, "candidate fetch failed");
                    continue;
                }
            };

            let image = match cover_from_bytes(
                fetched.data,
                fetched.content_type.as_deref(),
                candidate.url.clone(),
            ) {
                Ok(img) => img,
                Err(e) => {
                    debug!(url = %candidate.url, error = %e, "candidate does not decode");
                    continue;
                }
            };

            if !image.meets_min_resolution(min_resolution) {
                debug!(
                    url = %candidate.url,
                    width = image.width,
                    height = image.height,
                    min_resolution,
                    "candidate too small"
                );
                continue;
            }

            return Ok(Some(Resolved { image, candidate }));
        }
    }

    match last_err {
        Some(e) if !answered => Err(e),
        _ => Ok(None),
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    /// Returns a fixed list (or a fixed error) and records what it was asked.
    pub struct FakeSource {
        pub label: &'static str,
        pub result: Result<Vec<CoverCandidate>, String>,
        pub seen: RefCell<Vec<TrackQuery>>,
    }

    impl FakeSource {
        pub fn with_urls(label: &'static str, urls: &[&str]) -> Self {
            let candidates = urls
                .iter()
                .map(|u| CoverCandidate {
                    url: u.to_string(),
                    source: label.to_string(),
                    ..CoverCandidate::default()
                })
                .collect();
            Self::with_candidates(label, candidates)
        }

        pub fn with_candidates(label: &'static str, candidates: Vec<CoverCandidate>) -> Self {
            Self {
                label,
                result: Ok(candidates),
                seen: RefCell::new(Vec::new()),
            }
        }

        pub fn failing(label: &'static str) -> Self {
            Self {
                label,
                result: Err("connection refused".to_string()),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl CoverSource for FakeSource {
        fn name(&self) -> &str {
            self.label
        }

        fn search(&self, query: &TrackQuery) -> Result<Vec<CoverCandidate>, LookupError> {
            self.seen.borrow_mut().push(query.clone());
            self.result.clone().map_err(LookupError::Network)
        }
    }

    /// URL -> bytes. Unknown URLs 404.
    #[derive(Default)]
    pub struct FakeFetcher {
        pub images: HashMap<String, FetchedImage>,
        pub requested: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        pub fn serve(mut self, url: &str, data: Vec<u8>, content_type: Option<&str>) -> Self {
            self.images.insert(
                url.to_string(),
                FetchedImage {
                    data,
                    content_type: content_type.map(str::to_string),
                },
            );
            self
        }
    }

    impl ImageFetcher for FakeFetcher {
        fn fetch(&self, url: &str) -> Result<FetchedImage, LookupError> {
            self.requested.borrow_mut().push(url.to_string());
            self.images.get(url).cloned().ok_or(LookupError::Status {
                status: 404,
                url: url.to_string(),
            })
        }
    }
}
