//! core/lookup/itunes.rs
//! iTunes Search API as a cover source.
//!
//! Results only carry a 100px artwork URL, but the size lives in the path
//! (`.../100x100bb.jpg`), so each hit is offered at several larger sizes.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::super::types::{CoverCandidate, TrackQuery};
use super::{CoverSource, HttpClient, LookupError};

const ITUNES_SEARCH: &str = "https://itunes.apple.com/search";
const RESULT_LIMIT: &str = "5";

/// Tried biggest first.
pub const UPSCALE_SIZES: [u32; 4] = [1200, 1000, 800, 600];

static ART_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+x\d+bb\.").expect("valid regex"));

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchItem>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchItem {
    #[serde(rename = "artworkUrl100")]
    artwork_url_100: Option<String>,
    #[serde(rename = "artistName")]
    artist_name: Option<String>,
    #[serde(rename = "trackName")]
    track_name: Option<String>,
    #[serde(rename = "collectionName")]
    collection_name: Option<String>,
    #[serde(rename = "releaseDate")]
    release_date: Option<String>,
    #[serde(rename = "primaryGenreName")]
    primary_genre_name: Option<String>,
    #[serde(rename = "trackNumber")]
    track_number: Option<u32>,
    #[serde(rename = "trackCount")]
    track_count: Option<u32>,
}

pub struct ItunesSource {
    http: HttpClient,
}

impl ItunesSource {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

impl CoverSource for ItunesSource {
    fn name(&self) -> &str {
        "itunes"
    }

    fn search(&self, query: &TrackQuery) -> Result<Vec<CoverCandidate>, LookupError> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut last_err = None;
        let mut answered = false;

        for (term, entity) in search_terms(query) {
            let params = [
                ("term", term.as_str()),
                ("media", "music"),
                ("entity", entity),
                ("limit", RESULT_LIMIT),
            ];
            match self.http.get_json::<SearchResponse>(ITUNES_SEARCH, &params) {
                Ok(resp) => {
                    answered = true;
                    out.extend(candidates(resp, &mut seen));
                }
                Err(e) => last_err = Some(e),
            }
        }

        match last_err {
            Some(e) if !answered => Err(e),
            _ => Ok(out),
        }
    }
}

/// Album search first when we know the album, then the song itself.
fn search_terms(query: &TrackQuery) -> Vec<(String, &'static str)> {
    let mut terms = Vec::with_capacity(2);
    if let Some(album) = &query.album {
        terms.push((format!("{} {}", query.artist, album), "album"));
    }
    terms.push((query.search_term(), "song"));
    terms
}

/// Swap the `NNNxNNNbb.` size segment for `size`.
pub fn upscale(url: &str, size: u32) -> String {
    ART_SIZE
        .replace(url, format!("/{size}x{size}bb."))
        .into_owned()
}

fn candidates(resp: SearchResponse, seen: &mut HashSet<String>) -> Vec<CoverCandidate> {
    let mut out = Vec::new();

    for item in resp.results {
        let Some(art) = item.artwork_url_100.filter(|u| !u.is_empty()) else {
            continue;
        };
        if !seen.insert(art.clone()) {
            continue;
        }

        let release_date = item
            .release_date
            .as_deref()
            .and_then(|d| d.get(..10).or(Some(d)))
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        for size in UPSCALE_SIZES {
            out.push(CoverCandidate {
                url: upscale(&art, size),
                source: format!("iTunes {size}px"),
                size_hint: Some(size),
                artist: item.artist_name.clone(),
                title: item.track_name.clone(),
                album: item.collection_name.clone(),
                release_date: release_date.clone(),
                genre: item.primary_genre_name.clone(),
                track_no: item.track_number,
                track_total: item.track_count,
            });
        }
    }

    out
}
