//! core/lookup/musicbrainz.rs
//! MusicBrainz (find a release) + Cover Art Archive (find its front cover).
//!
//! Flow per query:
//! 1. release search by artist+album, else recording search by artist+title
//! 2. release details (date, genres/tags) for optional metadata writes
//! 3. CAA listing for that release -> ordered image URLs
//!
//! MusicBrainz asks for at most one request per second.

use std::cell::Cell;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::super::types::{CoverCandidate, TrackQuery};
use super::{CoverSource, HttpClient, LookupError};

const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";
const COVER_ART_ARCHIVE_URL: &str = "https://coverartarchive.org";
const RATE_LIMIT_MS: u64 = 1000;

#[derive(Debug, Clone, Default, Deserialize)]
struct MbRelease {
    id: String,
    title: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ReleaseSearch {
    #[serde(default)]
    releases: Vec<MbRelease>,
}

#[derive(Debug, Default, Deserialize)]
struct MbRecording {
    #[serde(default)]
    releases: Vec<MbRelease>,
}

#[derive(Debug, Default, Deserialize)]
struct RecordingSearch {
    #[serde(default)]
    recordings: Vec<MbRecording>,
}

#[derive(Debug, Default, Deserialize)]
struct MbNamed {
    name: Option<String>,
    #[serde(default)]
    count: i64,
}

impl MbNamed {
    fn label(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ReleaseDetails {
    date: Option<String>,
    #[serde(default)]
    genres: Vec<MbNamed>,
    #[serde(default)]
    tags: Vec<MbNamed>,
}

#[derive(Debug, Default, Deserialize)]
struct CaaListing {
    #[serde(default)]
    images: Vec<CaaImage>,
}

#[derive(Debug, Default, Deserialize)]
struct CaaImage {
    #[serde(default)]
    front: bool,
    image: Option<String>,
    #[serde(default)]
    thumbnails: HashMap<String, String>,
}

/// Blocking 1 req/s limiter. Single-threaded, so a `Cell` is enough.
struct RateLimiter {
    last_request: Cell<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Cell::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    fn wait(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("Rate limiting: waiting {:?}", wait);
                std::thread::sleep(wait);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

pub struct MusicBrainzSource {
    http: HttpClient,
    rate_limiter: RateLimiter,
}

impl MusicBrainzSource {
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            rate_limiter: RateLimiter::new(RATE_LIMIT_MS),
        }
    }

    fn mb_get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        self.rate_limiter.wait();
        let url = format!("{MUSICBRAINZ_BASE_URL}/{path}");
        self.http.get_json(&url, params)
    }

    fn find_release(&self, query: &TrackQuery) -> Result<Option<MbRelease>, LookupError> {
        if let Some(album) = &query.album {
            let q = format!(
                "artist:\"{}\" AND release:\"{}\"",
                lucene_escape(&query.artist),
                lucene_escape(album)
            );
            let params = [("query", q.as_str()), ("fmt", "json"), ("limit", "1")];
            let resp: ReleaseSearch = self.mb_get("release", &params)?;
            if let Some(rel) = resp.releases.into_iter().next() {
                return Ok(Some(rel));
            }
        }

        let q = format!(
            "artist:\"{}\" AND recording:\"{}\"",
            lucene_escape(&query.artist),
            lucene_escape(&query.title)
        );
        let params = [("query", q.as_str()), ("fmt", "json"), ("limit", "1")];
        let resp: RecordingSearch = self.mb_get("recording", &params)?;
        Ok(first_release(resp))
    }

    fn release_details(&self, mbid: &str) -> Result<ReleaseDetails, LookupError> {
        self.mb_get(
            &format!("release/{mbid}"),
            &[("fmt", "json"), ("inc", "genres+tags")],
        )
    }

    fn cover_urls(&self, mbid: &str) -> Vec<String> {
        let url = format!("{COVER_ART_ARCHIVE_URL}/release/{mbid}");
        let mut urls = match self.http.get_json::<CaaListing>(&url, &[]) {
            Ok(listing) => listing_urls(listing),
            Err(e) => {
                debug!(mbid, error = %e, "no cover art listing");
                Vec::new()
            }
        };
        let front = format!("{COVER_ART_ARCHIVE_URL}/release/{mbid}/front");
        if !urls.contains(&front) {
            urls.push(front);
        }
        urls
    }
}

impl CoverSource for MusicBrainzSource {
    fn name(&self) -> &str {
        "musicbrainz"
    }

    fn search(&self, query: &TrackQuery) -> Result<Vec<CoverCandidate>, LookupError> {
        let Some(release) = self.find_release(query)? else {
            return Ok(Vec::new());
        };
        debug!(mbid = %release.id, title = ?release.title, "musicbrainz release");

        let details = self.release_details(&release.id).unwrap_or_else(|e| {
            debug!(mbid = %release.id, error = %e, "release details unavailable");
            ReleaseDetails::default()
        });

        let template = CoverCandidate {
            album: release.title.clone(),
            release_date: details.date.clone().or(release.date.clone()),
            genre: pick_genre(&details),
            ..CoverCandidate::default()
        };

        Ok(self
            .cover_urls(&release.id)
            .into_iter()
            .map(|url| CoverCandidate {
                url,
                source: "CoverArtArchive".to_string(),
                ..template.clone()
            })
            .collect())
    }
}

fn first_release(resp: RecordingSearch) -> Option<MbRelease> {
    resp.recordings
        .into_iter()
        .flat_map(|r| r.releases)
        .next()
}

/// Genres if MusicBrainz has them, otherwise the most-voted tag.
fn pick_genre(details: &ReleaseDetails) -> Option<String> {
    if let Some(g) = details.genres.iter().find_map(MbNamed::label) {
        return Some(g.to_string());
    }
    details
        .tags
        .iter()
        .filter(|t| t.label().is_some())
        .max_by_key(|t| t.count)
        .and_then(MbNamed::label)
        .map(str::to_string)
}

/// Front images first (all images if none is marked front), each as
/// 1200px thumbnail, original, large, small.
fn listing_urls(listing: CaaListing) -> Vec<String> {
    let has_front = listing.images.iter().any(|i| i.front);
    let mut urls = Vec::new();

    for img in listing.images.into_iter().filter(|i| i.front || !has_front) {
        let thumbs = &img.thumbnails;
        let ordered = [
            thumbs.get("1200").cloned(),
            img.image.clone(),
            thumbs.get("large").cloned(),
            thumbs.get("small").cloned(),
        ];
        for url in ordered.into_iter().flatten() {
            let url = url.replacen("http://", "https://", 1);
            if !urls.contains(&url) {
                urls.push(url);
            }
        }
    }
    urls
}

/// Quote-safe value for a Lucene phrase query.
fn lucene_escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(lucene_escape(r#"12" Mix"#), r#"12\" Mix"#);
        assert_eq!(lucene_escape(r"AC\DC"), r"AC\\DC");
    }

    #[test]
    fn recording_search_takes_first_release() {
        let resp: RecordingSearch = serde_json::from_str(
            r#"{"recordings": [
                {"id": "r1", "releases": []},
                {"id": "r2", "releases": [{"id": "rel-1", "title": "Discovery", "date": "2001"}]}
            ]}"#,
        )
        .unwrap();
        let rel = first_release(resp).unwrap();
        assert_eq!(rel.id, "rel-1");
        assert_eq!(rel.title.as_deref(), Some("Discovery"));
    }

    #[test]
    fn genre_prefers_genres_then_top_tag() {
        let details: ReleaseDetails = serde_json::from_str(
            r#"{"date": "2001-03-12", "genres": [{"name": "house", "count": 2}], "tags": []}"#,
        )
        .unwrap();
        assert_eq!(pick_genre(&details).as_deref(), Some("house"));

        let details: ReleaseDetails = serde_json::from_str(
            r#"{"tags": [{"name": "french", "count": 1}, {"name": "electronic", "count": 7}]}"#,
        )
        .unwrap();
        assert_eq!(pick_genre(&details).as_deref(), Some("electronic"));

        assert_eq!(pick_genre(&ReleaseDetails::default()), None);
    }

    #[test]
    fn listing_orders_front_image_sizes() {
        let listing: CaaListing = serde_json::from_str(
            r#"{"images": [
                {"front": false, "image": "http://caa/back.jpg", "thumbnails": {}},
                {"front": true, "image": "http://caa/front.jpg",
                 "thumbnails": {"small": "http://caa/front-250.jpg",
                                "large": "http://caa/front-500.jpg",
                                "1200": "http://caa/front-1200.jpg"}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            listing_urls(listing),
            vec![
                "https://caa/front-1200.jpg",
                "https://caa/front.jpg",
                "https://caa/front-500.jpg",
                "https://caa/front-250.jpg",
            ]
        );
    }

    #[test]
    fn listing_without_front_uses_everything() {
        let listing: CaaListing = serde_json::from_str(
            r#"{"images": [{"image": "https://caa/only.png"}]}"#,
        )
        .unwrap();
        assert_eq!(listing_urls(listing), vec!["https://caa/only.png"]);
    }

    #[test]
    fn limiter_spaces_requests() {
        let limiter = RateLimiter::new(50);
        let start = Instant::now();
        limiter.wait();
        limiter.wait();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
