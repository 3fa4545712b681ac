//! core/lookup/http.rs
//! Thin blocking HTTP wrapper shared by the cover sources.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{FetchedImage, ImageFetcher, LookupError};

/// Larger than any cover art we would embed.
pub const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// One `reqwest` client (connection pool, user agent, timeout) for a run.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    /// GET `url?params` and decode the JSON body.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        debug!(url, ?params, "GET json");

        let response = self
            .client
            .get(url)
            .query(params)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response
            .json::<T>()
            .map_err(|e| LookupError::Parse(e.to_string()))
    }
}

impl ImageFetcher for HttpClient {
    fn fetch(&self, url: &str) -> Result<FetchedImage, LookupError> {
        debug!(url, "GET image");

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase());

        if let Some(ct) = &content_type {
            if !ct.contains("image") {
                return Err(LookupError::NotAnImage {
                    content_type: ct.clone(),
                    url: url.to_string(),
                });
            }
        }

        if let Some(len) = response.content_length() {
            if len > MAX_IMAGE_BYTES {
                return Err(LookupError::TooLarge {
                    limit: MAX_IMAGE_BYTES,
                    url: url.to_string(),
                });
            }
        }
        let data = read_capped(response, MAX_IMAGE_BYTES, url)?;

        Ok(FetchedImage { data, content_type })
    }
}

/// Read at most `limit` bytes; a longer body is an error, not a truncation.
fn read_capped(body: impl Read, limit: u64, url: &str) -> Result<Vec<u8>, LookupError> {
    let mut data = Vec::new();
    body.take(limit + 1)
        .read_to_end(&mut data)
        .map_err(|e| LookupError::Network(e.to_string()))?;

    if data.len() as u64 > limit {
        return Err(LookupError::TooLarge {
            limit,
            url: url.to_string(),
        });
    }
    Ok(data)
}
