use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::DiscoveryError;
use crate::models::{Genre, GenreList, MediaKind, MediaPage, MovieDetails, TvDetails};

pub const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Endpoint selection for search is a pure lookup: unknown or absent kinds
/// fall back to the combined movie+tv index.
pub fn search_endpoint(kind: &str) -> &'static str {
    match kind {
        "movie" => "search/movie",
        "tv" => "search/tv",
        _ => "search/multi",
    }
}

/// Time window accepted by the trending endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendWindow {
    Day,
    Week,
}

impl TrendWindow {
    /// Anything that is not exactly `week` collapses to `day`.
    pub fn normalize(window: &str) -> Self {
        match window {
            "week" => TrendWindow::Week,
            _ => TrendWindow::Day,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendWindow::Day => "day",
            TrendWindow::Week => "week",
        }
    }
}

/// Client for the primary catalog service (TMDB-shaped API, query-parameter
/// key auth). Holds the process-wide connection pool; safe to share across
/// concurrent requests.
pub struct TmdbClient {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl TmdbClient {
    pub fn new(client: Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            client,
        }
    }

    /// Every catalog call requires the key; it is resolved before any
    /// request is built.
    fn key(&self) -> Result<&str, DiscoveryError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(DiscoveryError::Configuration("TMDB"))
    }

    pub async fn search(
        &self,
        endpoint: &str,
        query: &str,
        page: &str,
    ) -> Result<MediaPage, DiscoveryError> {
        let key = self.key()?;
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!("TMDB search request: {url}");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", key),
                ("query", query),
                ("page", page),
                ("include_adult", "false"),
            ])
            .send()
            .await?;

        decode(response).await
    }

    /// Fetch a movie record with credits and external ids embedded in the
    /// same round trip. The id is forwarded verbatim; the upstream rejects
    /// malformed ids with a non-success status.
    pub async fn movie_details(&self, id: &str) -> Result<MovieDetails, DiscoveryError> {
        let key = self.key()?;
        let url = format!("{}/movie/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", key),
                ("append_to_response", "credits,external_ids"),
            ])
            .send()
            .await?;

        decode(response).await
    }

    pub async fn tv_details(&self, id: &str) -> Result<TvDetails, DiscoveryError> {
        let key = self.key()?;
        let url = format!("{}/tv/{}", self.base_url, id);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", key),
                ("append_to_response", "credits,external_ids"),
            ])
            .send()
            .await?;

        decode(response).await
    }

    pub async fn trending(&self, window: TrendWindow) -> Result<MediaPage, DiscoveryError> {
        let key = self.key()?;
        let url = format!("{}/trending/all/{}", self.base_url, window.as_str());

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", key)])
            .send()
            .await?;

        decode(response).await
    }

    pub async fn genre_list(&self, kind: MediaKind) -> Result<Vec<Genre>, DiscoveryError> {
        let key = self.key()?;
        let url = format!("{}/genre/{}/list", self.base_url, kind.as_str());

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", key)])
            .send()
            .await?;

        let list: GenreList = decode(response).await?;
        Ok(list.genres)
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, DiscoveryError> {
    let status = response.status();
    if !status.is_success() {
        return Err(DiscoveryError::Status(status));
    }

    response
        .json()
        .await
        .map_err(|e| DiscoveryError::Decode(e.to_string()))
}
