use reqwest::Client;

use crate::error::DiscoveryError;
use crate::models::OmdbRecord;

pub const DEFAULT_OMDB_BASE_URL: &str = "http://www.omdbapi.com";

/// Client for the secondary ratings service (OMDB-shaped API). Only ever
/// consulted for best-effort enrichment; a missing key disables it rather
/// than failing lookups.
pub struct OmdbClient {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl OmdbClient {
    pub fn new(client: Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            client,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    /// Look up supplementary data by IMDb id.
    pub async fn lookup(&self, imdb_id: &str) -> Result<OmdbRecord, DiscoveryError> {
        let key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(DiscoveryError::Configuration("OMDB"))?;

        let url = format!("{}/", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("apikey", key), ("i", imdb_id), ("plot", "full")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoveryError::Status(status));
        }

        let record: OmdbRecord = response
            .json()
            .await
            .map_err(|e| DiscoveryError::Decode(e.to_string()))?;

        // The upstream reports logical not-found inside a 200 body.
        if record.response == "False" {
            return Err(DiscoveryError::NotFound(
                record.error.unwrap_or_else(|| "unspecified error".to_string()),
            ));
        }

        Ok(record)
    }
}
