use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{
    ExternalIds, Genre, MediaKind, MediaPage, MediaSummary, MovieDetails, OmdbRecord, TvDetails,
};
use crate::providers::{OmdbClient, TmdbClient, TrendWindow, search_endpoint};

/// Orchestrates catalog lookups against the primary metadata service and
/// best-effort ratings enrichment from the secondary one. Holds immutable
/// configuration and the shared connection pool; no state is carried
/// between requests.
pub struct DiscoveryService {
    tmdb: TmdbClient,
    omdb: OmdbClient,
    image_base_url: String,
}

impl DiscoveryService {
    pub fn new(tmdb: TmdbClient, omdb: OmdbClient, image_base_url: impl Into<String>) -> Self {
        Self {
            tmdb,
            omdb,
            image_base_url: image_base_url.into(),
        }
    }

    /// Search the catalog. `kind` selects the movie or tv index, anything
    /// else searches both; an empty `page` means the first page.
    pub async fn search(
        &self,
        query: &str,
        kind: &str,
        page: &str,
    ) -> Result<MediaPage> {
        let page = if page.is_empty() { "1" } else { page };

        let mut results = self
            .tmdb
            .search(search_endpoint(kind), query, page)
            .await?;

        debug!("search for {query:?} returned {} results", results.results.len());
        for item in &mut results.results {
            self.rewrite_summary(item);
        }

        Ok(results)
    }

    /// Fetch a movie with embedded credits and external ids, then attach
    /// ratings data when an IMDb id is available.
    pub async fn movie_details(&self, id: &str) -> Result<MovieDetails> {
        let mut details = self.tmdb.movie_details(id).await?;

        self.rewrite_path(&mut details.poster_path);
        self.rewrite_path(&mut details.backdrop_path);
        if let Some(credits) = &mut details.credits {
            for member in &mut credits.cast {
                self.rewrite_path(&mut member.profile_path);
            }
        }

        details.omdb_data = self.enrich(details.external_ids.as_ref()).await;
        Ok(details)
    }

    /// TV variant of [`DiscoveryService::movie_details`].
    pub async fn tv_details(&self, id: &str) -> Result<TvDetails> {
        let mut details = self.tmdb.tv_details(id).await?;

        self.rewrite_path(&mut details.poster_path);
        self.rewrite_path(&mut details.backdrop_path);
        if let Some(credits) = &mut details.credits {
            for member in &mut credits.cast {
                self.rewrite_path(&mut member.profile_path);
            }
        }

        details.omdb_data = self.enrich(details.external_ids.as_ref()).await;
        Ok(details)
    }

    /// Trending movies and shows for the given window; anything that is not
    /// exactly `week` falls back to `day`.
    pub async fn trending(&self, window: &str) -> Result<MediaPage> {
        let mut page = self.tmdb.trending(TrendWindow::normalize(window)).await?;

        for item in &mut page.results {
            self.rewrite_summary(item);
        }

        Ok(page)
    }

    /// Genre lists for both media kinds. The two calls are independent but
    /// issued sequentially; either failure fails the whole lookup with no
    /// partial map.
    pub async fn genres(&self) -> Result<HashMap<String, Vec<Genre>>> {
        let movie = self.tmdb.genre_list(MediaKind::Movie).await?;
        let tv = self.tmdb.genre_list(MediaKind::Tv).await?;

        Ok(HashMap::from([
            (MediaKind::Movie.as_str().to_string(), movie),
            (MediaKind::Tv.as_str().to_string(), tv),
        ]))
    }

    /// Best-effort ratings lookup. Returns `None` unless the external-ids
    /// section carries a non-empty IMDb id and a ratings key is configured;
    /// any failure of the secondary call is logged and absorbed, never
    /// surfaced to the caller.
    async fn enrich(&self, external_ids: Option<&ExternalIds>) -> Option<OmdbRecord> {
        if !self.omdb.is_enabled() {
            return None;
        }

        let imdb_id = external_ids
            .and_then(|ids| ids.imdb_id.as_deref())
            .filter(|id| !id.is_empty())?;

        match self.omdb.lookup(imdb_id).await {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("skipping ratings enrichment for {imdb_id}: {err}");
                None
            }
        }
    }

    fn rewrite_summary(&self, item: &mut MediaSummary) {
        self.rewrite_path(&mut item.poster_path);
        self.rewrite_path(&mut item.backdrop_path);
    }

    /// Prefix a relative image path with the configured image base. Applied
    /// exactly once, while the record is still exclusively owned by the
    /// current request; empty or absent paths stay untouched.
    fn rewrite_path(&self, path: &mut Option<String>) {
        if let Some(p) = path {
            if !p.is_empty() {
                *p = format!("{}{}", self.image_base_url, p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{OmdbClient, TmdbClient};

    fn service(image_base: &str) -> DiscoveryService {
        let client = reqwest::Client::new();
        DiscoveryService::new(
            TmdbClient::new(client.clone(), None, "http://tmdb.invalid"),
            OmdbClient::new(client, None, "http://omdb.invalid"),
            image_base,
        )
    }

    #[test]
    fn rewrite_prefixes_relative_paths() {
        let svc = service("https://img.example/t/p/w500");
        let mut path = Some("/abc.jpg".to_string());
        svc.rewrite_path(&mut path);
        assert_eq!(path.as_deref(), Some("https://img.example/t/p/w500/abc.jpg"));
    }

    #[test]
    fn rewrite_leaves_empty_and_absent_paths() {
        let svc = service("https://img.example/t/p/w500");

        let mut empty = Some(String::new());
        svc.rewrite_path(&mut empty);
        assert_eq!(empty.as_deref(), Some(""));

        let mut absent: Option<String> = None;
        svc.rewrite_path(&mut absent);
        assert_eq!(absent, None);
    }
}
