use std::env;

use reelex_core::providers::{omdb::DEFAULT_OMDB_BASE_URL, tmdb::DEFAULT_TMDB_BASE_URL};

const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Environment-derived settings, read once at startup and treated as
/// immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct Config {
    // Server settings
    pub server_host: String,
    pub server_port: u16,

    // Catalog service (TMDB)
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub image_base_url: String,

    // Ratings service (OMDB)
    pub omdb_api_key: Option<String>,
    pub omdb_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env file if present
        dotenv::dotenv().ok();

        Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),

            tmdb_api_key: env::var("TMDB_API_KEY").ok().filter(|key| !key.is_empty()),
            tmdb_base_url: env::var("TMDB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_TMDB_BASE_URL.to_string()),
            image_base_url: env::var("TMDB_IMAGE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_IMAGE_BASE_URL.to_string()),

            omdb_api_key: env::var("OMDB_API_KEY").ok().filter(|key| !key.is_empty()),
            omdb_base_url: env::var("OMDB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OMDB_BASE_URL.to_string()),
        }
    }
}
