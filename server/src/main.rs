use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelex_core::{DiscoveryService, OmdbClient, TmdbClient};

mod config;
mod errors;
mod handlers;

use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub discovery: Arc<DiscoveryService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelex_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    if config.tmdb_api_key.is_none() {
        warn!("TMDB_API_KEY is not set; catalog lookups will fail until it is configured");
    }
    if config.omdb_api_key.is_none() {
        info!("OMDB_API_KEY is not set; ratings enrichment is disabled");
    }

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    let app = create_app(&config)?;

    info!("Starting reelex server on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(config: &Config) -> anyhow::Result<Router> {
    // One pooled client shared by both outbound services; each call gets the
    // same fixed timeout.
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let tmdb = TmdbClient::new(
        client.clone(),
        config.tmdb_api_key.clone(),
        config.tmdb_base_url.clone(),
    );
    let omdb = OmdbClient::new(
        client,
        config.omdb_api_key.clone(),
        config.omdb_base_url.clone(),
    );
    let discovery = DiscoveryService::new(tmdb, omdb, config.image_base_url.clone());

    let state = AppState {
        discovery: Arc::new(discovery),
    };

    Ok(Router::new()
        .route("/ping", get(handlers::ping_handler))
        .route("/api/search", get(handlers::search_handler))
        .route("/api/movie/{id}", get(handlers::movie_details_handler))
        .route("/api/tv/{id}", get(handlers::tv_details_handler))
        .route("/api/trending", get(handlers::trending_handler))
        .route("/api/genres", get(handlers::genres_handler))
        .route_service("/", ServeFile::new("web/static/index.html"))
        .nest_service("/static", ServeDir::new("web/static"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use httptest::{Expectation, Server, matchers::request, responders::json_encoded};
    use serde_json::json;
    use tower::ServiceExt;

    fn test_config(tmdb_base: &str) -> Config {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            tmdb_api_key: Some("test-key".to_string()),
            tmdb_base_url: tmdb_base.to_string(),
            image_base_url: "https://image.example/t/p/w500".to_string(),
            omdb_api_key: None,
            omdb_base_url: "http://omdb.invalid".to_string(),
        }
    }

    #[tokio::test]
    async fn ping_endpoint_is_up() {
        let app = create_app(&test_config("http://tmdb.invalid")).unwrap();

        let response = app
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn search_requires_query_param() {
        let app = create_app(&test_config("http://tmdb.invalid")).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/search?type=movie")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn search_round_trip_rewrites_images() {
        let tmdb = Server::run();
        tmdb.expect(
            Expectation::matching(request::method_path("GET", "/search/multi")).respond_with(
                json_encoded(json!({
                    "page": 1,
                    "results": [
                        {"id": 603, "title": "The Matrix", "overview": "", "poster_path": "/matrix.jpg"}
                    ],
                    "total_pages": 1,
                    "total_results": 1
                })),
            ),
        );

        // httptest's `url_str("")` carries a trailing slash; strip it so the
        // base matches the clients' slash-free concatenation contract.
        let tmdb_base = tmdb.url_str("");
        let app = create_app(&test_config(tmdb_base.trim_end_matches('/'))).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/search?q=matrix")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let page: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            page["results"][0]["poster_path"],
            "https://image.example/t/p/w500/matrix.jpg"
        );
    }

    #[tokio::test]
    async fn missing_catalog_key_is_internal_error() {
        let mut config = test_config("http://tmdb.invalid");
        config.tmdb_api_key = None;
        let app = create_app(&config).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/trending")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
