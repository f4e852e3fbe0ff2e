use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use reelex_core::{Genre, MediaPage, MovieDetails, TvDetails};

use crate::AppState;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    page: String,
}

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    #[serde(default)]
    time_window: String,
}

pub async fn ping_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "reelex server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<MediaPage>> {
    if params.q.is_empty() {
        return Err(AppError::bad_request("Query parameter 'q' is required"));
    }

    info!(
        "Search request: q={:?} type={:?} page={:?}",
        params.q, params.kind, params.page
    );
    let results = state
        .discovery
        .search(&params.q, &params.kind, &params.page)
        .await?;
    Ok(Json(results))
}

pub async fn movie_details_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MovieDetails>> {
    info!("Movie details request for id {id}");
    let details = state.discovery.movie_details(&id).await?;
    Ok(Json(details))
}

pub async fn tv_details_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<TvDetails>> {
    info!("TV details request for id {id}");
    let details = state.discovery.tv_details(&id).await?;
    Ok(Json(details))
}

pub async fn trending_handler(
    State(state): State<AppState>,
    Query(params): Query<TrendingParams>,
) -> AppResult<Json<MediaPage>> {
    info!("Trending request for window {:?}", params.time_window);
    let trending = state.discovery.trending(&params.time_window).await?;
    Ok(Json(trending))
}

pub async fn genres_handler(
    State(state): State<AppState>,
) -> AppResult<Json<HashMap<String, Vec<Genre>>>> {
    info!("Genre list request");
    let genres = state.discovery.genres().await?;
    Ok(Json(genres))
}
