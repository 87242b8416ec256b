use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{DetailTier, Movie, MovieCard};
use crate::services::{recommend, search_titles, Lookup, TopPicksSnapshot};

use super::AppState;

const INDEX_PAGE: &str = include_str!("../../assets/index.html");

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct MovieSearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: Option<String>,
    pub fast: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub tier: DetailTier,
    pub recommendations: Vec<MovieCard>,
}

#[derive(Debug, Serialize)]
pub struct TopPicksResponse {
    pub auto_refresh: bool,
    #[serde(flatten)]
    pub snapshot: TopPicksSnapshot,
}

#[derive(Debug, Serialize)]
pub struct RefreshStateResponse {
    pub auto_refresh: bool,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Static page driving the JSON API
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// Catalog titles for the selection input
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<MovieSearchQuery>,
) -> Json<Vec<Movie>> {
    let movies = search_titles(&state.catalog, params.q.as_deref())
        .into_iter()
        .cloned()
        .collect();
    Json(movies)
}

/// Ranked recommendations for one title, with resolved metadata
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let title = match params.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => return Err(AppError::InvalidInput("title must not be empty".to_string())),
    };

    let tier = DetailTier::from_fast_mode(params.fast.unwrap_or(state.fast_mode));

    tracing::info!(
        request_id = %request_id,
        title = %title,
        tier = %tier,
        "Processing recommendation request"
    );

    let movies = match recommend(&state.catalog, &title) {
        Lookup::Found(movies) => movies,
        Lookup::NotFound => {
            return Err(AppError::NotFound(format!(
                "Movie not found in the database: {}",
                title
            )));
        }
    };

    let ids: Vec<_> = movies.iter().map(|m| m.id).collect();
    let records = state.resolver.resolve_all(&ids, tier).await;

    let recommendations: Vec<MovieCard> = movies
        .iter()
        .zip(records)
        .map(|(movie, details)| MovieCard::new(movie, details))
        .collect();

    tracing::info!(
        request_id = %request_id,
        results = recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(RecommendationResponse {
        query: title,
        tier,
        recommendations,
    }))
}

/// Current top picks panel
pub async fn get_top_picks(State(state): State<AppState>) -> Json<TopPicksResponse> {
    Json(TopPicksResponse {
        auto_refresh: !state.top_picks.control().is_paused(),
        snapshot: state.top_picks.snapshot().await,
    })
}

/// Stop refreshing the top picks panel
pub async fn pause_top_picks(State(state): State<AppState>) -> Json<RefreshStateResponse> {
    state.top_picks.control().pause();
    tracing::info!("Top picks auto refresh paused");
    Json(RefreshStateResponse {
        auto_refresh: false,
    })
}

/// Resume refreshing the top picks panel
pub async fn resume_top_picks(State(state): State<AppState>) -> Json<RefreshStateResponse> {
    state.top_picks.control().resume();
    tracing::info!("Top picks auto refresh resumed");
    Json(RefreshStateResponse { auto_refresh: true })
}
