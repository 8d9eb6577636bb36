//! HTTP API Server for the ranking engine
//!
//! REST endpoints the site frontend renders from: the related strip for a
//! recording page and the global trending strip. Rendering itself happens
//! elsewhere; these handlers only return recording data plus ranking
//! signals.

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::catalog::{Catalog, Recording};
use crate::config::{ApiConfig, RankingConfig};
use crate::error::Error;
use crate::likes::{HttpLikeProvider, LikeCounts};
use crate::ranking::{related_recordings, trending_recordings, TrendingEntry};

/// Shared application state
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub likes: Option<HttpLikeProvider>,
    pub ranking: RankingConfig,
}

/// Query params for ranking endpoints
#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    /// Overrides the configured default strip size; clamped to the
    /// configured maximum.
    pub limit: Option<usize>,
}

/// Response for the related endpoint
#[derive(Debug, Serialize)]
pub struct RelatedResponse {
    pub items: Vec<Recording>,
    pub total: usize,
}

/// Response for the trending endpoint
#[derive(Debug, Serialize)]
pub struct TrendingResponse {
    pub items: Vec<TrendingEntry>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub catalog_size: usize,
}

/// Start the API server
pub async fn start_server(state: Arc<AppState>, config: &ApiConfig) -> Result<()> {
    let mut app = Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/v1/recordings/:short_id/related",
            get(get_related_recordings),
        )
        .route("/api/v1/trending", get(get_trending))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    let addr = format!("{}:{}", config.host, config.port);
    info!("Starting ranking API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size: state.catalog.len(),
    })
}

/// Related recordings for one anchor, identified by its short id
async fn get_related_recordings(
    State(state): State<Arc<AppState>>,
    Path(short_id): Path<String>,
    Query(query): Query<RankingQuery>,
) -> Result<Json<RelatedResponse>, Error> {
    let anchor = state
        .catalog
        .by_short_id(&short_id)
        .ok_or_else(|| Error::not_found("recording", short_id))?;

    let limit = clamp_limit(query.limit, state.ranking.related_limit, &state.ranking);
    let items = related_recordings(anchor, &state.catalog, limit);
    let total = items.len();

    Ok(Json(RelatedResponse { items, total }))
}

/// Global trending strip
async fn get_trending(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RankingQuery>,
) -> Json<TrendingResponse> {
    // Provider failure or absence degrades to zero counts; the strip must
    // always render.
    let like_counts = match &state.likes {
        Some(provider) => provider.fetch_like_counts_or_empty().await,
        None => LikeCounts::new(),
    };

    let limit = clamp_limit(query.limit, state.ranking.trending_limit, &state.ranking);
    let now = chrono::Utc::now().date_naive();
    let items = trending_recordings(&state.catalog, &like_counts, now, limit);
    let total = items.len();

    Json(TrendingResponse { items, total })
}

fn clamp_limit(requested: Option<usize>, default: usize, ranking: &RankingConfig) -> usize {
    requested.unwrap_or(default).min(ranking.max_limit)
}
