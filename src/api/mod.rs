use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;

mod error;
mod genres;
mod media;
mod movies;
mod observability;
mod people;
mod predictions;
mod ratings;
mod shows;
mod system;
mod titles;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub config: Config,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub const fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

/// Connects to the configured database (running migrations) and builds the
/// shared handler state.
pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::with_pool_options(
        &config.general.database_url,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(Arc::new(AppState {
        store,
        config,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_routes().with_state(state))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(observability::logging_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer.allow_methods(Any).allow_headers(Any)),
        )
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(movies::list_movies).post(movies::create_movie))
        .route("/movies/by-actor", get(movies::movies_by_actor))
        .route("/movies/top-rated", get(movies::top_rated_movies))
        .route(
            "/movies/{movie_id}",
            get(movies::get_movie).put(movies::update_movie),
        )
        .route("/shows", get(shows::list_shows).post(shows::create_show))
        .route("/shows/by-actor", get(shows::shows_by_actor))
        .route("/shows/by-details", get(shows::shows_by_details))
        .route("/shows/top-rated", get(shows::top_rated_shows))
        .route(
            "/shows/{show_id}",
            get(shows::get_show).put(shows::update_show),
        )
        .route("/genres", get(genres::list_genres).post(genres::create_genre))
        .route("/genres/{id}", get(genres::get_genre).put(genres::rename_genre))
        .route("/people", get(people::list_people).post(people::create_person))
        .route("/people/{id}", get(people::get_person).put(people::update_person))
        .route(
            "/ratings",
            get(ratings::list_ratings).post(ratings::create_rating),
        )
        .route(
            "/ratings/{id}",
            get(ratings::get_rating).put(ratings::update_rating),
        )
        .route("/media", get(media::search_media))
        .route(
            "/predictions",
            get(predictions::list_predictions).post(predictions::create_prediction),
        )
        .route("/system/status", get(system::get_status))
        .route("/health/live", get(system::health_live))
        .route("/health/ready", get(system::health_ready))
        .route("/metrics", get(observability::get_metrics))
}
