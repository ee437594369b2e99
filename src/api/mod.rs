pub mod advice;
pub mod calendar;
pub mod health;
pub mod ingest;
pub mod snapshots;
pub mod summary;
pub mod trades;

use crate::advice::AdviceSource;
use crate::config::Config;
use crate::db::Repository;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    pub advisor: Arc<dyn AdviceSource>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config, advisor: Arc<dyn AdviceSource>) -> Self {
        Self {
            repo,
            config,
            advisor,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/ingest", post(ingest::ingest))
        .route(
            "/v1/trades",
            get(trades::list_trades).delete(trades::delete_trades),
        )
        .route("/v1/trades/tags", put(trades::update_tags))
        .route("/v1/trades/export", get(trades::export_trades))
        .route("/v1/summary", get(summary::get_summary))
        .route("/v1/calendar", get(calendar::get_calendar))
        .route(
            "/v1/snapshots",
            post(snapshots::save_snapshot)
                .get(snapshots::list_snapshots)
                .delete(snapshots::reset_snapshots),
        )
        .route("/v1/advice", post(advice::generate_advice))
        .layer(cors)
        .with_state(state)
}
