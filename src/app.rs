use axum::Router;
use tower_http::cors::CorsLayer;

use crate::routes::{health, home, tvl};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::<AppState>::new()
        .merge(home::router())
        .nest("/health", health::router())
        .nest("/api/tvl", tvl::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
