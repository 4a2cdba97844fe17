pub mod accounts;
pub mod auth;
pub mod password_reset;

use axum::{http::Method, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .merge(auth::routes())
        .merge(accounts::routes())
        .merge(password_reset::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
