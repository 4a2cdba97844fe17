use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(crate::handlers::auth::login))
        .route("/logout", get(crate::handlers::auth::logout))
        .route("/signup", post(crate::handlers::auth::signup))
}
