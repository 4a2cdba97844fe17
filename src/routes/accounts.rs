use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(crate::handlers::accounts::list_accounts))
        .route("/add", post(crate::handlers::accounts::add_account))
        .route("/update/:id", get(crate::handlers::accounts::get_account))
        .route("/update/:id", post(crate::handlers::accounts::update_account))
        .route("/delete/:id", get(crate::handlers::accounts::delete_account))
}
