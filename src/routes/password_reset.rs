use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/forgot-password",
            post(crate::handlers::password_reset::forgot_password),
        )
        .route(
            "/verify-otp",
            get(crate::handlers::password_reset::get_verify_otp)
                .post(crate::handlers::password_reset::verify_otp),
        )
        .route(
            "/reset-password",
            post(crate::handlers::password_reset::reset_password),
        )
}
