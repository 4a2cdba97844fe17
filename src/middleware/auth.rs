use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::models::account::Account;
use crate::state::AppState;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// The optional authenticated caller, resolved from the session cookie.
/// Missing, tampered, or expired tokens make the request anonymous; the
/// handlers redirect to the login page instead of failing.
pub struct MaybeUser(pub Option<Account>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) else {
            return Ok(MaybeUser(None));
        };

        match state.flow.current_user(cookie.value()).await {
            Ok(user) => Ok(MaybeUser(user)),
            Err(err) => {
                tracing::warn!("session lookup failed: {}", err);
                Ok(MaybeUser(None))
            }
        }
    }
}
