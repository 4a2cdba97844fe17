use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use accounts_api::errors::Result;
use accounts_api::routes;
use accounts_api::services::mailer::Notifier;
use accounts_api::services::token::TokenService;
use accounts_api::state::AppState;
use accounts_api::store::memory::MemoryStore;

struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<()> {
        Ok(())
    }
}

fn app() -> Router {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(NullNotifier),
        TokenService::new("test-secret"),
    );
    routes::app(state)
}

fn form_request(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn forgot_password_for_unknown_user_renders_identify_error() {
    let app = app();
    let body = "option=email&identifier=nobody%40example.com\
&security_question=First+pet%3F&security_answer=Rex";

    let response = app
        .oneshot(form_request("/forgot-password", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let step: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(step["stage"], "identify");
    assert_eq!(step["error"], "User not found");
    assert_eq!(step["identifier"], "nobody@example.com");
}

#[tokio::test]
async fn direct_verify_otp_navigation_restarts_the_flow() {
    let app = app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/verify-otp")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get(header::LOCATION).unwrap();
    assert_eq!(location, "/forgot-password");
}

#[tokio::test]
async fn mismatched_reset_passwords_stay_in_reset() {
    let app = app();
    let body = "option=email&identifier=alice%40example.com\
&new_password=NewP4ss&confirm_password=Other1x";

    let response = app
        .oneshot(form_request("/reset-password", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let step: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(step["stage"], "reset");
    assert_eq!(step["error"], "Passwords do not match");
}
