use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
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
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body))
        .unwrap()
}

const SIGNUP_ALICE: &str = "first_name=Alice&last_name=Smith&username=alice1\
&email=alice%40example.com&mobile=0123456789&password=Secur3!\
&security_question=First+pet%3F&security_answer=Rex";

#[tokio::test]
async fn signup_redirects_to_login() {
    let app = app();
    let response = app
        .oneshot(form_request("/signup", SIGNUP_ALICE))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get(header::LOCATION).unwrap();
    assert_eq!(location, "/?msg=Signup successful. Please Login");
}

#[tokio::test]
async fn signup_rejects_invalid_username() {
    let app = app();
    let body = "first_name=Alice&last_name=Smith&username=al\
&email=alice%40example.com&mobile=0123456789&password=Secur3!\
&security_question=First+pet%3F&security_answer=Rex";

    let response = app.oneshot(form_request("/signup", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_sets_httponly_session_cookie() {
    let app = app();
    app.clone()
        .oneshot(form_request("/signup", SIGNUP_ALICE))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(form_request("/login", "username=alice1&password=Secur3!"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("access_token="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=1800"));

    // The cookie authenticates a protected request.
    let cookie = set_cookie.split(';').next().unwrap().to_string();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/home")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let app = app();
    app.clone()
        .oneshot(form_request("/signup", SIGNUP_ALICE))
        .await
        .unwrap();

    let response = app
        .oneshot(form_request("/login", "username=alice1&password=wrong"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn anonymous_protected_request_redirects_to_login() {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/home").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers().get(header::LOCATION).unwrap();
    assert_eq!(location, "/?msg=You need to login first");

    // A garbage cookie is treated the same as no cookie.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/home")
                .header(header::COOKIE, "access_token=not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn logout_clears_the_cookie_and_redirects() {
    let app = app();
    let response = app
        .oneshot(Request::builder().uri("/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.starts_with("access_token="));
    assert!(set_cookie.contains("Max-Age=0"));
}
