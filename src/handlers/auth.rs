use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::middleware::auth::ACCESS_TOKEN_COOKIE;
use crate::services::auth_flow::{SignupInput, MSG_INVALID_CREDENTIALS};
use crate::services::token::ACCESS_TOKEN_EXPIRE_MINUTES;
use crate::services::validation::{
    check_password_strength, first_message, MOBILE_RE, NAME_RE, USERNAME_RE,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(
        length(min = 2, max = 20, message = "It must be 2-20 characters long"),
        regex(path = *NAME_RE, message = "It can only contain letters")
    )]
    pub first_name: String,
    #[validate(
        length(min = 2, max = 20, message = "It must be 2-20 characters long"),
        regex(path = *NAME_RE, message = "It can only contain letters")
    )]
    pub last_name: String,
    #[validate(
        length(min = 5, max = 15, message = "Username must be between 5-15 characters."),
        regex(
            path = *USERNAME_RE,
            message = "Username can only contain letters, numbers, and underscores."
        )
    )]
    pub username: String,
    #[validate(email(message = "Invalid email format."))]
    pub email: String,
    #[validate(regex(path = *MOBILE_RE, message = "Mobile number must be exactly 10 digits."))]
    pub mobile: String,
    pub password: String,
    pub security_question: String,
    pub security_answer: String,
}

impl From<SignupForm> for SignupInput {
    fn from(form: SignupForm) -> Self {
        SignupInput {
            first_name: form.first_name,
            last_name: form.last_name,
            username: form.username,
            email: form.email,
            mobile: form.mobile,
            password: form.password,
            security_question: form.security_question,
            security_answer: form.security_answer,
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state.flow.login(&form.username, &form.password).await? {
        Some((_account, token)) => {
            let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, token))
                .path("/")
                .http_only(true)
                .max_age(time::Duration::minutes(ACCESS_TOKEN_EXPIRE_MINUTES))
                .build();
            Ok((
                jar.add(cookie),
                Redirect::to("/home?msg=User logged in successfully"),
            )
                .into_response())
        }
        None => Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": MSG_INVALID_CREDENTIALS })),
        )
            .into_response()),
    }
}

pub async fn logout(jar: CookieJar) -> Response {
    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, "")).path("/").build();
    (
        jar.remove(cookie),
        Redirect::to("/?msg=You have been logged out successfully"),
    )
        .into_response()
}

pub async fn signup(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    if let Err(errors) = form.validate() {
        return Err(AppError::Validation(first_message(&errors)));
    }
    if let Err(msg) = check_password_strength(&form.password) {
        return Err(AppError::validation(msg));
    }

    // Self-signup: the new account is its own creator.
    let created_by = form.username.clone();
    state.flow.signup(form.into(), &created_by).await?;

    Ok(Redirect::to("/?msg=Signup successful. Please Login").into_response())
}
