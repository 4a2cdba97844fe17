use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::handlers::auth::SignupForm;
use crate::middleware::auth::MaybeUser;
use crate::models::account::AccountResponse;
use crate::services::auth_flow::UpdateInput;
use crate::services::validation::{
    check_password_strength, first_message, MOBILE_RE, NAME_RE, USERNAME_RE,
};
use crate::state::AppState;

const LOGIN_REDIRECT: &str = "/?msg=You need to login first";

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateForm {
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
    pub password: Option<String>,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
}

/// Form fields arrive as empty strings when left blank; blank means
/// "keep the stored value".
fn provided(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.trim().is_empty())
}

// Listing for the home page.
pub async fn list_accounts(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Response> {
    if user.is_none() {
        return Ok(Redirect::to(LOGIN_REDIRECT).into_response());
    }

    let accounts = state.store.list().await?;
    let accounts: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();
    Ok(Json(accounts).into_response())
}

// Admin-style create: same rules as signup, but attributed to the actor.
pub async fn add_account(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let Some(current) = user else {
        return Ok(Redirect::to(LOGIN_REDIRECT).into_response());
    };

    if let Err(errors) = form.validate() {
        return Err(AppError::Validation(first_message(&errors)));
    }
    if let Err(msg) = check_password_strength(&form.password) {
        return Err(AppError::validation(msg));
    }

    state.flow.signup(form.into(), &current.username).await?;
    Ok(Redirect::to("/home?msg=User added successfully").into_response())
}

// Prefill data for the edit form.
pub async fn get_account(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i64>,
) -> Result<Response> {
    if user.is_none() {
        return Ok(Redirect::to(LOGIN_REDIRECT).into_response());
    }

    let account = state.store.get_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(AccountResponse::from(account)).into_response())
}

pub async fn update_account(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i64>,
    Form(form): Form<UpdateForm>,
) -> Result<Response> {
    let Some(current) = user else {
        return Ok(Redirect::to(LOGIN_REDIRECT).into_response());
    };

    if let Err(errors) = form.validate() {
        return Err(AppError::Validation(first_message(&errors)));
    }

    let password = provided(form.password);
    if let Some(ref password) = password {
        if let Err(msg) = check_password_strength(password) {
            return Err(AppError::validation(msg));
        }
    }

    let input = UpdateInput {
        first_name: form.first_name,
        last_name: form.last_name,
        username: form.username,
        email: form.email,
        mobile: form.mobile,
        password,
        security_question: provided(form.security_question),
        security_answer: provided(form.security_answer),
    };

    state.flow.update_account(id, input, &current.username).await?;
    Ok(Redirect::to("/home?msg=User updated successfully").into_response())
}

pub async fn delete_account(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<i64>,
) -> Result<Response> {
    if user.is_none() {
        return Ok(Redirect::to(LOGIN_REDIRECT).into_response());
    }

    state.store.delete(id).await?;
    Ok(Redirect::to("/home?msg=User deleted successfully").into_response())
}
