use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;

use crate::errors::Result;
use crate::services::auth_flow::{ResetOption, ResetStage};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub option: ResetOption,
    pub identifier: String,
    pub security_question: String,
    pub security_answer: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyOtpForm {
    pub option: ResetOption,
    pub identifier: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub option: ResetOption,
    pub identifier: String,
    pub new_password: String,
    pub confirm_password: String,
}

// Identify step: security check, then OTP issuance.
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Result<Response> {
    let step = state
        .flow
        .start_reset(
            form.option,
            &form.identifier,
            &form.security_question,
            &form.security_answer,
        )
        .await?;
    Ok(Json(step).into_response())
}

// Reached by navigating directly; the flow always starts at identify.
pub async fn get_verify_otp() -> Redirect {
    Redirect::to("/forgot-password")
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Form(form): Form<VerifyOtpForm>,
) -> Result<Response> {
    let step = state
        .flow
        .verify_otp(form.option, &form.identifier, &form.otp)
        .await?;
    Ok(Json(step).into_response())
}

pub async fn reset_password(
    State(state): State<AppState>,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response> {
    let step = state
        .flow
        .complete_reset(
            form.option,
            &form.identifier,
            &form.new_password,
            &form.confirm_password,
        )
        .await?;

    if step.stage == ResetStage::Complete {
        return Ok(Redirect::to("/?msg=Password reset successful").into_response());
    }
    Ok(Json(step).into_response())
}
