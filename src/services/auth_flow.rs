use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};
use crate::models::account::{Account, AccountChanges, NewAccount, OtpChallenge};
use crate::services::mailer::Notifier;
use crate::services::password::{hash_password, Credential};
use crate::services::token::TokenService;
use crate::store::AccountStore;

/// How long an issued OTP stays valid.
pub const OTP_EXPIRE_MINUTES: i64 = 3;

pub const MSG_USER_NOT_FOUND: &str = "User not found";
pub const MSG_SECURITY_CHECK_FAILED: &str = "Security check failed";
pub const MSG_OTP_SEND_FAILED: &str = "Failed to send OTP email";
pub const MSG_INVALID_OTP: &str = "Invalid OTP";
pub const MSG_OTP_EXPIRED: &str = "OTP has expired";
pub const MSG_PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const MSG_INVALID_CREDENTIALS: &str = "Invalid username or password!";

/// How a reset request identifies the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetOption {
    Email,
    Mobile,
}

/// The password-reset journey. Client-driven: nothing but the OTP pair is
/// persisted between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetStage {
    Identify,
    Verify,
    Reset,
    Complete,
}

/// The outcome of one reset step: where the client goes next, an optional
/// form-bound error, and the fields the next form re-renders with.
#[derive(Debug, Serialize, PartialEq)]
pub struct FlowStep {
    pub stage: ResetStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub option: ResetOption,
    pub identifier: String,
}

impl FlowStep {
    fn advance(stage: ResetStage, option: ResetOption, identifier: String) -> Self {
        FlowStep {
            stage,
            error: None,
            option,
            identifier,
        }
    }

    fn deny(stage: ResetStage, error: &'static str, option: ResetOption, identifier: String) -> Self {
        FlowStep {
            stage,
            error: Some(error),
            option,
            identifier,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub security_question: String,
    pub security_answer: String,
}

#[derive(Debug, Clone)]
pub struct UpdateInput {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password: Option<String>,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
}

/// 6-digit numeric code, uniform over the full 6-digit range.
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    rng.gen_range(100_000..=999_999).to_string()
}

/// Orchestrates login, signup, account maintenance, and the
/// forgot-password / OTP / reset state machine over the injected
/// store, notifier, and token issuer.
#[derive(Clone)]
pub struct AuthFlow {
    store: Arc<dyn AccountStore>,
    notifier: Arc<dyn Notifier>,
    tokens: TokenService,
}

impl AuthFlow {
    pub fn new(store: Arc<dyn AccountStore>, notifier: Arc<dyn Notifier>, tokens: TokenService) -> Self {
        Self {
            store,
            notifier,
            tokens,
        }
    }

    /// Trims the identifier and lower-cases it for email lookups. Mobile
    /// numbers are compared as-is.
    async fn resolve(&self, option: ResetOption, identifier: &str) -> Result<(String, Option<Account>)> {
        let identifier = identifier.trim();
        match option {
            ResetOption::Email => {
                let identifier = identifier.to_lowercase();
                let account = self.store.get_by_email(&identifier).await?;
                Ok((identifier, account))
            }
            ResetOption::Mobile => {
                let account = self.store.get_by_mobile(identifier).await?;
                Ok((identifier.to_string(), account))
            }
        }
    }

    // --- Login / session ---

    /// `Ok(None)` covers both unknown username and wrong password; the
    /// caller shows a single combined message.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<(Account, String)>> {
        let Some(account) = self.store.get_by_username(username).await? else {
            return Ok(None);
        };

        if !Credential::from_stored(&account.password).verify(password) {
            return Ok(None);
        }

        let token = self.tokens.issue(&account.username)?;
        Ok(Some((account, token)))
    }

    /// Resolves the bearer of a session token. Any invalidity means
    /// anonymous, never an error.
    pub async fn current_user(&self, token: &str) -> Result<Option<Account>> {
        let Some(claims) = self.tokens.verify(token) else {
            return Ok(None);
        };
        self.store.get_by_username(&claims.sub).await
    }

    // --- Signup / account maintenance ---

    /// Creates an account after per-field uniqueness checks. `created_by`
    /// is the new username for self-signup, the acting user otherwise.
    pub async fn signup(&self, input: SignupInput, created_by: &str) -> Result<Account> {
        if self.store.get_by_username(&input.username).await?.is_some() {
            return Err(AppError::Duplicate("Username"));
        }
        if self.store.get_by_email(&input.email).await?.is_some() {
            return Err(AppError::Duplicate("Email"));
        }
        if self.store.get_by_mobile(&input.mobile).await?.is_some() {
            return Err(AppError::Duplicate("Mobile number"));
        }

        let password = hash_password(&input.password)?;
        let account = self
            .store
            .create(NewAccount {
                first_name: input.first_name,
                last_name: input.last_name,
                username: input.username,
                email: input.email,
                mobile: input.mobile,
                password,
                security_question: input.security_question,
                security_answer: input.security_answer,
                created_by: created_by.to_string(),
                updated_by: created_by.to_string(),
            })
            .await?;

        tracing::info!("account {} created by {}", account.username, created_by);
        Ok(account)
    }

    /// Partial update: absent password / security fields keep their stored
    /// values, and uniqueness checks ignore the account's own values.
    pub async fn update_account(&self, id: i64, input: UpdateInput, updated_by: &str) -> Result<()> {
        let existing = self.store.get_by_id(id).await?.ok_or(AppError::NotFound)?;

        if input.username != existing.username
            && self.store.get_by_username(&input.username).await?.is_some()
        {
            return Err(AppError::Duplicate("Username"));
        }
        if input.email != existing.email && self.store.get_by_email(&input.email).await?.is_some() {
            return Err(AppError::Duplicate("Email"));
        }
        if input.mobile != existing.mobile
            && self.store.get_by_mobile(&input.mobile).await?.is_some()
        {
            return Err(AppError::Duplicate("Mobile number"));
        }

        let password = match input.password {
            Some(plaintext) => Some(hash_password(&plaintext)?),
            None => None,
        };

        self.store
            .update(
                id,
                AccountChanges {
                    first_name: input.first_name,
                    last_name: input.last_name,
                    username: input.username,
                    email: input.email,
                    mobile: input.mobile,
                    password,
                    security_question: input.security_question,
                    security_answer: input.security_answer,
                    updated_by: updated_by.to_string(),
                },
            )
            .await
    }

    // --- Password-reset state machine ---

    /// Identify step: security question/answer must match exactly, then a
    /// fresh OTP is stored and emailed.
    pub async fn start_reset(
        &self,
        option: ResetOption,
        identifier: &str,
        security_question: &str,
        security_answer: &str,
    ) -> Result<FlowStep> {
        let (identifier, account) = self.resolve(option, identifier).await?;

        let Some(account) = account else {
            return Ok(FlowStep::deny(ResetStage::Identify, MSG_USER_NOT_FOUND, option, identifier));
        };

        if account.security_question != security_question
            || account.security_answer != security_answer
        {
            return Ok(FlowStep::deny(
                ResetStage::Identify,
                MSG_SECURITY_CHECK_FAILED,
                option,
                identifier,
            ));
        }

        let code = generate_otp();
        let challenge = OtpChallenge {
            code: code.clone(),
            expires_at: Utc::now() + Duration::minutes(OTP_EXPIRE_MINUTES),
        };
        self.store.set_otp(account.id, Some(challenge)).await?;

        let body = format!("Your OTP is: {}", code);
        if let Err(err) = self
            .notifier
            .send(&account.email, "Your OTP for Password Reset", &body)
            .await
        {
            // The stored OTP ages out on its own; a retry re-issues it.
            tracing::error!("OTP delivery to {} failed: {}", account.email, err);
            return Ok(FlowStep::deny(
                ResetStage::Identify,
                MSG_OTP_SEND_FAILED,
                option,
                identifier,
            ));
        }

        Ok(FlowStep::advance(ResetStage::Verify, option, identifier))
    }

    /// Verify step: exact match on the trimmed code, lazy expiry check.
    /// The stored pair is cleared on success and on expiry, never on a
    /// plain mismatch.
    pub async fn verify_otp(&self, option: ResetOption, identifier: &str, otp: &str) -> Result<FlowStep> {
        let (identifier, account) = self.resolve(option, identifier).await?;
        let otp = otp.trim();

        let challenge = account.as_ref().and_then(|a| a.otp_challenge());
        let (account, challenge) = match (account, challenge) {
            (Some(account), Some(challenge)) if challenge.code == otp => (account, challenge),
            _ => {
                return Ok(FlowStep::deny(ResetStage::Verify, MSG_INVALID_OTP, option, identifier));
            }
        };

        if Utc::now() > challenge.expires_at {
            self.store.set_otp(account.id, None).await?;
            return Ok(FlowStep::deny(ResetStage::Identify, MSG_OTP_EXPIRED, option, identifier));
        }

        self.store.set_otp(account.id, None).await?;
        Ok(FlowStep::advance(ResetStage::Reset, option, identifier))
    }

    /// Reset step: terminal on success.
    pub async fn complete_reset(
        &self,
        option: ResetOption,
        identifier: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<FlowStep> {
        if new_password != confirm_password {
            return Ok(FlowStep::deny(
                ResetStage::Reset,
                MSG_PASSWORDS_DO_NOT_MATCH,
                option,
                identifier.trim().to_string(),
            ));
        }

        let (identifier, account) = self.resolve(option, identifier).await?;
        let Some(account) = account else {
            return Ok(FlowStep::deny(ResetStage::Identify, MSG_USER_NOT_FOUND, option, identifier));
        };

        let digest = hash_password(new_password)?;
        if !self.store.set_password(account.id, &digest).await? {
            return Ok(FlowStep::deny(ResetStage::Identify, MSG_USER_NOT_FOUND, option, identifier));
        }

        tracing::info!("password reset completed for {}", account.username);
        Ok(FlowStep::advance(ResetStage::Complete, option, identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_is_six_digits_in_range() {
        for _ in 0..200 {
            let code = generate_otp();
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }
}
