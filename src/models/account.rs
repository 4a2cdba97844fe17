use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One stored account row. The password column holds either a bcrypt digest
/// or, for rows created before the hashing migration, the raw password.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub security_question: String,
    pub security_answer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
    pub otp: Option<String>,
    pub otp_expiry: Option<DateTime<Utc>>,
}

/// Pending reset passcode. Code and expiry are set and cleared together.
#[derive(Debug, Clone, PartialEq)]
pub struct OtpChallenge {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl Account {
    /// The active OTP pair, only when both halves are present.
    pub fn otp_challenge(&self) -> Option<OtpChallenge> {
        match (&self.otp, &self.otp_expiry) {
            (Some(code), Some(expires_at)) => Some(OtpChallenge {
                code: code.clone(),
                expires_at: *expires_at,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub security_question: String,
    pub security_answer: String,
    pub created_by: String,
    pub updated_by: String,
}

/// Partial update. `None` password / security fields leave the stored
/// values untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password: Option<String>,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
    pub updated_by: String,
}

/// What the listing and edit pages see: never the password, the security
/// answer, or the OTP pair.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub security_question: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        AccountResponse {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            username: account.username,
            email: account.email,
            mobile: account.mobile,
            security_question: account.security_question,
            created_at: account.created_at,
            updated_at: account.updated_at,
            created_by: account.created_by,
            updated_by: account.updated_by,
        }
    }
}
