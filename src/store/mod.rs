pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::account::{Account, AccountChanges, NewAccount, OtpChallenge};

/// Data-access contract the auth flows depend on. Every operation is atomic
/// on its own; uniqueness of username/email/mobile is enforced here, the
/// callers only pre-check to produce friendlier messages.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn create(&self, new: NewAccount) -> Result<Account>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>>;
    async fn get_by_username(&self, username: &str) -> Result<Option<Account>>;
    async fn get_by_email(&self, email: &str) -> Result<Option<Account>>;
    async fn get_by_mobile(&self, mobile: &str) -> Result<Option<Account>>;

    async fn list(&self) -> Result<Vec<Account>>;

    async fn update(&self, id: i64, changes: AccountChanges) -> Result<()>;

    /// Sets or clears the OTP pair. Code and expiry always move together.
    async fn set_otp(&self, id: i64, challenge: Option<OtpChallenge>) -> Result<()>;

    /// Returns true if the account existed and the password was replaced.
    async fn set_password(&self, id: i64, password: &str) -> Result<bool>;

    async fn delete(&self, id: i64) -> Result<()>;
}
