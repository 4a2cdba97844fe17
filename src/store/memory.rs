use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::{AppError, Result};
use crate::models::account::{Account, AccountChanges, NewAccount, OtpChallenge};
use crate::store::AccountStore;

/// In-process store with the same contract as Postgres, including the
/// uniqueness checks. Backs the test suite and local experiments.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    accounts: Vec<Account>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_unique(accounts: &[Account], new: &NewAccount) -> Result<()> {
    if accounts.iter().any(|a| a.username == new.username) {
        return Err(AppError::Duplicate("Username"));
    }
    if accounts.iter().any(|a| a.email == new.email) {
        return Err(AppError::Duplicate("Email"));
    }
    if accounts.iter().any(|a| a.mobile == new.mobile) {
        return Err(AppError::Duplicate("Mobile number"));
    }
    Ok(())
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create(&self, new: NewAccount) -> Result<Account> {
        let mut inner = self.inner.lock().unwrap();
        check_unique(&inner.accounts, &new)?;

        inner.next_id += 1;
        let now = Utc::now();
        let account = Account {
            id: inner.next_id,
            first_name: new.first_name,
            last_name: new.last_name,
            username: new.username,
            email: new.email,
            mobile: new.mobile,
            password: new.password,
            security_question: new.security_question,
            security_answer: new.security_answer,
            created_at: now,
            updated_at: now,
            created_by: new.created_by,
            updated_by: new.updated_by,
            otp: None,
            otp_expiry: None,
        };
        inner.accounts.push(account.clone());
        Ok(account)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn get_by_mobile(&self, mobile: &str) -> Result<Option<Account>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.accounts.iter().find(|a| a.mobile == mobile).cloned())
    }

    async fn list(&self) -> Result<Vec<Account>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.accounts.clone())
    }

    async fn update(&self, id: i64, changes: AccountChanges) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();

        if inner
            .accounts
            .iter()
            .any(|a| a.id != id && a.username == changes.username)
        {
            return Err(AppError::Duplicate("Username"));
        }
        if inner
            .accounts
            .iter()
            .any(|a| a.id != id && a.email == changes.email)
        {
            return Err(AppError::Duplicate("Email"));
        }
        if inner
            .accounts
            .iter()
            .any(|a| a.id != id && a.mobile == changes.mobile)
        {
            return Err(AppError::Duplicate("Mobile number"));
        }

        if let Some(account) = inner.accounts.iter_mut().find(|a| a.id == id) {
            account.first_name = changes.first_name;
            account.last_name = changes.last_name;
            account.username = changes.username;
            account.email = changes.email;
            account.mobile = changes.mobile;
            if let Some(password) = changes.password {
                account.password = password;
            }
            if let Some(question) = changes.security_question {
                account.security_question = question;
            }
            if let Some(answer) = changes.security_answer {
                account.security_answer = answer;
            }
            account.updated_at = Utc::now();
            account.updated_by = changes.updated_by;
        }
        Ok(())
    }

    async fn set_otp(&self, id: i64, challenge: Option<OtpChallenge>) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(account) = inner.accounts.iter_mut().find(|a| a.id == id) {
            match challenge {
                Some(c) => {
                    account.otp = Some(c.code);
                    account.otp_expiry = Some(c.expires_at);
                }
                None => {
                    account.otp = None;
                    account.otp_expiry = None;
                }
            }
            account.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_password(&self, id: i64, password: &str) -> Result<bool> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(account) = inner.accounts.iter_mut().find(|a| a.id == id) {
            account.password = password.to_string();
            account.updated_at = Utc::now();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.accounts.retain(|a| a.id != id);
        Ok(())
    }
}
