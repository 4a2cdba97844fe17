use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::errors::{AppError, Result};
use crate::models::account::{Account, AccountChanges, NewAccount, OtpChallenge};
use crate::store::AccountStore;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id BIGSERIAL PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    mobile TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    security_question TEXT NOT NULL,
    security_answer TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    created_by TEXT NOT NULL,
    updated_by TEXT NOT NULL,
    otp TEXT,
    otp_expiry TIMESTAMPTZ
)
"#;

#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    /// Connects and creates the accounts table if it is not present.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        sqlx::query(SCHEMA).execute(&pool).await?;
        tracing::info!("Connected to Postgres, accounts table ready");

        Ok(Self { pool })
    }

    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique-constraint violation onto the offending field.
fn duplicate_field(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            let constraint = db.constraint().unwrap_or_default();
            let field = if constraint.contains("username") {
                "Username"
            } else if constraint.contains("email") {
                "Email"
            } else if constraint.contains("mobile") {
                "Mobile number"
            } else {
                "Account"
            };
            return AppError::Duplicate(field);
        }
    }
    AppError::Database(err)
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create(&self, new: NewAccount) -> Result<Account> {
        let now = Utc::now();
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts
                (first_name, last_name, username, email, mobile, password,
                 security_question, security_answer,
                 created_at, updated_at, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.mobile)
        .bind(&new.password)
        .bind(&new.security_question)
        .bind(&new.security_answer)
        .bind(now)
        .bind(now)
        .bind(&new.created_by)
        .bind(&new.updated_by)
        .fetch_one(&self.pool)
        .await
        .map_err(duplicate_field)?;

        Ok(account)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn get_by_mobile(&self, mobile: &str) -> Result<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE mobile = $1")
            .bind(mobile)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn list(&self) -> Result<Vec<Account>> {
        let accounts = sqlx::query_as::<_, Account>("SELECT * FROM accounts ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(accounts)
    }

    async fn update(&self, id: i64, changes: AccountChanges) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                first_name = $2,
                last_name = $3,
                username = $4,
                email = $5,
                mobile = $6,
                password = COALESCE($7, password),
                security_question = COALESCE($8, security_question),
                security_answer = COALESCE($9, security_answer),
                updated_at = $10,
                updated_by = $11
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.mobile)
        .bind(&changes.password)
        .bind(&changes.security_question)
        .bind(&changes.security_answer)
        .bind(Utc::now())
        .bind(&changes.updated_by)
        .execute(&self.pool)
        .await
        .map_err(duplicate_field)?;

        Ok(())
    }

    async fn set_otp(&self, id: i64, challenge: Option<OtpChallenge>) -> Result<()> {
        let (code, expires_at) = match challenge {
            Some(c) => (Some(c.code), Some(c.expires_at)),
            None => (None, None),
        };

        // Single statement keeps the pair consistent.
        sqlx::query("UPDATE accounts SET otp = $2, otp_expiry = $3, updated_at = $4 WHERE id = $1")
            .bind(id)
            .bind(code)
            .bind(expires_at)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_password(&self, id: i64, password: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE accounts SET password = $2, updated_at = $3 WHERE id = $1")
                .bind(id)
                .bind(password)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
