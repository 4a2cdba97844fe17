pub mod accounts;
pub mod auth;
pub mod password_reset;
