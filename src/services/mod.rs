pub mod auth_flow;
pub mod mailer;
pub mod password;
pub mod token;
pub mod validation;
