use auth::PasswordError;
use auth::TokenError;
use auth::TokenKind;
use thiserror::Error;

use crate::account::validation::ConstraintViolation;

/// Error for notification dispatch operations
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Failed to build message: {0}")]
    BuildFailed(String),

    #[error("Failed to send message: {0}")]
    SendFailed(String),

    #[error("Failed to issue link token: {0}")]
    TokenFailed(String),
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    /// One entry per violated constraint of the failing save.
    #[error("VALIDATION_ERROR")]
    Validation(Vec<ConstraintViolation>),

    /// Identity cannot be established. The message never distinguishes an
    /// unknown email from a wrong password.
    #[error("wrong_email_or_password")]
    WrongCredentials,

    /// A validly signed access token past its deadline; the only context
    /// resolution outcome that aborts the whole request.
    #[error("accessToken_expired")]
    AccessTokenExpired,

    /// Token rejected where a given kind was expected; renders as
    /// `<kind>_invalid` / `<kind>_expired`.
    #[error("{0}")]
    TokenRejected(TokenError),

    #[error("must_be_logged_in")]
    MustBeLoggedIn,

    // Infrastructure errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AccountError {
    /// Rejection for a verified token whose email matches no user. Same
    /// shape as a signature failure, so callers cannot probe for accounts
    /// with stale tokens.
    pub fn token_invalid(kind: TokenKind) -> Self {
        AccountError::TokenRejected(TokenError::Invalid(kind))
    }
}

impl From<TokenError> for AccountError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::SigningFailed(_, _) => AccountError::Unknown(err.to_string()),
            _ => AccountError::TokenRejected(err),
        }
    }
}

impl From<PasswordError> for AccountError {
    fn from(err: PasswordError) -> Self {
        AccountError::Unknown(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        AccountError::Unknown(err.to_string())
    }
}
