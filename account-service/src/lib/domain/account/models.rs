use std::fmt;

use chrono::DateTime;
use chrono::Utc;

/// User unique identifier type
///
/// Monotonic integer assigned by the store at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User aggregate entity.
///
/// `password_hash` is the only form the credential is ever stored in; the
/// plaintext exists solely in transit through a validation/hash pass.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload: validated profile fields plus an already-hashed password.
///
/// Id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Access/refresh pair returned by every credential-issuing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Command to register a new account with raw credential fields.
#[derive(Debug)]
pub struct RegisterCommand {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Command to authenticate with email and password.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Literal returned by forgot-password whether or not the email exists.
pub const EMAIL_SENT_IF_EXIST: &str = "email_sent_if_exist";

/// Per-request principal.
///
/// Constructed once from the Authorization header when the request arrives
/// and never mutated afterwards; a fresh value is derived for every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthContext {
    pub user: Option<CurrentUser>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
}

impl AuthContext {
    /// Context with no established principal.
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    /// Context for a known user.
    pub fn authenticated(id: UserId) -> Self {
        Self {
            user: Some(CurrentUser { id }),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user.is_none()
    }
}
