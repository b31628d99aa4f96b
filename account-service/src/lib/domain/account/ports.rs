use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::errors::MailerError;
use crate::account::models::AuthContext;
use crate::account::models::LoginCommand;
use crate::account::models::NewUser;
use crate::account::models::RegisterCommand;
use crate::account::models::TokenPair;
use crate::account::models::User;
use crate::account::models::UserId;

/// Port for account use-case operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Create an account from raw credential fields.
    ///
    /// # Returns
    /// Fresh access/refresh pair for the new account
    ///
    /// # Errors
    /// * `Validation` - Any violated field constraint, all reported together
    /// * `Database` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<TokenPair, AccountError>;

    /// Authenticate with email and password.
    ///
    /// # Errors
    /// * `WrongCredentials` - Unknown email or wrong password, same error
    ///   either way
    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AccountError>;

    /// Exchange a refresh token for a fresh pair.
    ///
    /// # Errors
    /// * `TokenRejected` - `refreshToken_expired` / `refreshToken_invalid`;
    ///   an unknown decoded email also rejects as invalid
    async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, AccountError>;

    /// Dispatch a password-reset notification if the email exists.
    ///
    /// # Returns
    /// The literal [`EMAIL_SENT_IF_EXIST`](crate::account::models::EMAIL_SENT_IF_EXIST)
    /// whether or not a user was found
    async fn forgot_password(&self, email: &str) -> Result<&'static str, AccountError>;

    /// Mark the token's account as confirmed.
    ///
    /// # Errors
    /// * `TokenRejected` - `confirmToken_expired` / `confirmToken_invalid`
    async fn confirm_email(&self, confirm_token: &str) -> Result<TokenPair, AccountError>;

    /// Replace the token's account password with a new plaintext.
    ///
    /// # Errors
    /// * `TokenRejected` - `forgotToken_expired` / `forgotToken_invalid`
    /// * `Validation` - New password fails the plaintext constraints
    async fn change_password(
        &self,
        forgot_token: &str,
        password: &str,
    ) -> Result<TokenPair, AccountError>;

    /// Current user of an authenticated context.
    ///
    /// # Errors
    /// * `MustBeLoggedIn` - Context is anonymous
    async fn me(&self, context: &AuthContext) -> Result<Option<User>, AccountError>;

    /// All users, for an authenticated context.
    ///
    /// # Errors
    /// * `MustBeLoggedIn` - Context is anonymous
    async fn list_users(&self, context: &AuthContext) -> Result<Vec<User>, AccountError>;

    /// Derive the per-request principal from a raw Authorization header.
    ///
    /// Absent, malformed, or mis-signed credentials resolve to an anonymous
    /// context rather than failing.
    ///
    /// # Errors
    /// * `AccessTokenExpired` - Validly signed access token past its deadline
    async fn resolve_context(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthContext, AccountError>;
}

/// Persistence operations for the credential store.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `Validation` - The unique email index rejected the insert
    /// * `Database` - Store operation failed
    async fn create(&self, user: NewUser) -> Result<User, AccountError>;

    /// Retrieve a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AccountError>;

    /// Retrieve a user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError>;

    /// Write back a modified user; bumps `updated_at`.
    ///
    /// # Errors
    /// * `Validation` - The unique email index rejected the update
    /// * `Database` - Store operation failed
    async fn update(&self, user: User) -> Result<User, AccountError>;

    /// Number of stored users.
    async fn count(&self) -> Result<i64, AccountError>;

    /// All users, oldest first.
    async fn list_all(&self) -> Result<Vec<User>, AccountError>;
}

/// Mail templates the notification sink can deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTemplate {
    ConfirmEmail,
    ForgotPassword,
}

/// Outbound notification sink.
///
/// Dispatch failures are the caller's to log; they are never surfaced to the
/// API caller.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Deliver `template` to the user's email address.
    async fn send(&self, user: &User, template: MailTemplate) -> Result<(), MailerError>;
}
