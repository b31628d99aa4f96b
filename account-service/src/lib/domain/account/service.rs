use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenCodec;
use auth::TokenError;
use auth::TokenKind;

use crate::account::errors::AccountError;
use crate::account::models::AuthContext;
use crate::account::models::CurrentUser;
use crate::account::models::LoginCommand;
use crate::account::models::NewUser;
use crate::account::models::RegisterCommand;
use crate::account::models::TokenPair;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::models::EMAIL_SENT_IF_EXIST;
use crate::account::ports::AccountServicePort;
use crate::account::ports::MailTemplate;
use crate::account::ports::Mailer;
use crate::account::ports::UserRepository;
use crate::account::validation;

/// Domain service implementation for the account use-cases.
///
/// Stateless across calls; every operation re-derives what it needs from the
/// store and the presented credentials.
pub struct AccountService<UR, M>
where
    UR: UserRepository,
    M: Mailer,
{
    repository: Arc<UR>,
    mailer: Arc<M>,
    tokens: Arc<TokenCodec>,
    password_hasher: auth::PasswordHasher,
}

impl<UR, M> AccountService<UR, M>
where
    UR: UserRepository,
    M: Mailer,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `mailer` - Notification sink implementation
    /// * `tokens` - Codec shared with whoever builds mail links
    pub fn new(repository: Arc<UR>, mailer: Arc<M>, tokens: Arc<TokenCodec>) -> Self {
        Self {
            repository,
            mailer,
            tokens,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    fn issue_pair(&self, email: &str) -> Result<TokenPair, AccountError> {
        Ok(TokenPair {
            access_token: self.tokens.issue(TokenKind::Access, email)?,
            refresh_token: self.tokens.issue(TokenKind::Refresh, email)?,
        })
    }

    /// Validation pass run before every store write. `new_password` is the
    /// plaintext when the save carries one; stored hashes are not re-checked.
    async fn validate_save(
        &self,
        username: &str,
        email: &str,
        own_id: Option<UserId>,
        new_password: Option<&str>,
    ) -> Result<(), AccountError> {
        let mut violations = validation::validate_profile(username, email);
        if let Some(password) = new_password {
            violations.extend(validation::validate_password(password));
        }

        // Fast, friendly duplicate check. The unique index in the store is
        // the authoritative one; concurrent writers that slip past this
        // query are caught there and mapped to the same violation.
        let taken = self
            .repository
            .find_by_email(email)
            .await?
            .is_some_and(|existing| Some(existing.id) != own_id);
        if taken {
            violations.push(validation::email_taken());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(AccountError::Validation(violations))
        }
    }

    async fn dispatch_mail(&self, user: &User, template: MailTemplate) {
        if let Err(e) = self.mailer.send(user, template).await {
            tracing::error!(
                "Failed to dispatch {:?} notification to {}: {}",
                template,
                user.email,
                e
            );
        }
    }
}

#[async_trait]
impl<UR, M> AccountServicePort for AccountService<UR, M>
where
    UR: UserRepository,
    M: Mailer,
{
    async fn register(&self, command: RegisterCommand) -> Result<TokenPair, AccountError> {
        self.validate_save(&command.username, &command.email, None, Some(&command.password))
            .await?;

        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = self
            .repository
            .create(NewUser {
                username: command.username,
                email: command.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "Account registered");

        self.dispatch_mail(&user, MailTemplate::ConfirmEmail).await;

        self.issue_pair(&user.email)
    }

    async fn login(&self, command: LoginCommand) -> Result<TokenPair, AccountError> {
        let user = self
            .repository
            .find_by_email(&command.email)
            .await?
            .ok_or(AccountError::WrongCredentials)?;

        let matches = self
            .password_hasher
            .verify(&command.password, &user.password_hash)?;
        if !matches {
            return Err(AccountError::WrongCredentials);
        }

        self.issue_pair(&user.email)
    }

    async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, AccountError> {
        let claims = self.tokens.verify(TokenKind::Refresh, refresh_token)?;

        let user = self
            .repository
            .find_by_email(&claims.email)
            .await?
            .ok_or(AccountError::token_invalid(TokenKind::Refresh))?;

        self.issue_pair(&user.email)
    }

    async fn forgot_password(&self, email: &str) -> Result<&'static str, AccountError> {
        if let Some(user) = self.repository.find_by_email(email).await? {
            self.dispatch_mail(&user, MailTemplate::ForgotPassword).await;
        }

        // Identical answer whether or not the email exists.
        Ok(EMAIL_SENT_IF_EXIST)
    }

    async fn confirm_email(&self, confirm_token: &str) -> Result<TokenPair, AccountError> {
        let claims = self.tokens.verify(TokenKind::Confirm, confirm_token)?;

        let mut user = self
            .repository
            .find_by_email(&claims.email)
            .await?
            .ok_or(AccountError::token_invalid(TokenKind::Confirm))?;

        self.validate_save(&user.username, &user.email, Some(user.id), None)
            .await?;

        user.confirmed = true;
        let user = self.repository.update(user).await?;

        tracing::info!(user_id = %user.id, "Email confirmed");

        self.issue_pair(&user.email)
    }

    async fn change_password(
        &self,
        forgot_token: &str,
        password: &str,
    ) -> Result<TokenPair, AccountError> {
        let claims = self.tokens.verify(TokenKind::Forgot, forgot_token)?;

        let mut user = self
            .repository
            .find_by_email(&claims.email)
            .await?
            .ok_or(AccountError::token_invalid(TokenKind::Forgot))?;

        self.validate_save(&user.username, &user.email, Some(user.id), Some(password))
            .await?;

        user.password_hash = self.password_hasher.hash(password)?;
        let user = self.repository.update(user).await?;

        tracing::info!(user_id = %user.id, "Password changed");

        self.issue_pair(&user.email)
    }

    async fn me(&self, context: &AuthContext) -> Result<Option<User>, AccountError> {
        let current = context.user.ok_or(AccountError::MustBeLoggedIn)?;
        self.repository.find_by_id(current.id).await
    }

    async fn list_users(&self, context: &AuthContext) -> Result<Vec<User>, AccountError> {
        if context.is_anonymous() {
            return Err(AccountError::MustBeLoggedIn);
        }
        self.repository.list_all().await
    }

    async fn resolve_context(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthContext, AccountError> {
        let Some(header) = authorization else {
            return Ok(AuthContext::anonymous());
        };

        let claims = match self.tokens.verify(TokenKind::Access, header) {
            Ok(claims) => claims,
            Err(TokenError::Expired(_)) => return Err(AccountError::AccessTokenExpired),
            Err(_) => return Ok(AuthContext::anonymous()),
        };

        let user = self.repository.find_by_email(&claims.email).await?;

        Ok(AuthContext {
            user: user.map(|user| CurrentUser { id: user.id }),
        })
    }
}
