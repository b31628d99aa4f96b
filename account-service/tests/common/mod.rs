use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::account::errors::AccountError;
use account_service::domain::account::errors::MailerError;
use account_service::domain::account::models::NewUser;
use account_service::domain::account::models::User;
use account_service::domain::account::models::UserId;
use account_service::domain::account::ports::MailTemplate;
use account_service::domain::account::ports::Mailer;
use account_service::domain::account::ports::UserRepository;
use account_service::domain::account::service::AccountService;
use account_service::domain::account::validation;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;
use auth::TokenCodec;
use auth::TokenKind;
use chrono::Utc;

pub const ACCESS_SECRET: &[u8] = b"test-access-secret-at-least-32-bytes!";
pub const REFRESH_SECRET: &[u8] = b"test-refresh-secret-at-least-32-byte!";

/// Test application that spawns a real server on a random port, wired to an
/// in-process store and a recording notification sink.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryUserRepository>,
    pub mailer: Arc<RecordingMailer>,
    pub tokens: Arc<TokenCodec>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let tokens = Arc::new(TokenCodec::new(ACCESS_SECRET, REFRESH_SECRET));
        let repository = Arc::new(InMemoryUserRepository::new());
        let mailer = Arc::new(RecordingMailer::new());

        let account_service = Arc::new(AccountService::new(
            Arc::clone(&repository),
            Arc::clone(&mailer),
            Arc::clone(&tokens),
        ));

        let router = create_router(account_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            repository,
            mailer,
            tokens,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with a raw Authorization header value.
    ///
    /// Tokens issued by the service already carry the `Bearer ` prefix, so
    /// they go on the wire verbatim.
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).header(reqwest::header::AUTHORIZATION, token)
    }

    /// Validly signed access token that expired a minute ago.
    pub fn expired_access_token(&self, email: &str) -> String {
        let claims = auth::Claims::issued_now(email, chrono::Duration::seconds(-60));
        self.tokens
            .sign(TokenKind::Access, &claims)
            .expect("Failed to sign token")
    }
}

/// In-process credential store.
///
/// Mirrors the storage contract the service relies on, including the
/// canonical unique-email rejection on both insert and update.
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, AccountError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|existing| existing.email == user.email) {
            return Err(AccountError::Validation(vec![validation::email_taken()]));
        }

        let now = Utc::now();
        let created = User {
            id: UserId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            confirmed: false,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AccountError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn update(&self, user: User) -> Result<User, AccountError> {
        let mut users = self.users.lock().unwrap();

        if users
            .iter()
            .any(|existing| existing.email == user.email && existing.id != user.id)
        {
            return Err(AccountError::Validation(vec![validation::email_taken()]));
        }

        let slot = users
            .iter_mut()
            .find(|existing| existing.id == user.id)
            .ok_or_else(|| AccountError::Unknown(format!("user {} missing during update", user.id)))?;

        let mut updated = user;
        updated.updated_at = Utc::now();
        *slot = updated.clone();

        Ok(updated)
    }

    async fn count(&self) -> Result<i64, AccountError> {
        let users = self.users.lock().unwrap();
        Ok(users.len() as i64)
    }

    async fn list_all(&self) -> Result<Vec<User>, AccountError> {
        let users = self.users.lock().unwrap();
        Ok(users.clone())
    }
}

/// Notification sink that records instead of delivering.
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, MailTemplate)>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Recorded `(recipient email, template)` dispatches, in order.
    pub fn sent(&self) -> Vec<(String, MailTemplate)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, user: &User, template: MailTemplate) -> Result<(), MailerError> {
        self.sent
            .lock()
            .unwrap()
            .push((user.email.clone(), template));
        Ok(())
    }
}
