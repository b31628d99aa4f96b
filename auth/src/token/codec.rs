use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;
use super::kind::TokenKind;

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Signs and verifies the four token kinds.
///
/// Uses HS256 with two secrets: access, confirm, and forgot tokens share the
/// access secret; refresh tokens use the refresh secret. Tokens are issued
/// and accepted in the wire form `"Bearer <jwt>"`.
///
/// # Security Notes
/// - Secrets should be at least 256 bits (32 bytes) for HS256
/// - Store secrets in environment variables or secure vaults, never in code
pub struct TokenCodec {
    access_keys: KeyPair,
    refresh_keys: KeyPair,
    access_ttl: Duration,
    refresh_ttl: Duration,
    link_ttl: Duration,
    algorithm: Algorithm,
}

impl TokenCodec {
    pub const DEFAULT_ACCESS_TTL_SECS: i64 = 30;
    pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;
    pub const DEFAULT_LINK_TTL_SECS: i64 = 7 * 24 * 60 * 60;

    /// Create a codec with the default lifetimes: access 30 seconds,
    /// refresh 7 days, confirm/forgot 7 days.
    ///
    /// # Arguments
    /// * `access_secret` - Secret signing access, confirm, and forgot tokens
    /// * `refresh_secret` - Secret signing refresh tokens
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self::with_lifetimes(
            access_secret,
            refresh_secret,
            Duration::seconds(Self::DEFAULT_ACCESS_TTL_SECS),
            Duration::seconds(Self::DEFAULT_REFRESH_TTL_SECS),
            Duration::seconds(Self::DEFAULT_LINK_TTL_SECS),
        )
    }

    /// Create a codec with explicit lifetimes.
    ///
    /// `link_ttl` covers both the confirm and forgot kinds.
    pub fn with_lifetimes(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl: Duration,
        refresh_ttl: Duration,
        link_ttl: Duration,
    ) -> Self {
        Self {
            access_keys: KeyPair::from_secret(access_secret),
            refresh_keys: KeyPair::from_secret(refresh_secret),
            access_ttl,
            refresh_ttl,
            link_ttl,
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue a signed `"Bearer <jwt>"` token of `kind` asserting `email`.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn issue(&self, kind: TokenKind, email: &str) -> Result<String, TokenError> {
        let claims = Claims::issued_now(email, self.lifetime(kind));
        self.sign(kind, &claims)
    }

    /// Sign prebuilt claims as `kind`.
    ///
    /// `issue` is the normal entry point; this exists for callers that need
    /// control over the timestamps.
    pub fn sign(&self, kind: TokenKind, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.keys(kind).encoding)
            .map(|token| format!("Bearer {token}"))
            .map_err(|e| TokenError::SigningFailed(kind, e.to_string()))
    }

    /// Verify a `"Bearer <jwt>"` token as `kind` and return its claims.
    ///
    /// The part after the first space is checked against the kind's secret
    /// with zero leeway.
    ///
    /// # Errors
    /// * `Expired` - Signature is good but `exp` has passed
    /// * `Invalid` - Missing signature part, bad structure, or wrong secret
    pub fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, TokenError> {
        let raw = token.split(' ').nth(1).ok_or(TokenError::Invalid(kind))?;

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        decode::<Claims>(raw, &self.keys(kind).decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired(kind),
                _ => TokenError::Invalid(kind),
            })
    }

    // Access, confirm, and forgot share one secret: a confirm token verifies
    // wherever a forgot token is accepted, and vice versa.
    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access | TokenKind::Confirm | TokenKind::Forgot => &self.access_keys,
            TokenKind::Refresh => &self.refresh_keys,
        }
    }

    fn lifetime(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
            TokenKind::Confirm | TokenKind::Forgot => self.link_ttl,
        }
    }
}
