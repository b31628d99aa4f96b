//! Authentication utilities library
//!
//! Provides the authentication infrastructure for the account service:
//! - Password hashing (Argon2id)
//! - Signed bearer tokens in four kinds (access, refresh, confirm, forgot)
//!
//! Token kinds are not encoded in the payload: each kind maps to a signing
//! secret and a lifetime, and a token belongs to a kind only insofar as that
//! kind's secret verifies it.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::{TokenCodec, TokenKind};
//!
//! let codec = TokenCodec::new(
//!     b"access_secret_at_least_32_bytes_long!",
//!     b"refresh_secret_at_least_32_bytes_lng!",
//! );
//! let token = codec.issue(TokenKind::Refresh, "user@example.com").unwrap();
//! assert!(token.starts_with("Bearer "));
//! let claims = codec.verify(TokenKind::Refresh, &token).unwrap();
//! assert_eq!(claims.email, "user@example.com");
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::Claims;
pub use token::TokenCodec;
pub use token::TokenError;
pub use token::TokenKind;
