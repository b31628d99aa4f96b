use thiserror::Error;

use super::kind::TokenKind;

/// Error type for token operations.
///
/// Expired and invalid are distinct failures with distinct messages: a
/// validly signed token past its deadline is `Expired`, everything else a
/// verification can reject (bad structure, wrong secret, tampering) is
/// `Invalid`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("{}_expired", .0.as_str())]
    Expired(TokenKind),

    #[error("{}_invalid", .0.as_str())]
    Invalid(TokenKind),

    #[error("failed to sign {} token: {}", .0.as_str(), .1)]
    SigningFailed(TokenKind, String),
}

impl TokenError {
    /// Kind the failing operation was verifying or signing for.
    pub fn kind(&self) -> TokenKind {
        match self {
            TokenError::Expired(kind)
            | TokenError::Invalid(kind)
            | TokenError::SigningFailed(kind, _) => *kind,
        }
    }
}
