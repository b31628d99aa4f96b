use std::fmt;

/// Token kind.
///
/// Determines which secret signs the token and how long it lives. The kind
/// is never embedded in the payload, so interchangeability between kinds is
/// governed entirely by the secret mapping in the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived API credential.
    Access,
    /// Long-lived credential exchanged for fresh pairs.
    Refresh,
    /// Emailed link token for confirming an address.
    Confirm,
    /// Emailed link token for resetting a password.
    Forgot,
}

impl TokenKind {
    /// Wire name used in error messages (`accessToken_expired`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "accessToken",
            TokenKind::Refresh => "refreshToken",
            TokenKind::Confirm => "confirmToken",
            TokenKind::Forgot => "forgotToken",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
