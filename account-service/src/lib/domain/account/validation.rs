use std::str::FromStr;

/// A single violated constraint.
///
/// Reported as a {property, constraint, message} triple; one save may carry
/// any number of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub property: &'static str,
    pub constraint: &'static str,
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(
        property: &'static str,
        constraint: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            property,
            constraint,
            message: message.into(),
        }
    }
}

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 50;
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Check the profile fields of a user about to be written.
///
/// Every failing constraint is collected; nothing short-circuits. The
/// uniqueness check needs a store query, so callers append [`email_taken`]
/// themselves before reporting.
pub fn validate_profile(username: &str, email: &str) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();

    if username.is_empty() {
        violations.push(ConstraintViolation::new(
            "username",
            "IsNotEmpty",
            "username_cannot_be_empty",
        ));
    }
    let length = username.chars().count();
    if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
        violations.push(ConstraintViolation::new(
            "username",
            "Length",
            "username_must_be_between_3_and_50_characters",
        ));
    }

    if email.is_empty() {
        violations.push(ConstraintViolation::new(
            "email",
            "IsNotEmpty",
            "email_cannot_be_empty",
        ));
    }
    if email_address::EmailAddress::from_str(email).is_err() {
        violations.push(ConstraintViolation::new(
            "email",
            "IsEmail",
            "email_must_be_an_email",
        ));
    }

    violations
}

/// Check a plaintext password before it is hashed.
pub fn validate_password(password: &str) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();

    if password.is_empty() {
        violations.push(ConstraintViolation::new(
            "password",
            "IsNotEmpty",
            "password_cannot_be_empty",
        ));
    }
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        violations.push(ConstraintViolation::new(
            "password",
            "MinLength",
            "password_must_be_at_least_8_characters",
        ));
    }

    violations
}

/// Violation reported when an email already belongs to another record.
///
/// Produced both by the pre-write query and by the store's unique-index
/// rejection, so callers see one error shape whichever path fires.
pub fn email_taken() -> ConstraintViolation {
    ConstraintViolation::new("email", "IsEmailUnique", "email_must_be_unique")
}
