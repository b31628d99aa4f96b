use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::account::errors::AccountError;
use crate::account::models::TokenPair;
use crate::account::validation::ConstraintViolation;

pub mod change_password;
pub mod confirm_email;
pub mod forgot_password;
pub mod list_users;
pub mod login;
pub mod me;
pub mod refresh_tokens;
pub mod register;

/// Successful envelope: `{"data": ...}`.
#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody {
                data: Some(data),
                errors: None,
            }),
        )
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Response envelope. `data` always serializes; on any error it is nulled
/// entirely so no partial state rides alongside the error entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ApiErrorEntry>>,
}

/// One reported error cause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorEntry {
    pub message: String,
    pub extensions: ErrorExtensions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorExtensions {
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl ApiErrorEntry {
    fn plain(code: &'static str, message: String) -> Self {
        Self {
            message,
            extensions: ErrorExtensions {
                code,
                constraint: None,
                property: None,
            },
        }
    }

    fn from_violation(violation: ConstraintViolation) -> Self {
        Self {
            message: violation.message,
            extensions: ErrorExtensions {
                code: BAD_USER_INPUT,
                constraint: Some(violation.constraint.to_string()),
                property: Some(violation.property.to_string()),
            },
        }
    }
}

const BAD_USER_INPUT: &str = "BAD_USER_INPUT";
const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
const FORBIDDEN: &str = "FORBIDDEN";
const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

/// Error classes of the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Validation(Vec<ConstraintViolation>),
    Unauthenticated(String),
    Forbidden(String),
    InternalServerError(String),
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(violations) => ApiError::Validation(violations),
            err @ (AccountError::WrongCredentials | AccountError::AccessTokenExpired) => {
                ApiError::Unauthenticated(err.to_string())
            }
            err @ (AccountError::TokenRejected(_) | AccountError::MustBeLoggedIn) => {
                ApiError::Forbidden(err.to_string())
            }
            err @ (AccountError::Database(_) | AccountError::Unknown(_)) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, entries) = match self {
            ApiError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                violations
                    .into_iter()
                    .map(ApiErrorEntry::from_violation)
                    .collect(),
            ),
            ApiError::Unauthenticated(message) => (
                StatusCode::UNAUTHORIZED,
                vec![ApiErrorEntry::plain(UNAUTHENTICATED, message)],
            ),
            ApiError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                vec![ApiErrorEntry::plain(FORBIDDEN, message)],
            ),
            ApiError::InternalServerError(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                vec![ApiErrorEntry::plain(INTERNAL_SERVER_ERROR, message)],
            ),
        };

        let body: ApiResponseBody<Value> = ApiResponseBody {
            data: None,
            errors: Some(entries),
        };

        (status, Json(body)).into_response()
    }
}

/// Access/refresh pair as it goes over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairData {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenPairData {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

pub(crate) const FIELD_CANNOT_BE_EMPTY: &str = "field_cannot_be_empty";

/// Transport-level guard for required credential fields.
///
/// Absent or empty values surface as `<field>_cannot_be_empty`, distinct
/// from the entity validator's `IsNotEmpty` entries; for an empty string
/// both can appear on the same response.
pub(crate) fn empty_field_violations(
    fields: &[(&'static str, Option<&str>)],
) -> Vec<ConstraintViolation> {
    fields
        .iter()
        .filter(|(_, value)| value.map_or(true, |v| v.is_empty()))
        .map(|&(name, _)| {
            ConstraintViolation::new(name, FIELD_CANNOT_BE_EMPTY, format!("{name}_cannot_be_empty"))
        })
        .collect()
}

/// Merge transport violations into a use-case validation failure. Non-
/// validation errors pass through untouched, so an empty-but-present field
/// never changes the class of error the operation itself reports.
pub(crate) fn merge_validation(transport: Vec<ConstraintViolation>, err: ApiError) -> ApiError {
    if transport.is_empty() {
        return err;
    }
    match err {
        ApiError::Validation(violations) => {
            let mut all = transport;
            all.extend(violations);
            ApiError::Validation(all)
        }
        other => other,
    }
}
