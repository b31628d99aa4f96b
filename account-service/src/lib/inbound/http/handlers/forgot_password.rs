use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::empty_field_violations;
use super::ApiError;
use super::ApiSuccess;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequestBody>,
) -> Result<ApiSuccess<&'static str>, ApiError> {
    if body.email.is_none() {
        return Err(ApiError::Validation(empty_field_violations(&[(
            "email", None,
        )])));
    }

    // An empty or unknown email still gets the literal answer.
    state
        .account_service
        .forgot_password(&body.email.unwrap_or_default())
        .await
        .map(|answer| ApiSuccess::new(StatusCode::OK, answer))
        .map_err(ApiError::from)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForgotPasswordRequestBody {
    email: Option<String>,
}
