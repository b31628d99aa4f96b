use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::empty_field_violations;
use super::merge_validation;
use super::ApiError;
use super::ApiSuccess;
use super::TokenPairData;
use crate::account::models::RegisterCommand;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess<TokenPairData>, ApiError> {
    let transport = empty_field_violations(&[
        ("email", body.email.as_deref()),
        ("username", body.username.as_deref()),
        ("password", body.password.as_deref()),
    ]);
    // Absent fields never reach the use-case; empty strings do, and the
    // transport entries ride along with whatever validation reports.
    if body.email.is_none() || body.username.is_none() || body.password.is_none() {
        return Err(ApiError::Validation(transport));
    }

    let command = RegisterCommand {
        email: body.email.unwrap_or_default(),
        username: body.username.unwrap_or_default(),
        password: body.password.unwrap_or_default(),
    };

    state
        .account_service
        .register(command)
        .await
        .map(|pair| ApiSuccess::new(StatusCode::CREATED, pair.into()))
        .map_err(|e| merge_validation(transport, ApiError::from(e)))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    email: Option<String>,
    username: Option<String>,
    password: Option<String>,
}
