use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::empty_field_violations;
use super::merge_validation;
use super::ApiError;
use super::ApiSuccess;
use super::TokenPairData;
use crate::account::models::LoginCommand;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<TokenPairData>, ApiError> {
    let transport = empty_field_violations(&[
        ("email", body.email.as_deref()),
        ("password", body.password.as_deref()),
    ]);
    if body.email.is_none() || body.password.is_none() {
        return Err(ApiError::Validation(transport));
    }

    let command = LoginCommand {
        email: body.email.unwrap_or_default(),
        password: body.password.unwrap_or_default(),
    };

    state
        .account_service
        .login(command)
        .await
        .map(|pair| ApiSuccess::new(StatusCode::OK, pair.into()))
        .map_err(|e| merge_validation(transport, ApiError::from(e)))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    email: Option<String>,
    password: Option<String>,
}
