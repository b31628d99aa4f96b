use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::empty_field_violations;
use super::merge_validation;
use super::ApiError;
use super::ApiSuccess;
use super::TokenPairData;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn change_password(
    State(state): State<AppState>,
    Json(body): Json<ChangePasswordRequestBody>,
) -> Result<ApiSuccess<TokenPairData>, ApiError> {
    let transport = empty_field_violations(&[("password", body.password.as_deref())]);
    if body.password.is_none() {
        return Err(ApiError::Validation(transport));
    }

    state
        .account_service
        .change_password(&body.forgot_token, &body.password.unwrap_or_default())
        .await
        .map(|pair| ApiSuccess::new(StatusCode::OK, pair.into()))
        .map_err(|e| merge_validation(transport, ApiError::from(e)))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequestBody {
    password: Option<String>,
    forgot_token: String,
}
