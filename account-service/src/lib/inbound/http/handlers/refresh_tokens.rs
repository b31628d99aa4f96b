use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::TokenPairData;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn refresh_tokens(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokensRequestBody>,
) -> Result<ApiSuccess<TokenPairData>, ApiError> {
    state
        .account_service
        .refresh_tokens(&body.refresh_token)
        .await
        .map(|pair| ApiSuccess::new(StatusCode::OK, pair.into()))
        .map_err(ApiError::from)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokensRequestBody {
    refresh_token: String,
}
