use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::AuthContext;
use crate::account::models::User;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn me(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Result<ApiSuccess<Option<MeData>>, ApiError> {
    state
        .account_service
        .me(&context)
        .await
        .map(|user| ApiSuccess::new(StatusCode::OK, user.as_ref().map(MeData::from)))
        .map_err(ApiError::from)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeData {
    pub username: String,
    pub email: String,
}

impl From<&User> for MeData {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}
