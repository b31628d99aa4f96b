use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware deriving the per-request `AuthContext` from the Authorization
/// header and attaching it to the request extensions.
///
/// Runs on every route, whether or not the target operation needs a
/// principal. An absent, malformed, or mis-signed credential yields an
/// anonymous context; the one aborting case is a validly signed access token
/// past its deadline.
pub async fn resolve_auth_context(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let authorization = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let context = state
        .account_service
        .resolve_context(authorization)
        .await
        .map_err(|e| {
            tracing::warn!("Auth context resolution aborted the request: {}", e);
            ApiError::from(e).into_response()
        })?;

    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}
