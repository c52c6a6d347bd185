//! Bearer authentication middleware.

use crate::http_transport::HttpTransportState;
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use memgate_auth::{AuthError, CredentialContext, bearer_token};
use serde_json::json;
use std::sync::Arc;

/// Body text for a missing or malformed `Authorization` header.
pub const MISSING_TOKEN_MESSAGE: &str = "Missing or invalid access token";

/// Body text for a token that failed verification.
pub const UNAUTHENTICATED_MESSAGE: &str = "Unauthenticated";

/// Verify the bearer token and attach the caller's [`CredentialContext`].
///
/// Runs before any handler on the protected routes. Failures answer 401 and
/// the handler never runs.
pub async fn require_bearer(
    State(state): State<Arc<HttpTransportState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match bearer_token(authorization) {
        Ok(token) => token.to_string(),
        Err(_) => {
            tracing::debug!(path = %req.uri().path(), "Request without bearer token");
            return unauthorized(MISSING_TOKEN_MESSAGE);
        }
    };

    let claims = match state.verifier().verify(&token).await {
        Ok(claims) => claims,
        Err(err) => {
            match &err {
                AuthError::KeySetUnavailable(_) | AuthError::Internal(_) => {
                    tracing::error!(error = %err, "Token verification could not run");
                }
                _ => tracing::info!(error = %err, "Token rejected"),
            }
            return unauthorized(UNAUTHENTICATED_MESSAGE);
        }
    };

    let context = CredentialContext::new(token, claims);
    tracing::debug!(
        sub = context.subject(),
        client_id = ?context.client_id(),
        expires_in_secs = context.claims().time_until_expiration().map(|d| d.num_seconds()),
        "Caller authenticated"
    );
    req.extensions_mut().insert(context);

    next.run(req).await
}

fn unauthorized(message: &str) -> Response {
    let mut response = (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}
