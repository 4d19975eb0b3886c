//! Operator authentication for attestation issuance.
//!
//! Only the game operator decides winners, so the signing route requires a
//! bearer token shared with the operator. Without a configured token the
//! route refuses every request.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use std::fmt;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::handlers::AppError;
use crate::state::OracleState;

/// Shared secret presented by the operator as `Authorization: Bearer <token>`
#[derive(Clone)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Constant-time comparison against a presented token
    pub fn matches(&self, presented: &str) -> bool {
        self.0.as_bytes().ct_eq(presented.as_bytes()).into()
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiToken(<redacted>)")
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
}

/// Reject requests that do not carry the operator token
pub async fn require_operator_token(
    State(state): State<Arc<OracleState>>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_owned();

    let Some(expected) = state.api_token.as_ref() else {
        warn!("Rejected {}: ORACLE_API_TOKEN not configured", path);
        return Err(AppError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Issuance not configured",
        ));
    };

    match bearer_token(&headers) {
        Some(token) if expected.matches(token) => {
            debug!("Operator authenticated for path: {}", path);
            Ok(next.run(request).await)
        }
        Some(_) => {
            warn!("Invalid operator token for path: {}", path);
            Err(AppError::new(StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
        None => {
            warn!("Missing operator token for path: {}", path);
            Err(AppError::new(StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
    }
}
