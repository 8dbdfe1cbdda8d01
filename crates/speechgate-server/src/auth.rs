use std::sync::Arc;

use axum::{
    Json,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{HeaderValue, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Decides whether a bearer token grants access
pub trait TokenValidator: Send + Sync {
    fn is_valid(&self, token: &str) -> bool;
}

/// Accepts exactly the configured shared secret
///
/// Only SHA-256 digests are kept and compared, so the comparison takes the
/// same time whatever the length of the presented token.
pub struct SharedSecretValidator {
    digest: [u8; 32],
}

impl SharedSecretValidator {
    pub fn new(secret: &SecretString) -> Self {
        Self {
            digest: Sha256::digest(secret.expose_secret().as_bytes()).into(),
        }
    }
}

impl TokenValidator for SharedSecretValidator {
    fn is_valid(&self, token: &str) -> bool {
        let presented: [u8; 32] = Sha256::digest(token.as_bytes()).into();

        presented
            .iter()
            .zip(self.digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

/// Why a request was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("Authorization header is required")]
    MissingHeader,
    #[error("Invalid Authorization header format")]
    MalformedHeader,
    #[error("Invalid token")]
    InvalidToken,
}

impl AuthFailure {
    const fn reason(self) -> &'static str {
        match self {
            Self::MissingHeader => "missing_header",
            Self::MalformedHeader => "malformed_header",
            Self::InvalidToken => "invalid_token",
        }
    }
}

impl IntoResponse for AuthFailure {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Extract the token from an `Authorization` value of the form `Bearer <token>`
///
/// The value must split on single spaces into exactly two parts, the first
/// being `bearer` in any case.
pub fn parse_bearer(value: Option<&HeaderValue>) -> Result<&str, AuthFailure> {
    let value = match value {
        None => return Err(AuthFailure::MissingHeader),
        Some(value) if value.is_empty() => return Err(AuthFailure::MissingHeader),
        Some(value) => value.to_str().map_err(|_| AuthFailure::MalformedHeader)?,
    };

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthFailure::MalformedHeader),
    }
}

fn authorize(validator: &dyn TokenValidator, value: Option<&HeaderValue>) -> Result<(), AuthFailure> {
    let token = parse_bearer(value)?;

    if validator.is_valid(token) {
        Ok(())
    } else {
        Err(AuthFailure::InvalidToken)
    }
}

/// Reject the request with 401 unless it carries a valid bearer token
///
/// Nothing behind this layer runs for a rejected request.
pub async fn auth_middleware(validator: Arc<dyn TokenValidator>, request: Request, next: Next) -> Response {
    match authorize(validator.as_ref(), request.headers().get(http::header::AUTHORIZATION)) {
        Ok(()) => next.run(request).await,
        Err(failure) => {
            tracing::warn!(
                reason = failure.reason(),
                path = %request.uri().path(),
                "request rejected by bearer authentication"
            );
            failure.into_response()
        }
    }
}
