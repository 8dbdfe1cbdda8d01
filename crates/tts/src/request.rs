use axum::{
    body::Body,
    extract::FromRequest,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::error::{NativeApiError, OpenAiApiError, TtsError};

/// Body limit for synthesis requests (1 MiB)
pub const BODY_LIMIT_BYTES: usize = 1 << 20;

/// JSON body on the native surface, rejected as `{"error": "..."}`
pub struct NativeJson<T>(pub T);

/// JSON body on the `OpenAI` surface, rejected as an `OpenAI` error object
pub struct OpenAiJson<T>(pub T);

impl<S, T: DeserializeOwned> FromRequest<S> for NativeJson<T>
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        read_json(request)
            .await
            .map(Self)
            .map_err(|e| NativeApiError(e).into_response())
    }
}

impl<S, T: DeserializeOwned> FromRequest<S> for OpenAiJson<T>
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: http::Request<Body>, _state: &S) -> Result<Self, Self::Rejection> {
        read_json(request)
            .await
            .map(Self)
            .map_err(|e| OpenAiApiError(e).into_response())
    }
}

/// `application/json`, with or without parameters such as `charset`
fn is_json(value: &http::HeaderValue) -> bool {
    value
        .to_str()
        .ok()
        .and_then(|v| v.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

async fn read_json<T: DeserializeOwned>(request: http::Request<Body>) -> Result<T, TtsError> {
    let (parts, body) = request.into_parts();

    if !parts.headers.get(http::header::CONTENT_TYPE).is_some_and(is_json) {
        return Err(TtsError::UnsupportedMediaType);
    }

    let bytes = axum::body::to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
        if std::error::Error::source(&err).is_some_and(|source| source.is::<http_body_util::LengthLimitError>()) {
            TtsError::PayloadTooLarge(BODY_LIMIT_BYTES)
        } else {
            TtsError::InvalidBody(format!("Failed to read request body: {err}"))
        }
    })?;

    serde_json::from_slice::<T>(&bytes).map_err(|e| {
        tracing::debug!("rejected request body: {e}");
        TtsError::InvalidBody(format!("Failed to parse request body: {e}"))
    })
}
