use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use speechgate_core::HttpError;
use thiserror::Error;

use crate::engine::EngineError;

pub type Result<T> = std::result::Result<T, TtsError>;

/// Failures on either speech API surface
///
/// Client mistakes are detected before the engine is contacted; the two
/// engine variants wrap the collaborator's error unchanged.
#[derive(Debug, Error)]
pub enum TtsError {
    /// Native request without `t`
    #[error("Text is required")]
    MissingText,

    /// `OpenAI` request without `input`
    #[error("Input is required")]
    MissingInput,

    /// Body was not valid JSON for the expected shape
    #[error("{0}")]
    InvalidBody(String),

    #[error("Unsupported Content-Type, expected: 'Content-Type: application/json'")]
    UnsupportedMediaType,

    #[error("Request body is too large, limit is {0} bytes")]
    PayloadTooLarge(usize),

    /// The voice catalog could not be fetched
    #[error("{0}")]
    CatalogUnavailable(#[source] EngineError),

    /// The engine failed to synthesize audio
    #[error("{0}")]
    SynthesisFailed(#[source] EngineError),
}

impl HttpError for TtsError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingText | Self::MissingInput | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::CatalogUnavailable(_) | Self::SynthesisFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            Self::CatalogUnavailable(_) | Self::SynthesisFailed(_) => "server_error",
            _ => "invalid_request_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::InvalidBody(_) => "Invalid request body".to_string(),
            Self::CatalogUnavailable(_) => "Failed to retrieve voice list".to_string(),
            Self::SynthesisFailed(_) => "Failed to synthesize speech".to_string(),
            _ => self.to_string(),
        }
    }

    fn param(&self) -> Option<&'static str> {
        match self {
            Self::MissingText => Some("t"),
            Self::MissingInput => Some("input"),
            _ => None,
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            Self::MissingText | Self::MissingInput => Some("parameter_missing"),
            _ => None,
        }
    }
}

/// Renders a [`TtsError`] as `{"error": "<message>"}` for the native API
///
/// The native surface has always passed engine messages through verbatim.
#[derive(Debug)]
pub struct NativeApiError(pub TtsError);

impl From<TtsError> for NativeApiError {
    fn from(error: TtsError) -> Self {
        Self(error)
    }
}

#[derive(Serialize)]
struct NativeErrorBody {
    error: String,
}

impl IntoResponse for NativeApiError {
    fn into_response(self) -> Response {
        let body = NativeErrorBody {
            error: self.0.to_string(),
        };

        (self.0.status_code(), Json(body)).into_response()
    }
}

/// Renders a [`TtsError`] as an `OpenAI` error object
///
/// Engine details never reach the caller on this surface; they are logged
/// where the failure happened.
#[derive(Debug)]
pub struct OpenAiApiError(pub TtsError);

impl From<TtsError> for OpenAiApiError {
    fn from(error: TtsError) -> Self {
        Self(error)
    }
}

#[derive(Debug, Serialize)]
struct OpenAiErrorBody {
    error: OpenAiErrorDetails,
}

#[derive(Debug, Serialize)]
struct OpenAiErrorDetails {
    message: String,
    r#type: &'static str,
    param: Option<&'static str>,
    code: Option<&'static str>,
}

impl IntoResponse for OpenAiApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let body = OpenAiErrorBody {
            error: OpenAiErrorDetails {
                message: error.client_message(),
                r#type: error.error_type(),
                param: error.param(),
                code: error.code(),
            },
        };

        (error.status_code(), Json(body)).into_response()
    }
}
