pub mod azure;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::types::{SynthesisRequest, VoiceDescriptor};

/// Errors reported by a speech engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine could not be reached or the transfer broke off
    #[error("failed to reach speech engine: {0}")]
    Connection(String),

    /// The engine answered with a non-success status
    #[error("speech engine error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The engine's answer could not be decoded
    #[error("unexpected speech engine response: {0}")]
    InvalidResponse(String),

    #[error("speech engine configuration error: {0}")]
    Config(String),
}

/// The text-to-speech engine behind the gateway
///
/// Implementations are shared by every in-flight request and must not keep
/// per-request state.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Turn one canonical request into encoded audio
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Bytes, EngineError>;

    /// Fetch the engine's full voice catalog
    async fn list_voices(&self) -> Result<Vec<VoiceDescriptor>, EngineError>;

    fn name(&self) -> &str;
}
