#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod catalog;
mod delivery;
mod engine;
mod error;
mod http_client;
mod normalize;
mod request;
mod server;
mod types;

use std::{sync::Arc, time::Instant};

use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::get,
};

pub use catalog::{
    MODEL_OWNER, SPEAKER_SHEET_CONTENT_TYPE, VoiceListing, filter_by_locale, models_from_voices, speaker_sheet,
};
pub use delivery::{OPENAI_ORGANIZATION, OPENAI_VERSION, StreamSettings, chunk_count};
pub use engine::{EngineError, SpeechEngine, azure::AzureSpeechEngine};
pub use error::{NativeApiError, OpenAiApiError, Result, TtsError};
pub use normalize::{
    Delivery, IncomingRequest, MAX_RATE, MIN_RATE, NormalizedRequest, SynthesisDefaults, speed_to_rate,
};
pub use server::{Server, TtsServerBuilder, format_iec};
pub use types::{
    AudioContentType, AudioPayload, ModelList, ModelObject, NativeSpeechParams, OpenAiSpeechRequest, Surface,
    SynthesisRequest, VoiceDescriptor, VoiceQuery,
};
use request::{NativeJson, OpenAiJson};

/// Build the synthesis server from configuration
pub fn build_server(config: &speechgate_config::TtsConfig) -> anyhow::Result<Arc<Server>> {
    let server = Arc::new(
        TtsServerBuilder::new(config)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize TTS server: {e}"))?,
    );
    Ok(server)
}

/// Routes of the native API: `/voices` and `/tts`
pub fn native_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/voices", get(list_voices))
        .route("/tts", get(synthesize_query).post(synthesize_json))
}

/// Routes of the `OpenAI` compatible API: `/v1/models` and `/v1/audio/speech`
pub fn openai_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/v1/models", get(list_models))
        .route("/v1/audio/speech", axum::routing::post(speech))
}

async fn list_voices(
    State(server): State<Arc<Server>>,
    Query(query): Query<VoiceQuery>,
) -> std::result::Result<Response, NativeApiError> {
    let voices = filter_by_locale(server.voices().await?, query.l.as_deref());

    tracing::debug!("Listing {} voices", voices.len());

    if query.f.as_deref() == Some("0") {
        let headers = [(http::header::CONTENT_TYPE, SPEAKER_SHEET_CONTENT_TYPE)];
        return Ok((headers, speaker_sheet(&voices)).into_response());
    }

    Ok(Json(VoiceListing::new(&voices, &query)).into_response())
}

async fn synthesize_query(
    State(server): State<Arc<Server>>,
    Query(params): Query<NativeSpeechParams>,
) -> std::result::Result<Response, NativeApiError> {
    synthesize_native(&server, params).await
}

async fn synthesize_json(
    State(server): State<Arc<Server>>,
    NativeJson(params): NativeJson<NativeSpeechParams>,
) -> std::result::Result<Response, NativeApiError> {
    synthesize_native(&server, params).await
}

async fn synthesize_native(
    server: &Server,
    params: NativeSpeechParams,
) -> std::result::Result<Response, NativeApiError> {
    let request = IncomingRequest::Native(params).normalize(server.defaults())?;
    let payload = server.synthesize(&request.synthesis, Surface::Native).await?;

    let attachment = request.download.then(|| server.next_request_id());

    Ok(delivery::native(payload, server.cache_duration(), attachment.as_deref()))
}

async fn list_models(State(server): State<Arc<Server>>) -> Response {
    let started = Instant::now();
    let request_id = server.next_request_id();

    let mut response = match server.voices().await {
        Ok(voices) => {
            let created = jiff::Timestamp::now().as_second();
            Json(models_from_voices(voices, created)).into_response()
        }
        Err(e) => OpenAiApiError(e).into_response(),
    };

    delivery::attach_openai_headers(response.headers_mut(), &request_id, started);
    response
}

async fn speech(State(server): State<Arc<Server>>, OpenAiJson(request): OpenAiJson<OpenAiSpeechRequest>) -> Response {
    let started = Instant::now();
    let request_id = server.next_request_id();

    tracing::debug!(request_id = %request_id, "OpenAI speech handler called");

    let mut response = match synthesize_openai(&server, request).await {
        Ok(response) => response,
        Err(e) => OpenAiApiError(e).into_response(),
    };

    delivery::attach_openai_headers(response.headers_mut(), &request_id, started);
    response
}

async fn synthesize_openai(server: &Server, request: OpenAiSpeechRequest) -> Result<Response> {
    let request = IncomingRequest::OpenAi(request).normalize(server.defaults())?;
    let payload = server.synthesize(&request.synthesis, Surface::OpenAi).await?;

    Ok(match request.delivery {
        Delivery::Buffered => delivery::buffered(payload),
        Delivery::Streamed => delivery::streamed(payload, server.stream_settings(), Some(server.metrics().clone())),
    })
}
