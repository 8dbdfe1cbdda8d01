//! Rendering of synthesized audio into HTTP responses

use std::{convert::Infallible, time::Duration, time::Instant};

use axum::{body::Body, response::Response};
use bytes::Bytes;
use futures_util::Stream;
use http::{HeaderMap, HeaderValue, StatusCode, header};
use speechgate_telemetry::SynthesisMetrics;

use crate::types::AudioPayload;

pub const OPENAI_ORGANIZATION: &str = "microsoft-organization-id";
pub const OPENAI_VERSION: &str = "2023-05-15";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Chunking parameters for emulated streaming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    pub chunk_size: usize,
    pub chunk_delay: Duration,
}

/// Number of writes an emulated stream performs for `len` bytes
pub const fn chunk_count(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size)
}

fn respond(status: StatusCode, headers: HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// The whole payload in one body
pub fn buffered(payload: AudioPayload) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(payload.content_type.as_str()),
    );

    respond(StatusCode::OK, headers, Body::from(payload.audio))
}

/// Buffered response for the native surface
///
/// Adds a `Cache-Control` lifetime and, when `attachment_name` is set, a
/// `Content-Disposition` so browsers save the audio instead of playing it.
pub fn native(payload: AudioPayload, cache_duration: Duration, attachment_name: Option<&str>) -> Response {
    let extension = payload.content_type.file_extension();
    let mut response = buffered(payload);
    let headers = response.headers_mut();

    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", cache_duration.as_secs())) {
        headers.insert(header::CACHE_CONTROL, value);
    }

    if let Some(name) = attachment_name
        && let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{name}.{extension}\""))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    response
}

/// Emulated streaming: the finished payload in paced, flushed chunks
///
/// Every chunk is a separate body frame, so it is written out before the
/// next one is produced. If the client goes away the body stream is dropped,
/// the remaining chunks are never sent and the abort is logged.
pub fn streamed(payload: AudioPayload, settings: StreamSettings, metrics: Option<SynthesisMetrics>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(payload.content_type.as_str()),
    );
    headers.insert(header::TRANSFER_ENCODING, HeaderValue::from_static("chunked"));

    let on_abort = metrics.map(|metrics| -> AbortHook { Box::new(move |_| metrics.record_stream_aborted()) });
    let body = Body::from_stream(chunk_stream(payload.audio, settings, on_abort));

    respond(StatusCode::OK, headers, body)
}

/// Invoked once, with the bytes the client consumed, when a stream is cut short
pub(crate) type AbortHook = Box<dyn FnOnce(usize) + Send>;

/// Progress through a payload being streamed to one client
struct ChunkCursor {
    audio: Bytes,
    /// Start of the next chunk to hand out
    offset: usize,
    /// Bytes the consumer has pulled past; a chunk only counts once the
    /// stream is polled again after yielding it
    delivered: usize,
    settings: StreamSettings,
    on_abort: Option<AbortHook>,
}

impl Drop for ChunkCursor {
    fn drop(&mut self) {
        if self.delivered < self.audio.len() {
            tracing::warn!(
                sent_bytes = self.delivered,
                total_bytes = self.audio.len(),
                "client stopped reading mid-stream, remaining chunks dropped"
            );
            if let Some(on_abort) = self.on_abort.take() {
                on_abort(self.delivered);
            }
        }
    }
}

pub(crate) fn chunk_stream(
    audio: Bytes,
    settings: StreamSettings,
    on_abort: Option<AbortHook>,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send {
    let cursor = ChunkCursor {
        audio,
        offset: 0,
        delivered: 0,
        settings,
        on_abort,
    };

    futures_util::stream::unfold(cursor, |mut cursor| async move {
        // being polled again means the previous chunk was taken
        cursor.delivered = cursor.offset;

        if cursor.offset >= cursor.audio.len() {
            return None;
        }

        if cursor.offset > 0 && !cursor.settings.chunk_delay.is_zero() {
            tokio::time::sleep(cursor.settings.chunk_delay).await;
        }

        let end = cursor
            .offset
            .saturating_add(cursor.settings.chunk_size.max(1))
            .min(cursor.audio.len());
        let chunk = cursor.audio.slice(cursor.offset..end);
        cursor.offset = end;

        Some((Ok(chunk), cursor))
    })
}

/// Attach the vendor headers `OpenAI` clients expect on every response
pub fn attach_openai_headers(headers: &mut HeaderMap, request_id: &str, started: Instant) {
    headers.insert("openai-organization", HeaderValue::from_static(OPENAI_ORGANIZATION));
    headers.insert(
        "openai-processing-ms",
        HeaderValue::from(u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)),
    );
    headers.insert("openai-version", HeaderValue::from_static(OPENAI_VERSION));
    if let Ok(value) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
}
