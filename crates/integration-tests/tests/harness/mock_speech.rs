//! Mock Azure Speech backend
//!
//! Serves the synthesis and voice list endpoints with canned data and
//! remembers what it was asked for.

use std::{
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU32, Ordering},
    },
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing,
};
use tokio_util::sync::CancellationToken;

/// Size of the audio every successful synthesis returns
pub const AUDIO_LEN: usize = 5000;

pub struct MockSpeech {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    synthesis_count: AtomicU32,
    voices_count: AtomicU32,
    failing: AtomicBool,
    last_ssml: Mutex<Option<String>>,
    last_format: Mutex<Option<String>>,
    last_key: Mutex<Option<String>>,
}

impl MockSpeech {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(false).await
    }

    /// Start a backend that answers every request with 503
    pub async fn start_failing() -> anyhow::Result<Self> {
        Self::start_inner(true).await
    }

    async fn start_inner(failing: bool) -> anyhow::Result<Self> {
        let state = Arc::new(MockState::default());
        state.failing.store(failing, Ordering::Relaxed);

        let app = Router::new()
            .route("/cognitiveservices/v1", routing::post(handle_synthesis))
            .route("/cognitiveservices/voices/list", routing::get(handle_voices))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    pub fn synthesis_url(&self) -> String {
        format!("http://{}/cognitiveservices/v1", self.addr)
    }

    pub fn voices_url(&self) -> String {
        format!("http://{}/cognitiveservices/voices/list", self.addr)
    }

    /// Synthesis plus voice list requests received
    pub fn request_count(&self) -> u32 {
        self.synthesis_count() + self.voices_count()
    }

    pub fn synthesis_count(&self) -> u32 {
        self.state.synthesis_count.load(Ordering::Relaxed)
    }

    pub fn voices_count(&self) -> u32 {
        self.state.voices_count.load(Ordering::Relaxed)
    }

    pub fn last_ssml(&self) -> Option<String> {
        self.state.last_ssml.lock().unwrap().clone()
    }

    pub fn last_format(&self) -> Option<String> {
        self.state.last_format.lock().unwrap().clone()
    }

    pub fn last_key(&self) -> Option<String> {
        self.state.last_key.lock().unwrap().clone()
    }
}

impl Drop for MockSpeech {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Deterministic stand-in for encoded audio
pub fn audio() -> Vec<u8> {
    (0..AUDIO_LEN).map(|i| (i % 251) as u8).collect()
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

async fn handle_synthesis(State(state): State<Arc<MockState>>, headers: HeaderMap, body: String) -> Response {
    state.synthesis_count.fetch_add(1, Ordering::Relaxed);
    *state.last_ssml.lock().unwrap() = Some(body);
    *state.last_format.lock().unwrap() = header(&headers, "x-microsoft-outputformat");
    *state.last_key.lock().unwrap() = header(&headers, "ocp-apim-subscription-key");

    if state.failing.load(Ordering::Relaxed) {
        return (StatusCode::SERVICE_UNAVAILABLE, "speech backend overloaded").into_response();
    }

    audio().into_response()
}

async fn handle_voices(State(state): State<Arc<MockState>>) -> Response {
    state.voices_count.fetch_add(1, Ordering::Relaxed);

    if state.failing.load(Ordering::Relaxed) {
        return (StatusCode::SERVICE_UNAVAILABLE, "speech backend overloaded").into_response();
    }

    Json(serde_json::json!([
        {
            "Name": "Microsoft Server Speech Text to Speech Voice (en-US, AvaNeural)",
            "ShortName": "en-US-AvaNeural",
            "LocalName": "Ava",
            "Locale": "en-US",
            "Gender": "Female",
            "SampleRateHertz": "24000"
        },
        {
            "Name": "Microsoft Server Speech Text to Speech Voice (en-GB, SoniaNeural)",
            "ShortName": "en-GB-SoniaNeural",
            "LocalName": "Sonia",
            "Locale": "en-GB",
            "Gender": "Female",
            "SampleRateHertz": "24000"
        },
        {
            "Name": "Microsoft Server Speech Text to Speech Voice (zh-CN, XiaoxiaoMultilingualNeural)",
            "ShortName": "zh-CN-XiaoxiaoMultilingualNeural",
            "LocalName": "晓晓 多语言",
            "Locale": "zh-CN",
            "Gender": "Female",
            "SampleRateHertz": "24000"
        }
    ]))
    .into_response()
}
