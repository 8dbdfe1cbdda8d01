use std::{sync::Arc, time::Duration, time::Instant};

use speechgate_config::TtsConfig;
use speechgate_core::{RequestIdGenerator, UuidRequestIds};
use speechgate_telemetry::SynthesisMetrics;

use crate::{
    delivery::StreamSettings,
    engine::{EngineError, SpeechEngine, azure::AzureSpeechEngine},
    error::{Result, TtsError},
    normalize::SynthesisDefaults,
    types::{AudioContentType, AudioPayload, Surface, SynthesisRequest, VoiceDescriptor},
};

/// Synthesis orchestrator shared by both API surfaces
pub struct Server {
    engine: Arc<dyn SpeechEngine>,
    defaults: SynthesisDefaults,
    stream: StreamSettings,
    cache_duration: Duration,
    request_ids: Arc<dyn RequestIdGenerator>,
    metrics: SynthesisMetrics,
}

impl Server {
    /// Synthesize one normalized request
    ///
    /// The engine is called exactly once. Timeouts and engine rejections are
    /// both reported as [`TtsError::SynthesisFailed`].
    pub async fn synthesize(&self, request: &SynthesisRequest, surface: Surface) -> Result<AudioPayload> {
        let start = Instant::now();

        match self.engine.synthesize(request).await {
            Ok(audio) => {
                self.metrics.record_success(start, audio.len(), surface.as_str());

                tracing::info!(
                    surface = surface.as_str(),
                    voice = %request.voice,
                    output_format = %request.output_format,
                    bytes = audio.len(),
                    "synthesized {}",
                    format_iec(audio.len())
                );

                Ok(AudioPayload {
                    audio,
                    content_type: AudioContentType::for_output_format(&request.output_format),
                })
            }
            Err(e) => {
                self.metrics.record_failure(start, surface.as_str());

                tracing::error!(
                    surface = surface.as_str(),
                    engine = self.engine.name(),
                    voice = %request.voice,
                    "speech synthesis failed: {e}"
                );

                Err(TtsError::SynthesisFailed(e))
            }
        }
    }

    /// Fetch the full voice catalog; never cached
    pub async fn voices(&self) -> Result<Vec<VoiceDescriptor>> {
        self.engine.list_voices().await.map_err(|e| {
            tracing::error!(engine = self.engine.name(), "failed to fetch voice catalog: {e}");
            TtsError::CatalogUnavailable(e)
        })
    }

    pub const fn defaults(&self) -> &SynthesisDefaults {
        &self.defaults
    }

    pub const fn stream_settings(&self) -> StreamSettings {
        self.stream
    }

    pub const fn cache_duration(&self) -> Duration {
        self.cache_duration
    }

    pub fn next_request_id(&self) -> String {
        self.request_ids.generate()
    }

    pub fn metrics(&self) -> &SynthesisMetrics {
        &self.metrics
    }
}

/// Builder for the synthesis server
///
/// Without an explicit engine, an [`AzureSpeechEngine`] is built from the
/// `[tts.engine]` section.
pub struct TtsServerBuilder<'a> {
    config: &'a TtsConfig,
    engine: Option<Arc<dyn SpeechEngine>>,
    request_ids: Option<Arc<dyn RequestIdGenerator>>,
}

impl<'a> TtsServerBuilder<'a> {
    pub const fn new(config: &'a TtsConfig) -> Self {
        Self {
            config,
            engine: None,
            request_ids: None,
        }
    }

    #[must_use]
    pub fn with_engine(mut self, engine: Arc<dyn SpeechEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    #[must_use]
    pub fn with_request_ids(mut self, request_ids: Arc<dyn RequestIdGenerator>) -> Self {
        self.request_ids = Some(request_ids);
        self
    }

    pub fn build(self) -> std::result::Result<Server, EngineError> {
        let engine = match self.engine {
            Some(engine) => engine,
            None => Arc::new(AzureSpeechEngine::new(&self.config.engine)?),
        };

        tracing::debug!(
            engine = engine.name(),
            default_voice = %self.config.default_voice,
            "TTS server initialized"
        );

        Ok(Server {
            engine,
            defaults: SynthesisDefaults::from(self.config),
            stream: StreamSettings {
                chunk_size: self.config.stream_chunk_size,
                chunk_delay: self.config.stream_chunk_delay,
            },
            cache_duration: self.config.cache_duration,
            request_ids: self.request_ids.unwrap_or_else(|| Arc::new(UuidRequestIds)),
            metrics: SynthesisMetrics::new(),
        })
    }
}

/// Human readable size in IEC units, e.g. `1.5 KiB`
#[allow(clippy::cast_precision_loss)]
pub fn format_iec(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{value:.1} {}", UNITS[unit])
}
