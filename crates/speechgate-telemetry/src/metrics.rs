//! Metric names and the instruments recorded by the synthesis path

use std::time::Instant;

use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram},
};

pub const TTS_SYNTHESIS_DURATION: &str = "tts.synthesis.duration";
pub const TTS_SYNTHESIS_COUNT: &str = "tts.synthesis.count";
pub const TTS_AUDIO_BYTES: &str = "tts.audio.bytes";
pub const TTS_STREAM_ABORTED: &str = "tts.stream.aborted";

/// Instruments for synthesis outcomes and emulated stream delivery
///
/// Backed by the global meter provider, so recording is a no-op until an
/// exporter has been installed by [`crate::init`].
#[derive(Clone)]
pub struct SynthesisMetrics {
    duration: Histogram<f64>,
    count: Counter<u64>,
    audio_bytes: Histogram<u64>,
    stream_aborted: Counter<u64>,
}

impl SynthesisMetrics {
    pub fn new() -> Self {
        let meter = global::meter("speechgate");

        Self {
            duration: meter
                .f64_histogram(TTS_SYNTHESIS_DURATION)
                .with_unit("s")
                .with_description("Time spent in the speech engine per request")
                .build(),
            count: meter
                .u64_counter(TTS_SYNTHESIS_COUNT)
                .with_description("Synthesis attempts by outcome")
                .build(),
            audio_bytes: meter
                .u64_histogram(TTS_AUDIO_BYTES)
                .with_unit("By")
                .with_description("Size of synthesized audio payloads")
                .build(),
            stream_aborted: meter
                .u64_counter(TTS_STREAM_ABORTED)
                .with_description("Emulated streams cut off before the last chunk")
                .build(),
        }
    }

    /// Record a successful synthesis of `bytes` bytes that started at `start`
    pub fn record_success(&self, start: Instant, bytes: usize, surface: &'static str) {
        let attributes = [KeyValue::new("surface", surface), KeyValue::new("outcome", "success")];
        self.duration.record(start.elapsed().as_secs_f64(), &attributes);
        self.count.add(1, &attributes);
        self.audio_bytes
            .record(u64::try_from(bytes).unwrap_or(u64::MAX), &[KeyValue::new("surface", surface)]);
    }

    /// Record a failed synthesis that started at `start`
    pub fn record_failure(&self, start: Instant, surface: &'static str) {
        let attributes = [KeyValue::new("surface", surface), KeyValue::new("outcome", "error")];
        self.duration.record(start.elapsed().as_secs_f64(), &attributes);
        self.count.add(1, &attributes);
    }

    pub fn record_stream_aborted(&self) {
        self.stream_aborted.add(1, &[]);
    }
}

impl Default for SynthesisMetrics {
    fn default() -> Self {
        Self::new()
    }
}
