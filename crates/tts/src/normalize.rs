//! Conversion of both inbound request shapes into one [`SynthesisRequest`]

use crate::{
    error::{Result, TtsError},
    types::{NativeSpeechParams, OpenAiSpeechRequest, SynthesisRequest},
};

/// Bounds of the rate offset derived from an `OpenAI` speed multiplier
pub const MIN_RATE: i32 = -100;
pub const MAX_RATE: i32 = 200;

/// Values filled in when a request leaves a field out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisDefaults {
    pub voice: String,
    pub output_format: String,
    pub opus_output_format: String,
}

impl From<&speechgate_config::TtsConfig> for SynthesisDefaults {
    fn from(config: &speechgate_config::TtsConfig) -> Self {
        Self {
            voice: config.default_voice.clone(),
            output_format: config.default_output_format.clone(),
            opus_output_format: config.opus_output_format.clone(),
        }
    }
}

/// How the synthesized audio goes back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// One response body
    Buffered,
    /// Paced chunks of the already complete payload
    Streamed,
}

/// A request as it arrived, tagged with the surface that received it
#[derive(Debug)]
pub enum IncomingRequest {
    Native(NativeSpeechParams),
    OpenAi(OpenAiSpeechRequest),
}

/// Result of normalization: what to synthesize and how to deliver it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRequest {
    pub synthesis: SynthesisRequest,
    pub delivery: Delivery,
    /// Serve as a file attachment instead of inline audio
    pub download: bool,
}

impl IncomingRequest {
    /// Validate mandatory fields and apply defaults
    ///
    /// Nothing here touches the engine, so a rejected request never causes
    /// synthesis work.
    pub fn normalize(self, defaults: &SynthesisDefaults) -> Result<NormalizedRequest> {
        match self {
            Self::Native(params) => normalize_native(params, defaults),
            Self::OpenAi(request) => normalize_openai(request, defaults),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn normalize_native(params: NativeSpeechParams, defaults: &SynthesisDefaults) -> Result<NormalizedRequest> {
    let text = non_empty(params.t).ok_or(TtsError::MissingText)?;

    // Rate and pitch are opaque to the gateway on this surface
    let synthesis = SynthesisRequest {
        text,
        voice: non_empty(params.v).unwrap_or_else(|| defaults.voice.clone()),
        rate: non_empty(params.r).unwrap_or_else(|| "0".to_string()),
        pitch: non_empty(params.p).unwrap_or_else(|| "0".to_string()),
        output_format: non_empty(params.o).unwrap_or_else(|| defaults.output_format.clone()),
    };

    let download = params
        .download
        .is_some_and(|d| d.eq_ignore_ascii_case("true") || d == "1");

    Ok(NormalizedRequest {
        synthesis,
        delivery: Delivery::Buffered,
        download,
    })
}

fn normalize_openai(request: OpenAiSpeechRequest, defaults: &SynthesisDefaults) -> Result<NormalizedRequest> {
    let text = non_empty(request.input).ok_or(TtsError::MissingInput)?;

    // Model ids are voice short names (see /v1/models)
    let voice = non_empty(request.voice)
        .or_else(|| non_empty(request.model))
        .unwrap_or_else(|| defaults.voice.clone());

    let output_format = if request.response_format.as_deref() == Some("opus") {
        defaults.opus_output_format.clone()
    } else {
        defaults.output_format.clone()
    };

    let delivery = if request.stream == Some(false) {
        Delivery::Buffered
    } else {
        Delivery::Streamed
    };

    Ok(NormalizedRequest {
        synthesis: SynthesisRequest {
            text,
            voice,
            rate: speed_to_rate(request.speed).to_string(),
            pitch: "0".to_string(),
            output_format,
        },
        delivery,
        download: false,
    })
}

/// Map an `OpenAI` speed multiplier to the engine's percentage rate offset
///
/// Zero or absent means normal speed. The result is clamped to
/// [`MIN_RATE`]..=[`MAX_RATE`], the range the engine accepts.
#[allow(clippy::cast_possible_truncation)]
pub fn speed_to_rate(speed: Option<f64>) -> i32 {
    let speed = match speed {
        Some(s) if s != 0.0 && !s.is_nan() => s,
        _ => 1.0,
    };

    ((speed - 1.0) * 100.0)
        .round()
        .clamp(f64::from(MIN_RATE), f64::from(MAX_RATE)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> SynthesisDefaults {
        SynthesisDefaults {
            voice: "zh-CN-XiaoxiaoMultilingualNeural".to_string(),
            output_format: "audio-24khz-48kbitrate-mono-mp3".to_string(),
            opus_output_format: "ogg-24khz-16bit-mono-opus".to_string(),
        }
    }

    fn openai(input: &str) -> OpenAiSpeechRequest {
        OpenAiSpeechRequest {
            input: Some(input.to_string()),
            ..OpenAiSpeechRequest::default()
        }
    }

    #[test]
    fn native_requires_text() {
        let result = IncomingRequest::Native(NativeSpeechParams::default()).normalize(&defaults());
        assert!(matches!(result, Err(TtsError::MissingText)));

        let empty = NativeSpeechParams {
            t: Some(String::new()),
            v: Some("en-US-AvaNeural".to_string()),
            ..NativeSpeechParams::default()
        };
        assert!(matches!(
            IncomingRequest::Native(empty).normalize(&defaults()),
            Err(TtsError::MissingText)
        ));
    }

    #[test]
    fn native_fills_defaults() {
        let params = NativeSpeechParams {
            t: Some("hello".to_string()),
            ..NativeSpeechParams::default()
        };

        let normalized = IncomingRequest::Native(params).normalize(&defaults()).unwrap();
        assert_eq!(
            normalized.synthesis,
            SynthesisRequest {
                text: "hello".to_string(),
                voice: "zh-CN-XiaoxiaoMultilingualNeural".to_string(),
                rate: "0".to_string(),
                pitch: "0".to_string(),
                output_format: "audio-24khz-48kbitrate-mono-mp3".to_string(),
            }
        );
        assert_eq!(normalized.delivery, Delivery::Buffered);
        assert!(!normalized.download);
    }

    #[test]
    fn native_passes_rate_and_pitch_through_untouched() {
        let params = NativeSpeechParams {
            t: Some("hello".to_string()),
            v: Some("en-GB-SoniaNeural".to_string()),
            r: Some("+350".to_string()),
            p: Some("-abc".to_string()),
            o: Some("riff-24khz-16bit-mono-pcm".to_string()),
            download: Some("TRUE".to_string()),
        };

        let normalized = IncomingRequest::Native(params).normalize(&defaults()).unwrap();
        assert_eq!(normalized.synthesis.rate, "+350");
        assert_eq!(normalized.synthesis.pitch, "-abc");
        assert_eq!(normalized.synthesis.voice, "en-GB-SoniaNeural");
        assert_eq!(normalized.synthesis.output_format, "riff-24khz-16bit-mono-pcm");
        assert!(normalized.download);
    }

    #[test]
    fn openai_requires_input() {
        let result = IncomingRequest::OpenAi(OpenAiSpeechRequest::default()).normalize(&defaults());
        assert!(matches!(result, Err(TtsError::MissingInput)));
    }

    #[test]
    fn absent_or_zero_speed_is_normal_rate() {
        assert_eq!(speed_to_rate(None), 0);
        assert_eq!(speed_to_rate(Some(0.0)), 0);
        assert_eq!(speed_to_rate(Some(1.0)), 0);
    }

    #[test]
    fn speed_maps_to_percentage() {
        assert_eq!(speed_to_rate(Some(1.5)), 50);
        assert_eq!(speed_to_rate(Some(0.5)), -50);
        assert_eq!(speed_to_rate(Some(1.234)), 23);
        assert_eq!(speed_to_rate(Some(2.999)), 200);
    }

    #[test]
    fn rate_is_clamped_asymmetrically() {
        assert_eq!(speed_to_rate(Some(10.0)), 200);
        assert_eq!(speed_to_rate(Some(-5.0)), -100);
        assert_eq!(speed_to_rate(Some(0.01)), -99);
    }

    #[test]
    fn opus_selects_opus_profile() {
        let request = OpenAiSpeechRequest {
            response_format: Some("opus".to_string()),
            ..openai("hi")
        };

        let normalized = IncomingRequest::OpenAi(request).normalize(&defaults()).unwrap();
        assert_eq!(normalized.synthesis.output_format, "ogg-24khz-16bit-mono-opus");
    }

    #[test]
    fn other_formats_select_mp3_profile() {
        for format in [None, Some("mp3"), Some("wav"), Some("OPUS")] {
            let request = OpenAiSpeechRequest {
                response_format: format.map(str::to_string),
                ..openai("hi")
            };

            let normalized = IncomingRequest::OpenAi(request).normalize(&defaults()).unwrap();
            assert_eq!(normalized.synthesis.output_format, "audio-24khz-48kbitrate-mono-mp3");
        }
    }

    #[test]
    fn stream_is_tri_state() {
        let cases = [
            (None, Delivery::Streamed),
            (Some(true), Delivery::Streamed),
            (Some(false), Delivery::Buffered),
        ];

        for (stream, expected) in cases {
            let request = OpenAiSpeechRequest { stream, ..openai("hi") };
            let normalized = IncomingRequest::OpenAi(request).normalize(&defaults()).unwrap();
            assert_eq!(normalized.delivery, expected);
        }
    }

    #[test]
    fn openai_pitch_is_always_zero() {
        let normalized = IncomingRequest::OpenAi(openai("hi")).normalize(&defaults()).unwrap();
        assert_eq!(normalized.synthesis.pitch, "0");
        assert_eq!(normalized.synthesis.rate, "0");
    }

    #[test]
    fn openai_voice_falls_back_to_model_then_default() {
        let with_voice = OpenAiSpeechRequest {
            voice: Some("en-US-AvaNeural".to_string()),
            model: Some("en-GB-RyanNeural".to_string()),
            ..openai("hi")
        };
        let with_model = OpenAiSpeechRequest {
            voice: Some(String::new()),
            model: Some("en-GB-RyanNeural".to_string()),
            ..openai("hi")
        };

        let voice_of = |request| {
            IncomingRequest::OpenAi(request)
                .normalize(&defaults())
                .unwrap()
                .synthesis
                .voice
        };

        assert_eq!(voice_of(with_voice), "en-US-AvaNeural");
        assert_eq!(voice_of(with_model), "en-GB-RyanNeural");
        assert_eq!(voice_of(openai("hi")), "zh-CN-XiaoxiaoMultilingualNeural");
    }
}
