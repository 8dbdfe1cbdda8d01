use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One voice profile from the engine's catalog
///
/// Only the fields the gateway reads are typed; everything else the engine
/// reports (gender, sample rate, styles, ...) rides along in `extra` and is
/// returned verbatim on detailed listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceDescriptor {
    /// Engine identifier, e.g. `en-US-AvaMultilingualNeural`
    pub short_name: String,
    /// Display name in the voice's own language
    pub local_name: String,
    /// Language/region tag, e.g. `en-US`
    pub locale: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Projection of a voice used by the default `/voices` listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoiceSummary<'a> {
    pub local_name: &'a str,
    pub short_name: &'a str,
}

/// Canonical synthesis request every inbound shape is normalized into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: String,
    /// Signed percentage offset understood by the engine, e.g. `-25`
    pub rate: String,
    /// Signed percentage offset understood by the engine
    pub pitch: String,
    /// Engine output profile, e.g. `audio-24khz-48kbitrate-mono-mp3`
    pub output_format: String,
}

/// MIME type of synthesized audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioContentType {
    Mpeg,
    Opus,
}

impl AudioContentType {
    /// Opus-family engine profiles are served as `audio/opus`, everything else as `audio/mpeg`
    pub fn for_output_format(output_format: &str) -> Self {
        if output_format.to_ascii_lowercase().contains("opus") {
            Self::Opus
        } else {
            Self::Mpeg
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mpeg => "audio/mpeg",
            Self::Opus => "audio/opus",
        }
    }

    pub const fn file_extension(self) -> &'static str {
        match self {
            Self::Mpeg => "mp3",
            Self::Opus => "opus",
        }
    }
}

/// Synthesized audio owned by the request that produced it
#[derive(Debug, Clone)]
pub struct AudioPayload {
    pub audio: Bytes,
    pub content_type: AudioContentType,
}

/// API surface a request arrived on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Native,
    OpenAi,
}

impl Surface {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::OpenAi => "openai",
        }
    }
}

/// Native synthesis parameters, from the query string or a JSON body
#[derive(Debug, Default, Deserialize)]
pub struct NativeSpeechParams {
    /// Text to speak
    #[serde(default, alias = "text")]
    pub t: Option<String>,
    /// Voice short name
    #[serde(default)]
    pub v: Option<String>,
    /// Rate offset in percent
    #[serde(default)]
    pub r: Option<String>,
    /// Pitch offset in percent
    #[serde(default)]
    pub p: Option<String>,
    /// Engine output profile
    #[serde(default)]
    pub o: Option<String>,
    /// `true` or `1` asks for a `Content-Disposition: attachment` response
    #[serde(default)]
    pub download: Option<String>,
}

/// Speech request following the `OpenAI` audio API
#[derive(Debug, Default, Deserialize)]
pub struct OpenAiSpeechRequest {
    /// Model id; the gateway lists voice short names as models
    #[serde(default)]
    pub model: Option<String>,
    /// Text to synthesize
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub voice: Option<String>,
    /// `opus` selects the opus profile, anything else MP3
    #[serde(default)]
    pub response_format: Option<String>,
    /// Speed multiplier; zero or absent means 1.0
    #[serde(default)]
    pub speed: Option<f64>,
    /// Unset or `true` streams the response in chunks
    #[serde(default)]
    pub stream: Option<bool>,
}

/// Query parameters of `GET /voices`
#[derive(Debug, Default, Deserialize)]
pub struct VoiceQuery {
    /// Locale substring filter
    #[serde(default)]
    pub l: Option<String>,
    /// Present (with any value) to return unprojected entries
    #[serde(default)]
    pub d: Option<String>,
    /// `1` returns a `ShortName -> LocalName` map
    #[serde(default)]
    pub f: Option<String>,
}

/// Model entry in the `OpenAI` style `/v1/models` listing
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelObject {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelObject>,
}
