use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_VOICE: &str = "zh-CN-XiaoxiaoMultilingualNeural";
pub const DEFAULT_OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";
pub const DEFAULT_OPUS_OUTPUT_FORMAT: &str = "ogg-24khz-16bit-mono-opus";

/// Synthesis defaults, streaming emulation and the speech engine
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TtsConfig {
    /// Voice used when a request names none
    #[serde(default = "default_voice")]
    pub default_voice: String,
    /// Engine output profile used unless opus is requested
    #[serde(default = "default_output_format")]
    pub default_output_format: String,
    /// Engine output profile for `response_format = "opus"`
    #[serde(default = "default_opus_output_format")]
    pub opus_output_format: String,
    /// Bytes written per chunk when emulating a streamed response
    #[serde(default = "default_chunk_size")]
    pub stream_chunk_size: usize,
    /// Pause between emulated stream chunks
    #[serde(default = "default_chunk_delay", with = "crate::duration")]
    pub stream_chunk_delay: Duration,
    /// Client cache lifetime advertised on native audio responses
    #[serde(default = "default_cache_duration", with = "crate::duration")]
    pub cache_duration: Duration,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            default_voice: default_voice(),
            default_output_format: default_output_format(),
            opus_output_format: default_opus_output_format(),
            stream_chunk_size: default_chunk_size(),
            stream_chunk_delay: default_chunk_delay(),
            cache_duration: default_cache_duration(),
            engine: EngineConfig::default(),
        }
    }
}

/// Connection settings for the Azure Speech REST API
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Azure region hosting the speech resource (e.g. `eastus`)
    #[serde(default = "default_region")]
    pub region: String,
    /// Speech resource key, sent as `Ocp-Apim-Subscription-Key`
    #[serde(default)]
    pub subscription_key: Option<SecretString>,
    /// Override for the synthesis endpoint
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Override for the voice list endpoint
    #[serde(default)]
    pub voices_url: Option<Url>,
    /// Upper bound for a single engine call
    #[serde(default = "default_timeout", with = "crate::duration")]
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            subscription_key: None,
            base_url: None,
            voices_url: None,
            timeout: default_timeout(),
        }
    }
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_output_format() -> String {
    DEFAULT_OUTPUT_FORMAT.to_string()
}

fn default_opus_output_format() -> String {
    DEFAULT_OPUS_OUTPUT_FORMAT.to_string()
}

const fn default_chunk_size() -> usize {
    1024
}

const fn default_chunk_delay() -> Duration {
    Duration::from_millis(10)
}

const fn default_cache_duration() -> Duration {
    Duration::from_secs(3600)
}

fn default_region() -> String {
    "eastus".to_string()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(120)
}
