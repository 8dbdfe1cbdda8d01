//! Programmatic configuration builder for integration tests

use std::{net::SocketAddr, time::Duration};

use secrecy::SecretString;
use speechgate_config::{AuthConfig, Config, CorsConfig, ServerConfig, TtsConfig};

use super::TOKEN;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal configuration with the shared test token and no chunk pacing
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: SocketAddr::from(([127, 0, 0, 1], 0)),
                    ..ServerConfig::default()
                },
                auth: AuthConfig {
                    secret_token: SecretString::from(TOKEN),
                },
                tts: TtsConfig {
                    stream_chunk_delay: Duration::ZERO,
                    ..TtsConfig::default()
                },
                telemetry: None,
            },
        }
    }

    /// Point the speech engine at a mock backend
    pub fn with_engine(mut self, synthesis_url: &str, voices_url: &str) -> Self {
        self.config.tts.engine.base_url = Some(synthesis_url.parse().expect("valid URL"));
        self.config.tts.engine.voices_url = Some(voices_url.parse().expect("valid URL"));
        self.config.tts.engine.subscription_key = Some(SecretString::from("mock-key"));
        self
    }

    pub fn with_stream_chunks(mut self, size: usize, delay: Duration) -> Self {
        self.config.tts.stream_chunk_size = size;
        self.config.tts.stream_chunk_delay = delay;
        self
    }

    pub fn with_cors(mut self, config: CorsConfig) -> Self {
        self.config.server.cors = Some(config);
        self
    }

    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
