#![allow(clippy::must_use_candidate)]

pub mod auth;
pub mod cors;
mod duration;
mod env;
mod loader;
pub mod server;
pub mod telemetry;
pub mod tts;

use serde::Deserialize;

pub use auth::*;
pub use cors::*;
pub use server::*;
pub use telemetry::{ExportProtocol, LogFormat, MetricsConfig, OtlpExporter, TelemetryConfig, TracingConfig};
pub use tts::*;

/// Top-level gateway configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Listener, health check and CORS settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Bearer token settings shared by every protected route
    pub auth: AuthConfig,
    /// Synthesis defaults, streaming emulation and the speech engine
    #[serde(default)]
    pub tts: TtsConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
