use std::{net::SocketAddr, time::Duration};

use serde::Deserialize;

use crate::cors::CorsConfig;

/// Port used when neither the config file nor the command line names one
pub const DEFAULT_PORT: u16 = 8070;

/// Paths the gateway routes itself; the health check may not take one
pub const RESERVED_PATHS: [&str; 5] = ["/", "/tts", "/voices", "/v1/models", "/v1/audio/speech"];

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: SocketAddr,
    /// How long in-flight requests may keep running after a shutdown signal
    #[serde(default = "default_grace_period", with = "crate::duration")]
    pub shutdown_grace_period: Duration,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            shutdown_grace_period: default_grace_period(),
            health: HealthConfig::default(),
            cors: None,
        }
    }
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT))
}

const fn default_grace_period() -> Duration {
    Duration::from_secs(5)
}

/// Unauthenticated liveness check
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct HealthConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/health".to_string(),
        }
    }
}
