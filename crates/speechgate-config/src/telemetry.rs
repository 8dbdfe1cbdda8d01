use std::{collections::HashMap, time::Duration};

use serde::Deserialize;
use url::Url;

/// Logging format plus optional OTLP export of traces and metrics
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    /// Reported as `service.name`
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default)]
    pub resource_attributes: HashMap<String, String>,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Collector used by traces and metrics unless they name their own
    #[serde(default)]
    pub exporter: Option<OtlpExporter>,
    #[serde(default)]
    pub tracing: Option<TracingConfig>,
    #[serde(default)]
    pub metrics: Option<MetricsConfig>,
}

impl TelemetryConfig {
    /// Exporter for spans, falling back to the shared one
    pub fn trace_exporter(&self) -> Option<&OtlpExporter> {
        self.tracing
            .as_ref()
            .and_then(|t| t.exporter.as_ref())
            .or(self.exporter.as_ref())
    }

    /// Exporter for metrics, falling back to the shared one
    pub fn metrics_exporter(&self) -> Option<&OtlpExporter> {
        self.metrics
            .as_ref()
            .and_then(|m| m.exporter.as_ref())
            .or(self.exporter.as_ref())
    }
}

/// Console log output style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// An OTLP collector endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtlpExporter {
    pub endpoint: Url,
    #[serde(default)]
    pub protocol: ExportProtocol,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportProtocol {
    #[default]
    Grpc,
    HttpProto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TracingConfig {
    /// Fraction of root traces kept, 0.0 to 1.0
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate: f64,
    /// Follow the caller's sampling decision when one is propagated
    #[serde(default = "default_parent_based")]
    pub parent_based: bool,
    #[serde(default)]
    pub exporter: Option<OtlpExporter>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// How often synthesis metrics are pushed
    #[serde(default = "default_export_interval", with = "crate::duration")]
    pub export_interval: Duration,
    #[serde(default)]
    pub exporter: Option<OtlpExporter>,
}

fn default_service_name() -> String {
    "speechgate".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_sampling_rate() -> f64 {
    1.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_parent_based() -> bool {
    true
}

const fn default_export_interval() -> Duration {
    Duration::from_secs(30)
}
