use std::path::Path;

use secrecy::ExposeSecret;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Expands `{{ env.VAR }}` placeholders, deserializes and validates.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a referenced environment
    /// variable is missing, the TOML is invalid, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], minus file access
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Reject settings the gateway cannot run with
    ///
    /// # Errors
    ///
    /// Returns an error on an empty secret token, a zero stream chunk size, a
    /// zero shutdown grace period or an unusable health check path
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.auth.secret_token.expose_secret().trim().is_empty() {
            anyhow::bail!("auth.secret_token is not set; it is required");
        }

        if self.tts.stream_chunk_size == 0 {
            anyhow::bail!("tts.stream_chunk_size must be greater than 0");
        }

        if self.server.shutdown_grace_period.is_zero() {
            anyhow::bail!("server.shutdown_grace_period must be greater than 0");
        }

        if self.server.health.enabled {
            validate_health_path(&self.server.health.path)?;
        }

        if self.tts.engine.subscription_key.is_none() && self.tts.engine.base_url.is_none() {
            tracing::warn!("tts.engine.subscription_key is not set; synthesis requests will likely be rejected");
        }

        Ok(())
    }
}

fn validate_health_path(path: &str) -> anyhow::Result<()> {
    if !path.starts_with('/') {
        anyhow::bail!("server.health.path must start with '/', got {path:?}");
    }

    if path.contains(['{', '}', '*']) {
        anyhow::bail!("server.health.path must be a literal path, got {path:?}");
    }

    if crate::RESERVED_PATHS.contains(&path) {
        anyhow::bail!("server.health.path {path:?} collides with a gateway route");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_toml("[auth]\nsecret_token = \"abc\"\n").unwrap();

        assert_eq!(config.server.listen_address.port(), crate::DEFAULT_PORT);
        assert_eq!(config.server.shutdown_grace_period, Duration::from_secs(5));
        assert!(config.server.health.enabled);
        assert_eq!(config.tts.stream_chunk_size, 1024);
        assert!(config.telemetry.is_none());
    }

    #[test]
    fn missing_auth_section_is_fatal() {
        let err = Config::from_toml("[tts]\n").unwrap_err();
        assert!(err.to_string().contains("auth"));
    }

    #[test]
    fn empty_secret_is_fatal() {
        let err = Config::from_toml("[auth]\nsecret_token = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("secret_token"));
    }

    #[test]
    fn unset_secret_variable_is_fatal() {
        temp_env::with_var_unset("SG_LOADER_SECRET", || {
            let err = Config::from_toml("[auth]\nsecret_token = \"{{ env.SG_LOADER_SECRET }}\"\n").unwrap_err();
            assert!(err.to_string().contains("SG_LOADER_SECRET"));
        });
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let err = Config::from_toml("[auth]\nsecret_token = \"abc\"\n[tts]\nstream_chunk_size = 0\n").unwrap_err();
        assert!(err.to_string().contains("stream_chunk_size"));
    }

    fn health_path_error(path: &str) -> String {
        let raw = format!("[server.health]\npath = \"{path}\"\n[auth]\nsecret_token = \"abc\"\n");
        Config::from_toml(&raw).unwrap_err().to_string()
    }

    #[test]
    fn health_path_needs_leading_slash() {
        assert!(health_path_error("health").contains("must start with '/'"));
    }

    #[test]
    fn health_path_cannot_shadow_gateway_routes() {
        for path in ["/", "/tts", "/voices", "/v1/models", "/v1/audio/speech"] {
            assert!(health_path_error(path).contains("collides"), "{path} accepted");
        }
    }

    #[test]
    fn health_path_cannot_capture() {
        assert!(health_path_error("/{name}").contains("literal path"));
    }

    #[test]
    fn custom_health_path_is_accepted() {
        let config =
            Config::from_toml("[server.health]\npath = \"/healthz\"\n[auth]\nsecret_token = \"abc\"\n").unwrap();
        assert_eq!(config.server.health.path, "/healthz");
    }

    #[test]
    fn disabled_health_skips_path_checks() {
        let config = Config::from_toml(
            "[server.health]\nenabled = false\npath = \"/tts\"\n[auth]\nsecret_token = \"abc\"\n",
        )
        .unwrap();
        assert!(!config.server.health.enabled);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [server]
            listen_address = "127.0.0.1:9100"
            shutdown_grace_period = "2s"

            [auth]
            secret_token = "from-file"

            [tts]
            default_voice = "en-US-AvaNeural"
            stream_chunk_size = 512

            [telemetry]
            log_format = "json"
            "#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.server.listen_address.port(), 9100);
        assert_eq!(config.server.shutdown_grace_period, Duration::from_secs(2));
        assert_eq!(config.auth.secret_token.expose_secret(), "from-file");
        assert_eq!(config.tts.default_voice, "en-US-AvaNeural");
        assert_eq!(config.tts.stream_chunk_size, 512);
        assert_eq!(
            config.telemetry.map(|t| t.log_format),
            Some(crate::LogFormat::Json)
        );
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Config::load(Path::new("/nonexistent/speechgate.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/speechgate.toml"));
    }
}
