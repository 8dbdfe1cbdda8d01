use secrecy::SecretString;
use serde::Deserialize;

/// Bearer token authentication for the protected route groups
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Shared secret every caller must present as `Authorization: Bearer <token>`
    pub secret_token: SecretString,
}
