use std::time::Duration;

use reqwest::Client;

use crate::engine::EngineError;

/// Build the HTTP client shared by every call to the speech engine
pub fn http_client(timeout: Duration) -> Result<Client, EngineError> {
    let mut headers = http::HeaderMap::new();
    headers.insert(http::header::CONNECTION, http::HeaderValue::from_static("keep-alive"));

    Client::builder()
        .timeout(timeout)
        .pool_idle_timeout(Some(Duration::from_secs(5)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .user_agent(concat!("speechgate/", env!("CARGO_PKG_VERSION")))
        .default_headers(headers)
        .build()
        .map_err(|e| EngineError::Config(format!("failed to build HTTP client: {e}")))
}
