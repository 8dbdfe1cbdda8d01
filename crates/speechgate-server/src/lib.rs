mod auth;
mod cors;
mod landing;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{Router, routing::get};
use speechgate_config::Config;
use tower_http::{
    LatencyUnit,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub use auth::{AuthFailure, SharedSecretValidator, TokenValidator, parse_bearer};

/// Assembled gateway with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
    shutdown_grace_period: Duration,
}

impl Server {
    /// Build the server from configuration, with the Azure speech engine
    ///
    /// # Errors
    ///
    /// Returns an error if the speech engine client cannot be constructed
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let tts_state = tts::build_server(&config.tts)?;
        let validator = Arc::new(SharedSecretValidator::new(&config.auth.secret_token));

        Ok(Self::with_parts(config, tts_state, validator))
    }

    /// Build the server around an already constructed synthesis server and token check
    #[must_use]
    pub fn with_parts(config: &Config, tts_state: Arc<tts::Server>, validator: Arc<dyn TokenValidator>) -> Self {
        let mut app = Router::new().route("/", get(landing::index));

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(|| async { "ok" }));
        }

        // Both API surfaces sit behind the bearer check; route_layer keeps
        // unknown paths at 404 instead of 401
        app = app
            .merge(protect(tts::native_router().with_state(tts_state.clone()), &validator))
            .merge(protect(tts::openai_router().with_state(tts_state), &validator));

        app = app.layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &http::Request<axum::body::Body>| {
                    let user_agent = request
                        .headers()
                        .get(http::header::USER_AGENT)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default();

                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        query = request.uri().query().unwrap_or_default(),
                        user_agent,
                    )
                })
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        );

        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Self {
            router: app,
            listen_address: config.server.listen_address,
            shutdown_grace_period: config.server.shutdown_grace_period,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Once the cancellation token fires, in-flight requests get the
    /// configured grace period to finish; whatever is still running after
    /// that is cut off.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        let graceful = shutdown.clone();
        let server = axum::serve(listener, self.router).with_graceful_shutdown(async move {
            graceful.cancelled().await;
        });
        let mut handle = tokio::spawn(async move { server.await });

        tokio::select! {
            result = &mut handle => {
                result??;
                return Ok(());
            }
            () = shutdown.cancelled() => {}
        }

        tracing::info!(grace_period = ?self.shutdown_grace_period, "graceful shutdown initiated");

        if let Ok(result) = tokio::time::timeout(self.shutdown_grace_period, &mut handle).await {
            result??;
        } else {
            tracing::warn!("shutdown grace period elapsed, cutting off in-flight requests");
            handle.abort();
        }

        Ok(())
    }
}

fn protect(router: Router, validator: &Arc<dyn TokenValidator>) -> Router {
    let validator = Arc::clone(validator);

    router.route_layer(axum::middleware::from_fn(move |request, next| {
        let validator = Arc::clone(&validator);
        async move { auth::auth_middleware(validator, request, next).await }
    }))
}
