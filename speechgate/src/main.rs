#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use args::Args;
use clap::Parser;
use speechgate_config::Config;
use speechgate_server::Server;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // A missing or empty secret token fails here, before anything listens
    let mut config = Config::load(&args.config)?;
    config.server.listen_address = args.listen_address(config.server.listen_address);

    let _telemetry_guard = speechgate_telemetry::init(config.telemetry.as_ref(), &args.log)?;

    tracing::info!(
        config_path = %args.config.display(),
        listen_address = %config.server.listen_address,
        grace_period = ?config.server.shutdown_grace_period,
        "starting speechgate"
    );

    let server = Server::new(&config)?;

    let shutdown = CancellationToken::new();
    spawn_signal_listener(shutdown.clone())?;

    server.serve(shutdown).await?;

    tracing::info!("speechgate stopped");
    Ok(())
}

/// Cancel `shutdown` on the first `SIGINT` or `SIGTERM`
fn spawn_signal_listener(shutdown: CancellationToken) -> anyhow::Result<()> {
    #[cfg(unix)]
    let mut terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    tokio::spawn(async move {
        #[cfg(unix)]
        let terminate = terminate.recv();
        #[cfg(not(unix))]
        let terminate = std::future::pending::<Option<()>>();

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    tracing::error!("failed to listen for Ctrl+C: {e}");
                    return;
                }
            }
            _ = terminate => {}
        }

        tracing::info!("shutdown signal received");
        shutdown.cancel();
    });

    Ok(())
}
