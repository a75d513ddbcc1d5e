use anyhow::Context;
use api::{routes::app, state::AppState};
use services::{LimitsClient, LimitsIngestor, Poller};
use std::{net::SocketAddr, sync::Arc};
use tracing_appender::rolling;
use util::config::{self, AppConfig};
use util::dates::parse_timezone;

#[tokio::main]
async fn main() {
    let _log_guard = init_logging(&config::log_file(), &config::log_level());

    if let Err(e) = run().await {
        tracing::error!(error = ?e, "limit-watch failed to start");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    AppConfig::global().require_upstream()?;

    let db = db::connect()
        .await
        .context("failed to open the rate limit store")?;

    let client = LimitsClient::from_config().context("failed to build the limits client")?;
    tracing::info!(endpoint = client.endpoint(), "limits client ready");
    let ingestor = LimitsIngestor::new(db.clone(), Arc::new(client));

    // Background poller; its retry state never leaves the task.
    let poller = Poller::from_config(ingestor.clone()).spawn();

    let app_state = AppState::new(ingestor, parse_timezone(&config::display_timezone()));
    let app = app(app_state);

    let addr = format!("{}:{}", config::host(), config::port());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    println!(
        "Starting {} on http://{}",
        config::project_name(),
        listener.local_addr()?
    );
    tracing::info!(%addr, env = %config::env(), "server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    tracing::info!("shutting down: stopping poller");
    poller.abort();
    let _ = poller.await;

    db::close(db).await.context("failed to close the store")?;
    tracing::info!("shutdown complete");
    Ok(())
}

fn init_logging(log_file: &str, log_level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("api=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config::log_to_stdout() {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = sigterm.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("shutdown signal received");
}
