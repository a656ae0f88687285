mod config;
mod telemetry;
mod wiring;

use std::error::Error;

use runtime::MarketRuntime;
use tokio::{net::TcpListener, sync::watch};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = config::Config::from_env()?;
    telemetry::init(&config.log_level);

    let engine = wiring::build_engine(&config)?;
    let (market, handle) = MarketRuntime::new(engine, config.runtime_options());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let market_task = tokio::spawn(market.run(shutdown_rx));

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(
        addr = %config.listen_addr,
        mode = config.mode.as_str(),
        tick_ms = config.tick_interval_ms,
        "dashboard server listening"
    );

    axum::serve(listener, wiring::build_app(handle))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Err(error) = market_task.await {
        tracing::error!(%error, "market runtime task failed");
    }
    tracing::info!("dashboard server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
    }
}
