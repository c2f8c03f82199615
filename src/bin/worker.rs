//! Phantom Alert Worker
//!
//! Runs one polling task per configured instrument and logs every emitted
//! signal until interrupted.

use dotenvy::dotenv;
use phantom_alert::config::{EngineConfig, JsonFileConfig};
use phantom_alert::core::{Collaborators, SignalRuntime};
use phantom_alert::logging;
use phantom_alert::metrics::Metrics;
use phantom_alert::models::StrategyConfig;
use phantom_alert::services::{
    InMemorySignalBoard, JsonFileConnector, LoggingTradeExecutor, NoopChartRenderer, NotifierSet,
    ReconnectingFeed, TracingNotifier,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let config = EngineConfig::from_env()?;
    info!("Starting Phantom Alert Worker");
    info!(environment = %config.environment, "Environment");
    info!(
        instruments = config.instruments.len(),
        candle_count = config.candle_count,
        cooldown = ?config.cooldown,
        "Monitoring {} instruments",
        config.instruments.len()
    );

    let metrics = Arc::new(Metrics::new()?);

    let settings = Arc::new(JsonFileConfig::new(
        config.settings_path.clone(),
        StrategyConfig::default(),
    ));
    if !settings.path().exists() {
        warn!(
            path = %settings.path().display(),
            "Settings file not found, using day-trade defaults until it appears"
        );
    }

    let feed = Arc::new(ReconnectingFeed::new(JsonFileConnector::new(
        config.candle_dir.clone(),
    )));
    let board = Arc::new(InMemorySignalBoard::new());

    let deps = Collaborators {
        source: feed,
        config: settings,
        charts: Arc::new(NoopChartRenderer),
        notifiers: NotifierSet::new().with(Arc::new(TracingNotifier)),
        executor: Arc::new(LoggingTradeExecutor),
        metrics: None,
    }
    .with_metrics(metrics.clone());

    let handle = SignalRuntime::new(config, deps)
        .with_sink(board.clone())
        .start();

    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;

    info!("Shutting down worker...");
    handle.shutdown().await;
    info!(signals = board.len().await, "Worker stopped");
    info!("Final metrics:\n{}", metrics.export()?);

    Ok(())
}
