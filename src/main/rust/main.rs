use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};

use media_bridge::{
    serve_api, serve_metrics, AppState, Config, MetadataResolver, PrometheusReporter,
    StreamBridgeService, TokioProcessSpawner,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();
    config.validate()?;

    // Initialize logging
    let filter = if config.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    // Initialize metrics
    PrometheusReporter::init_metrics()?;

    info!("Starting media bridge");
    info!("  HTTP port: {}", config.port);
    info!("  Metrics port: {}", config.metrics_port);
    info!("  Extraction tool: {}", config.ytdlp_path.display());
    info!("  Merge format: {}", config.merge_container().extension());

    // Create infrastructure implementations (dependency injection)
    let spawner = Arc::new(TokioProcessSpawner::new(config.ytdlp_path.clone()));
    let metrics_reporter = Arc::new(PrometheusReporter::new());

    // Create application services
    let state = AppState {
        resolver: Arc::new(MetadataResolver::new(
            spawner.clone(),
            metrics_reporter.clone(),
        )),
        bridge: Arc::new(
            StreamBridgeService::new(spawner, metrics_reporter)
                .with_merge_format(config.merge_container()),
        ),
    };

    // Set up graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl+c: {}", e);
            return;
        }
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    });

    let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let metrics_server = serve_metrics(metrics_addr, wait_for(shutdown_rx.clone()));

    let api_addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let api_server = serve_api(
        api_addr,
        state,
        config.static_dir.clone(),
        wait_for(shutdown_rx),
    );

    // A bind failure on either server stops both
    tokio::try_join!(api_server, metrics_server)?;

    info!("Media bridge shutdown complete");
    Ok(())
}

async fn wait_for(mut shutdown: watch::Receiver<bool>) {
    loop {
        let stopping = *shutdown.borrow();
        if stopping {
            return;
        }
        // Sender gone without a signal: keep serving
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
