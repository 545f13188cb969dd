use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use common::{Clock, Config, SystemClock};
use market::{CoinGeckoClient, PriceSource};
use notify::NotificationDispatcher;
use strategy::{StrategyOrchestrator, StrategyRunner};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    info!(
        coin = %cfg.coin_id,
        vs = %cfg.vs_currency,
        short = cfg.crossover.short_period,
        long = cfg.crossover.long_period,
        threshold = cfg.crossover.threshold,
        "SolSignal starting"
    );

    // ── Market data ───────────────────────────────────────────────────────────
    let provider = CoinGeckoClient::from_config(&cfg)
        .unwrap_or_else(|e| panic!("Failed to build CoinGecko client: {e}"));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let source = Arc::new(PriceSource::new(
        Arc::new(provider),
        clock.clone(),
        cfg.cache_ttls,
    ));

    // ── Notifications ─────────────────────────────────────────────────────────
    let dispatcher = Arc::new(NotificationDispatcher::from_config(&cfg));

    // ── Strategy ──────────────────────────────────────────────────────────────
    let orchestrator = Arc::new(StrategyOrchestrator::new(
        source.clone(),
        dispatcher,
        clock,
        cfg.crossover,
        cfg.cache_ttls.strategy,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let runner_task = match cfg.evaluation_interval {
        Some(interval) => {
            let runner = StrategyRunner::new(orchestrator.clone(), interval);
            Some(tokio::spawn(runner.run(shutdown_rx)))
        }
        None => {
            info!("Background evaluation disabled, strategy runs only on API requests");
            None
        }
    };

    // ── API ───────────────────────────────────────────────────────────────────
    let api_state = api::AppState {
        source,
        orchestrator,
        history_days: cfg.crossover.history_days,
    };
    let port = cfg.http_port;
    tokio::spawn(async move {
        if let Err(e) = api::serve(api_state, port).await {
            error!(error = %e, "API server stopped");
        }
    });

    // Keep main alive
    info!("All subsystems started. Waiting for shutdown signal.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c");
    }
    info!("Shutdown signal received. Exiting.");

    let _ = shutdown_tx.send(true);
    if let Some(task) = runner_task {
        let _ = task.await;
    }
}
