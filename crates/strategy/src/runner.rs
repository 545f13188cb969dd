use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::StrategyOrchestrator;

/// Drives `evaluate_cycle` on a fixed timer so transitions are noticed even
/// when nobody is polling the API.
pub struct StrategyRunner {
    orchestrator: Arc<StrategyOrchestrator>,
    interval: Duration,
}

impl StrategyRunner {
    pub fn new(orchestrator: Arc<StrategyOrchestrator>, interval: Duration) -> Self {
        Self {
            orchestrator,
            interval,
        }
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped.
    /// Call from `tokio::spawn`. Failed cycles are logged and the loop continues.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval_secs = self.interval.as_secs(), "StrategyRunner running");

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.orchestrator.evaluate_cycle().await {
                        Ok(result) if result.cached => {
                            info!(signal = %result.value.signal, "Strategy result still fresh");
                        }
                        Ok(result) => {
                            info!(
                                signal = %result.value.signal,
                                price = result.value.price,
                                "Strategy cycle complete"
                            );
                        }
                        Err(e) => {
                            error!(kind = %e.kind(), error = %e, "Strategy cycle failed");
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        warn!("Shutdown requested, stopping strategy runner");
                        return;
                    }
                }
            }
        }
    }
}
