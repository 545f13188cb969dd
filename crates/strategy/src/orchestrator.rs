use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use common::{
    CacheEntry, Cached, Clock, CrossoverParams, HistoryInterval, Result, Signal, StrategyResult,
};
use market::PriceSource;
use notify::NotificationDispatcher;

use crate::indicators::simple_moving_average;
use crate::signal::{SignalEvaluator, SignalState};

/// Mutable state owned by the orchestrator. Only touched under its lock.
#[derive(Debug)]
struct CycleState {
    cache: Option<CacheEntry<StrategyResult>>,
    signal: SignalState,
}

/// Runs one fetch → compute → evaluate → notify → cache cycle per call.
///
/// The whole cycle executes under a single lock, so two overlapping callers
/// can never both observe the same previous signal. A cycle that fails
/// leaves both the result cache and the signal state untouched.
///
/// Once a transition is decided the dispatch runs on its own task, so a
/// caller that drops the cycle future mid-send cannot lose the notification.
pub struct StrategyOrchestrator {
    source: Arc<PriceSource>,
    dispatcher: Arc<NotificationDispatcher>,
    clock: Arc<dyn Clock>,
    params: CrossoverParams,
    evaluator: SignalEvaluator,
    strategy_ttl: Duration,
    state: Mutex<CycleState>,
    last_signal: watch::Sender<Option<Signal>>,
}

impl StrategyOrchestrator {
    pub fn new(
        source: Arc<PriceSource>,
        dispatcher: Arc<NotificationDispatcher>,
        clock: Arc<dyn Clock>,
        params: CrossoverParams,
        strategy_ttl: Duration,
    ) -> Self {
        Self {
            source,
            dispatcher,
            clock,
            evaluator: SignalEvaluator::new(params.threshold),
            params,
            strategy_ttl,
            state: Mutex::new(CycleState {
                cache: None,
                signal: SignalState::new(params.first_signal),
            }),
            last_signal: watch::Sender::new(None),
        }
    }

    /// Signal recorded by the last completed cycle, if any. Never waits on an
    /// in-flight cycle.
    pub fn last_signal(&self) -> Option<Signal> {
        *self.last_signal.borrow()
    }

    /// Evaluate the strategy, or return the cached result while it is fresh.
    ///
    /// A fresh cache short-circuits everything, including transition
    /// detection. Upstream and computation errors are returned as-is and are
    /// never cached.
    pub async fn evaluate_cycle(&self) -> Result<Cached<StrategyResult>> {
        let mut state = self.state.lock().await;

        let now = self.clock.now_millis();
        if let Some(entry) = state
            .cache
            .as_ref()
            .filter(|e| e.is_fresh(now, self.strategy_ttl))
        {
            debug!(signal = %entry.value.signal, "Strategy cache hit");
            return Ok(entry.to_cached(true));
        }

        let history = self
            .source
            .get_history(self.params.history_days, HistoryInterval::Daily)
            .await?;
        let current = self.source.get_current_price().await?;

        let mut series: Vec<f64> = history.value.iter().map(|p| p.price).collect();
        series.push(current.value.price);

        let short_ma = simple_moving_average(&series, self.params.short_period)?;
        let long_ma = simple_moving_average(&series, self.params.long_period)?;
        let signal = self.evaluator.classify(short_ma, long_ma);

        let timestamp_millis = self.clock.now_millis();
        let result = StrategyResult {
            signal,
            short_ma,
            long_ma,
            price: current.value.price,
            timestamp_millis,
        };

        info!(
            signal = %signal,
            price = result.price,
            short_ma,
            long_ma,
            samples = series.len(),
            "Strategy evaluated"
        );

        let event = state.signal.observe(&result);
        self.last_signal.send_replace(Some(signal));
        let entry = CacheEntry::new(result, timestamp_millis);
        let fresh = entry.to_cached(false);
        state.cache = Some(entry);

        if let Some(event) = event {
            info!(signal = %event.signal, price = event.price, "Signal transition, notifying");
            let dispatcher = self.dispatcher.clone();
            let delivery = tokio::spawn(async move { dispatcher.dispatch(&event).await });
            // Awaited under the cycle lock; the spawned task survives if we are dropped here.
            if let Err(e) = delivery.await {
                warn!(error = %e, "Notification task failed");
            }
        }

        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use common::{
        CacheTtls, Error, FirstSignalPolicy, ManualClock, MarketDataProvider, PricePoint,
        PriceSnapshot,
    };

    struct StubProvider {
        history: Vec<f64>,
        price: f64,
        fail: AtomicBool,
        price_calls: AtomicUsize,
    }

    #[async_trait]
    impl MarketDataProvider for StubProvider {
        async fn current_price(&self) -> Result<PriceSnapshot> {
            self.price_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(Error::upstream("down"));
            }
            Ok(PriceSnapshot {
                price: self.price,
                change_24h_percent: 0.0,
                timestamp_millis: 0,
            })
        }

        async fn daily_history(&self, _days: u32) -> Result<Vec<PricePoint>> {
            Ok(self
                .history
                .iter()
                .enumerate()
                .map(|(i, &price)| PricePoint {
                    timestamp_millis: i as i64,
                    price,
                })
                .collect())
        }
    }

    fn orchestrator(
        history: Vec<f64>,
        price: f64,
    ) -> (StrategyOrchestrator, Arc<StubProvider>, Arc<ManualClock>) {
        let provider = Arc::new(StubProvider {
            history,
            price,
            fail: AtomicBool::new(false),
            price_calls: AtomicUsize::new(0),
        });
        let clock = Arc::new(ManualClock::new(1_000_000));
        let ttls = CacheTtls::default();
        let source = Arc::new(PriceSource::new(provider.clone(), clock.clone(), ttls));
        let dispatcher = Arc::new(NotificationDispatcher::new("Solana", Vec::new()));
        let params = CrossoverParams {
            first_signal: FirstSignalPolicy::Suppress,
            ..CrossoverParams::default()
        };
        let orch = StrategyOrchestrator::new(source, dispatcher, clock.clone(), params, ttls.strategy);
        (orch, provider, clock)
    }

    #[tokio::test]
    async fn warm_cache_is_returned_without_refetch() {
        let (orch, provider, clock) = orchestrator(vec![100.0; 30], 100.0);

        let first = orch.evaluate_cycle().await.unwrap();
        assert!(!first.cached);

        clock.advance(Duration::from_secs(14 * 60));
        let second = orch.evaluate_cycle().await.unwrap();

        assert!(second.cached);
        assert_eq!(second.value, first.value);
        assert_eq!(provider.price_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn insufficient_history_is_a_computation_error() {
        let (orch, _provider, _clock) = orchestrator(vec![100.0; 10], 100.0);

        let err = orch.evaluate_cycle().await.unwrap_err();

        assert!(matches!(
            err,
            Error::InsufficientData {
                required: 21,
                available: 11
            }
        ));
        assert_eq!(orch.last_signal(), None);
    }

    #[tokio::test]
    async fn failed_cycle_leaves_state_and_cache_untouched() {
        let (orch, provider, clock) = orchestrator(vec![100.0; 30], 100.0);

        let first = orch.evaluate_cycle().await.unwrap();
        assert_eq!(orch.last_signal(), Some(Signal::Hold));

        // Expire both the strategy and the price caches, then break upstream.
        clock.advance(Duration::from_secs(16 * 60));
        provider.fail.store(true, Ordering::SeqCst);
        let err = orch.evaluate_cycle().await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable(_)));

        // Errors are not cached: the next call retries upstream.
        provider.fail.store(false, Ordering::SeqCst);
        let retried = orch.evaluate_cycle().await.unwrap();
        assert!(!retried.cached);
        assert_ne!(retried.value.timestamp_millis, first.value.timestamp_millis);
        assert_eq!(provider.price_calls.load(Ordering::SeqCst), 3);
    }
}
