use tracing::debug;

use common::{FirstSignalPolicy, NotificationEvent, Signal, StrategyResult};

/// Maps a (short MA, long MA) pair to a discrete signal.
///
/// Buy iff `short > long * (1 + threshold)`, Sell iff
/// `short < long * (1 - threshold)`, otherwise Hold. Both boundaries belong
/// to the Hold dead zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEvaluator {
    pub threshold: f64,
}

impl SignalEvaluator {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn classify(&self, short_ma: f64, long_ma: f64) -> Signal {
        if short_ma > long_ma * (1.0 + self.threshold) {
            Signal::Buy
        } else if short_ma < long_ma * (1.0 - self.threshold) {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

/// The most recently emitted signal, `None` until the first completed cycle.
/// Lives in memory only; a restart forgets it.
#[derive(Debug, Clone, Default)]
pub struct SignalState {
    last: Option<Signal>,
    policy: FirstSignalPolicy,
}

impl SignalState {
    pub fn new(policy: FirstSignalPolicy) -> Self {
        Self { last: None, policy }
    }

    pub fn last(&self) -> Option<Signal> {
        self.last
    }

    /// Record the signal of a completed cycle and return the event to send,
    /// if this is a transition to Buy or Sell. The state is overwritten
    /// whether or not an event is produced.
    pub fn observe(&mut self, result: &StrategyResult) -> Option<NotificationEvent> {
        let previous = self.last.replace(result.signal);
        let notify = is_transition(previous, result.signal, self.policy);
        debug!(?previous, current = %result.signal, notify, "Signal observed");
        notify.then(|| NotificationEvent::from_result(result))
    }
}

/// A change into Buy or Sell. With no previous signal the policy decides.
pub fn is_transition(previous: Option<Signal>, current: Signal, policy: FirstSignalPolicy) -> bool {
    if !current.is_actionable() {
        return false;
    }
    match previous {
        Some(prev) => prev != current,
        None => policy == FirstSignalPolicy::Notify,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: f64 = 0.02;

    fn result(signal: Signal) -> StrategyResult {
        StrategyResult {
            signal,
            short_ma: 1.0,
            long_ma: 1.0,
            price: 135.0,
            timestamp_millis: 42,
        }
    }

    #[test]
    fn classify_outside_dead_zone() {
        let eval = SignalEvaluator::new(T);
        assert_eq!(eval.classify(103.0, 100.0), Signal::Buy);
        assert_eq!(eval.classify(97.0, 100.0), Signal::Sell);
        assert_eq!(eval.classify(100.0, 100.0), Signal::Hold);
        assert_eq!(eval.classify(101.9, 100.0), Signal::Hold);
        assert_eq!(eval.classify(98.1, 100.0), Signal::Hold);
    }

    #[test]
    fn boundaries_are_hold() {
        // Values chosen so long * (1 ± t) is exact in binary floating point.
        let eval = SignalEvaluator::new(0.25);
        assert_eq!(eval.classify(80.0 * 1.25, 80.0), Signal::Hold);
        assert_eq!(eval.classify(80.0 * 0.75, 80.0), Signal::Hold);
        assert_eq!(eval.classify(100.0 + 1e-9, 80.0), Signal::Buy);
        assert_eq!(eval.classify(60.0 - 1e-9, 80.0), Signal::Sell);

        let eval = SignalEvaluator::new(T);
        let long = 250.0;
        assert_eq!(eval.classify(long * (1.0 + T), long), Signal::Hold);
        assert_eq!(eval.classify(long * (1.0 - T), long), Signal::Hold);
    }

    #[test]
    fn dead_zone_scales_with_long_ma() {
        let eval = SignalEvaluator::new(T);
        // 1.5 above the long MA: Buy at 50, Hold at 100.
        assert_eq!(eval.classify(51.5, 50.0), Signal::Buy);
        assert_eq!(eval.classify(101.5, 100.0), Signal::Hold);
    }

    #[test]
    fn zero_threshold_has_no_dead_zone_except_equality() {
        let eval = SignalEvaluator::new(0.0);
        assert_eq!(eval.classify(100.01, 100.0), Signal::Buy);
        assert_eq!(eval.classify(99.99, 100.0), Signal::Sell);
        assert_eq!(eval.classify(100.0, 100.0), Signal::Hold);
    }

    #[test]
    fn buy_to_sell_emits_one_event() {
        let mut state = SignalState::new(FirstSignalPolicy::Suppress);
        assert!(state.observe(&result(Signal::Buy)).is_none());

        let event = state.observe(&result(Signal::Sell)).expect("transition event");
        assert_eq!(event.signal, Signal::Sell);
        assert_eq!(event.price, 135.0);
        assert_eq!(state.last(), Some(Signal::Sell));
    }

    #[test]
    fn repeated_signal_emits_nothing() {
        let mut state = SignalState::new(FirstSignalPolicy::Suppress);
        state.observe(&result(Signal::Buy));
        assert!(state.observe(&result(Signal::Buy)).is_none());
    }

    #[test]
    fn first_signal_is_suppressed_by_default() {
        let mut state = SignalState::default();
        assert!(state.observe(&result(Signal::Buy)).is_none());
        assert_eq!(state.last(), Some(Signal::Buy));
    }

    #[test]
    fn first_signal_notifies_when_policy_allows() {
        let mut state = SignalState::new(FirstSignalPolicy::Notify);
        assert!(state.observe(&result(Signal::Sell)).is_some());
    }

    #[test]
    fn transition_into_hold_never_notifies_but_updates_state() {
        let mut state = SignalState::new(FirstSignalPolicy::Notify);
        state.observe(&result(Signal::Buy));
        assert!(state.observe(&result(Signal::Hold)).is_none());
        assert_eq!(state.last(), Some(Signal::Hold));

        // Hold -> Buy is a transition again.
        assert!(state.observe(&result(Signal::Buy)).is_some());
    }

    #[test]
    fn transition_table() {
        use Signal::*;
        let cases = [
            (None, Buy, FirstSignalPolicy::Suppress, false),
            (None, Hold, FirstSignalPolicy::Notify, false),
            (Some(Hold), Buy, FirstSignalPolicy::Suppress, true),
            (Some(Hold), Sell, FirstSignalPolicy::Suppress, true),
            (Some(Buy), Sell, FirstSignalPolicy::Suppress, true),
            (Some(Sell), Buy, FirstSignalPolicy::Suppress, true),
            (Some(Sell), Sell, FirstSignalPolicy::Notify, false),
            (Some(Buy), Hold, FirstSignalPolicy::Notify, false),
        ];
        for (prev, cur, policy, expected) in cases {
            assert_eq!(
                is_transition(prev, cur, policy),
                expected,
                "prev={prev:?} cur={cur:?} policy={policy:?}"
            );
        }
    }
}
