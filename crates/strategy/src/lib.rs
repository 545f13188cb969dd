pub mod indicators;
pub mod orchestrator;
pub mod runner;
pub mod signal;

pub use indicators::simple_moving_average;
pub use orchestrator::StrategyOrchestrator;
pub use runner::StrategyRunner;
pub use signal::{is_transition, SignalEvaluator, SignalState};
