pub mod sma;

pub use sma::simple_moving_average;
