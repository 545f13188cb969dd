use common::{Error, Result};

/// SMA (Simple Moving Average) indicator.
///
/// Mean of the trailing window of `period` elements ending at the last sample.
///
/// Fails with `InvalidPeriod` for `period == 0` and with `InsufficientData`
/// when `series.len() < period`.
pub fn simple_moving_average(series: &[f64], period: usize) -> Result<f64> {
    if period == 0 {
        return Err(Error::InvalidPeriod(period));
    }
    if series.len() < period {
        return Err(Error::InsufficientData {
            required: period,
            available: series.len(),
        });
    }
    let window = &series[series.len() - period..];
    Ok(window.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_of_trailing_window() {
        let prices = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let value = simple_moving_average(&prices, 3).unwrap();
        assert!((value - 4.0).abs() < 1e-12, "Expected 4, got {value}");
    }

    #[test]
    fn sma_period_equal_to_length_is_full_mean() {
        let prices = vec![10.0, 20.0, 30.0];
        let value = simple_moving_average(&prices, 3).unwrap();
        assert!((value - 20.0).abs() < 1e-12);
    }

    #[test]
    fn sma_period_one_is_last_value() {
        let prices = vec![7.0, 8.0, 9.5];
        assert_eq!(simple_moving_average(&prices, 1).unwrap(), 9.5);
    }

    #[test]
    fn sma_reports_insufficient_data() {
        let prices = vec![100.0; 20];
        let err = simple_moving_average(&prices, 21).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientData {
                required: 21,
                available: 20
            }
        ));
    }

    #[test]
    fn sma_on_empty_series_reports_insufficient_data() {
        assert!(matches!(
            simple_moving_average(&[], 1),
            Err(Error::InsufficientData { available: 0, .. })
        ));
    }

    #[test]
    fn sma_rejects_zero_period() {
        assert!(matches!(
            simple_moving_average(&[1.0], 0),
            Err(Error::InvalidPeriod(0))
        ));
    }
}
