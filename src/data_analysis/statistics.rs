// src/data_analysis/statistics.rs

use ndarray::Array1;
use ndarray_stats::QuantileExt;
use serde::{Deserialize, Serialize};

/// Summary of one angle series. `std` is the population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStatistics {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesStatistics {
    /// `None` for an empty series or one containing NaN.
    pub fn from_series(series: &Array1<f64>) -> Option<Self> {
        let mean = series.mean()?;
        let min = *series.min().ok()?;
        let max = *series.max().ok()?;
        Some(Self {
            mean,
            std: series.std(0.0),
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_statistics() {
        let stats = SeriesStatistics::from_series(&Array1::from(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]))
            .unwrap();
        assert_abs_diff_eq!(stats.mean, 5.0);
        assert_abs_diff_eq!(stats.std, 2.0);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn test_empty_series() {
        assert!(SeriesStatistics::from_series(&Array1::zeros(0)).is_none());
    }
}
