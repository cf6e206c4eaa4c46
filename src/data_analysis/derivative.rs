// src/data_analysis/derivative.rs

use ndarray::Array1;

/// Discrete time derivative of a uniformly sampled series.
/// Matches `numpy.gradient` with spacing `1 / sample_rate`.
pub fn calculate_derivative(data: &[f64], sample_rate: f64) -> Array1<f64> {
    let n = data.len();
    if n < 2 || !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Array1::zeros(0);
    }

    Array1::from_shape_fn(n, |i| match i {
        0 => (data[1] - data[0]) * sample_rate,
        i if i == n - 1 => (data[i] - data[i - 1]) * sample_rate,
        // Interior points: central difference over two sample intervals.
        i => (data[i + 1] - data[i - 1]) * (0.5 * sample_rate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_matches_numpy_gradient() {
        // numpy.gradient([1, 2, 4, 7, 11], 0.5) -> [2, 3, 5, 7, 8]
        let d = calculate_derivative(&[1.0, 2.0, 4.0, 7.0, 11.0], 2.0);
        let expected = [2.0, 3.0, 5.0, 7.0, 8.0];
        for (got, want) in d.iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_inputs() {
        assert!(calculate_derivative(&[1.0], 100.0).is_empty());
        assert!(calculate_derivative(&[1.0, 2.0], 0.0).is_empty());
        assert!(calculate_derivative(&[1.0, 2.0], f64::NAN).is_empty());
    }
}
