// src/data_analysis/polyfit.rs

use nalgebra::{DMatrix, DVector};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{MocapError, MocapResult};

/// Polynomial with coefficients ordered from the highest power down to the
/// constant term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    pub coefficients: Vec<f64>,
}

impl Polynomial {
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation.
    pub fn eval(&self, x: f64) -> f64 {
        self.coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
    }

    pub fn eval_many(&self, xs: &[f64]) -> Array1<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// Coefficients as `a=... b=... c=... d=...` in scientific notation.
    pub fn describe(&self) -> String {
        self.coefficients
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let name = char::from(b'a' + (i % 26) as u8);
                format!("{name}={c:.6e}")
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Least-squares polynomial fit of `y` over `x`.
///
/// Vandermonde columns are scaled to unit norm and solved by SVD, with
/// singular values below `len(x) * eps` relative to the largest discarded.
pub fn polyfit(x: &[f64], y: &[f64], degree: usize) -> MocapResult<Polynomial> {
    if x.is_empty() {
        return Err(MocapError::InsufficientData(
            "polynomial fit needs at least one sample".to_string(),
        ));
    }
    if x.len() != y.len() {
        return Err(MocapError::InsufficientData(format!(
            "polynomial fit got {} x values and {} y values",
            x.len(),
            y.len()
        )));
    }

    let rows = x.len();
    let cols = degree + 1;
    let mut vander = DMatrix::from_fn(rows, cols, |r, c| x[r].powi((degree - c) as i32));

    let scale: Vec<f64> = (0..cols)
        .map(|c| {
            let norm = vander.column(c).norm();
            if norm == 0.0 {
                1.0
            } else {
                norm
            }
        })
        .collect();
    for (c, s) in scale.iter().enumerate() {
        vander.column_mut(c).scale_mut(1.0 / s);
    }

    let rhs = DVector::from_column_slice(y);
    let svd = vander.svd(true, true);
    let largest = svd.singular_values.max();
    let cutoff = rows as f64 * f64::EPSILON * largest;
    let solution = svd
        .solve(&rhs, cutoff)
        .map_err(|e| MocapError::InsufficientData(format!("polynomial fit failed: {e}")))?;

    let coefficients = solution
        .iter()
        .zip(&scale)
        .map(|(c, s)| c / s)
        .collect();
    Ok(Polynomial { coefficients })
}

/// `n` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_recovers_exact_cubic() {
        let x: Vec<f64> = (0..20).map(|i| 90.0 + i as f64 * 4.5).collect();
        let truth = Polynomial {
            coefficients: vec![2.0e-5, -0.01, 1.5, -30.0],
        };
        let y: Vec<f64> = x.iter().map(|&v| truth.eval(v)).collect();

        let fit = polyfit(&x, &y, 3).unwrap();
        assert_eq!(fit.degree(), 3);
        for &v in &x {
            assert_abs_diff_eq!(fit.eval(v), truth.eval(v), epsilon = 1e-6);
        }

        let curve = fit.eval_many(&x);
        assert_eq!(curve.len(), x.len());
        assert_abs_diff_eq!(curve[19], truth.eval(x[19]), epsilon = 1e-6);
    }

    #[test]
    fn test_line_through_noisy_points() {
        // Least squares of (0,0), (1,1), (2,1): slope 0.5, intercept 1/6.
        let fit = polyfit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 1.0], 1).unwrap();
        assert_abs_diff_eq!(fit.coefficients[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.coefficients[1], 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_fit_errors() {
        assert!(matches!(
            polyfit(&[], &[], 3),
            Err(MocapError::InsufficientData(_))
        ));
        assert!(matches!(
            polyfit(&[1.0, 2.0], &[1.0], 1),
            Err(MocapError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_describe() {
        let p = Polynomial {
            coefficients: vec![1.0, -2.5],
        };
        assert_eq!(p.describe(), "a=1.000000e0, b=-2.500000e0");
    }
}
