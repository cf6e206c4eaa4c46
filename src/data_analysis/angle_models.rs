// src/data_analysis/angle_models.rs

use ndarray::Array1;
use tracing::debug;

use crate::constants::{PHI_POLYNOMIAL_DEGREE, Q2_TIME_POLYNOMIAL_DEGREE};
use crate::data_analysis::derivative::calculate_derivative;
use crate::data_analysis::joint_angles::{JointAngles, SideAngles};
use crate::data_analysis::polyfit::{polyfit, Polynomial};
use crate::data_input::roles::Side;
use crate::error::MocapResult;

/// Fitted relations for one body side.
#[derive(Debug, Clone)]
pub struct SideModels {
    /// q1 as a cubic in q2.
    pub phi1: Polynomial,
    /// q3 as a cubic in q2.
    pub phi3: Polynomial,
    /// q2 as a quintic in time (seconds).
    pub q2_of_t: Polynomial,
    /// Sample times `i / f`.
    pub time: Array1<f64>,
    /// dq2/dt in degrees per second.
    pub dq2_dt: Array1<f64>,
}

impl SideModels {
    pub fn fit(angles: &SideAngles, frequency_hz: f64) -> MocapResult<Self> {
        let q1 = angles.q1.to_vec();
        let q2 = angles.q2.to_vec();
        let q3 = angles.q3.to_vec();
        let time: Array1<f64> = (0..q2.len()).map(|i| i as f64 / frequency_hz).collect();

        let phi1 = polyfit(&q2, &q1, PHI_POLYNOMIAL_DEGREE)?;
        let phi3 = polyfit(&q2, &q3, PHI_POLYNOMIAL_DEGREE)?;
        let q2_of_t = polyfit(time.as_slice().unwrap_or(&[]), &q2, Q2_TIME_POLYNOMIAL_DEGREE)?;
        let dq2_dt = calculate_derivative(&q2, frequency_hz);

        Ok(Self {
            phi1,
            phi3,
            q2_of_t,
            time,
            dq2_dt,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AngleModels {
    pub right: SideModels,
    pub left: SideModels,
}

impl AngleModels {
    pub fn fit(angles: &JointAngles, frequency_hz: f64) -> MocapResult<Self> {
        let right = SideModels::fit(&angles.right, frequency_hz)?;
        let left = SideModels::fit(&angles.left, frequency_hz)?;
        debug!(
            "Fitted angle models over {} frames at {} Hz",
            angles.num_frames(),
            frequency_hz
        );
        Ok(Self { right, left })
    }

    pub fn side(&self, side: Side) -> &SideModels {
        match side {
            Side::Right => &self.right,
            Side::Left => &self.left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_side_models() {
        let n = 50;
        let q2: Vec<f64> = (0..n).map(|i| 100.0 + i as f64).collect();
        let q1: Vec<f64> = q2.iter().map(|v| 0.5 * v - 10.0).collect();
        let q3: Vec<f64> = q2.iter().map(|v| 200.0 - v).collect();
        let angles = SideAngles {
            q1: Array1::from(q1),
            q2: Array1::from(q2),
            q3: Array1::from(q3),
        };

        let models = SideModels::fit(&angles, 100.0).unwrap();
        assert_abs_diff_eq!(models.phi1.eval(120.0), 50.0, epsilon = 1e-6);
        assert_abs_diff_eq!(models.phi3.eval(120.0), 80.0, epsilon = 1e-6);
        // q2 rises 1 degree per frame at 100 Hz.
        assert_abs_diff_eq!(models.dq2_dt[10], 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(models.q2_of_t.eval(0.2), 120.0, epsilon = 1e-6);
        assert_eq!(models.time.len(), 50);
    }

    #[test]
    fn test_empty_series_fails() {
        assert!(SideModels::fit(&SideAngles::zeros(0), 100.0).is_err());
    }
}
