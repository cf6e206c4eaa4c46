// src/data_analysis/geometry.rs

use nalgebra::Vector3;

/// Elevation of `v` above the XY plane, in degrees.
///
/// The zero vector gives 0. A purely vertical vector has no horizontal
/// projection to measure against and gives 90.
pub fn angle_with_xy_plane(v: &Vector3<f64>) -> f64 {
    let norm = v.norm();
    if norm == 0.0 {
        return 0.0;
    }
    let projection = Vector3::new(v.x, v.y, 0.0);
    let projection_norm = projection.norm();
    if projection_norm == 0.0 {
        return 90.0;
    }
    let cos_angle = (v.dot(&projection) / (norm * projection_norm)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

/// Unsigned angle between two vectors in degrees; 0 when either is zero.
pub fn angle_between_vectors(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    let norm1 = v1.norm();
    let norm2 = v2.norm();
    if norm1 == 0.0 || norm2 == 0.0 {
        return 0.0;
    }
    let cos_angle = (v1.dot(v2) / (norm1 * norm2)).clamp(-1.0, 1.0);
    cos_angle.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_angle_with_xy_plane() {
        assert_eq!(angle_with_xy_plane(&Vector3::zeros()), 0.0);
        assert_abs_diff_eq!(angle_with_xy_plane(&Vector3::new(3.0, -4.0, 0.0)), 0.0);
        assert_eq!(angle_with_xy_plane(&Vector3::new(0.0, 0.0, 1.0)), 90.0);
        assert_eq!(angle_with_xy_plane(&Vector3::new(0.0, 0.0, -5.0)), 90.0);
        assert_abs_diff_eq!(
            angle_with_xy_plane(&Vector3::new(1.0, 0.0, 1.0)),
            45.0,
            epsilon = 1e-9
        );
        // Elevation is unsigned.
        assert_abs_diff_eq!(
            angle_with_xy_plane(&Vector3::new(1.0, 0.0, -1.0)),
            45.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_angle_between_vectors() {
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert_abs_diff_eq!(angle_between_vectors(&v, &v), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(angle_between_vectors(&v, &-v), 180.0, epsilon = 1e-6);
        assert_abs_diff_eq!(
            angle_between_vectors(&Vector3::x(), &Vector3::y()),
            90.0,
            epsilon = 1e-12
        );
        assert_eq!(angle_between_vectors(&v, &Vector3::zeros()), 0.0);
    }
}
