// src/data_analysis/joint_angles.rs

use nalgebra::Vector3;
use ndarray::{s, Array1, Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data_analysis::geometry::{angle_between_vectors, angle_with_xy_plane};
use crate::data_input::roles::{RoleMapping, Side};

/// q1, q2, q3 of one body side, in degrees, one value per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SideAngles {
    /// Elevation of the shank (ankle - knee) above the XY plane.
    pub q1: Array1<f64>,
    /// Knee flexion: 180 minus the ankle-knee-hip angle.
    pub q2: Array1<f64>,
    /// Hip flexion: 180 minus the knee-hip-shoulder angle.
    pub q3: Array1<f64>,
}

impl SideAngles {
    pub fn zeros(num_frames: usize) -> Self {
        Self {
            q1: Array1::zeros(num_frames),
            q2: Array1::zeros(num_frames),
            q3: Array1::zeros(num_frames),
        }
    }

    pub fn len(&self) -> usize {
        self.q2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.q2.is_empty()
    }

    /// The series as `[q1, q2, q3]`.
    pub fn series(&self) -> [&Array1<f64>; 3] {
        [&self.q1, &self.q2, &self.q3]
    }

    fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            q1: self.q1.slice(s![start..end]).to_owned(),
            q2: self.q2.slice(s![start..end]).to_owned(),
            q3: self.q3.slice(s![start..end]).to_owned(),
        }
    }
}

/// Joint angle series for both sides.
#[derive(Debug, Clone, PartialEq)]
pub struct JointAngles {
    pub right: SideAngles,
    pub left: SideAngles,
}

impl JointAngles {
    pub fn num_frames(&self) -> usize {
        self.right.len()
    }

    pub fn side(&self, side: Side) -> &SideAngles {
        match side {
            Side::Right => &self.right,
            Side::Left => &self.left,
        }
    }

    pub fn qr1(&self) -> &Array1<f64> {
        &self.right.q1
    }

    pub fn qr2(&self) -> &Array1<f64> {
        &self.right.q2
    }

    pub fn qr3(&self) -> &Array1<f64> {
        &self.right.q3
    }

    pub fn ql1(&self) -> &Array1<f64> {
        &self.left.q1
    }

    pub fn ql2(&self) -> &Array1<f64> {
        &self.left.q2
    }

    pub fn ql3(&self) -> &Array1<f64> {
        &self.left.q3
    }

    /// Frames `[start, end)` of `range` resolved against this series.
    pub fn slice_frames(&self, range: FrameRange) -> Self {
        let (start, end) = range.resolve(self.num_frames());
        Self {
            right: self.right.slice(start, end),
            left: self.left.slice(start, end),
        }
    }
}

/// Optional frame window; `end` is exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl FrameRange {
    pub fn new(start: Option<usize>, end: Option<usize>) -> Self {
        Self { start, end }
    }

    pub fn is_full(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Clamps to `0 <= start <= end <= num_frames`.
    pub fn resolve(&self, num_frames: usize) -> (usize, usize) {
        let start = self.start.unwrap_or(0).min(num_frames);
        let end = self.end.unwrap_or(num_frames).clamp(start, num_frames);
        (start, end)
    }
}

fn marker_vector(frame: &ArrayView2<'_, f64>, marker: usize) -> Vector3<f64> {
    Vector3::new(
        frame[[marker, 0]],
        frame[[marker, 1]],
        frame[[marker, 2]],
    )
}

/// q1, q2, q3 for one frame given the ankle, knee, hip and shoulder rows.
pub fn frame_angles(frame: &ArrayView2<'_, f64>, chain: [usize; 4]) -> (f64, f64, f64) {
    let [ankle, knee, hip, shoulder] = chain.map(|idx| marker_vector(frame, idx));

    let shank = ankle - knee;
    let thigh = hip - knee;
    let q1 = angle_with_xy_plane(&shank);
    let q2 = 180.0 - angle_between_vectors(&shank, &thigh);
    let q3 = 180.0 - angle_between_vectors(&(knee - hip), &(shoulder - hip));
    (q1, q2, q3)
}

/// Computes q1..q3 for both sides of every frame of a (frame, marker, axis)
/// tensor. A side without its full ankle/knee/hip/shoulder set is left at
/// zero.
pub fn calculate_angles(frames: &Array3<f64>, roles: &RoleMapping) -> JointAngles {
    let num_frames = frames.len_of(Axis(0));

    let side_angles = |side: Side| -> SideAngles {
        let Some(chain) = roles.side_indices(side) else {
            debug!(
                "{} side angles set to zero, missing markers: {:?}",
                side.name(),
                roles.missing_roles(side)
            );
            return SideAngles::zeros(num_frames);
        };

        let mut angles = SideAngles::zeros(num_frames);
        for (i, frame) in frames.axis_iter(Axis(0)).enumerate() {
            let (q1, q2, q3) = frame_angles(&frame, chain);
            angles.q1[i] = q1;
            angles.q2[i] = q2;
            angles.q3[i] = q3;
        }
        debug!("{} side angles computed for {} frames", side.name(), num_frames);
        angles
    };

    JointAngles {
        right: side_angles(Side::Right),
        left: side_angles(Side::Left),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn single_frame(points: &[[f64; 3]]) -> Array3<f64> {
        let mut frames = Array3::zeros((1, points.len(), 3));
        for (m, p) in points.iter().enumerate() {
            for axis in 0..3 {
                frames[[0, m, axis]] = p[axis];
            }
        }
        frames
    }

    #[test]
    fn test_right_angle_knee() {
        // ra, rk, rh, rs
        let frames = single_frame(&[
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 100.0],
            [100.0, 0.0, 100.0],
            [100.0, 0.0, 200.0],
        ]);
        let roles = RoleMapping::from_names(&["ra", "rk", "rh", "rs"]);
        let angles = calculate_angles(&frames, &roles);

        assert_abs_diff_eq!(angles.qr1()[0], 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angles.qr2()[0], 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(angles.qr3()[0], 90.0, epsilon = 1e-9);
        // Left side missing entirely.
        assert_eq!(angles.ql2()[0], 0.0);
    }

    #[test]
    fn test_colinear_leg_is_fully_extended() {
        let frames = single_frame(&[
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 100.0],
            [0.0, 0.0, 200.0],
            [0.0, 0.0, 300.0],
        ]);
        let roles = RoleMapping::from_names(&["la", "lk", "lh", "ls"]);
        let angles = calculate_angles(&frames, &roles);
        // 180 minus a straight vertex angle
        assert_abs_diff_eq!(angles.ql2()[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(angles.ql3()[0], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_repeated_ankle_tag_uses_last_marker() {
        let frames = single_frame(&[
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 100.0],
            [100.0, 0.0, 100.0],
            [100.0, 0.0, 200.0],
            [-100.0, 0.0, 100.0],
        ]);
        let roles = RoleMapping::from_names(&["ra", "rk", "rh", "rs", "ra"]);
        let angles = calculate_angles(&frames, &roles);
        // The second "ra" lies level with the knee
        assert_abs_diff_eq!(angles.qr1()[0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_frame_range_resolve() {
        assert_eq!(FrameRange::default().resolve(10), (0, 10));
        assert_eq!(FrameRange::new(Some(3), Some(7)).resolve(10), (3, 7));
        assert_eq!(FrameRange::new(Some(12), None).resolve(10), (10, 10));
        assert_eq!(FrameRange::new(Some(5), Some(2)).resolve(10), (5, 5));
        assert_eq!(FrameRange::new(None, Some(50)).resolve(10), (0, 10));
    }

    #[test]
    fn test_slice_frames() {
        let angles = JointAngles {
            right: SideAngles {
                q1: Array1::from(vec![1.0, 2.0, 3.0, 4.0]),
                q2: Array1::from(vec![5.0, 6.0, 7.0, 8.0]),
                q3: Array1::from(vec![9.0, 10.0, 11.0, 12.0]),
            },
            left: SideAngles::zeros(4),
        };
        let sliced = angles.slice_frames(FrameRange::new(Some(1), Some(3)));
        assert_eq!(sliced.num_frames(), 2);
        assert_eq!(sliced.qr2().to_vec(), vec![6.0, 7.0]);
    }
}
