// src/data_input/marker_identifier.rs

use std::path::{Path, PathBuf};

use nalgebra::{DMatrix, Vector3};
use ndarray::{Array2, Array3, ArrayView2, Axis};
use tracing::{debug, info, warn};

use crate::data_input::capture::{mean_positions, CaptureMetadata, MotionCapture};
use crate::data_input::layout::{
    label_display_name, CenterLineSplitLayout, CompanionMatchedLayout, LayoutProfile,
    LayoutSelector,
};
use crate::data_input::roles::{RoleMapping, Side};
use crate::data_input::tsv_reader::read_capture;
use crate::error::{MocapError, MocapResult};

/// A capture after layout identification: only the retained markers, with
/// their anatomical roles.
#[derive(Debug, Clone)]
pub struct IdentifiedCapture {
    pub metadata: CaptureMetadata,
    /// Original labels of the retained markers.
    pub marker_names: Vec<String>,
    /// Shape (frames, retained markers, 3).
    pub frames: Array3<f64>,
    pub missing: Array2<bool>,
    pub roles: RoleMapping,
    pub layout_name: &'static str,
}

impl IdentifiedCapture {
    pub fn num_frames(&self) -> usize {
        self.frames.len_of(Axis(0))
    }

    pub fn num_markers(&self) -> usize {
        self.frames.len_of(Axis(1))
    }

    pub fn frequency_hz(&self) -> f64 {
        self.metadata.frequency_hz()
    }

    pub fn simple_names(&self) -> &[String] {
        self.roles.simple_names()
    }
}

/// Reads `path`, picks its layout from `selector` and identifies it.
pub fn load_identified(path: &Path, selector: &LayoutSelector) -> MocapResult<IdentifiedCapture> {
    let capture = read_capture(path)?;
    let profile = selector.select(path);
    debug!("Using {} layout for {}", profile.name(), path.display());
    identify(capture, profile, path)
}

/// Assigns anatomical roles to the markers of `capture` according to
/// `profile`. `source_path` locates companion captures and names errors.
///
/// Missing roles are not an error; they are logged and left for
/// [`RoleMapping::has_role_set`] to report.
pub fn identify(
    capture: MotionCapture,
    profile: &LayoutProfile,
    source_path: &Path,
) -> MocapResult<IdentifiedCapture> {
    let identified = match profile {
        LayoutProfile::CenterLineSplit(layout) => {
            identify_center_line(capture, layout, source_path)?
        }
        LayoutProfile::CompanionMatched(layout) => {
            identify_companion_matched(capture, layout, source_path)?
        }
    };

    for side in Side::BOTH {
        let missing = identified.roles.missing_roles(side);
        if !missing.is_empty() {
            let tags: Vec<&str> = missing.iter().map(|role| role.tag()).collect();
            warn!(
                "{}: {} side markers missing ({}). Available: {}",
                source_path.display(),
                side.name(),
                tags.join(", "),
                identified.simple_names().join(", ")
            );
        }
    }
    Ok(identified)
}

/// Temporary side labels (`l1..`, `r1..`) per marker index.
///
/// Markers whose mean Y lies below the mean of all mean-Y values are left,
/// the rest right; each side is numbered by ascending mean Y.
pub fn center_line_labels(mean_positions: ArrayView2<'_, f64>) -> Vec<String> {
    let mean_y = mean_positions.column(1);
    let center_y = mean_y.mean().unwrap_or(0.0);

    let mut left_markers: Vec<(usize, f64)> = Vec::new();
    let mut right_markers: Vec<(usize, f64)> = Vec::new();
    for (idx, &y) in mean_y.iter().enumerate() {
        if y < center_y {
            left_markers.push((idx, y));
        } else {
            right_markers.push((idx, y));
        }
    }
    left_markers.sort_by(|a, b| a.1.total_cmp(&b.1));
    right_markers.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut labels = vec![String::new(); mean_y.len()];
    for (rank, &(idx, _)) in left_markers.iter().enumerate() {
        labels[idx] = format!("l{}", rank + 1);
    }
    for (rank, &(idx, _)) in right_markers.iter().enumerate() {
        labels[idx] = format!("r{}", rank + 1);
    }
    labels
}

fn identify_center_line(
    capture: MotionCapture,
    layout: &CenterLineSplitLayout,
    source_path: &Path,
) -> MocapResult<IdentifiedCapture> {
    let means = capture.mean_positions().ok_or_else(|| MocapError::EmptyCapture {
        path: source_path.to_path_buf(),
    })?;
    let temp_labels = center_line_labels(means.view());

    let keep: Vec<usize> = (0..capture.num_markers())
        .filter(|&idx| !layout.excluded_labels.contains(&temp_labels[idx]))
        .collect();

    // Survivors are renumbered 1..n in their original index order.
    let simple_names: Vec<String> = (1..=keep.len())
        .map(|label| label_display_name(&layout.role_table, label))
        .collect();

    info!(
        "{}: center-line layout kept {} of {} markers",
        source_path.display(),
        keep.len(),
        capture.num_markers()
    );
    Ok(retain_markers(capture, &keep, simple_names, "center-line split"))
}

fn identify_companion_matched(
    capture: MotionCapture,
    layout: &CompanionMatchedLayout,
    source_path: &Path,
) -> MocapResult<IdentifiedCapture> {
    let means = capture.mean_positions().ok_or_else(|| MocapError::EmptyCapture {
        path: source_path.to_path_buf(),
    })?;

    let keep: Vec<usize> = (0..capture.num_markers())
        .filter(|idx| !layout.excluded_indices.contains(idx))
        .collect();

    let companion_path = companion_path_for(source_path, &layout.companion_file);
    info!(
        "{}: matching markers against companion capture {}",
        source_path.display(),
        companion_path.display()
    );
    let companion = read_capture(&companion_path)?;
    let companion = identify_center_line(companion, &layout.companion_layout, &companion_path)?;
    let companion_means =
        mean_positions(&companion.frames).ok_or_else(|| MocapError::EmptyCapture {
            path: companion_path.clone(),
        })?;

    let candidates = rows_as_points(means.view(), &keep);
    let all_reference: Vec<usize> = (0..companion_means.nrows()).collect();
    let reference = rows_as_points(companion_means.view(), &all_reference);

    let mut labels = greedy_nearest_labels(&candidates, &reference);
    for &[a, b] in &layout.label_swaps {
        swap_labels_if_both_present(&mut labels, a, b);
    }

    let unmatched = labels.iter().filter(|label| label.is_none()).count();
    if unmatched > 0 {
        warn!(
            "{}: {} markers had no companion match and were labelled {}",
            source_path.display(),
            unmatched,
            layout.unmatched_label
        );
    }

    let simple_names: Vec<String> = labels
        .iter()
        .map(|label| {
            label_display_name(&layout.role_table, label.unwrap_or(layout.unmatched_label))
        })
        .collect();

    Ok(retain_markers(capture, &keep, simple_names, "companion-matched"))
}

/// Greedy closest-pair matching of candidate points to reference points.
///
/// Repeatedly takes the globally smallest distance between a still
/// unlabelled candidate and a still unused reference point (first in
/// row-major order on ties) and labels the candidate with the 1-based
/// reference index. Stops when either side runs out; leftover candidates
/// are `None`.
///
/// This is a heuristic for one pair of recordings of the same rig, not a
/// general pose-matching method.
pub fn greedy_nearest_labels(
    candidates: &[Vector3<f64>],
    reference: &[Vector3<f64>],
) -> Vec<Option<usize>> {
    let distances = DMatrix::from_fn(candidates.len(), reference.len(), |row, col| {
        (candidates[row] - reference[col]).norm()
    });

    let mut labels: Vec<Option<usize>> = vec![None; candidates.len()];
    let mut used_columns = vec![false; reference.len()];
    let pairs = candidates.len().min(reference.len());

    for _ in 0..pairs {
        let mut best: Option<(usize, usize, f64)> = None;
        for row in 0..distances.nrows() {
            if labels[row].is_some() {
                continue;
            }
            for col in 0..distances.ncols() {
                if used_columns[col] {
                    continue;
                }
                let distance = distances[(row, col)];
                if best.map_or(true, |(_, _, d)| distance < d) {
                    best = Some((row, col, distance));
                }
            }
        }
        match best {
            Some((row, col, _)) => {
                labels[row] = Some(col + 1);
                used_columns[col] = true;
            }
            None => break,
        }
    }
    labels
}

/// Exchanges labels `a` and `b` when both were assigned.
pub fn swap_labels_if_both_present(labels: &mut [Option<usize>], a: usize, b: usize) {
    let has_a = labels.contains(&Some(a));
    let has_b = labels.contains(&Some(b));
    if !(has_a && has_b) {
        return;
    }
    for label in labels.iter_mut() {
        if *label == Some(a) {
            *label = Some(b);
        } else if *label == Some(b) {
            *label = Some(a);
        }
    }
}

fn companion_path_for(source_path: &Path, companion_file: &str) -> PathBuf {
    source_path
        .parent()
        .map(|dir| dir.join(companion_file))
        .unwrap_or_else(|| PathBuf::from(companion_file))
}

fn rows_as_points(positions: ArrayView2<'_, f64>, rows: &[usize]) -> Vec<Vector3<f64>> {
    rows.iter()
        .map(|&row| {
            Vector3::new(
                positions[[row, 0]],
                positions[[row, 1]],
                positions[[row, 2]],
            )
        })
        .collect()
}

fn retain_markers(
    capture: MotionCapture,
    keep: &[usize],
    simple_names: Vec<String>,
    layout_name: &'static str,
) -> IdentifiedCapture {
    IdentifiedCapture {
        frames: capture.frames.select(Axis(1), keep),
        missing: capture.missing.select(Axis(1), keep),
        marker_names: keep
            .iter()
            .map(|&idx| capture.marker_names[idx].clone())
            .collect(),
        roles: RoleMapping::from_names(&simple_names),
        metadata: capture.metadata,
        layout_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_greedy_closest_pair() {
        let reference = [Vector3::new(0.0, 0.0, 0.0), Vector3::new(10.0, 0.0, 0.0)];
        let candidates = [Vector3::new(10.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0)];
        assert_eq!(
            greedy_nearest_labels(&candidates, &reference),
            vec![Some(2), Some(1)]
        );
    }

    #[test]
    fn test_greedy_leaves_extra_candidates_unlabelled() {
        let reference = [Vector3::new(0.0, 0.0, 0.0)];
        let candidates = [Vector3::new(5.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)];
        assert_eq!(
            greedy_nearest_labels(&candidates, &reference),
            vec![None, Some(1)]
        );
    }

    #[test]
    fn test_greedy_is_global_not_per_row() {
        // Row 0 is closest to col 0, but row 1 is even closer to it.
        let reference = [Vector3::new(0.0, 0.0, 0.0), Vector3::new(100.0, 0.0, 0.0)];
        let candidates = [Vector3::new(3.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)];
        assert_eq!(
            greedy_nearest_labels(&candidates, &reference),
            vec![Some(2), Some(1)]
        );
    }

    #[test]
    fn test_swap_only_when_both_present() {
        let mut labels = vec![Some(3), Some(7), Some(1)];
        swap_labels_if_both_present(&mut labels, 3, 7);
        assert_eq!(labels, vec![Some(7), Some(3), Some(1)]);

        let mut labels = vec![Some(3), None, Some(1)];
        swap_labels_if_both_present(&mut labels, 3, 7);
        assert_eq!(labels, vec![Some(3), None, Some(1)]);
    }

    #[test]
    fn test_center_line_labels() {
        let means = array![
            [0.0, -10.0, 0.0],
            [0.0, 30.0, 0.0],
            [0.0, -20.0, 0.0],
            [0.0, 10.0, 0.0],
        ];
        assert_eq!(center_line_labels(means.view()), vec!["l2", "r2", "l1", "r1"]);
    }

    #[test]
    fn test_empty_capture_cannot_be_identified() {
        let capture = MotionCapture {
            metadata: CaptureMetadata::new(),
            marker_names: vec!["A".into()],
            frames: Array3::zeros((0, 1, 3)),
            missing: Array2::from_elem((0, 1), false),
        };
        let profile = LayoutSelector::builtin().default_profile;
        let result = identify(capture, &profile, Path::new("empty.tsv"));
        assert!(matches!(result, Err(MocapError::EmptyCapture { .. })));
    }
}
