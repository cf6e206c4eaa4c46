// src/plot_functions/plot_marker_trajectories.rs

use std::error::Error;

use ndarray::{Array3, Axis};
use plotters::backend::BitMapBackend;
use plotters::drawing::IntoDrawingArea;

use crate::constants::{MARKER_START_POINT_SIZE, PLOT_HEIGHT, PLOT_WIDTH};
use crate::plot_framework::{
    draw_markers_3d, draw_root_title, draw_unavailable_message, equal_scale_ranges, marker_color,
    Marker3d,
};
use crate::types::{MarkerPoint, MarkerTrack};

/// Per-marker tracks of a (frame, marker, axis) tensor.
pub fn marker_tracks(frames: &Array3<f64>) -> Vec<MarkerTrack> {
    frames
        .axis_iter(Axis(1))
        .map(|track| {
            track
                .outer_iter()
                .map(|p| [p[0], p[1], p[2]])
                .collect()
        })
        .collect()
}

/// Generates the 3D trajectory plot: one coloured path per marker, with the
/// marker's first position dotted and labelled. Axes share one scale.
pub fn plot_marker_trajectories(
    frames: &Array3<f64>,
    marker_labels: &[String],
    root_name: &str,
) -> Result<(), Box<dyn Error>> {
    let output_file = format!("{}_MarkerTrajectories.png", root_name);

    let root_area =
        BitMapBackend::new(&output_file, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    draw_root_title(&root_area, root_name)?;
    let plot_area = root_area.margin(50, 5, 5, 5);

    let tracks = marker_tracks(frames);
    let all_points: Vec<MarkerPoint> = tracks.iter().flatten().copied().collect();

    match equal_scale_ranges(&all_points) {
        Some(ranges) => {
            let markers: Vec<Marker3d<'_>> = tracks
                .iter()
                .enumerate()
                .filter_map(|(idx, track)| {
                    Some(Marker3d {
                        label: marker_labels.get(idx).map(String::as_str).unwrap_or("?"),
                        color: marker_color(idx, tracks.len()),
                        trail: track.as_slice(),
                        position: *track.first()?,
                    })
                })
                .collect();
            draw_markers_3d(
                &plot_area,
                "Marker Trajectories (X, Y, Z in mm, Z up)",
                &ranges,
                &markers,
                MARKER_START_POINT_SIZE,
            )?;
            root_area.present()?;
            println!("  Trajectory plot saved as '{output_file}'.");
        }
        None => {
            draw_unavailable_message(&plot_area, "Marker", "Trajectory", "No frames")?;
            root_area.present()?;
            println!("  '{output_file}' saved with a placeholder message only: no frames to plot.");
        }
    }
    Ok(())
}

// src/plot_functions/plot_marker_trajectories.rs
