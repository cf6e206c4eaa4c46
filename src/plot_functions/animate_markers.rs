// src/plot_functions/animate_markers.rs

use std::error::Error;
use std::path::Path;

use ndarray::{Array3, Axis};
use plotters::backend::BitMapBackend;
use plotters::drawing::IntoDrawingArea;
use plotters::style::RGBColor;
use tracing::{debug, info};

use crate::constants::{
    ANIMATION_HEIGHT, ANIMATION_WIDTH, ANIMATION_WIDTH_WITH_ANGLES, COLOR_LEFT_SIDE,
    COLOR_RIGHT_SIDE, COLOR_TIME_CURSOR, DEFAULT_ANIMATION_INTERVAL_MS,
    DEFAULT_ANIMATION_SKIP_FRAMES, LINE_WIDTH_PLOT, MARKER_POINT_SIZE,
};
use crate::data_analysis::joint_angles::JointAngles;
use crate::plot_framework::{
    draw_markers_3d, draw_panel, draw_root_title, equal_scale_ranges, marker_color, range_of,
    Marker3d, PlotSeries,
};
use crate::plot_functions::plot_marker_trajectories::marker_tracks;
use crate::types::{MarkerPoint, PanelPlotData};

const ANGLE_PANEL_TITLES: [&str; 3] = [
    "Q1: Knee-Ankle vs XY plane",
    "Q2: Knee Angle",
    "Q3: Hip Angle",
];

#[derive(Debug, Clone)]
pub struct AnimationOptions {
    pub title: String,
    /// Render every n-th frame.
    pub skip_frames: usize,
    /// Delay between rendered frames.
    pub interval_ms: u32,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            title: "Motion Capture Visualization".to_string(),
            skip_frames: DEFAULT_ANIMATION_SKIP_FRAMES,
            interval_ms: DEFAULT_ANIMATION_INTERVAL_MS,
        }
    }
}

/// Joint angles shown next to the 3D view, with their sample rate.
pub struct AngleOverlay<'a> {
    pub angles: &'a JointAngles,
    pub frequency_hz: f64,
}

/// Indices of the frames an animation renders.
pub fn animation_frame_indices(num_frames: usize, skip_frames: usize) -> Vec<usize> {
    (0..num_frames).step_by(skip_frames.max(1)).collect()
}

/// Writes a GIF with one image per rendered frame: the labelled 3D marker
/// cloud and, with `overlay`, a column of Q1/Q2/Q3 plots whose cursor follows
/// the current time. Returns the number of images written.
pub fn animate_markers(
    frames: &Array3<f64>,
    marker_labels: &[String],
    overlay: Option<AngleOverlay<'_>>,
    output_path: &Path,
    options: &AnimationOptions,
) -> Result<usize, Box<dyn Error>> {
    let num_frames = frames.len_of(Axis(0));
    let tracks = marker_tracks(frames);
    let all_points: Vec<MarkerPoint> = tracks.iter().flatten().copied().collect();
    let Some(ranges) = equal_scale_ranges(&all_points) else {
        return Err(format!("no marker positions to animate in '{}'", options.title).into());
    };

    let width = if overlay.is_some() {
        ANIMATION_WIDTH_WITH_ANGLES
    } else {
        ANIMATION_WIDTH
    };
    let root_area = BitMapBackend::gif(output_path, (width, ANIMATION_HEIGHT), options.interval_ms)?
        .into_drawing_area();

    let angle_panels = overlay.as_ref().map(build_angle_panels);
    let colors: Vec<RGBColor> = (0..tracks.len())
        .map(|idx| marker_color(idx, tracks.len()))
        .collect();

    let frame_indices = animation_frame_indices(num_frames, options.skip_frames);
    info!(
        "Rendering {} of {} frames to {}",
        frame_indices.len(),
        num_frames,
        output_path.display()
    );

    for &frame_idx in &frame_indices {
        draw_root_title(
            &root_area,
            &format!("{} - Frame {}/{}", options.title, frame_idx + 1, num_frames),
        )?;
        let content_area = root_area.margin(50, 5, 5, 5);

        let (view_area, side_area) = if overlay.is_some() {
            let (left, right) = content_area.split_horizontally(ANIMATION_WIDTH - 40);
            (left, Some(right))
        } else {
            (content_area, None)
        };

        let markers: Vec<Marker3d<'_>> = tracks
            .iter()
            .enumerate()
            .map(|(idx, track)| Marker3d {
                label: marker_labels.get(idx).map(String::as_str).unwrap_or("?"),
                color: colors[idx],
                trail: &[],
                position: track[frame_idx],
            })
            .collect();
        draw_markers_3d(
            &view_area,
            "3D Marker Positions",
            &ranges,
            &markers,
            MARKER_POINT_SIZE,
        )?;

        if let (Some(side_area), Some(overlay), Some(panels)) =
            (side_area, overlay.as_ref(), angle_panels.as_ref())
        {
            let cursor_time = frame_idx as f64 / overlay.frequency_hz;
            for (panel_index, area) in side_area.split_evenly((3, 1)).iter().enumerate() {
                let panel = panels[panel_index]
                    .as_ref()
                    .map(|panel| with_time_cursor(panel, cursor_time));
                draw_panel(area, ANGLE_PANEL_TITLES[panel_index], "Angle", panel)?;
            }
        }

        root_area.present()?;
        debug!("Rendered animation frame {}", frame_idx);
    }

    println!(
        "  Animation saved as '{}' ({} frames).",
        output_path.display(),
        frame_indices.len()
    );
    Ok(frame_indices.len())
}

/// Right/left series of each angle, without the cursor.
fn build_angle_panels(overlay: &AngleOverlay<'_>) -> [Option<PanelPlotData>; 3] {
    let angles = overlay.angles;
    let time: Vec<f64> = (0..angles.num_frames())
        .map(|i| i as f64 / overlay.frequency_hz)
        .collect();
    let right = angles.right.series();
    let left = angles.left.series();

    std::array::from_fn(|q| {
        let x_range = time.first().copied()?..time.last().copied()?;
        let y_range = range_of(right[q].iter().chain(left[q].iter()).copied())?;
        let right_data = time.iter().copied().zip(right[q].iter().copied()).collect();
        let left_data = time.iter().copied().zip(left[q].iter().copied()).collect();
        Some((
            ANGLE_PANEL_TITLES[q].to_string(),
            x_range,
            y_range,
            vec![
                PlotSeries::line(right_data, "Right", *COLOR_RIGHT_SIDE, LINE_WIDTH_PLOT),
                PlotSeries::line(left_data, "Left", *COLOR_LEFT_SIDE, LINE_WIDTH_PLOT),
            ],
            "Time (s)".to_string(),
            "Angle (deg)".to_string(),
        ))
    })
}

fn with_time_cursor(panel: &PanelPlotData, time: f64) -> PanelPlotData {
    let (title, x_range, y_range, mut series, x_label, y_label) = panel.clone();
    series.push(PlotSeries::line(
        vec![(time, y_range.start), (time, y_range.end)],
        "",
        *COLOR_TIME_CURSOR,
        LINE_WIDTH_PLOT,
    ));
    (title, x_range, y_range, series, x_label, y_label)
}


// src/plot_functions/animate_markers.rs
