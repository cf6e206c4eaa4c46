// src/plot_functions/plot_joint_angles.rs

use std::error::Error;

use plotters::style::RGBColor;

use crate::constants::{COLOR_LEFT_SIDE, COLOR_RIGHT_SIDE, LINE_WIDTH_PLOT};
use crate::data_analysis::joint_angles::JointAngles;
use crate::plot_framework::{draw_stacked_plot, range_of, PlotSeries};

/// Generates the stacked Q1/Q2/Q3 plot, right side (blue) against left side
/// (red) over time. `first_frame` is the capture frame index of the first
/// sample, so sliced ranges keep their true time axis; a slice shorter than
/// `total_frames` gets its frame window in the title.
pub fn plot_joint_angles(
    angles: &JointAngles,
    frequency_hz: f64,
    root_name: &str,
    first_frame: usize,
    total_frames: usize,
) -> Result<(), Box<dyn Error>> {
    let output_file = format!("{}_JointAngles_stacked.png", root_name);
    let plot_type_name = "Joint Angle";
    let end_frame = first_frame + angles.num_frames();
    let title = if first_frame > 0 || end_frame < total_frames {
        format!("{root_name} (frames {first_frame}-{end_frame} of {total_frames})")
    } else {
        root_name.to_string()
    };
    let panel_names = ["Q1", "Q2", "Q3"];

    let time: Vec<f64> = (0..angles.num_frames())
        .map(|i| (first_frame + i) as f64 / frequency_hz)
        .collect();
    let right = angles.right.series();
    let left = angles.left.series();

    let color_right: RGBColor = *COLOR_RIGHT_SIDE;
    let color_left: RGBColor = *COLOR_LEFT_SIDE;

    draw_stacked_plot(
        &output_file,
        &title,
        plot_type_name,
        &panel_names,
        |panel_index| {
            let right_data: Vec<(f64, f64)> = time
                .iter()
                .copied()
                .zip(right[panel_index].iter().copied())
                .collect();
            let left_data: Vec<(f64, f64)> = time
                .iter()
                .copied()
                .zip(left[panel_index].iter().copied())
                .collect();

            let x_range = time.first().copied()?..time.last().copied()?;
            let y_range = range_of(
                right[panel_index]
                    .iter()
                    .chain(left[panel_index].iter())
                    .copied(),
            )?;

            let q = panel_index + 1;
            let series = vec![
                PlotSeries::line(right_data, format!("Right (qr{q})"), color_right, LINE_WIDTH_PLOT),
                PlotSeries::line(left_data, format!("Left (ql{q})"), color_left, LINE_WIDTH_PLOT),
            ];

            Some((
                format!("Q{q}"),
                x_range,
                y_range,
                series,
                "Time (s)".to_string(),
                "Angle (deg)".to_string(),
            ))
        },
    )
}

// src/plot_functions/plot_joint_angles.rs
