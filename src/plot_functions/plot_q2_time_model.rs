// src/plot_functions/plot_q2_time_model.rs

use std::error::Error;

use plotters::style::RGBColor;

use crate::constants::{
    COLOR_LEFT_SIDE, COLOR_Q2_DERIVATIVE, COLOR_Q2_MODEL, COLOR_RIGHT_SIDE, FIT_CURVE_POINTS,
    LINE_WIDTH_PLOT, SCATTER_POINT_SIZE,
};
use crate::data_analysis::angle_models::AngleModels;
use crate::data_analysis::joint_angles::JointAngles;
use crate::data_analysis::polyfit::linspace;
use crate::data_input::roles::Side;
use crate::plot_framework::{draw_stacked_plot, range_of, PlotSeries};

/// Generates the q2(t) model plot: for each side, measured q2 with its
/// quintic time fit, followed by the dq2/dt gradient.
pub fn plot_q2_time_model(
    angles: &JointAngles,
    models: &AngleModels,
    root_name: &str,
) -> Result<(), Box<dyn Error>> {
    let output_file = format!("{}_Q2Model_stacked.png", root_name);
    let plot_type_name = "Q2 Model";
    let panel_names = ["Right q2(t)", "Right dq2/dt", "Left q2(t)", "Left dq2/dt"];

    draw_stacked_plot(
        &output_file,
        root_name,
        plot_type_name,
        &panel_names,
        |panel_index| {
            let side = if panel_index < 2 { Side::Right } else { Side::Left };
            let side_models = models.side(side);
            let q2 = &angles.side(side).q2;
            let time = &side_models.time;
            let data_color: RGBColor = match side {
                Side::Right => *COLOR_RIGHT_SIDE,
                Side::Left => *COLOR_LEFT_SIDE,
            };

            let x_range = time.iter().next().copied()?..time.iter().last().copied()?;

            if panel_index % 2 == 0 {
                let samples: Vec<(f64, f64)> =
                    time.iter().copied().zip(q2.iter().copied()).collect();
                let curve_time = linspace(x_range.start, x_range.end, FIT_CURVE_POINTS);
                let fitted = side_models.q2_of_t.eval_many(&curve_time);
                let curve: Vec<(f64, f64)> = curve_time
                    .into_iter()
                    .zip(fitted.iter().copied())
                    .collect();
                let y_range = range_of(
                    samples
                        .iter()
                        .map(|p| p.1)
                        .chain(curve.iter().map(|p| p.1)),
                )?;
                let series = vec![
                    PlotSeries::scatter(samples, "Data", data_color, SCATTER_POINT_SIZE),
                    PlotSeries::line(
                        curve,
                        "Quintic fit",
                        *COLOR_Q2_MODEL,
                        LINE_WIDTH_PLOT,
                    ),
                ];
                Some((
                    format!("{}: q2(t)", side.name()),
                    x_range,
                    y_range,
                    series,
                    "Time (s)".to_string(),
                    "q2 (deg)".to_string(),
                ))
            } else {
                let derivative: Vec<(f64, f64)> = time
                    .iter()
                    .copied()
                    .zip(side_models.dq2_dt.iter().copied())
                    .collect();
                let y_range = range_of(derivative.iter().map(|p| p.1))?;
                let series = vec![PlotSeries::line(
                    derivative,
                    "dq2/dt",
                    *COLOR_Q2_DERIVATIVE,
                    LINE_WIDTH_PLOT,
                )];
                Some((
                    format!("{}: dq2/dt", side.name()),
                    x_range,
                    y_range,
                    series,
                    "Time (s)".to_string(),
                    "dq2/dt (deg/s)".to_string(),
                ))
            }
        },
    )
}

// src/plot_functions/plot_q2_time_model.rs
