// src/plot_functions/plot_angle_dependencies.rs

use std::error::Error;

use plotters::style::RGBColor;

use crate::constants::{
    COLOR_FIT_LEFT, COLOR_FIT_RIGHT, COLOR_LEFT_SIDE, COLOR_RIGHT_SIDE, FIT_CURVE_POINTS,
    LINE_WIDTH_PLOT, SCATTER_POINT_SIZE,
};
use crate::data_analysis::angle_models::AngleModels;
use crate::data_analysis::joint_angles::JointAngles;
use crate::data_analysis::polyfit::{linspace, Polynomial};
use crate::data_input::roles::Side;
use crate::plot_framework::{draw_grid_plot, range_of, PlotSeries};

/// Generates the 2x2 grid of q1(q2) and q3(q2) per side: measured samples
/// as dots and the fitted cubic as a curve over the observed q2 span.
pub fn plot_angle_dependencies(
    angles: &JointAngles,
    models: &AngleModels,
    root_name: &str,
) -> Result<(), Box<dyn Error>> {
    let output_file = format!("{}_AngleDependencies.png", root_name);
    let plot_type_name = "Angle Dependency";
    let panel_names = ["Right q1", "Right q3", "Left q1", "Left q3"];

    draw_grid_plot(
        &output_file,
        root_name,
        plot_type_name,
        &panel_names,
        (2, 2),
        |panel_index| {
            let side = if panel_index < 2 { Side::Right } else { Side::Left };
            let dependent = if panel_index % 2 == 0 { 1 } else { 3 };

            let side_angles = angles.side(side);
            let side_models = models.side(side);
            let (values, polynomial, phi_name) = if dependent == 1 {
                (&side_angles.q1, &side_models.phi1, "phi_1")
            } else {
                (&side_angles.q3, &side_models.phi3, "phi_3")
            };
            let (data_color, fit_color): (RGBColor, RGBColor) = match side {
                Side::Right => (*COLOR_RIGHT_SIDE, *COLOR_FIT_RIGHT),
                Side::Left => (*COLOR_LEFT_SIDE, *COLOR_FIT_LEFT),
            };

            let samples: Vec<(f64, f64)> = side_angles
                .q2
                .iter()
                .copied()
                .zip(values.iter().copied())
                .collect();
            let curve = fitted_curve(polynomial, &side_angles.q2.to_vec());

            let x_range = range_of(samples.iter().map(|p| p.0))?;
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
                    format!("{phi_name}(q2) approximation"),
                    fit_color,
                    LINE_WIDTH_PLOT,
                ),
            ];

            Some((
                format!("{}: q{} vs q2", side.name(), dependent),
                x_range,
                y_range,
                series,
                "q2 (deg)".to_string(),
                format!("q{} (deg)", dependent),
            ))
        },
    )
}

/// Evaluates `polynomial` on evenly spaced points across the span of `x`.
fn fitted_curve(polynomial: &Polynomial, x: &[f64]) -> Vec<(f64, f64)> {
    let min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min > max {
        return Vec::new();
    }
    let q2 = linspace(min, max, FIT_CURVE_POINTS);
    let fitted = polynomial.eval_many(&q2);
    q2.into_iter().zip(fitted.iter().copied()).collect()
}

// src/plot_functions/plot_angle_dependencies.rs
