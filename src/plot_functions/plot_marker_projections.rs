// src/plot_functions/plot_marker_projections.rs

use std::error::Error;

use ndarray::{ArrayView2, Axis};
use plotters::backend::BitMapBackend;
use plotters::chart::ChartBuilder;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, Text};
use plotters::style::colors::WHITE;
use plotters::style::{Color, IntoFont, RGBColor};

use crate::axis_names::axis_name;
use crate::constants::{
    COLOR_MARKER_LABEL, COLOR_PROJECTIONS, MARKER_POINT_SIZE, PLOT_HEIGHT, PLOT_WIDTH,
};
use crate::font_config::{FONT_TUPLE_AXIS_LABEL, FONT_TUPLE_CHART_TITLE, FONT_TUPLE_MARKER_LABEL};
use crate::plot_framework::{draw_root_title, draw_unavailable_message, equal_scale_ranges};
use crate::types::MarkerPoint;

/// (horizontal axis, vertical axis, view name) per projection panel.
const PROJECTIONS: [(usize, usize, &str); 3] =
    [(0, 1, "top view"), (0, 2, "side view"), (1, 2, "front view")];

/// Generates the XY, XZ and YZ projections of every marker in frame
/// `frame_index`, each point labelled with its marker name.
pub fn plot_marker_projections(
    frame: ArrayView2<'_, f64>,
    frame_index: usize,
    marker_labels: &[String],
    root_name: &str,
) -> Result<(), Box<dyn Error>> {
    let output_file = format!("{}_MarkerProjections_frame{}.png", root_name, frame_index);

    let root_area =
        BitMapBackend::new(&output_file, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    draw_root_title(
        &root_area,
        &format!("{} - Marker Positions - Frame {}", root_name, frame_index + 1),
    )?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let panels = margined_root_area.split_evenly((1, 3));

    let points: Vec<MarkerPoint> = frame
        .axis_iter(Axis(0))
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let ranges = equal_scale_ranges(&points);

    let projection_panels = panels.iter().zip(PROJECTIONS.iter()).zip(COLOR_PROJECTIONS);
    for ((area, &(h, v, view)), color) in projection_panels {
        let panel_name = format!("{}{}", axis_name(h), axis_name(v));
        match &ranges {
            Some(ranges) => draw_projection(
                area,
                &points,
                marker_labels,
                (h, v),
                (ranges[h].clone(), ranges[v].clone()),
                &format!("{panel_name} Projection ({view})"),
                *color,
            )?,
            None => draw_unavailable_message(area, &panel_name, "Projection", "No markers")?,
        }
    }

    root_area.present()?;
    println!("  Projection plot saved as '{output_file}'.");
    Ok(())
}

fn draw_projection(
    area: &DrawingArea<BitMapBackend, Shift>,
    points: &[MarkerPoint],
    marker_labels: &[String],
    (h, v): (usize, usize),
    (x_range, y_range): (std::ops::Range<f64>, std::ops::Range<f64>),
    title: &str,
    color: RGBColor,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, FONT_TUPLE_CHART_TITLE)
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(format!("{} (mm)", axis_name(h)))
        .y_desc(format!("{} (mm)", axis_name(v)))
        .light_line_style(WHITE.mix(0.7))
        .label_style(FONT_TUPLE_AXIS_LABEL)
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new((p[h], p[v]), MARKER_POINT_SIZE, color.mix(0.7).filled())),
    )?;

    let label_style = FONT_TUPLE_MARKER_LABEL
        .into_font()
        .color(COLOR_MARKER_LABEL);
    chart.draw_series(points.iter().zip(marker_labels).map(|(p, label)| {
        Text::new(label.clone(), (p[h], p[v]), label_style.clone())
    }))?;

    Ok(())
}

// src/plot_functions/plot_marker_projections.rs
