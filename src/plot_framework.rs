// src/plot_framework.rs

use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, PathElement, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use std::error::Error;
use std::ops::Range;

use crate::constants::{
    COLOR_MARKER_LABEL, FONT_SIZE_MESSAGE, LINE_WIDTH_LEGEND, LINE_WIDTH_TRAJECTORY, PLOT_HEIGHT,
    PLOT_WIDTH,
};
use crate::font_config::{
    FONT_TUPLE_AXIS_LABEL, FONT_TUPLE_CHART_TITLE, FONT_TUPLE_LEGEND, FONT_TUPLE_MAIN_TITLE,
    FONT_TUPLE_MARKER_LABEL, FONT_TUPLE_MESSAGE,
};
use crate::types::{MarkerPoint, PanelPlotData};

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Padded range over the finite values of `values`; `None` if there are none.
pub fn range_of<I: IntoIterator<Item = f64>>(values: I) -> Option<Range<f64>> {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return None;
    }
    let (lo, hi) = calculate_range(min, max);
    Some(lo..hi)
}

/// Equal-scale cube around `points`: every axis spans the largest of the
/// three half-ranges around its own midpoint, so distances are not distorted.
pub fn equal_scale_ranges(points: &[MarkerPoint]) -> Option<[Range<f64>; 3]> {
    let mut min = [f64::INFINITY; 3];
    let mut max = [f64::NEG_INFINITY; 3];
    for p in points {
        for axis in 0..3 {
            if p[axis].is_finite() {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
    }
    if (0..3).any(|axis| min[axis] > max[axis]) {
        return None;
    }
    let half = (0..3)
        .map(|axis| (max[axis] - min[axis]) / 2.0)
        .fold(0.0_f64, f64::max);
    let half = if half < 1e-6 { 1.0 } else { half };
    Some(std::array::from_fn(|axis| {
        let mid = (max[axis] + min[axis]) / 2.0;
        (mid - half)..(mid + half)
    }))
}

/// Y-axis tick formatter. Positions in mm print as plain integers; other
/// large values use "k"/"M" notation, small fractional values one decimal.
pub fn format_axis_label(y: f64, y_label: &str) -> String {
    if y_label.contains("mm") {
        format!("{:.0}", y)
    } else if y.abs() >= 1_000_000.0 {
        format!("{:.1}M", y / 1_000_000.0)
    } else if y.abs() >= 1000.0 {
        format!("{:.0}k", y / 1000.0)
    } else if y.abs() < 10.0 && y.fract() != 0.0 {
        format!("{:.1}", y)
    } else {
        format!("{:.0}", y)
    }
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, Shift>,
    panel_name: &str,
    plot_type: &str,
    reason: &str,
) -> Result<(), Box<dyn Error>> {
    const CHAR_WIDTH_RATIO: f32 = 0.6; // Approximate character width relative to font size
    const LINE_HEIGHT_SPACING: i32 = 4;

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (
        (x_range.end - x_range.start) as u32,
        (y_range.end - y_range.start) as u32,
    );
    let message = format!("{panel_name} {plot_type} Data Unavailable:\n{reason}");

    let estimated_char_width = (FONT_SIZE_MESSAGE as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = FONT_SIZE_MESSAGE + LINE_HEIGHT_SPACING;

    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.len()).max().unwrap_or(0);
    let estimated_text_width = max_line_length.saturating_mul(estimated_char_width as usize) as i32;
    let estimated_text_height = lines.len().saturating_mul(estimated_line_height as usize) as i32;

    let center_x = width as i32 / 2 - estimated_text_width / 2;
    let center_y = height as i32 / 2 - estimated_text_height / 2;

    let text_style = FONT_TUPLE_MESSAGE.into_font().color(&RED);
    area.draw(&Text::new(message, (center_x, center_y), text_style))?;
    Ok(())
}

/// How a series is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesStyle {
    Line,
    /// Filled dots; `stroke_width` is the dot radius.
    Scatter,
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
    pub style: SeriesStyle,
}

impl PlotSeries {
    pub fn line(data: Vec<(f64, f64)>, label: impl Into<String>, color: RGBColor, width: u32) -> Self {
        Self {
            data,
            label: label.into(),
            color,
            stroke_width: width,
            style: SeriesStyle::Line,
        }
    }

    pub fn scatter(data: Vec<(f64, f64)>, label: impl Into<String>, color: RGBColor, radius: u32) -> Self {
        Self {
            data,
            label: label.into(),
            color,
            stroke_width: radius,
            style: SeriesStyle::Scatter,
        }
    }
}

#[derive(Clone)]
pub struct PlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub x_label: String,
    pub y_label: String,
}

impl From<PanelPlotData> for PlotConfig {
    fn from(panel: PanelPlotData) -> Self {
        let (title, x_range, y_range, series, x_label, y_label) = panel;
        Self {
            title,
            x_range,
            y_range,
            series,
            x_label,
            y_label,
        }
    }
}

/// Draws one 2D chart with its series and legend.
pub fn draw_chart(
    area: &DrawingArea<BitMapBackend, Shift>,
    plot_config: &PlotConfig,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(&plot_config.title, FONT_TUPLE_CHART_TITLE)
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(plot_config.x_range.clone(), plot_config.y_range.clone())?;

    let y_label = plot_config.y_label.clone();
    chart
        .configure_mesh()
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_labels(20)
        .y_labels(10)
        .y_label_formatter(&|y| format_axis_label(*y, &y_label))
        .light_line_style(WHITE.mix(0.7))
        .label_style(FONT_TUPLE_AXIS_LABEL)
        .draw()?;

    let mut legend_series_count = 0;

    for s in &plot_config.series {
        if s.data.is_empty() {
            continue;
        }
        let color = s.color;
        match s.style {
            SeriesStyle::Line => {
                let series = chart.draw_series(LineSeries::new(
                    s.data.iter().cloned(),
                    color.stroke_width(s.stroke_width),
                ))?;
                if !s.label.is_empty() {
                    series.label(&s.label).legend(move |(x, y)| {
                        PathElement::new(
                            vec![(x, y), (x + 20, y)],
                            color.stroke_width(LINE_WIDTH_LEGEND),
                        )
                    });
                    legend_series_count += 1;
                }
            }
            SeriesStyle::Scatter => {
                let radius = s.stroke_width;
                let series = chart.draw_series(
                    s.data
                        .iter()
                        .map(move |&point| Circle::new(point, radius, color.filled())),
                )?;
                if !s.label.is_empty() {
                    series
                        .label(&s.label)
                        .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
                    legend_series_count += 1;
                }
            }
        }
    }

    if legend_series_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(FONT_TUPLE_LEGEND)
            .draw()?;
    }

    Ok(())
}

/// Draws one panel, or the unavailable message when it has nothing to show.
/// Returns whether a chart was drawn.
pub fn draw_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    panel_name: &str,
    plot_type_name: &str,
    panel: Option<PanelPlotData>,
) -> Result<bool, Box<dyn Error>> {
    match panel {
        Some(panel) => {
            let plot_config = PlotConfig::from(panel);
            let has_data = plot_config.series.iter().any(|s| !s.data.is_empty());
            let valid_ranges = plot_config.x_range.end > plot_config.x_range.start
                && plot_config.y_range.end > plot_config.y_range.start;
            if has_data && valid_ranges {
                draw_chart(area, &plot_config)?;
                Ok(true)
            } else {
                let reason = if !has_data {
                    "No data points"
                } else {
                    "Invalid ranges"
                };
                draw_unavailable_message(area, panel_name, plot_type_name, reason)?;
                Ok(false)
            }
        }
        None => {
            let reason = "Calculation/Data Extraction Failed";
            draw_unavailable_message(area, panel_name, plot_type_name, reason)?;
            Ok(false)
        }
    }
}

/// Fills `root_area` white and writes the title at the top-left.
pub fn draw_root_title(
    root_area: &DrawingArea<BitMapBackend, Shift>,
    root_name: &str,
) -> Result<(), Box<dyn Error>> {
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        root_name,
        (10, 10),
        FONT_TUPLE_MAIN_TITLE.into_font().color(&BLACK),
    ))?;
    Ok(())
}

/// Creates a plot image with `rows` x `cols` panels, filled in row-major
/// order by `get_panel_data(panel_index)`.
pub fn draw_grid_plot<F>(
    output_filename: &str,
    root_name: &str,
    plot_type_name: &str,
    panel_names: &[&str],
    (rows, cols): (usize, usize),
    mut get_panel_data: F,
) -> Result<(), Box<dyn Error>>
where
    F: FnMut(usize) -> Option<PanelPlotData>,
{
    let root_area =
        BitMapBackend::new(output_filename, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    draw_root_title(&root_area, root_name)?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly((rows, cols));
    let mut any_panel_plotted = false;

    for (panel_index, area) in sub_plot_areas.iter().enumerate() {
        let panel_name = panel_names.get(panel_index).copied().unwrap_or("Panel");
        let plotted = draw_panel(
            area,
            panel_name,
            plot_type_name,
            get_panel_data(panel_index),
        )?;
        any_panel_plotted |= plotted;
    }

    root_area.present()?;
    if any_panel_plotted {
        println!("  Plot saved as '{output_filename}'.");
    } else {
        println!("  '{output_filename}' saved with placeholder messages only: no panel had data to plot.");
    }
    Ok(())
}

/// Creates a plot image with one column of stacked panels.
pub fn draw_stacked_plot<F>(
    output_filename: &str,
    root_name: &str,
    plot_type_name: &str,
    panel_names: &[&str],
    get_panel_data: F,
) -> Result<(), Box<dyn Error>>
where
    F: FnMut(usize) -> Option<PanelPlotData>,
{
    draw_grid_plot(
        output_filename,
        root_name,
        plot_type_name,
        panel_names,
        (panel_names.len(), 1),
        get_panel_data,
    )
}

/// One marker in a 3D chart: a labelled point with an optional trail.
pub struct Marker3d<'a> {
    pub label: &'a str,
    pub color: RGBColor,
    pub trail: &'a [MarkerPoint],
    pub position: MarkerPoint,
}

/// Chart coordinates for a marker position. Plotters draws its second axis
/// vertically, so capture Z goes there.
fn to_chart_coords(p: &MarkerPoint) -> (f64, f64, f64) {
    (p[0], p[2], p[1])
}

/// Draws markers in a 3D chart with Z up. `ranges` are the capture X, Y, Z
/// ranges.
pub fn draw_markers_3d(
    area: &DrawingArea<BitMapBackend, Shift>,
    title: &str,
    ranges: &[Range<f64>; 3],
    markers: &[Marker3d<'_>],
    point_size: u32,
) -> Result<(), Box<dyn Error>> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, FONT_TUPLE_CHART_TITLE)
        .margin(10)
        .build_cartesian_3d(ranges[0].clone(), ranges[2].clone(), ranges[1].clone())?;

    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.3;
        pb.scale = 0.85;
        pb.into_matrix()
    });

    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.15))
        .max_light_lines(3)
        .label_style(FONT_TUPLE_AXIS_LABEL)
        .draw()?;

    for marker in markers {
        if marker.trail.len() > 1 {
            chart.draw_series(LineSeries::new(
                marker.trail.iter().map(to_chart_coords),
                marker.color.stroke_width(LINE_WIDTH_TRAJECTORY),
            ))?;
        }
    }

    chart.draw_series(markers.iter().map(|marker| {
        Circle::new(
            to_chart_coords(&marker.position),
            point_size,
            marker.color.filled(),
        )
    }))?;

    let label_style = FONT_TUPLE_MARKER_LABEL
        .into_font()
        .color(COLOR_MARKER_LABEL);
    chart.draw_series(markers.iter().map(|marker| {
        Text::new(
            marker.label.to_string(),
            to_chart_coords(&marker.position),
            label_style.clone(),
        )
    }))?;

    Ok(())
}

/// Evenly spread colour for marker `index` of `count`.
pub fn marker_color(index: usize, count: usize) -> RGBColor {
    let t = index as f64 / count.max(1) as f64;
    let color = colorous::RAINBOW.eval_continuous(t);
    RGBColor(color.r, color.g, color.b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_range_padding() {
        assert_eq!(calculate_range(0.0, 100.0), (-15.0, 115.0));
        assert_eq!(calculate_range(100.0, 0.0), (-15.0, 115.0));
        assert_eq!(calculate_range(5.0, 5.0), (4.5, 5.5));
    }

    #[test]
    fn test_range_of_skips_non_finite() {
        let range = range_of(vec![f64::NAN, 0.0, 10.0]).unwrap();
        assert_eq!(range, -1.5..11.5);
        assert!(range_of(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn test_equal_scale_ranges() {
        let points = [[0.0, 0.0, 0.0], [100.0, 10.0, 40.0]];
        let [x, y, z] = equal_scale_ranges(&points).unwrap();
        assert_eq!(x, 0.0..100.0);
        assert_eq!(y, -45.0..55.0);
        assert_eq!(z, -30.0..70.0);
    }
}
