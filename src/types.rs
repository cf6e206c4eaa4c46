// src/types.rs
// Type aliases to reduce complexity warnings

use std::ops::Range;

use crate::plot_framework::PlotSeries;

/// One chart panel: (title, x range, y range, series, x label, y label).
pub type PanelPlotData = (
    String,
    Range<f64>,
    Range<f64>,
    Vec<PlotSeries>,
    String,
    String,
);

/// A marker position as `[x, y, z]` in millimeters.
pub type MarkerPoint = [f64; 3];

/// Per-marker trajectory, one point per frame.
pub type MarkerTrack = Vec<MarkerPoint>;
