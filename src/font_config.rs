// src/font_config.rs

// Font styles for plot rendering, shared by the static plots and the animation.

use crate::constants::{
    FONT_SIZE_AXIS_LABEL, FONT_SIZE_CHART_TITLE, FONT_SIZE_LEGEND, FONT_SIZE_MAIN_TITLE,
    FONT_SIZE_MARKER_LABEL, FONT_SIZE_MESSAGE,
};

/// Font family for all text; plotters resolves it to a system font.
pub const FONT_FAMILY_SYSTEM: &str = "sans-serif";

// Tuple representations for use with plotters' IntoFont trait
pub const FONT_TUPLE_MAIN_TITLE: (&str, i32) = (FONT_FAMILY_SYSTEM, FONT_SIZE_MAIN_TITLE);
pub const FONT_TUPLE_CHART_TITLE: (&str, i32) = (FONT_FAMILY_SYSTEM, FONT_SIZE_CHART_TITLE);
pub const FONT_TUPLE_AXIS_LABEL: (&str, i32) = (FONT_FAMILY_SYSTEM, FONT_SIZE_AXIS_LABEL);
pub const FONT_TUPLE_LEGEND: (&str, i32) = (FONT_FAMILY_SYSTEM, FONT_SIZE_LEGEND);
pub const FONT_TUPLE_MESSAGE: (&str, i32) = (FONT_FAMILY_SYSTEM, FONT_SIZE_MESSAGE);
pub const FONT_TUPLE_MARKER_LABEL: (&str, i32) = (FONT_FAMILY_SYSTEM, FONT_SIZE_MARKER_LABEL);
