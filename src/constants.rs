// src/constants.rs

// Import specific colors needed
use plotters::style::colors::full_palette::{BLUE, GREEN, ORANGE, PURPLE, RED};
use plotters::style::colors::BLACK;
use plotters::style::RGBColor;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1920;
pub const PLOT_HEIGHT: u32 = 1080;

// Animation frame dimensions (smaller than static plots to keep GIFs manageable).
pub const ANIMATION_WIDTH: u32 = 1280;
pub const ANIMATION_HEIGHT: u32 = 720;
pub const ANIMATION_WIDTH_WITH_ANGLES: u32 = 1600;

// Default animation timing.
pub const DEFAULT_ANIMATION_INTERVAL_MS: u32 = 10;
pub const DEFAULT_ANIMATION_SKIP_FRAMES: usize = 1;

// --- Capture file format ---
// Lines starting with this prefix carry the column headers; everything above is metadata.
pub const HEADER_TRIGGER: &str = "Frame\t";
// Leading columns of every header/data row that are not marker coordinates (Frame, Time).
pub const NON_COORDINATE_COLUMNS: usize = 2;
pub const COORDINATES_PER_MARKER: usize = 3;

// Sampling frequency assumed when FREQUENCY is missing from the capture metadata (Hz).
pub const DEFAULT_FREQUENCY_HZ: f64 = 100.0;
pub const METADATA_KEY_FREQUENCY: &str = "FREQUENCY";
pub const METADATA_KEY_FRAMES: &str = "NO_OF_FRAMES";
pub const METADATA_KEY_MARKERS: &str = "NO_OF_MARKERS";

// --- Built-in layout tables ---
// Center-line split layout: temporary side labels dropped before renumbering.
pub const CENTER_LINE_EXCLUDED_LABELS: [&str; 6] = ["l1", "l6", "l5", "r5", "r8", "r2"];
// Companion-matched layout: raw 0-based marker indices dropped outright.
pub const COMPANION_EXCLUDED_INDICES: [usize; 6] = [1, 3, 4, 6, 10, 11];
pub const COMPANION_FILE_PATTERN: &str = "Measurement2";
pub const COMPANION_FILE_NAME: &str = "Measurement1.tsv";
// Label given to markers the greedy matcher could not pair.
pub const COMPANION_UNMATCHED_LABEL: usize = 10;
// Empirical swap applied after greedy matching.
pub const COMPANION_LABEL_SWAP: (usize, usize) = (3, 7);
// Numeric label -> role tag.
pub const BUILTIN_ROLE_TABLE: [(usize, &str); 10] = [
    (1, "ra"),
    (8, "rk"),
    (2, "rh"),
    (6, "rs"),
    (7, "ls"),
    (9, "lh"),
    (5, "lk"),
    (4, "la"),
    (3, "spine"),
    (10, "mass"),
];

// --- Angle model fitting ---
// q1 = phi_1(q2), q3 = phi_3(q2)
pub const PHI_POLYNOMIAL_DEGREE: usize = 3;
// q2 = f(t)
pub const Q2_TIME_POLYNOMIAL_DEGREE: usize = 5;
// Points used to draw fitted curves.
pub const FIT_CURVE_POINTS: usize = 200;

// --- Export ---
pub const ANGLES_JSON_SUFFIX: &str = "_calculated_angles.json";

// --- Plot Color Assignments ---
pub const COLOR_RIGHT_SIDE: &RGBColor = &BLUE;
pub const COLOR_LEFT_SIDE: &RGBColor = &RED;
pub const COLOR_FIT_RIGHT: &RGBColor = &RED;
pub const COLOR_FIT_LEFT: &RGBColor = &BLUE;
pub const COLOR_Q2_DERIVATIVE: &RGBColor = &PURPLE;
pub const COLOR_Q2_MODEL: &RGBColor = &ORANGE;
pub const COLOR_MARKER_LABEL: &RGBColor = &BLACK;
pub const COLOR_TIME_CURSOR: &RGBColor = &GREEN;
// XY, XZ, YZ projection panels
pub const COLOR_PROJECTIONS: [&RGBColor; 3] = [&RED, &GREEN, &BLUE];

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 2;
pub const LINE_WIDTH_LEGEND: u32 = 2;
pub const LINE_WIDTH_TRAJECTORY: u32 = 2;

// Marker glyph sizes (pixels)
pub const SCATTER_POINT_SIZE: u32 = 2;
pub const MARKER_POINT_SIZE: u32 = 6;
pub const MARKER_START_POINT_SIZE: u32 = 8;

// Font sizes
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 20;
pub const FONT_SIZE_AXIS_LABEL: i32 = 14;
pub const FONT_SIZE_LEGEND: i32 = 14;
pub const FONT_SIZE_MESSAGE: i32 = 20;
pub const FONT_SIZE_MARKER_LABEL: i32 = 14;

// src/constants.rs
