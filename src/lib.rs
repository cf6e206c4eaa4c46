// src/lib.rs - Library interface for internal module access

pub mod axis_names;
pub mod config;
pub mod constants;
pub mod data_analysis;
pub mod data_input;
pub mod error;
pub mod font_config;
pub mod plot_framework;
pub mod plot_functions;
pub mod types;

pub use data_analysis::joint_angles::{calculate_angles, FrameRange, JointAngles, SideAngles};
pub use data_input::marker_identifier::{identify, load_identified, IdentifiedCapture};
pub use data_input::tsv_reader::read_capture;
pub use error::{MocapError, MocapResult};

// Expose crate version for the CLI banner.
pub fn crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
