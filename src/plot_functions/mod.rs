// src/plot_functions/mod.rs

pub mod animate_markers;
pub mod plot_angle_dependencies;
pub mod plot_joint_angles;
pub mod plot_marker_projections;
pub mod plot_marker_trajectories;
pub mod plot_q2_time_model;

// src/plot_functions/mod.rs
