// src/data_analysis/mod.rs

pub mod angle_models;
pub mod derivative;
pub mod geometry;
pub mod joint_angles;
pub mod polyfit;
pub mod statistics;

// src/data_analysis/mod.rs
