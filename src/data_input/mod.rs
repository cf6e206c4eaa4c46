// src/data_input/mod.rs

pub mod angle_export;
pub mod capture;
pub mod layout;
pub mod marker_identifier;
pub mod roles;
pub mod tsv_reader;
