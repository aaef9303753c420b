//! Input processing module
//! Handles file detection, parsing, and input management

pub mod file_detector;
pub mod parser;
pub mod manager;
