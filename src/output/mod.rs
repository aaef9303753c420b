pub mod formatter;
pub mod report;
pub mod views;
