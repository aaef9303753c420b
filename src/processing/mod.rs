//! Skill matching, scoring and catalog processing

pub mod normalizer;
pub mod matcher;
pub mod scorer;
pub mod categories;
pub mod catalog;
pub mod suggestions;
pub mod analyzer;
