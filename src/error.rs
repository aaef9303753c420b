//! Error handling for the skill aligner

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillAlignerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Job profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, SkillAlignerError>;

impl From<toml::de::Error> for SkillAlignerError {
    fn from(err: toml::de::Error) -> Self {
        SkillAlignerError::InvalidInput(format!("TOML parse error: {}", err))
    }
}
