//! CLI interface for the skill aligner

use crate::config::OutputFormat;
use crate::processing::catalog::SortKey;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skill-aligner")]
#[command(about = "Match candidate skills against job profiles")]
#[command(long_about = "Score a candidate's skills against the required and recommended skills of a job profile, browse the profile catalog and inspect skill statistics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze candidate skills against one job profile
    Analyze {
        /// Candidate skills file (JSON, TOML, TXT, MD)
        #[arg(short, long)]
        skills: PathBuf,

        /// Job profile catalog (JSON, TOML)
        #[arg(short = 'j', long)]
        catalog: PathBuf,

        /// Read the catalog as an industry file and use this industry's profiles
        #[arg(short = 'i', long)]
        industry: Option<String>,

        /// Sub-profile name, e.g. "Data Analyst"
        #[arg(short, long)]
        profile: String,

        /// Restrict the profile lookup to one catalog category
        #[arg(long)]
        category: Option<String>,

        /// Skill category map (JSON, TOML); keyword rules are used otherwise
        #[arg(long)]
        categories: Option<PathBuf>,

        /// Only chart these skill categories
        #[arg(long = "show-category")]
        show_categories: Vec<String>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file, or into a directory with a generated name
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// List job profiles with search, skill filters and sorting
    Profiles {
        /// Job profile catalog (JSON, TOML)
        #[arg(short = 'j', long)]
        catalog: PathBuf,

        /// Read the catalog as an industry file and use this industry's profiles
        #[arg(short = 'i', long)]
        industry: Option<String>,

        /// Search term matched against profile and skill names
        #[arg(short, long)]
        search: Option<String>,

        /// Only show profiles requiring or recommending this skill (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,

        /// Sort key: name, total-skills, required-skills
        #[arg(long, default_value = "name")]
        sort: String,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Show each profile's skills
        #[arg(short, long)]
        detailed: bool,
    },

    /// Catalog statistics
    Stats {
        /// Job profile catalog (JSON, TOML)
        #[arg(short = 'j', long)]
        catalog: PathBuf,

        /// Read the catalog as an industry file and use this industry's profiles
        #[arg(short = 'i', long)]
        industry: Option<String>,

        /// Number of most common skills to list
        #[arg(short, long)]
        top: Option<usize>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "scoring.required_weight")
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}

pub fn parse_sort_key(sort: &str) -> Result<SortKey, String> {
    sort.parse()
}

/// Validate file extension
pub fn validate_file_extension(path: &std::path::Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
