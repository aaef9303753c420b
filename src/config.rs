//! Configuration management for the skill aligner

use crate::error::{Result, SkillAlignerError};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub matching: MatchingConfig,
    pub scoring: ScoringConfig,
    pub categories: CategoryConfig,
    pub views: ViewConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub partial_rule: PartialRule,
    /// Jaro-Winkler threshold used by the `similarity` rule
    pub similarity_threshold: f64,
    /// alias -> canonical skill name
    pub aliases: BTreeMap<String, String>,
}

/// How a requirement that is not an exact hit can still count as related
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialRule {
    /// Substring containment in either direction
    Containment,
    /// Containment, or Jaro-Winkler similarity above the threshold
    Similarity,
    /// Only exact matches count
    ExactOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight of the required tier in the overall score; recommended gets the rest
    pub required_weight: f64,
    /// Credit given to a partial match relative to an exact one
    pub partial_credit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    pub fallback: String,
    pub rules: Vec<CategoryRuleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRuleConfig {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub radar_full_mark: usize,
    pub top_common_skills: usize,
    pub max_suggestions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        let aliases = [
            ("js", "javascript"),
            ("ts", "typescript"),
            ("node", "node.js"),
            ("nodejs", "node.js"),
            ("reactjs", "react"),
            ("react.js", "react"),
            ("postgres", "postgresql"),
            ("k8s", "kubernetes"),
            ("golang", "go"),
            ("ml", "machine learning"),
        ]
        .iter()
        .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
        .collect();

        Self {
            partial_rule: PartialRule::Containment,
            similarity_threshold: 0.9,
            aliases,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            required_weight: 0.7,
            partial_credit: 0.0,
        }
    }
}

impl Default for CategoryConfig {
    fn default() -> Self {
        let rule = |name: &str, keywords: &[&str]| CategoryRuleConfig {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        };

        Self {
            fallback: "Domain Knowledge".to_string(),
            rules: vec![
                rule(
                    "Technical",
                    &["programming", "code", "software", "development", "engineering"],
                ),
                rule(
                    "Soft Skills",
                    &["communication", "leadership", "management", "team", "problem"],
                ),
                rule("Tools", &["tool", "software", "platform", "system"]),
            ],
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            radar_full_mark: 10,
            top_common_skills: 10,
            max_suggestions: 3,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location when `None`.
    /// A missing file is created with defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| SkillAlignerError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            info!("No configuration at {}, writing defaults", config_path.display());
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| SkillAlignerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("skill-aligner")
            .join("config.toml")
    }

    /// Check numeric ranges and the alias table
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("scoring.required_weight", self.scoring.required_weight)?;
        check_unit_interval("scoring.partial_credit", self.scoring.partial_credit)?;
        check_unit_interval("matching.similarity_threshold", self.matching.similarity_threshold)?;

        if self.views.radar_full_mark == 0 {
            return Err(SkillAlignerError::Configuration(
                "views.radar_full_mark must be greater than zero".to_string(),
            ));
        }
        if self.categories.fallback.trim().is_empty() {
            return Err(SkillAlignerError::Configuration(
                "categories.fallback must not be empty".to_string(),
            ));
        }

        // Surfaces alias cycles and empty entries at load time
        crate::processing::normalizer::SkillNormalizer::with_aliases(&self.matching.aliases)?;
        // Blank or clashing rule names, the fallback included
        crate::processing::categories::CategoryRules::from_config(&self.categories)?;
        Ok(())
    }

    /// Set a scalar value by dotted key, e.g. `scoring.required_weight`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "matching.partial_rule" => {
                self.matching.partial_rule = match value {
                    "containment" => PartialRule::Containment,
                    "similarity" => PartialRule::Similarity,
                    "exact_only" => PartialRule::ExactOnly,
                    _ => return Err(invalid_value(key, value)),
                }
            }
            "matching.similarity_threshold" => self.matching.similarity_threshold = parse_value(key, value)?,
            "scoring.required_weight" => self.scoring.required_weight = parse_value(key, value)?,
            "scoring.partial_credit" => self.scoring.partial_credit = parse_value(key, value)?,
            "categories.fallback" => self.categories.fallback = value.to_string(),
            "views.radar_full_mark" => self.views.radar_full_mark = parse_value(key, value)?,
            "views.top_common_skills" => self.views.top_common_skills = parse_value(key, value)?,
            "views.max_suggestions" => self.views.max_suggestions = parse_value(key, value)?,
            "output.format" => {
                self.output.format = crate::cli::parse_output_format(value)
                    .map_err(SkillAlignerError::Configuration)?
            }
            "output.detailed" => self.output.detailed = parse_value(key, value)?,
            "output.color_output" => self.output.color_output = parse_value(key, value)?,
            _ if key.starts_with("matching.aliases.") => {
                let alias = &key["matching.aliases.".len()..];
                self.matching.aliases.insert(alias.to_string(), value.to_string());
            }
            _ => {
                return Err(SkillAlignerError::Configuration(format!(
                    "Unknown configuration key: {}",
                    key
                )))
            }
        }

        self.validate()
    }
}

fn check_unit_interval(key: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SkillAlignerError::Configuration(format!(
            "{} must be within [0, 1], got {}",
            key, value
        )))
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| invalid_value(key, value))
}

fn invalid_value(key: &str, value: &str) -> SkillAlignerError {
    SkillAlignerError::Configuration(format!("Invalid value for {}: {}", key, value))
}
