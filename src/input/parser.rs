//! Parsing of catalog, skill list and category files

use crate::error::{Result, SkillAlignerError};
use crate::input::file_detector::FileType;
use crate::processing::catalog::{Catalog, IndustryCatalog};
use crate::processing::categories::SkillCategories;
use serde::Deserialize;

/// JSON/TOML skill list shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum SkillListFile {
    List(Vec<String>),
    Object {
        #[serde(alias = "extracted_skills")]
        skills: Vec<String>,
    },
}

impl SkillListFile {
    fn into_skills(self) -> Vec<String> {
        match self {
            SkillListFile::List(skills) | SkillListFile::Object { skills } => skills,
        }
    }
}

pub fn parse_catalog(content: &str, file_type: FileType) -> Result<Catalog> {
    match file_type {
        FileType::Json => Ok(serde_json::from_str(content)?),
        FileType::Toml => Ok(toml::from_str(content)?),
        _ => Err(SkillAlignerError::UnsupportedFormat(
            "Job profile catalogs must be JSON or TOML".to_string(),
        )),
    }
}

pub fn parse_industries(content: &str, file_type: FileType) -> Result<IndustryCatalog> {
    match file_type {
        FileType::Json => Ok(serde_json::from_str(content)?),
        FileType::Toml => Ok(toml::from_str(content)?),
        _ => Err(SkillAlignerError::UnsupportedFormat(
            "Industry catalogs must be JSON or TOML".to_string(),
        )),
    }
}

pub fn parse_skill_categories(content: &str, file_type: FileType) -> Result<SkillCategories> {
    match file_type {
        FileType::Json => Ok(serde_json::from_str(content)?),
        FileType::Toml => Ok(toml::from_str(content)?),
        _ => Err(SkillAlignerError::UnsupportedFormat(
            "Skill category maps must be JSON or TOML".to_string(),
        )),
    }
}

/// Raw skill strings in file order; blank entries are dropped
pub fn parse_skill_list(content: &str, file_type: FileType) -> Result<Vec<String>> {
    let skills = match file_type {
        FileType::Json => serde_json::from_str::<SkillListFile>(content)?.into_skills(),
        FileType::Toml => toml::from_str::<SkillListFile>(content)?.into_skills(),
        FileType::Text => parse_skill_text(content),
        FileType::Unknown => {
            return Err(SkillAlignerError::UnsupportedFormat(
                "Unsupported skill list format".to_string(),
            ))
        }
    };

    Ok(skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// One skill per line or comma/semicolon separated; `#` lines are comments
fn parse_skill_text(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.trim_start_matches(['-', '*', '•']).trim())
        .flat_map(|line| line.split([',', ';']))
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect()
}
