//! Input manager for loading catalogs, skill lists and category maps

use crate::error::{Result, SkillAlignerError};
use crate::input::file_detector::FileType;
use crate::input::parser::{parse_catalog, parse_industries, parse_skill_categories, parse_skill_list};
use crate::processing::catalog::{Catalog, IndustryCatalog};
use crate::processing::categories::SkillCategories;
use log::info;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn load_catalog(&mut self, path: &Path) -> Result<Catalog> {
        let (content, file_type) = self.read(path).await?;
        let catalog = parse_catalog(&content, file_type)?;
        info!(
            "Loaded {} job profile categories ({} profiles) from {}",
            catalog.categories().len(),
            catalog.sub_profile_count(),
            path.display()
        );
        Ok(catalog)
    }

    pub async fn load_industries(&mut self, path: &Path) -> Result<IndustryCatalog> {
        let (content, file_type) = self.read(path).await?;
        let industries = parse_industries(&content, file_type)?;
        info!("Loaded {} industries from {}", industries.industries().len(), path.display());
        Ok(industries)
    }

    pub async fn load_skills(&mut self, path: &Path) -> Result<Vec<String>> {
        let (content, file_type) = self.read(path).await?;
        let skills = parse_skill_list(&content, file_type)?;
        info!("Loaded {} candidate skills from {}", skills.len(), path.display());
        Ok(skills)
    }

    pub async fn load_skill_categories(&mut self, path: &Path) -> Result<SkillCategories> {
        let (content, file_type) = self.read(path).await?;
        let categories = parse_skill_categories(&content, file_type)?;
        info!("Loaded {} skill categories from {}", categories.len(), path.display());
        Ok(categories)
    }

    async fn read(&mut self, path: &Path) -> Result<(String, FileType)> {
        let file_type = self.detect_file_type(path)?;
        let path_str = path.to_string_lossy().to_string();

        // Check cache first
        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached content for: {}", path.display());
                return Ok((cached.clone(), file_type));
            }
        }

        if !path.exists() {
            return Err(SkillAlignerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).await?;

        if self.enable_cache {
            self.cache.insert(path_str, content.clone());
        }

        Ok((content, file_type))
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| SkillAlignerError::InvalidInput(format!("File has no extension: {}", path.display())))?;

        match FileType::from_extension(extension) {
            FileType::Unknown => Err(SkillAlignerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            ))),
            file_type => Ok(file_type),
        }
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}
