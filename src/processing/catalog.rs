//! Job profile catalog: filtering, sorting, lookup and statistics

use crate::error::{Result, SkillAlignerError};
use crate::processing::categories::{SkillCount, SkillFrequency};
use crate::processing::normalizer::{normalize_key, Skill, SkillSet};
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSubProfile {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_skills: SkillSet,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommended_skills: SkillSet,
}

impl JobSubProfile {
    pub fn new<R, S>(name: &str, required: R, recommended: R) -> Self
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.trim().to_string(),
            required_skills: required.into_iter().map(|s| Skill::new(s.as_ref())).collect(),
            recommended_skills: recommended.into_iter().map(|s| Skill::new(s.as_ref())).collect(),
        }
    }

    pub fn total_skills(&self) -> usize {
        self.required_skills.len() + self.recommended_skills.len()
    }

    /// Listed in either tier
    pub fn has_skill(&self, skill: &Skill) -> bool {
        self.required_skills.contains(skill) || self.recommended_skills.contains(skill)
    }

    /// `term` must already be lowercased; only the empty string matches everything
    fn matches_search(&self, term: &str) -> bool {
        term.is_empty()
            || self.name.to_lowercase().contains(term)
            || self
                .required_skills
                .iter()
                .chain(self.recommended_skills.iter())
                .any(|skill| skill.label().to_lowercase().contains(term))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProfileCategory {
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sub_categories: Vec<JobSubProfile>,
}

impl JobProfileCategory {
    pub fn total_skills(&self) -> usize {
        self.sub_categories.iter().map(JobSubProfile::total_skills).sum()
    }

    pub fn required_skills(&self) -> usize {
        self.sub_categories.iter().map(|s| s.required_skills.len()).sum()
    }
}

/// Accepted catalog file shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<JobProfileCategory>),
    Wrapped { job_profiles: Vec<JobProfileCategory> },
}

impl From<CatalogFile> for Catalog {
    fn from(file: CatalogFile) -> Self {
        match file {
            CatalogFile::List(categories) | CatalogFile::Wrapped { job_profiles: categories } => {
                Catalog::new(categories)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CatalogFile", into = "Vec<JobProfileCategory>")]
pub struct Catalog {
    categories: Vec<JobProfileCategory>,
}

impl From<Catalog> for Vec<JobProfileCategory> {
    fn from(catalog: Catalog) -> Self {
        catalog.categories
    }
}

impl Catalog {
    pub fn new(categories: Vec<JobProfileCategory>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[JobProfileCategory] {
        &self.categories
    }

    pub fn sub_profile_count(&self) -> usize {
        self.categories.iter().map(|c| c.sub_categories.len()).sum()
    }

    /// Find a sub-profile by name, optionally only inside `category`
    pub fn find_sub_profile(&self, name: &str, category: Option<&str>) -> Option<(&JobProfileCategory, &JobSubProfile)> {
        let name = normalize_key(name);
        let category = category.map(normalize_key);

        self.categories
            .iter()
            .filter(|c| category.as_ref().map_or(true, |wanted| normalize_key(&c.category) == *wanted))
            .find_map(|c| {
                c.sub_categories
                    .iter()
                    .find(|s| normalize_key(&s.name) == name)
                    .map(|s| (c, s))
            })
    }

    pub fn require_sub_profile(&self, name: &str, category: Option<&str>) -> Result<(&JobProfileCategory, &JobSubProfile)> {
        self.find_sub_profile(name, category).ok_or_else(|| {
            let scope = category.map(|c| format!(" in category '{}'", c)).unwrap_or_default();
            SkillAlignerError::ProfileNotFound(format!("{}{}", name, scope))
        })
    }

    /// Every distinct skill in the catalog, first-seen order
    pub fn skill_filter_options(&self) -> SkillSet {
        self.categories
            .iter()
            .flat_map(|c| c.sub_categories.iter())
            .flat_map(|s| s.required_skills.iter().chain(s.recommended_skills.iter()))
            .cloned()
            .collect()
    }
}

/// An industry groups its own job profile catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Industry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub job_profiles: Catalog,
}

/// Accepted industry file shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum IndustryFile {
    List(Vec<Industry>),
    Wrapped { industries: Vec<Industry> },
}

impl From<IndustryFile> for IndustryCatalog {
    fn from(file: IndustryFile) -> Self {
        match file {
            IndustryFile::List(industries) | IndustryFile::Wrapped { industries } => IndustryCatalog::new(industries),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "IndustryFile", into = "Vec<Industry>")]
pub struct IndustryCatalog {
    industries: Vec<Industry>,
}

impl From<IndustryCatalog> for Vec<Industry> {
    fn from(catalog: IndustryCatalog) -> Self {
        catalog.industries
    }
}

impl IndustryCatalog {
    pub fn new(industries: Vec<Industry>) -> Self {
        Self { industries }
    }

    pub fn industries(&self) -> &[Industry] {
        &self.industries
    }

    pub fn names(&self) -> Vec<&str> {
        self.industries.iter().map(|i| i.name.as_str()).collect()
    }

    /// Lookup ignores case and surrounding whitespace
    pub fn find_industry(&self, name: &str) -> Option<&Industry> {
        let name = normalize_key(name);
        self.industries.iter().find(|i| normalize_key(&i.name) == name)
    }

    pub fn require_industry(&self, name: &str) -> Result<&Industry> {
        self.find_industry(name)
            .ok_or_else(|| SkillAlignerError::ProfileNotFound(format!("industry '{}'", name)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    Name,
    TotalSkills,
    RequiredSkills,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "name" => Ok(SortKey::Name),
            "totalskills" | "skills" | "total" => Ok(SortKey::TotalSkills),
            "requiredskills" | "required" => Ok(SortKey::RequiredSkills),
            _ => Err(format!(
                "Invalid sort key: {}. Supported: name, total-skills, required-skills",
                s
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => write!(f, "name"),
            SortKey::TotalSkills => write!(f, "total-skills"),
            SortKey::RequiredSkills => write!(f, "required-skills"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_term: String,
    pub selected_skills: SkillSet,
    pub sort_key: SortKey,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: &str) -> Self {
        self.search_term = term.to_string();
        self
    }

    pub fn with_skill(mut self, skill: &str) -> Self {
        self.selected_skills.insert(Skill::new(skill));
        self
    }

    pub fn with_sort(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Select the skill, or deselect it when already selected
    pub fn toggle_skill(&mut self, skill: &str) {
        let skill = Skill::new(skill);
        if self.selected_skills.contains(&skill) {
            self.selected_skills = self
                .selected_skills
                .iter()
                .filter(|s| **s != skill)
                .cloned()
                .collect();
        } else {
            self.selected_skills.insert(skill);
        }
    }

    fn accepts(&self, profile: &JobSubProfile, term: &str) -> bool {
        profile.matches_search(term) && self.selected_skills.iter().all(|skill| profile.has_skill(skill))
    }
}

/// Filter sub-profiles by search term and selected skills, drop emptied
/// categories, then stable-sort the categories by `state.sort_key`.
pub fn filter_and_sort(catalog: &Catalog, state: &FilterState) -> Vec<JobProfileCategory> {
    let term = state.search_term.to_lowercase();

    let mut filtered: Vec<JobProfileCategory> = catalog
        .categories()
        .iter()
        .filter_map(|category| {
            let sub_categories: Vec<JobSubProfile> = category
                .sub_categories
                .iter()
                .filter(|profile| state.accepts(profile, &term))
                .cloned()
                .collect();

            (!sub_categories.is_empty()).then(|| JobProfileCategory {
                category: category.category.clone(),
                sub_categories,
            })
        })
        .collect();

    match state.sort_key {
        SortKey::Name => filtered.sort_by(|a, b| {
            a.category
                .to_lowercase()
                .cmp(&b.category.to_lowercase())
                .then_with(|| a.category.cmp(&b.category))
        }),
        SortKey::TotalSkills => filtered.sort_by(|a, b| b.total_skills().cmp(&a.total_skills())),
        SortKey::RequiredSkills => filtered.sort_by(|a, b| b.required_skills().cmp(&a.required_skills())),
    }

    debug!(
        "Filtered catalog: {} of {} categories kept (search '{}', {} skill filters, sort {})",
        filtered.len(),
        catalog.categories().len(),
        state.search_term,
        state.selected_skills.len(),
        state.sort_key
    );

    filtered
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryProfileCount {
    pub category: String,
    pub profiles: usize,
}

/// Catalog-wide totals and the most common skills
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_profiles: usize,
    pub total_required_skills: usize,
    pub total_recommended_skills: usize,
    pub profiles_per_category: Vec<CategoryProfileCount>,
    pub most_common_skills: Vec<SkillCount>,
}

impl CatalogStats {
    pub fn from_catalog(catalog: &Catalog, top_n: usize) -> Self {
        let profiles = || catalog.categories().iter().flat_map(|c| c.sub_categories.iter());

        Self {
            total_profiles: catalog.sub_profile_count(),
            total_required_skills: profiles().map(|s| s.required_skills.len()).sum(),
            total_recommended_skills: profiles().map(|s| s.recommended_skills.len()).sum(),
            profiles_per_category: catalog
                .categories()
                .iter()
                .map(|c| CategoryProfileCount {
                    category: c.category.clone(),
                    profiles: c.sub_categories.len(),
                })
                .collect(),
            most_common_skills: SkillFrequency::from_catalog(catalog).top(top_n),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
