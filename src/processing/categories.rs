//! Skill categories, rule-based categorization and per-category aggregation

use crate::config::CategoryConfig;
use crate::error::{Result, SkillAlignerError};
use crate::processing::catalog::Catalog;
use crate::processing::matcher::{BucketCounts, MatchResult, MatchStatus, SkillTier};
use crate::processing::normalizer::{Skill, SkillSet};
use aho_corasick::AhoCorasick;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct SkillCategory {
    pub name: String,
    pub skills: SkillSet,
}

/// Ordered mapping of category name to skills.
///
/// Names are trimmed, non-empty and unique ignoring case. Document order is
/// kept when deserializing so charts render categories in a stable order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillCategories {
    categories: Vec<SkillCategory>,
}

impl SkillCategories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, skills: SkillSet) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SkillAlignerError::InvalidInput(
                "Skill category name must not be empty".to_string(),
            ));
        }
        if self.get(name).is_some() {
            return Err(SkillAlignerError::InvalidInput(format!(
                "Duplicate skill category: {}",
                name
            )));
        }
        self.categories.push(SkillCategory {
            name: name.to_string(),
            skills,
        });
        Ok(())
    }

    pub fn from_pairs<I, N, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, Vec<S>)>,
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let mut categories = Self::new();
        for (name, skills) in pairs {
            let skills = skills.iter().map(|s| Skill::new(s.as_ref())).collect();
            categories.insert(name.as_ref(), skills)?;
        }
        Ok(categories)
    }

    /// Append `other`; same-named categories receive the extra skills
    pub fn merge(&mut self, other: SkillCategories) {
        for incoming in other.categories {
            match self
                .categories
                .iter_mut()
                .find(|c| c.name.eq_ignore_ascii_case(&incoming.name))
            {
                Some(existing) => {
                    for skill in incoming.skills.iter() {
                        existing.skills.insert(skill.clone());
                    }
                }
                None => self.categories.push(incoming),
            }
        }
    }

    /// Keep only skills in `keep`, dropping categories left empty
    pub fn restricted_to(&self, keep: &SkillSet) -> SkillCategories {
        let categories = self
            .categories
            .iter()
            .map(|c| SkillCategory {
                name: c.name.clone(),
                skills: c.skills.iter().filter(|s| keep.contains(s)).cloned().collect(),
            })
            .filter(|c| !c.skills.is_empty())
            .collect();
        SkillCategories { categories }
    }

    pub fn get(&self, name: &str) -> Option<&SkillCategory> {
        let name = name.trim();
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Names of every category listing `skill`
    pub fn categories_of(&self, skill: &Skill) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|c| c.skills.contains(skill))
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SkillCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}

impl Serialize for SkillCategories {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.skills)?;
        }
        map.end()
    }
}

/// A category value is either a plain list or `{ "skills": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryEntry {
    List(Vec<String>),
    Object {
        #[serde(default)]
        skills: Vec<String>,
    },
}

impl<'de> Deserialize<'de> for SkillCategories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct CategoriesVisitor;

        impl<'de> Visitor<'de> for CategoriesVisitor {
            type Value = SkillCategories;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category name to a list of skills")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
                let mut categories = SkillCategories::new();
                while let Some((name, entry)) = access.next_entry::<String, CategoryEntry>()? {
                    let skills = match entry {
                        CategoryEntry::List(skills) | CategoryEntry::Object { skills } => skills,
                    };
                    let skills = skills.iter().map(|s| Skill::new(s)).collect();
                    categories.insert(&name, skills).map_err(de::Error::custom)?;
                }
                Ok(categories)
            }
        }

        deserializer.deserialize_map(CategoriesVisitor)
    }
}

/// Keyword rules that sort free skill lists into categories
pub struct CategoryRules {
    rules: Vec<(String, AhoCorasick)>,
    fallback: String,
}

impl CategoryRules {
    pub fn from_config(config: &CategoryConfig) -> Result<Self> {
        let fallback = config.fallback.trim().to_string();
        let mut rules: Vec<(String, AhoCorasick)> = Vec::with_capacity(config.rules.len());

        for rule in &config.rules {
            let name = rule.name.trim();
            if name.is_empty() {
                return Err(SkillAlignerError::Configuration(
                    "category rule names must not be empty".to_string(),
                ));
            }
            if name.eq_ignore_ascii_case(&fallback) || rules.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)) {
                return Err(SkillAlignerError::Configuration(format!(
                    "category rule '{}' is defined more than once (names ignore case and include the fallback)",
                    name
                )));
            }

            let patterns: Vec<String> = rule
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            let matcher = AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(&patterns)
                .map_err(|e| {
                    SkillAlignerError::Configuration(format!(
                        "Failed to build category rule '{}': {}",
                        rule.name, e
                    ))
                })?;
            rules.push((name.to_string(), matcher));
        }

        Ok(Self { rules, fallback })
    }

    /// Category for a single skill: first rule whose keyword occurs in it
    pub fn category_for(&self, skill: &Skill) -> &str {
        self.rules
            .iter()
            .find(|(_, matcher)| matcher.is_match(skill.key()))
            .map(|(name, _)| name.as_str())
            .unwrap_or(&self.fallback)
    }

    /// Group skills by rule; categories nobody falls into are left out
    pub fn categorize<'a, I>(&self, skills: I) -> SkillCategories
    where
        I: IntoIterator<Item = &'a Skill>,
    {
        let mut order: Vec<&str> = self.rules.iter().map(|(name, _)| name.as_str()).collect();
        order.push(&self.fallback);

        let mut grouped: HashMap<&str, SkillSet> = HashMap::new();
        for skill in skills {
            grouped
                .entry(self.category_for(skill))
                .or_default()
                .insert(skill.clone());
        }

        let mut categories = SkillCategories::new();
        for name in order {
            if let Some(skills) = grouped.remove(name) {
                // Same-named groups fold into the first category of that name
                categories.merge(SkillCategories {
                    categories: vec![SkillCategory {
                        name: name.to_string(),
                        skills,
                    }],
                });
            }
        }
        categories
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCount {
    pub skill: Skill,
    pub count: usize,
}

/// Occurrence counts that remember first-seen order for tie breaking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SkillCount>", into = "Vec<SkillCount>")]
pub struct SkillFrequency {
    entries: Vec<SkillCount>,
    index: HashMap<String, usize>,
}

impl SkillFrequency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, skill: &Skill) {
        if skill.is_empty() {
            return;
        }
        match self.index.get(skill.key()) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(skill.key().to_string(), self.entries.len());
                self.entries.push(SkillCount {
                    skill: skill.clone(),
                    count: 1,
                });
            }
        }
    }

    /// One count per category a skill is listed in
    pub fn from_categories(categories: &SkillCategories) -> Self {
        let mut frequency = Self::new();
        for category in categories.iter() {
            for skill in &category.skills {
                frequency.record(skill);
            }
        }
        frequency
    }

    /// One count per sub-profile tier a skill is listed in
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut frequency = Self::new();
        for category in catalog.categories() {
            for profile in &category.sub_categories {
                for skill in profile.required_skills.iter().chain(profile.recommended_skills.iter()) {
                    frequency.record(skill);
                }
            }
        }
        frequency
    }

    pub fn count(&self, skill: &Skill) -> usize {
        self.index
            .get(skill.key())
            .map(|&i| self.entries[i].count)
            .unwrap_or(0)
    }

    pub fn max_count(&self) -> usize {
        self.entries.iter().map(|e| e.count).max().unwrap_or(0)
    }

    /// Highest count first; equal counts keep first-seen order
    pub fn ranked(&self) -> Vec<SkillCount> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    pub fn top(&self, n: usize) -> Vec<SkillCount> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<SkillCount>> for SkillFrequency {
    fn from(counts: Vec<SkillCount>) -> Self {
        let mut frequency = Self::new();
        for entry in counts {
            if entry.skill.is_empty() {
                continue;
            }
            match frequency.index.get(entry.skill.key()) {
                Some(&i) => frequency.entries[i].count += entry.count,
                None => {
                    frequency
                        .index
                        .insert(entry.skill.key().to_string(), frequency.entries.len());
                    frequency.entries.push(entry);
                }
            }
        }
        frequency
    }
}

impl From<SkillFrequency> for Vec<SkillCount> {
    fn from(frequency: SkillFrequency) -> Self {
        frequency.entries
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    /// Skills listed in the category
    pub skill_count: usize,
    /// Requirement entries of either tier that fall in the category
    pub requirements: BucketCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub categories: Vec<CategoryCount>,
    pub common_skill_frequency: SkillFrequency,
}

impl CategoryAggregate {
    pub fn get(&self, category: &str) -> Option<&CategoryCount> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Per-category counts and cross-category skill frequency
pub fn aggregate(categories: &SkillCategories, result: &MatchResult) -> CategoryAggregate {
    let counts = categories
        .iter()
        .map(|category| {
            let mut requirements = BucketCounts::default();
            for skill in &category.skills {
                for tier in SkillTier::ALL {
                    match result.status_of(skill, tier) {
                        Some(MatchStatus::Matched) => requirements.matched += 1,
                        Some(MatchStatus::Partial) => requirements.partial += 1,
                        Some(MatchStatus::Missing) => requirements.missing += 1,
                        None => {}
                    }
                }
            }
            CategoryCount {
                category: category.name.clone(),
                skill_count: category.skills.len(),
                requirements,
            }
        })
        .collect();

    CategoryAggregate {
        categories: counts,
        common_skill_frequency: SkillFrequency::from_categories(categories),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::matcher::SkillMatcher;

    fn set(skills: &[&str]) -> SkillSet {
        skills.iter().map(|s| Skill::new(s)).collect()
    }

    #[test]
    fn test_categories_reject_duplicates_and_blank_names() {
        let mut categories = SkillCategories::new();
        categories.insert("Languages", set(&["Rust"])).unwrap();
        assert!(categories.insert(" languages ", set(&["Go"])).is_err());
        assert!(categories.insert("  ", set(&["Go"])).is_err());
        assert_eq!(categories.len(), 1);
    }

    #[test]
    fn test_deserialize_keeps_document_order() {
        let json = r#"{
            "Web": ["React", "CSS"],
            "Data": {"skills": ["SQL", "Pandas"]},
            "Cloud": ["AWS"]
        }"#;
        let categories: SkillCategories = serde_json::from_str(json).unwrap();
        assert_eq!(categories.names(), vec!["Web", "Data", "Cloud"]);
        assert_eq!(categories.get("data").unwrap().skills.len(), 2);

        let back = serde_json::to_string(&categories).unwrap();
        assert!(back.starts_with(r#"{"Web":["React","CSS"]"#));
    }

    #[test]
    fn test_rule_categorization_follows_keywords() {
        let rules = CategoryRules::from_config(&CategoryConfig::default()).unwrap();
        let skills = set(&[
            "Software Development",
            "Team Leadership",
            "Build Tools",
            "Accounting",
        ]);
        let categories = rules.categorize(&skills);

        assert_eq!(categories.names(), vec!["Technical", "Soft Skills", "Tools", "Domain Knowledge"]);
        assert!(categories.get("Technical").unwrap().skills.contains_key("software development"));
        assert!(categories.get("Domain Knowledge").unwrap().skills.contains_key("accounting"));
    }

    #[test]
    fn test_categorize_omits_empty_categories() {
        let rules = CategoryRules::from_config(&CategoryConfig::default()).unwrap();
        let categories = rules.categorize(&set(&["Python"]));
        assert_eq!(categories.names(), vec!["Domain Knowledge"]);
    }

    #[test]
    fn test_categorize_keeps_every_skill_when_rules_share_a_name() {
        let mut config = CategoryConfig::default();
        config.rules.push(crate::config::CategoryRuleConfig {
            name: "domain knowledge".to_string(),
            keywords: vec!["data".to_string()],
        });
        assert!(CategoryRules::from_config(&config).is_err());

        let rules = CategoryRules {
            rules: vec![
                ("Data".to_string(), AhoCorasick::new(["data"]).unwrap()),
                ("data".to_string(), AhoCorasick::new(["sql"]).unwrap()),
            ],
            fallback: "Domain Knowledge".to_string(),
        };
        let categories = rules.categorize(&set(&["Data Analysis", "SQL", "Python"]));
        assert_eq!(categories.names(), vec!["Data", "Domain Knowledge"]);
        assert_eq!(categories.get("data").unwrap().skills.len(), 2);
        assert!(categories.get("Domain Knowledge").unwrap().skills.contains_key("python"));
    }

    #[test]
    fn test_frequency_counts_each_category_occurrence() {
        let categories = SkillCategories::from_pairs(vec![
            ("Backend", vec!["Python", "SQL"]),
            ("Data", vec!["SQL", "Pandas", "Python"]),
            ("Ops", vec!["Docker", "SQL"]),
        ])
        .unwrap();

        let frequency = SkillFrequency::from_categories(&categories);
        assert_eq!(frequency.count(&Skill::new("sql")), 3);
        assert_eq!(frequency.count(&Skill::new("python")), 2);

        let ranked: Vec<String> = frequency.ranked().iter().map(|c| c.skill.key().to_string()).collect();
        assert_eq!(ranked, vec!["sql", "python", "pandas", "docker"]);
    }

    #[test]
    fn test_aggregate_counts_requirements_per_category() {
        let categories = SkillCategories::from_pairs(vec![
            ("Languages", vec!["Python", "Java"]),
            ("Data", vec!["SQL"]),
            ("Empty", Vec::<&str>::new()),
        ])
        .unwrap();
        let result = SkillMatcher::default().match_skills(
            &set(&["python", "sql"]),
            &set(&["Python", "Java", "SQL"]),
            &set(&["SQL"]),
        );

        let aggregate = aggregate(&categories, &result);
        let languages = aggregate.get("Languages").unwrap();
        assert_eq!(languages.skill_count, 2);
        assert_eq!(languages.requirements, BucketCounts { matched: 1, partial: 0, missing: 1 });

        let data = aggregate.get("Data").unwrap();
        assert_eq!(data.requirements.matched, 2);
        assert_eq!(aggregate.get("Empty").unwrap().requirements.total(), 0);
    }
}
