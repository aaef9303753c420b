//! Analysis engine tying normalization, matching, scoring and aggregation together

use crate::config::Config;
use crate::error::Result;
use crate::processing::catalog::JobSubProfile;
use crate::processing::categories::{aggregate, CategoryAggregate, CategoryRules, SkillCategories};
use crate::processing::matcher::{MatchResult, SkillMatcher};
use crate::processing::normalizer::{SkillNormalizer, SkillSet};
use crate::processing::scorer::{score_with_categories, ScoreSet, Weighting};
use crate::processing::suggestions::{improvement_suggestions, Suggestion};
use log::{debug, info};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRef {
    pub category: String,
    pub name: String,
}

/// Everything the score cards, charts and gap views need for one profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillAnalysis {
    pub profile: ProfileRef,
    pub candidate_skills: SkillSet,
    #[serde(flatten)]
    pub scores: ScoreSet,
    #[serde(flatten)]
    pub match_result: MatchResult,
    pub skill_categories: SkillCategories,
    pub category_breakdown: CategoryAggregate,
    pub improvement_suggestions: Vec<Suggestion>,
}

/// Stateless engine built once from configuration
pub struct AnalysisEngine {
    normalizer: SkillNormalizer,
    matcher: SkillMatcher,
    weighting: Weighting,
    category_rules: CategoryRules,
    skill_categories: Option<SkillCategories>,
    max_suggestions: usize,
}

impl AnalysisEngine {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            normalizer: SkillNormalizer::with_aliases(&config.matching.aliases)?,
            matcher: SkillMatcher::from_config(&config.matching),
            weighting: Weighting::from_config(&config.scoring)?,
            category_rules: CategoryRules::from_config(&config.categories)?,
            skill_categories: None,
            max_suggestions: config.views.max_suggestions,
        })
    }

    /// Use an explicit category map; skills it does not list fall back to the keyword rules
    pub fn with_skill_categories(mut self, categories: SkillCategories) -> Self {
        self.skill_categories = Some(categories);
        self
    }

    pub fn normalizer(&self) -> &SkillNormalizer {
        &self.normalizer
    }

    pub fn candidate_skills<I, S>(&self, raw_skills: I) -> SkillSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.normalizer.skill_set(raw_skills)
    }

    /// Analyze a candidate against one sub-profile
    pub fn analyze(&self, candidate: &SkillSet, category: &str, profile: &JobSubProfile) -> SkillAnalysis {
        let required = self.canonical(&profile.required_skills);
        let recommended = self.canonical(&profile.recommended_skills);
        let candidate = self.canonical(candidate);

        let match_result = self.matcher.match_skills(&candidate, &required, &recommended);
        debug_assert!(match_result
            .check_partition(crate::processing::matcher::SkillTier::Required, &required)
            .is_ok());
        debug_assert!(match_result
            .check_partition(crate::processing::matcher::SkillTier::Recommended, &recommended)
            .is_ok());

        let involved: SkillSet = candidate
            .iter()
            .chain(required.iter())
            .chain(recommended.iter())
            .cloned()
            .collect();
        let skill_categories = self.categorize(&involved);

        let category_breakdown = aggregate(&skill_categories, &match_result);
        let scores = score_with_categories(&match_result, &self.weighting, &category_breakdown);
        let improvement_suggestions = improvement_suggestions(&match_result, &category_breakdown, self.max_suggestions);

        info!(
            "Analyzed '{}' / '{}': overall {}%, required {}%, recommended {}%",
            category, profile.name, scores.overall, scores.required, scores.recommended
        );

        SkillAnalysis {
            profile: ProfileRef {
                category: category.to_string(),
                name: profile.name.clone(),
            },
            candidate_skills: candidate,
            scores,
            match_result,
            skill_categories,
            category_breakdown,
            improvement_suggestions,
        }
    }

    fn canonical(&self, skills: &SkillSet) -> SkillSet {
        self.normalizer.skill_set(skills.iter().map(|s| s.label()))
    }

    fn categorize(&self, involved: &SkillSet) -> SkillCategories {
        match &self.skill_categories {
            Some(explicit) => {
                let mut categories = explicit.restricted_to(involved);
                let leftover: Vec<_> = involved
                    .iter()
                    .filter(|s| categories.categories_of(s).is_empty())
                    .collect();
                debug!("{} skills not in the category map, using keyword rules", leftover.len());
                categories.merge(self.category_rules.categorize(leftover));
                categories
            }
            None => self.category_rules.categorize(involved),
        }
    }
}

/// Holds the current inputs and recomputes the analysis whenever one changes
pub struct AnalysisSession {
    engine: AnalysisEngine,
    candidate: SkillSet,
    profile: Option<(String, JobSubProfile)>,
    analysis: Option<SkillAnalysis>,
}

impl AnalysisSession {
    pub fn new(engine: AnalysisEngine) -> Self {
        Self {
            engine,
            candidate: SkillSet::new(),
            profile: None,
            analysis: None,
        }
    }

    pub fn set_candidate_skills<I, S>(&mut self, raw_skills: I) -> Option<&SkillAnalysis>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let candidate = self.engine.candidate_skills(raw_skills);
        if candidate != self.candidate || self.analysis.is_none() {
            self.candidate = candidate;
            self.recompute();
        }
        self.analysis.as_ref()
    }

    pub fn select_profile(&mut self, category: &str, profile: &JobSubProfile) -> Option<&SkillAnalysis> {
        let selected = Some((category.to_string(), profile.clone()));
        if selected != self.profile {
            self.profile = selected;
            self.recompute();
        }
        self.analysis.as_ref()
    }

    pub fn clear_profile(&mut self) {
        self.profile = None;
        self.analysis = None;
    }

    pub fn analysis(&self) -> Option<&SkillAnalysis> {
        self.analysis.as_ref()
    }

    fn recompute(&mut self) {
        self.analysis = self
            .profile
            .as_ref()
            .map(|(category, profile)| self.engine.analyze(&self.candidate, category, profile));
    }
}
