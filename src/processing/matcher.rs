//! Tiered skill matching: matched / partial / missing per requirement tier

use crate::config::{MatchingConfig, PartialRule};
use crate::processing::normalizer::{Skill, SkillSet};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use strsim::jaro_winkler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTier {
    Required,
    Recommended,
}

impl SkillTier {
    pub const ALL: [SkillTier; 2] = [SkillTier::Required, SkillTier::Recommended];
}

impl fmt::Display for SkillTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillTier::Required => write!(f, "Required"),
            SkillTier::Recommended => write!(f, "Recommended"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Matched,
    Partial,
    Missing,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Matched => write!(f, "Matched"),
            MatchStatus::Partial => write!(f, "Partial"),
            MatchStatus::Missing => write!(f, "Missing"),
        }
    }
}

/// One bucket split by tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierSkills {
    pub required: SkillSet,
    pub recommended: SkillSet,
}

impl TierSkills {
    pub fn tier(&self, tier: SkillTier) -> &SkillSet {
        match tier {
            SkillTier::Required => &self.required,
            SkillTier::Recommended => &self.recommended,
        }
    }

    fn tier_mut(&mut self, tier: SkillTier) -> &mut SkillSet {
        match tier {
            SkillTier::Required => &mut self.required,
            SkillTier::Recommended => &mut self.recommended,
        }
    }

    pub fn total(&self) -> usize {
        self.required.len() + self.recommended.len()
    }
}

/// Which candidate skill made a requirement count as partial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialEvidence {
    pub tier: SkillTier,
    pub requirement: Skill,
    pub candidate: Skill,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketCounts {
    pub matched: usize,
    pub partial: usize,
    pub missing: usize,
}

impl BucketCounts {
    pub fn total(&self) -> usize {
        self.matched + self.partial + self.missing
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(rename = "matching_skills")]
    pub matched: TierSkills,
    #[serde(rename = "partial_matches")]
    pub partial: TierSkills,
    #[serde(rename = "missing_skills")]
    pub missing: TierSkills,
    pub partial_evidence: Vec<PartialEvidence>,
}

impl MatchResult {
    pub fn bucket(&self, status: MatchStatus) -> &TierSkills {
        match status {
            MatchStatus::Matched => &self.matched,
            MatchStatus::Partial => &self.partial,
            MatchStatus::Missing => &self.missing,
        }
    }

    fn bucket_mut(&mut self, status: MatchStatus) -> &mut TierSkills {
        match status {
            MatchStatus::Matched => &mut self.matched,
            MatchStatus::Partial => &mut self.partial,
            MatchStatus::Missing => &mut self.missing,
        }
    }

    pub fn counts(&self, tier: SkillTier) -> BucketCounts {
        BucketCounts {
            matched: self.matched.tier(tier).len(),
            partial: self.partial.tier(tier).len(),
            missing: self.missing.tier(tier).len(),
        }
    }

    pub fn status_of(&self, skill: &Skill, tier: SkillTier) -> Option<MatchStatus> {
        [MatchStatus::Matched, MatchStatus::Partial, MatchStatus::Missing]
            .into_iter()
            .find(|status| self.bucket(*status).tier(tier).contains(skill))
    }

    /// Best status of a skill across both tiers
    pub fn best_status(&self, skill: &Skill) -> Option<MatchStatus> {
        SkillTier::ALL
            .iter()
            .filter_map(|tier| self.status_of(skill, *tier))
            .min_by_key(|status| match status {
                MatchStatus::Matched => 0,
                MatchStatus::Partial => 1,
                MatchStatus::Missing => 2,
            })
    }

    /// Verify the buckets of `tier` partition `requirements` without overlap
    pub fn check_partition(&self, tier: SkillTier, requirements: &SkillSet) -> std::result::Result<(), String> {
        let buckets = [
            self.matched.tier(tier),
            self.partial.tier(tier),
            self.missing.tier(tier),
        ];

        let mut seen = HashSet::new();
        for bucket in buckets {
            for skill in bucket {
                if !seen.insert(skill.key()) {
                    return Err(format!("{} skill '{}' appears in more than one bucket", tier, skill));
                }
                if !requirements.contains(skill) {
                    return Err(format!("{} skill '{}' is not a requirement", tier, skill));
                }
            }
        }

        if seen.len() != requirements.len() {
            return Err(format!(
                "{} buckets cover {} of {} requirements",
                tier,
                seen.len(),
                requirements.len()
            ));
        }
        Ok(())
    }
}

/// Classifies requirement skills against a candidate skill set
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    partial_rule: PartialRule,
    similarity_threshold: f64,
}

impl Default for SkillMatcher {
    fn default() -> Self {
        Self::new(PartialRule::Containment, 0.9)
    }
}

impl SkillMatcher {
    pub fn new(partial_rule: PartialRule, similarity_threshold: f64) -> Self {
        Self {
            partial_rule,
            similarity_threshold: similarity_threshold.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.partial_rule, config.similarity_threshold)
    }

    pub fn partial_rule(&self) -> PartialRule {
        self.partial_rule
    }

    /// Classify every required and recommended skill
    pub fn match_skills(&self, candidate: &SkillSet, required: &SkillSet, recommended: &SkillSet) -> MatchResult {
        let mut result = MatchResult::default();

        for (tier, requirements) in [(SkillTier::Required, required), (SkillTier::Recommended, recommended)] {
            for requirement in requirements {
                let status = if candidate.contains(requirement) {
                    MatchStatus::Matched
                } else if let Some(related) = candidate.iter().find(|c| self.is_related(requirement, c)) {
                    result.partial_evidence.push(PartialEvidence {
                        tier,
                        requirement: requirement.clone(),
                        candidate: related.clone(),
                    });
                    MatchStatus::Partial
                } else {
                    MatchStatus::Missing
                };

                result.bucket_mut(status).tier_mut(tier).insert(requirement.clone());
            }
        }

        debug!(
            "Matched {} required / {} recommended skills ({} partial)",
            result.matched.required.len(),
            result.matched.recommended.len(),
            result.partial.total()
        );

        result
    }

    fn is_related(&self, requirement: &Skill, candidate: &Skill) -> bool {
        match self.partial_rule {
            PartialRule::ExactOnly => false,
            PartialRule::Containment => contains_either(requirement.key(), candidate.key()),
            PartialRule::Similarity => {
                contains_either(requirement.key(), candidate.key())
                    || jaro_winkler(requirement.key(), candidate.key()) >= self.similarity_threshold
            }
        }
    }
}

fn contains_either(a: &str, b: &str) -> bool {
    !a.is_empty() && !b.is_empty() && (a.contains(b) || b.contains(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(skills: &[&str]) -> SkillSet {
        skills.iter().map(|s| Skill::new(s)).collect()
    }

    fn keys(skills: &SkillSet) -> Vec<String> {
        let mut keys: Vec<String> = skills.iter().map(|s| s.key().to_string()).collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_reference_scenario_buckets() {
        let matcher = SkillMatcher::default();
        let candidate = set(&["python", "SQL", "React"]);
        let required = set(&["Python", "Java", "SQL"]);
        let recommended = set(&["React", "Docker"]);

        let result = matcher.match_skills(&candidate, &required, &recommended);

        assert_eq!(keys(&result.matched.required), vec!["python", "sql"]);
        assert_eq!(keys(&result.missing.required), vec!["java"]);
        assert_eq!(keys(&result.matched.recommended), vec!["react"]);
        assert_eq!(keys(&result.missing.recommended), vec!["docker"]);
        assert!(result.partial.required.is_empty());
        assert!(result.partial.recommended.is_empty());
        assert!(result.check_partition(SkillTier::Required, &required).is_ok());
        assert!(result.check_partition(SkillTier::Recommended, &recommended).is_ok());
    }

    #[test]
    fn test_containment_is_partial_in_both_directions() {
        let matcher = SkillMatcher::default();
        let candidate = set(&["React Native", "AWS"]);
        let required = set(&["React", "AWS Lambda", "Go"]);

        let result = matcher.match_skills(&candidate, &required, &SkillSet::new());

        assert_eq!(keys(&result.partial.required), vec!["aws lambda", "react"]);
        assert_eq!(keys(&result.missing.required), vec!["go"]);
        assert_eq!(result.partial_evidence.len(), 2);
        assert_eq!(result.partial_evidence[0].candidate.key(), "react native");
        assert_eq!(
            result.status_of(&Skill::new("react"), SkillTier::Required),
            Some(MatchStatus::Partial)
        );
    }

    #[test]
    fn test_exact_only_rule_has_no_partials() {
        let matcher = SkillMatcher::new(PartialRule::ExactOnly, 0.9);
        let candidate = set(&["React Native"]);
        let required = set(&["React"]);

        let result = matcher.match_skills(&candidate, &required, &SkillSet::new());
        assert!(result.partial.required.is_empty());
        assert_eq!(keys(&result.missing.required), vec!["react"]);
    }

    #[test]
    fn test_similarity_rule_catches_near_spellings() {
        let matcher = SkillMatcher::new(PartialRule::Similarity, 0.9);
        let candidate = set(&["Kubernetes"]);
        let required = set(&["Kubernets", "Terraform"]);

        let result = matcher.match_skills(&candidate, &required, &SkillSet::new());
        assert_eq!(keys(&result.partial.required), vec!["kubernets"]);
        assert_eq!(keys(&result.missing.required), vec!["terraform"]);
    }

    #[test]
    fn test_empty_tiers_and_empty_candidate() {
        let matcher = SkillMatcher::default();
        let empty = SkillSet::new();
        let result = matcher.match_skills(&set(&["Rust"]), &empty, &empty);
        assert_eq!(result, MatchResult::default());

        let required = set(&["Python", "Java"]);
        let result = matcher.match_skills(&empty, &required, &empty);
        assert!(result.matched.required.is_empty());
        assert_eq!(result.missing.required.len(), 2);
    }

    #[test]
    fn test_skill_in_both_tiers_is_classified_per_tier() {
        let matcher = SkillMatcher::default();
        let candidate = set(&["SQL"]);
        let both = set(&["SQL", "Excel"]);

        let result = matcher.match_skills(&candidate, &both, &both);
        assert_eq!(result.counts(SkillTier::Required).matched, 1);
        assert_eq!(result.counts(SkillTier::Recommended).matched, 1);
        assert_eq!(result.best_status(&Skill::new("excel")), Some(MatchStatus::Missing));
    }

    #[test]
    fn test_partition_holds_across_varied_inputs() {
        let candidates = [
            vec![],
            vec!["python", "data analysis", "excel"],
            vec!["java", "javascript", "type script"],
            vec!["a", "b", "c"],
        ];
        let requirement_sets = [
            vec!["Python", "Data", "Excel Macros", "SQL"],
            vec!["Java", "JavaScript", "TypeScript"],
            vec!["C", "C++", "C#", "Go"],
        ];

        for rule in [PartialRule::Containment, PartialRule::Similarity, PartialRule::ExactOnly] {
            let matcher = SkillMatcher::new(rule, 0.85);
            for candidate in &candidates {
                for required in &requirement_sets {
                    for recommended in &requirement_sets {
                        let candidate = set(candidate);
                        let required = set(required);
                        let recommended = set(recommended);
                        let result = matcher.match_skills(&candidate, &required, &recommended);
                        assert!(result.check_partition(SkillTier::Required, &required).is_ok());
                        assert!(result.check_partition(SkillTier::Recommended, &recommended).is_ok());
                    }
                }
            }
        }
    }

    #[test]
    fn test_check_partition_reports_overlap() {
        let mut result = MatchResult::default();
        result.matched.required.insert(Skill::new("Go"));
        result.missing.required.insert(Skill::new("go"));
        assert!(result.check_partition(SkillTier::Required, &set(&["Go"])).is_err());
    }
}
