//! Improvement suggestions derived from missing skills and thin categories

use crate::processing::categories::CategoryAggregate;
use crate::processing::matcher::MatchResult;
use crate::processing::normalizer::Skill;
use serde::{Deserialize, Serialize};

/// Categories with fewer skills than this are flagged as thin
const THIN_CATEGORY_SKILLS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    AcquireRequired,
    ConsiderRecommended,
    BroadenCategory,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub priority: SuggestionPriority,
    pub message: String,
    pub skills: Vec<Skill>,
}

const GENERAL_ADVICE: [&str; 4] = [
    "Focus on acquiring the missing required skills first",
    "Consider online courses or certifications for key missing skills",
    "Look for projects or work opportunities to practice new skills",
    "Network with professionals in the field to learn about skill requirements",
];

/// Ordered suggestions: missing required, missing recommended, thinnest
/// category, then general advice when anything is missing.
pub fn improvement_suggestions(
    result: &MatchResult,
    aggregate: &CategoryAggregate,
    max_skills_per_suggestion: usize,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if !result.missing.required.is_empty() {
        suggestions.push(Suggestion {
            kind: SuggestionKind::AcquireRequired,
            priority: SuggestionPriority::High,
            message: "Priority skills to acquire".to_string(),
            skills: result
                .missing
                .required
                .iter()
                .take(max_skills_per_suggestion)
                .cloned()
                .collect(),
        });
    }

    if !result.missing.recommended.is_empty() {
        suggestions.push(Suggestion {
            kind: SuggestionKind::ConsiderRecommended,
            priority: SuggestionPriority::Medium,
            message: "Additional skills to consider".to_string(),
            skills: result
                .missing
                .recommended
                .iter()
                .take(max_skills_per_suggestion)
                .cloned()
                .collect(),
        });
    }

    // min_by_key keeps the first of equal minimums
    if let Some(thin) = aggregate
        .categories
        .iter()
        .filter(|c| c.skill_count < THIN_CATEGORY_SKILLS)
        .min_by_key(|c| c.skill_count)
    {
        suggestions.push(Suggestion {
            kind: SuggestionKind::BroadenCategory,
            priority: SuggestionPriority::Low,
            message: format!("Consider developing more {} skills", thin.category.to_lowercase()),
            skills: Vec::new(),
        });
    }

    if result.missing.total() > 0 {
        suggestions.extend(GENERAL_ADVICE.iter().map(|advice| Suggestion {
            kind: SuggestionKind::General,
            priority: SuggestionPriority::Low,
            message: advice.to_string(),
            skills: Vec::new(),
        }));
    }

    suggestions
}
