//! Percentage scores from match buckets

use crate::config::ScoringConfig;
use crate::error::{Result, SkillAlignerError};
use crate::processing::categories::CategoryAggregate;
use crate::processing::matcher::{BucketCounts, MatchResult, SkillTier};
use serde::{Deserialize, Serialize};

/// Tier weighting and partial credit used by [`score`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScoringConfig")]
pub struct Weighting {
    required_weight: f64,
    partial_credit: f64,
}

impl Default for Weighting {
    fn default() -> Self {
        Self {
            required_weight: 0.7,
            partial_credit: 0.0,
        }
    }
}

impl TryFrom<ScoringConfig> for Weighting {
    type Error = SkillAlignerError;

    fn try_from(config: ScoringConfig) -> Result<Self> {
        Self::from_config(&config)
    }
}

impl Weighting {
    pub fn new(required_weight: f64, partial_credit: f64) -> Result<Self> {
        for (name, value) in [("required_weight", required_weight), ("partial_credit", partial_credit)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SkillAlignerError::InvalidInput(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(Self {
            required_weight,
            partial_credit,
        })
    }

    pub fn from_config(config: &ScoringConfig) -> Result<Self> {
        Self::new(config.required_weight, config.partial_credit)
    }

    pub fn required_weight(&self) -> f64 {
        self.required_weight
    }

    pub fn recommended_weight(&self) -> f64 {
        1.0 - self.required_weight
    }

    pub fn partial_credit(&self) -> f64 {
        self.partial_credit
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSet {
    #[serde(rename = "overall_score")]
    pub overall: u8,
    #[serde(rename = "required_score")]
    pub required: u8,
    #[serde(rename = "recommended_score")]
    pub recommended: u8,
    #[serde(rename = "category_scores")]
    pub per_category: Vec<CategoryScore>,
}

impl ScoreSet {
    pub fn category(&self, name: &str) -> Option<u8> {
        self.per_category
            .iter()
            .find(|c| c.category == name)
            .map(|c| c.score)
    }
}

/// `round(100 * (matched + credit * partial) / total)`, or 100 when nothing is required
pub fn percentage(counts: BucketCounts, partial_credit: f64) -> u8 {
    let total = counts.total();
    if total == 0 {
        return 100;
    }
    let earned = counts.matched as f64 + partial_credit * counts.partial as f64;
    to_score(100.0 * earned / total as f64)
}

/// Tier and overall scores; per-category scores stay empty
pub fn score(result: &MatchResult, weighting: &Weighting) -> ScoreSet {
    let required = percentage(result.counts(SkillTier::Required), weighting.partial_credit);
    let recommended = percentage(result.counts(SkillTier::Recommended), weighting.partial_credit);
    let overall = to_score(
        weighting.required_weight * required as f64 + weighting.recommended_weight() * recommended as f64,
    );

    ScoreSet {
        overall,
        required,
        recommended,
        per_category: Vec::new(),
    }
}

/// Like [`score`], plus one score per category of the aggregate
pub fn score_with_categories(result: &MatchResult, weighting: &Weighting, aggregate: &CategoryAggregate) -> ScoreSet {
    let mut scores = score(result, weighting);
    scores.per_category = aggregate
        .categories
        .iter()
        .map(|c| CategoryScore {
            category: c.category.clone(),
            score: percentage(c.requirements, weighting.partial_credit),
        })
        .collect();
    scores
}

fn to_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}
