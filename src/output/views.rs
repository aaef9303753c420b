//! Chart series projected from a finished analysis

use crate::processing::categories::{CategoryAggregate, SkillCategories, SkillFrequency};
use crate::processing::matcher::{MatchResult, MatchStatus, SkillTier};
use crate::processing::normalizer::Skill;
use crate::processing::scorer::ScoreSet;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreCards {
    pub overall: u8,
    pub required: u8,
    pub recommended: u8,
}

impl From<&ScoreSet> for ScoreCards {
    fn from(scores: &ScoreSet) -> Self {
        Self {
            overall: scores.overall,
            required: scores.required,
            recommended: scores.recommended,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadarPoint {
    pub category: String,
    pub value: usize,
    pub full_mark: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackedBar {
    pub tier: SkillTier,
    pub matched: usize,
    pub partial: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub status: MatchStatus,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinePoint {
    pub category: String,
    pub current: usize,
    pub target: usize,
}

/// A scatter coordinate; `synthetic` marks values not backed by data
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaceholderValue {
    pub value: f64,
    pub synthetic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub skill: Skill,
    pub category: String,
    /// `None` for candidate skills no requirement asks for
    pub status: Option<MatchStatus>,
    pub complexity: PlaceholderValue,
    pub demand: PlaceholderValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub score_cards: ScoreCards,
    pub radar: Vec<RadarPoint>,
    pub stacked_bar: Vec<StackedBar>,
    pub pie: Vec<PieSlice>,
    pub line: Vec<LinePoint>,
    pub scatter: Vec<ScatterPoint>,
}

pub struct ViewOptions<'a> {
    pub full_mark: usize,
    /// Display hint restricting radar, line and scatter; empty shows everything
    pub selected_categories: Vec<String>,
    /// Catalog skill frequency backing the scatter `demand` axis
    pub demand: Option<&'a SkillFrequency>,
}

impl Default for ViewOptions<'_> {
    fn default() -> Self {
        Self {
            full_mark: 10,
            selected_categories: Vec::new(),
            demand: None,
        }
    }
}

impl ViewOptions<'_> {
    fn shows(&self, category: &str) -> bool {
        self.selected_categories.is_empty()
            || self
                .selected_categories
                .iter()
                .any(|selected| selected.eq_ignore_ascii_case(category))
    }
}

pub fn project_views(
    match_result: &MatchResult,
    scores: &ScoreSet,
    aggregate: &CategoryAggregate,
    skill_categories: &SkillCategories,
    options: &ViewOptions<'_>,
) -> ChartSeries {
    let radar = aggregate
        .categories
        .iter()
        .filter(|c| options.shows(&c.category))
        .map(|c| RadarPoint {
            category: c.category.clone(),
            value: c.skill_count.min(options.full_mark),
            full_mark: options.full_mark,
        })
        .collect();

    let stacked_bar = SkillTier::ALL
        .iter()
        .map(|&tier| {
            let counts = match_result.counts(tier);
            StackedBar {
                tier,
                matched: counts.matched,
                partial: counts.partial,
                missing: counts.missing,
            }
        })
        .collect();

    let pie = [MatchStatus::Matched, MatchStatus::Partial, MatchStatus::Missing]
        .into_iter()
        .map(|status| PieSlice {
            status,
            value: match_result.bucket(status).total(),
        })
        .collect();

    let line = aggregate
        .categories
        .iter()
        .filter(|c| options.shows(&c.category))
        .map(|c| LinePoint {
            category: c.category.clone(),
            current: c.requirements.matched,
            target: c.requirements.total(),
        })
        .collect();

    let scatter = skill_categories
        .iter()
        .filter(|c| options.shows(&c.name))
        .flat_map(|category| {
            category.skills.iter().map(move |skill| ScatterPoint {
                skill: skill.clone(),
                category: category.name.clone(),
                status: match_result.best_status(skill),
                complexity: placeholder(skill, 0),
                demand: demand(skill, options.demand),
            })
        })
        .collect();

    ChartSeries {
        score_cards: ScoreCards::from(scores),
        radar,
        stacked_bar,
        pie,
        line,
        scatter,
    }
}

/// Share of the most frequent skill's count, 0-100
fn demand(skill: &Skill, frequency: Option<&SkillFrequency>) -> PlaceholderValue {
    match frequency {
        Some(frequency) if frequency.max_count() > 0 => PlaceholderValue {
            value: (frequency.count(skill) as f64 / frequency.max_count() as f64 * 100.0).round(),
            synthetic: false,
        },
        _ => placeholder(skill, 1),
    }
}

/// Stable pseudo-value in 10..=100, steps of 10, derived from the skill key.
/// Shares the 0-100 scale of frequency-backed demand.
fn placeholder(skill: &Skill, salt: u32) -> PlaceholderValue {
    let hash = skill
        .key()
        .bytes()
        .fold(2166136261u32 ^ salt, |acc, b| (acc ^ b as u32).wrapping_mul(16777619));
    PlaceholderValue {
        value: f64::from((hash % 10 + 1) * 10),
        synthetic: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::categories::aggregate;
    use crate::processing::matcher::SkillMatcher;
    use crate::processing::normalizer::SkillSet;
    use crate::processing::scorer::{score_with_categories, Weighting};

    fn set(skills: &[&str]) -> SkillSet {
        skills.iter().map(|s| Skill::new(s)).collect()
    }

    fn fixture() -> (MatchResult, ScoreSet, CategoryAggregate, SkillCategories) {
        let result = SkillMatcher::default().match_skills(
            &set(&["python", "SQL", "React"]),
            &set(&["Python", "Java", "SQL"]),
            &set(&["React", "Docker"]),
        );
        let categories = SkillCategories::from_pairs(vec![
            ("Languages", vec!["Python", "Java"]),
            ("Data", vec!["SQL"]),
            ("Frontend", vec!["React"]),
            ("Ops", vec!["Docker"]),
        ])
        .unwrap();
        let aggregate = aggregate(&categories, &result);
        let scores = score_with_categories(&result, &Weighting::default(), &aggregate);
        (result, scores, aggregate, categories)
    }

    #[test]
    fn test_projection_shapes() {
        let (result, scores, aggregate, categories) = fixture();
        let views = project_views(&result, &scores, &aggregate, &categories, &ViewOptions::default());

        assert_eq!(views.score_cards.overall, 62);
        assert_eq!(views.radar.len(), 4);
        assert_eq!(views.stacked_bar[0].matched, 2);
        assert_eq!(views.stacked_bar[0].missing, 1);
        assert_eq!(views.stacked_bar[1].matched, 1);

        let pie: Vec<usize> = views.pie.iter().map(|s| s.value).collect();
        assert_eq!(pie, vec![3, 0, 2]);

        let languages = &views.line[0];
        assert_eq!((languages.current, languages.target), (1, 2));
        assert_eq!(views.scatter.len(), 5);
    }

    #[test]
    fn test_radar_value_is_capped() {
        let result = SkillMatcher::default().match_skills(&SkillSet::new(), &SkillSet::new(), &SkillSet::new());
        let categories = SkillCategories::from_pairs(vec![("Wide", vec!["a", "b", "c", "d"])]).unwrap();
        let aggregate = aggregate(&categories, &result);
        let scores = score_with_categories(&result, &Weighting::default(), &aggregate);
        let options = ViewOptions {
            full_mark: 3,
            ..ViewOptions::default()
        };

        let views = project_views(&result, &scores, &aggregate, &categories, &options);
        assert_eq!(views.radar[0].value, 3);
        assert_eq!(views.radar[0].full_mark, 3);
    }

    #[test]
    fn test_category_selection_restricts_series() {
        let (result, scores, aggregate, categories) = fixture();
        let options = ViewOptions {
            selected_categories: vec!["languages".to_string()],
            ..ViewOptions::default()
        };
        let views = project_views(&result, &scores, &aggregate, &categories, &options);

        assert_eq!(views.radar.len(), 1);
        assert_eq!(views.line.len(), 1);
        assert_eq!(views.scatter.len(), 2);
        assert_eq!(views.stacked_bar.len(), 2);
    }

    #[test]
    fn test_scatter_placeholders_are_tagged_and_stable() {
        let (result, scores, aggregate, categories) = fixture();
        let first = project_views(&result, &scores, &aggregate, &categories, &ViewOptions::default());
        let second = project_views(&result, &scores, &aggregate, &categories, &ViewOptions::default());

        assert_eq!(first.scatter, second.scatter);
        assert!(first.scatter.iter().all(|p| p.complexity.synthetic && p.demand.synthetic));
        for point in &first.scatter {
            for value in [point.complexity.value, point.demand.value] {
                assert!((10.0..=100.0).contains(&value));
                assert_eq!(value % 10.0, 0.0);
            }
        }
    }

    #[test]
    fn test_demand_from_frequency() {
        let (result, scores, aggregate, categories) = fixture();
        let mut frequency = SkillFrequency::new();
        for skill in ["Python", "Python", "SQL"] {
            frequency.record(&Skill::new(skill));
        }
        let options = ViewOptions {
            demand: Some(&frequency),
            ..ViewOptions::default()
        };
        let views = project_views(&result, &scores, &aggregate, &categories, &options);

        let python = views.scatter.iter().find(|p| p.skill.key() == "python").unwrap();
        assert_eq!(python.demand.value, 100.0);
        assert!(!python.demand.synthetic);
        let sql = views.scatter.iter().find(|p| p.skill.key() == "sql").unwrap();
        assert_eq!(sql.demand.value, 50.0);
        let docker = views.scatter.iter().find(|p| p.skill.key() == "docker").unwrap();
        assert_eq!(docker.demand.value, 0.0);
        assert_eq!(docker.status, Some(MatchStatus::Missing));
    }
}
