//! Report structures handed to the formatters

use crate::config::{Config, PartialRule};
use crate::output::views::{project_views, ChartSeries, ViewOptions};
use crate::processing::analyzer::SkillAnalysis;
use crate::processing::catalog::{filter_and_sort, Catalog, CatalogStats, FilterState, JobProfileCategory};
use crate::processing::categories::SkillFrequency;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Report metadata and generation info
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub aligner_version: String,
    pub partial_rule: PartialRule,
    /// Source files the report was built from
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl ReportMetadata {
    pub fn new(config: &Config) -> Self {
        Self {
            generated_at: Utc::now(),
            aligner_version: env!("CARGO_PKG_VERSION").to_string(),
            partial_rule: config.matching.partial_rule,
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }
}

/// Verdict band for an overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitLevel {
    Excellent,
    Strong,
    Moderate,
    Weak,
}

impl FitLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=100 => FitLevel::Excellent,
            70..=89 => FitLevel::Strong,
            50..=69 => FitLevel::Moderate,
            _ => FitLevel::Weak,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            FitLevel::Excellent => "Excellent fit",
            FitLevel::Strong => "Strong fit",
            FitLevel::Moderate => "Moderate fit",
            FitLevel::Weak => "Weak fit",
        }
    }
}

/// One analyzed profile with its chart series
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub fit_level: FitLevel,
    pub analysis: SkillAnalysis,
    pub views: ChartSeries,
    pub metadata: ReportMetadata,
}

impl AnalysisReport {
    pub fn build(
        analysis: SkillAnalysis,
        config: &Config,
        selected_categories: Vec<String>,
        demand: Option<&SkillFrequency>,
        metadata: ReportMetadata,
    ) -> Self {
        let options = ViewOptions {
            full_mark: config.views.radar_full_mark,
            selected_categories,
            demand,
        };
        let views = project_views(
            &analysis.match_result,
            &analysis.scores,
            &analysis.category_breakdown,
            &analysis.skill_categories,
            &options,
        );

        Self {
            fit_level: FitLevel::from_score(analysis.scores.overall),
            analysis,
            views,
            metadata,
        }
    }
}

/// Filtered, sorted catalog as shown by the profile browser
#[derive(Debug, Clone, Serialize)]
pub struct ProfileListing {
    pub filter: FilterState,
    pub categories: Vec<JobProfileCategory>,
    pub matching_profiles: usize,
    pub total_profiles: usize,
    pub skill_filter_options: usize,
    pub metadata: ReportMetadata,
}

impl ProfileListing {
    pub fn build(catalog: &Catalog, filter: FilterState, metadata: ReportMetadata) -> Self {
        let categories = filter_and_sort(catalog, &filter);
        let matching_profiles = categories.iter().map(|c| c.sub_categories.len()).sum();

        Self {
            filter,
            categories,
            matching_profiles,
            total_profiles: catalog.sub_profile_count(),
            skill_filter_options: catalog.skill_filter_options().len(),
            metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub stats: CatalogStats,
    pub metadata: ReportMetadata,
}

impl StatsReport {
    pub fn build(catalog: &Catalog, top_n: usize, metadata: ReportMetadata) -> Self {
        Self {
            stats: CatalogStats::from_catalog(catalog, top_n),
            metadata,
        }
    }
}
