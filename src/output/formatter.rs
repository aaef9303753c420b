//! Output formatters for analysis reports, profile listings and catalog stats

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{Result, SkillAlignerError};
use crate::output::report::{AnalysisReport, ProfileListing, ReportMetadata, StatsReport};
use crate::processing::matcher::SkillTier;
use crate::processing::normalizer::SkillSet;
use crate::processing::suggestions::{Suggestion, SuggestionPriority};
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering every report kind in one format
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn format_profiles(&self, listing: &ProfileListing) -> Result<String>;
    fn format_stats(&self, report: &StatsReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Dispatches to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

const STYLES: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
        .header { text-align: center; margin-bottom: 30px; border-bottom: 3px solid #007acc; padding-bottom: 20px; }
        .score-badge { display: inline-block; padding: 8px 16px; border-radius: 20px; font-weight: bold; color: white; margin-left: 10px; }
        .score-excellent { background: #28a745; }
        .score-good { background: #17a2b8; }
        .score-fair { background: #ffc107; color: #000; }
        .score-poor { background: #dc3545; }
        .cards { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; margin: 20px 0; }
        .card { background: #f8f9fa; padding: 15px; border-radius: 6px; border-left: 4px solid #007acc; }
        .section h2 { color: #007acc; border-bottom: 2px solid #e9ecef; padding-bottom: 10px; }
        table { border-collapse: collapse; width: 100%; }
        th, td { text-align: left; padding: 6px 10px; border-bottom: 1px solid #e9ecef; }
        .suggestion { background: white; padding: 10px 15px; margin: 8px 0; border-radius: 6px; border-left: 4px solid #17a2b8; }
        .priority-high { border-left-color: #dc3545; }
        .priority-medium { border-left-color: #ffc107; }
        .priority-low { border-left-color: #28a745; }
        .metadata { background: #e9ecef; padding: 15px; border-radius: 6px; margin-top: 30px; font-size: 0.9em; color: #6c757d; }
"#;

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Skill Alignment: {{ profile_name }}</title>
    {% if include_styles %}<style>{{ styles|safe }}</style>{% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Skill Alignment Report</h1>
            <p>{{ category }} / <strong>{{ profile_name }}</strong></p>
            <p>Overall: {{ overall }}% <span class="score-badge {{ score_class }}">{{ fit_label }}</span></p>
        </div>

        <div class="cards">
            <div class="card"><h3>Overall</h3><p>{{ overall }}%</p></div>
            <div class="card"><h3>Required</h3><p>{{ required }}%</p></div>
            <div class="card"><h3>Recommended</h3><p>{{ recommended }}%</p></div>
        </div>

        <div class="section">
            <h2>Skill Gaps</h2>
            <table>
                <tr><th>Bucket</th><th>Required</th><th>Recommended</th></tr>
                {% for row in bucket_rows %}
                <tr><td>{{ row.label }}</td><td>{{ row.required }}</td><td>{{ row.recommended }}</td></tr>
                {% endfor %}
            </table>
        </div>

        {% if !category_rows.is_empty() %}
        <div class="section">
            <h2>Categories</h2>
            <table>
                <tr><th>Category</th><th>Skills</th><th>Matched</th><th>Requirements</th><th>Score</th></tr>
                {% for row in category_rows %}
                <tr><td>{{ row.name }}</td><td>{{ row.skills }}</td><td>{{ row.matched }}</td><td>{{ row.target }}</td><td>{{ row.score }}%</td></tr>
                {% endfor %}
            </table>
        </div>
        {% endif %}

        {% if !suggestions.is_empty() %}
        <div class="section">
            <h2>Suggestions</h2>
            {% for suggestion in suggestions %}
            <div class="suggestion priority-{{ suggestion.priority }}">
                <strong>{{ suggestion.message }}</strong>{% if !suggestion.skills.is_empty() %}: {{ suggestion.skills }}{% endif %}
            </div>
            {% endfor %}
        </div>
        {% endif %}

        <div class="metadata">
            <p><strong>Generated:</strong> {{ generated_at }} | <strong>Version:</strong> {{ version }} | <strong>Partial rule:</strong> {{ partial_rule }}</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlReportTemplate {
    include_styles: bool,
    styles: &'static str,
    category: String,
    profile_name: String,
    overall: u8,
    required: u8,
    recommended: u8,
    score_class: &'static str,
    fit_label: &'static str,
    bucket_rows: Vec<HtmlBucketRow>,
    category_rows: Vec<HtmlCategoryRow>,
    suggestions: Vec<HtmlSuggestion>,
    generated_at: String,
    version: String,
    partial_rule: String,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{{ title }}</title>
    {% if include_styles %}<style>{{ styles|safe }}</style>{% endif %}
</head>
<body>
    <div class="container">
        <div class="header"><h1>{{ title }}</h1><p>{{ summary }}</p></div>
        <div class="section">
            <table>
                <tr>{% for heading in headings %}<th>{{ heading }}</th>{% endfor %}</tr>
                {% for row in rows %}
                <tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>
                {% endfor %}
            </table>
        </div>
        <div class="metadata"><p><strong>Generated:</strong> {{ generated_at }} | <strong>Version:</strong> {{ version }}</p></div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTableTemplate {
    include_styles: bool,
    styles: &'static str,
    title: String,
    summary: String,
    headings: Vec<&'static str>,
    rows: Vec<Vec<String>>,
    generated_at: String,
    version: String,
}

struct HtmlBucketRow {
    label: &'static str,
    required: String,
    recommended: String,
}

struct HtmlCategoryRow {
    name: String,
    skills: usize,
    matched: usize,
    target: usize,
    score: u8,
}

struct HtmlSuggestion {
    priority: &'static str,
    message: String,
    skills: String,
}

fn join_skills(skills: &SkillSet) -> String {
    if skills.is_empty() {
        return "none".to_string();
    }
    skills.iter().map(|s| s.label()).collect::<Vec<_>>().join(", ")
}

fn suggestion_skills(suggestion: &Suggestion) -> String {
    suggestion.skills.iter().map(|s| s.label()).collect::<Vec<_>>().join(", ")
}

fn format_timestamp(metadata: &ReportMetadata) -> String {
    metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            90..=100 => ("EXCELLENT", Color::Green),
            70..=89 => ("STRONG", Color::BrightGreen),
            50..=69 => ("MODERATE", Color::Yellow),
            _ => ("WEAK", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_priority_icon(&self, priority: SuggestionPriority) -> &'static str {
        match (self.use_colors, priority) {
            (true, SuggestionPriority::High) => "⚠️ ",
            (true, SuggestionPriority::Medium) => "📋",
            (true, SuggestionPriority::Low) => "💡",
            (false, SuggestionPriority::High) => "[!]",
            (false, SuggestionPriority::Medium) => "[-]",
            (false, SuggestionPriority::Low) => "[+]",
        }
    }

    fn format_metadata(&self, metadata: &ReportMetadata) -> String {
        self.colorize(
            &format!(
                "Generated: {} | skill-aligner v{}\n",
                format_timestamp(metadata),
                metadata.aligner_version
            ),
            Color::BrightBlack,
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let analysis = &report.analysis;
        let scores = &analysis.scores;
        let result = &analysis.match_result;
        let mut output = String::new();

        output.push_str(&self.format_header("SKILL ALIGNMENT ANALYSIS", 1));
        output.push_str(&format!(
            "Profile: {} / {}\n",
            analysis.profile.category,
            self.colorize(&analysis.profile.name, Color::Cyan)
        ));
        output.push_str(&self.format_metadata(&report.metadata));

        output.push_str(&self.format_header("Scores", 2));
        output.push_str(&format!(
            "Overall Score: {}% {}\n",
            scores.overall,
            self.format_score_badge(scores.overall)
        ));
        output.push_str(&format!("Required:      {}%\n", scores.required));
        output.push_str(&format!("Recommended:   {}%\n", scores.recommended));
        output.push_str(&format!("Verdict: {}\n", self.colorize(report.fit_level.label(), Color::Cyan)));

        output.push_str(&self.format_header("Required Skills", 3));
        output.push_str(&format!("✓ Matched: {}\n", self.colorize(&join_skills(&result.matched.required), Color::Green)));
        output.push_str(&format!("~ Partial: {}\n", self.colorize(&join_skills(&result.partial.required), Color::Yellow)));
        output.push_str(&format!("✗ Missing: {}\n", self.colorize(&join_skills(&result.missing.required), Color::Red)));

        output.push_str(&self.format_header("Recommended Skills", 3));
        output.push_str(&format!("✓ Matched: {}\n", self.colorize(&join_skills(&result.matched.recommended), Color::Green)));
        output.push_str(&format!("~ Partial: {}\n", self.colorize(&join_skills(&result.partial.recommended), Color::Yellow)));
        output.push_str(&format!("✗ Missing: {}\n", self.colorize(&join_skills(&result.missing.recommended), Color::Red)));

        if !scores.per_category.is_empty() {
            output.push_str(&self.format_header("Categories", 3));
            for point in &report.views.line {
                let score = scores.category(&point.category).unwrap_or(100);
                output.push_str(&format!(
                    "  {:<24} {:>3}%  ({}/{} requirements matched)\n",
                    point.category, score, point.current, point.target
                ));
            }
        }

        if !analysis.improvement_suggestions.is_empty() {
            output.push_str(&self.format_header("Suggestions", 2));
            for suggestion in &analysis.improvement_suggestions {
                let skills = suggestion_skills(suggestion);
                if skills.is_empty() {
                    output.push_str(&format!("{} {}\n", self.format_priority_icon(suggestion.priority), suggestion.message));
                } else {
                    output.push_str(&format!(
                        "{} {}: {}\n",
                        self.format_priority_icon(suggestion.priority),
                        suggestion.message,
                        self.colorize(&skills, Color::Yellow)
                    ));
                }
            }
        }

        if self.detailed {
            if !result.partial_evidence.is_empty() {
                output.push_str(&self.format_header("Partial Matches", 3));
                for evidence in &result.partial_evidence {
                    output.push_str(&format!(
                        "  {} ({}) ~ {}\n",
                        evidence.requirement, evidence.tier, evidence.candidate
                    ));
                }
            }

            output.push_str(&self.format_header("Skill Categories", 3));
            for category in analysis.skill_categories.iter() {
                output.push_str(&format!("  {}: {}\n", category.name, join_skills(&category.skills)));
            }

            output.push_str(&self.format_header("Chart Series", 3));
            for slice in &report.views.pie {
                output.push_str(&format!("  {:<8} {}\n", slice.status, slice.value));
            }
            for point in &report.views.radar {
                output.push_str(&format!("  radar {:<24} {}/{}\n", point.category, point.value, point.full_mark));
            }
        }

        Ok(output)
    }

    fn format_profiles(&self, listing: &ProfileListing) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("JOB PROFILES", 1));
        output.push_str(&format!(
            "Showing {} of {} profiles (sorted by {}, {} skills available as filters)\n",
            listing.matching_profiles, listing.total_profiles, listing.filter.sort_key, listing.skill_filter_options
        ));
        if !listing.filter.search_term.is_empty() {
            output.push_str(&format!("Search: {}\n", self.colorize(&listing.filter.search_term, Color::Cyan)));
        }
        if !listing.filter.selected_skills.is_empty() {
            output.push_str(&format!("Skills: {}\n", join_skills(&listing.filter.selected_skills)));
        }

        for category in &listing.categories {
            output.push_str(&self.format_header(&category.category, 2));
            for profile in &category.sub_categories {
                output.push_str(&format!(
                    "  {} ({} required, {} recommended)\n",
                    self.colorize(&profile.name, Color::Cyan),
                    profile.required_skills.len(),
                    profile.recommended_skills.len()
                ));
                if self.detailed {
                    output.push_str(&format!("    required: {}\n", join_skills(&profile.required_skills)));
                    output.push_str(&format!("    recommended: {}\n", join_skills(&profile.recommended_skills)));
                }
            }
        }

        if listing.categories.is_empty() {
            output.push_str(&self.colorize("No profiles match the current filters\n", Color::Yellow));
        }

        Ok(output)
    }

    fn format_stats(&self, report: &StatsReport) -> Result<String> {
        let stats = &report.stats;
        let mut output = String::new();

        output.push_str(&self.format_header("CATALOG STATISTICS", 1));
        output.push_str(&format!("Profiles:              {}\n", stats.total_profiles));
        output.push_str(&format!("Required skill slots:  {}\n", stats.total_required_skills));
        output.push_str(&format!("Recommended slots:     {}\n", stats.total_recommended_skills));

        output.push_str(&self.format_header("Profiles per Category", 2));
        for entry in &stats.profiles_per_category {
            output.push_str(&format!("  {:<28} {}\n", entry.category, entry.profiles));
        }

        output.push_str(&self.format_header("Most Common Skills", 2));
        for (rank, entry) in stats.most_common_skills.iter().enumerate() {
            output.push_str(&format!("  {:>2}. {:<24} {}\n", rank + 1, entry.skill, entry.count));
        }

        output.push_str(&self.format_metadata(&report.metadata));
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_profiles(&self, listing: &ProfileListing) -> Result<String> {
        self.to_json(listing)
    }

    fn format_stats(&self, report: &StatsReport) -> Result<String> {
        self.to_json(report)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(score: u8) -> &'static str {
        match score {
            90..=100 => "🟢 Excellent",
            70..=89 => "🔵 Strong",
            50..=69 => "🟡 Moderate",
            _ => "🔴 Weak",
        }
    }

    fn metadata_line(&self, metadata: &ReportMetadata) -> String {
        if self.include_metadata {
            format!(
                "**Generated:** {} | **Version:** {}\n\n",
                format_timestamp(metadata),
                metadata.aligner_version
            )
        } else {
            String::new()
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let analysis = &report.analysis;
        let scores = &analysis.scores;
        let result = &analysis.match_result;
        let mut output = String::new();

        output.push_str(&format!("# Skill Alignment: {}\n\n", analysis.profile.name));
        output.push_str(&format!("**Category:** {}\n\n", analysis.profile.category));
        output.push_str(&self.metadata_line(&report.metadata));

        output.push_str("## Scores\n\n");
        output.push_str(&format!(
            "**Overall:** {}% {}\n\n",
            scores.overall,
            Self::markdown_score_badge(scores.overall)
        ));
        output.push_str("| Tier | Score | Matched | Partial | Missing |\n");
        output.push_str("|------|-------|---------|---------|---------|\n");
        for bar in &report.views.stacked_bar {
            let score = match bar.tier {
                SkillTier::Required => scores.required,
                SkillTier::Recommended => scores.recommended,
            };
            output.push_str(&format!(
                "| {} | {}% | {} | {} | {} |\n",
                bar.tier, score, bar.matched, bar.partial, bar.missing
            ));
        }
        output.push('\n');

        output.push_str("## Skill Gaps\n\n");
        output.push_str(&format!("- **Matched (required):** {}\n", join_skills(&result.matched.required)));
        output.push_str(&format!("- **Missing (required):** {}\n", join_skills(&result.missing.required)));
        output.push_str(&format!("- **Matched (recommended):** {}\n", join_skills(&result.matched.recommended)));
        output.push_str(&format!("- **Missing (recommended):** {}\n", join_skills(&result.missing.recommended)));
        if result.partial.total() > 0 {
            output.push_str(&format!(
                "- **Partial:** {}, {}\n",
                join_skills(&result.partial.required),
                join_skills(&result.partial.recommended)
            ));
        }
        output.push('\n');

        if !report.views.line.is_empty() {
            output.push_str("## Categories\n\n");
            output.push_str("| Category | Skills | Matched | Requirements | Score |\n");
            output.push_str("|----------|--------|---------|--------------|-------|\n");
            for (radar, line) in report.views.radar.iter().zip(&report.views.line) {
                output.push_str(&format!(
                    "| {} | {} | {} | {} | {}% |\n",
                    line.category,
                    radar.value,
                    line.current,
                    line.target,
                    scores.category(&line.category).unwrap_or(100)
                ));
            }
            output.push('\n');
        }

        if !analysis.improvement_suggestions.is_empty() {
            output.push_str("## Suggestions\n\n");
            for suggestion in &analysis.improvement_suggestions {
                let skills = suggestion_skills(suggestion);
                if skills.is_empty() {
                    output.push_str(&format!("- {}\n", suggestion.message));
                } else {
                    output.push_str(&format!("- **{}:** {}\n", suggestion.message, skills));
                }
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn format_profiles(&self, listing: &ProfileListing) -> Result<String> {
        let mut output = String::from("# Job Profiles\n\n");
        output.push_str(&self.metadata_line(&listing.metadata));
        output.push_str(&format!(
            "Showing {} of {} profiles, sorted by {}.\n\n",
            listing.matching_profiles, listing.total_profiles, listing.filter.sort_key
        ));

        for category in &listing.categories {
            output.push_str(&format!("## {}\n\n", category.category));
            output.push_str("| Profile | Required | Recommended |\n");
            output.push_str("|---------|----------|-------------|\n");
            for profile in &category.sub_categories {
                output.push_str(&format!(
                    "| {} | {} | {} |\n",
                    profile.name,
                    join_skills(&profile.required_skills),
                    join_skills(&profile.recommended_skills)
                ));
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn format_stats(&self, report: &StatsReport) -> Result<String> {
        let stats = &report.stats;
        let mut output = String::from("# Catalog Statistics\n\n");
        output.push_str(&self.metadata_line(&report.metadata));
        output.push_str(&format!("- **Profiles:** {}\n", stats.total_profiles));
        output.push_str(&format!("- **Required skill slots:** {}\n", stats.total_required_skills));
        output.push_str(&format!("- **Recommended skill slots:** {}\n\n", stats.total_recommended_skills));

        output.push_str("## Most Common Skills\n\n");
        output.push_str("| Skill | Profiles |\n|-------|----------|\n");
        for entry in &stats.most_common_skills {
            output.push_str(&format!("| {} | {} |\n", entry.skill, entry.count));
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn create_template_data(&self, report: &AnalysisReport) -> HtmlReportTemplate {
        let analysis = &report.analysis;
        let scores = &analysis.scores;
        let result = &analysis.match_result;

        let score_class = match scores.overall {
            90..=100 => "score-excellent",
            70..=89 => "score-good",
            50..=69 => "score-fair",
            _ => "score-poor",
        };

        let bucket_rows = vec![
            HtmlBucketRow {
                label: "Matched",
                required: join_skills(&result.matched.required),
                recommended: join_skills(&result.matched.recommended),
            },
            HtmlBucketRow {
                label: "Partial",
                required: join_skills(&result.partial.required),
                recommended: join_skills(&result.partial.recommended),
            },
            HtmlBucketRow {
                label: "Missing",
                required: join_skills(&result.missing.required),
                recommended: join_skills(&result.missing.recommended),
            },
        ];

        let category_rows = report
            .views
            .radar
            .iter()
            .zip(&report.views.line)
            .map(|(radar, line)| HtmlCategoryRow {
                name: line.category.clone(),
                skills: radar.value,
                matched: line.current,
                target: line.target,
                score: scores.category(&line.category).unwrap_or(100),
            })
            .collect();

        let suggestions = analysis
            .improvement_suggestions
            .iter()
            .map(|suggestion| HtmlSuggestion {
                priority: match suggestion.priority {
                    SuggestionPriority::High => "high",
                    SuggestionPriority::Medium => "medium",
                    SuggestionPriority::Low => "low",
                },
                message: suggestion.message.clone(),
                skills: suggestion_skills(suggestion),
            })
            .collect();

        HtmlReportTemplate {
            include_styles: self.include_styles,
            styles: STYLES,
            category: analysis.profile.category.clone(),
            profile_name: analysis.profile.name.clone(),
            overall: scores.overall,
            required: scores.required,
            recommended: scores.recommended,
            score_class,
            fit_label: report.fit_level.label(),
            bucket_rows,
            category_rows,
            suggestions,
            generated_at: format_timestamp(&report.metadata),
            version: report.metadata.aligner_version.clone(),
            partial_rule: format!("{:?}", report.metadata.partial_rule),
        }
    }

    fn table(
        &self,
        title: &str,
        summary: String,
        headings: Vec<&'static str>,
        rows: Vec<Vec<String>>,
        metadata: &ReportMetadata,
    ) -> Result<String> {
        HtmlTableTemplate {
            include_styles: self.include_styles,
            styles: STYLES,
            title: title.to_string(),
            summary,
            headings,
            rows,
            generated_at: format_timestamp(metadata),
            version: metadata.aligner_version.clone(),
        }
        .render()
        .map_err(|e| SkillAlignerError::OutputFormatting(e.to_string()))
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| SkillAlignerError::OutputFormatting(e.to_string()))
    }

    fn format_profiles(&self, listing: &ProfileListing) -> Result<String> {
        let rows = listing
            .categories
            .iter()
            .flat_map(|category| {
                category.sub_categories.iter().map(move |profile| {
                    vec![
                        category.category.clone(),
                        profile.name.clone(),
                        join_skills(&profile.required_skills),
                        join_skills(&profile.recommended_skills),
                    ]
                })
            })
            .collect();

        self.table(
            "Job Profiles",
            format!("Showing {} of {} profiles", listing.matching_profiles, listing.total_profiles),
            vec!["Category", "Profile", "Required", "Recommended"],
            rows,
            &listing.metadata,
        )
    }

    fn format_stats(&self, report: &StatsReport) -> Result<String> {
        let rows = report
            .stats
            .most_common_skills
            .iter()
            .map(|entry| vec![entry.skill.to_string(), entry.count.to_string()])
            .collect();

        self.table(
            "Catalog Statistics",
            format!(
                "{} profiles, {} required and {} recommended skill slots",
                report.stats.total_profiles, report.stats.total_required_skills, report.stats.total_recommended_skills
            ),
            vec!["Skill", "Profiles"],
            rows,
            &report.metadata,
        )
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::with_options(config.color_output, config.detailed, true, true, true)
    }

    fn formatter(&self, format: &OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
            OutputFormat::Html => &self.html_formatter,
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn generate_profiles(&self, listing: &ProfileListing, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_profiles(listing)
    }

    pub fn generate_stats(&self, report: &StatsReport, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_stats(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, profile_name: &str, timestamp: bool) -> String {
    let base_name: String = profile_name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let base_name = if base_name.is_empty() { "profile".to_string() } else { base_name };

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };
    format!("{}_analysis{}.{}", base_name, timestamp_suffix, extension)
}
