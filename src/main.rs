//! Skill aligner: match candidate skills against job profiles

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use skill_aligner::cli::{self, Cli, Commands, ConfigAction};
use skill_aligner::config::Config;
use skill_aligner::input::manager::InputManager;
use skill_aligner::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use skill_aligner::output::report::{AnalysisReport, ProfileListing, ReportMetadata, StatsReport};
use skill_aligner::processing::analyzer::AnalysisEngine;
use skill_aligner::processing::catalog::{Catalog, FilterState};
use skill_aligner::processing::categories::SkillFrequency;
use skill_aligner::SkillAlignerError;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load(Some(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: &Path) -> Result<()> {
    let mut input_manager = InputManager::new();

    match command {
        Commands::Analyze {
            skills,
            catalog,
            industry,
            profile,
            category,
            categories,
            show_categories,
            output,
            detailed,
            save,
        } => {
            info!("Starting skill alignment analysis");

            cli::validate_file_extension(&skills, &["json", "toml", "txt", "md", "markdown", "csv"])
                .map_err(|e| SkillAlignerError::InvalidInput(format!("Skills file: {}", e)))?;
            cli::validate_file_extension(&catalog, &["json", "toml"])
                .map_err(|e| SkillAlignerError::InvalidInput(format!("Catalog file: {}", e)))?;
            let output_format = resolve_format(output.as_deref(), &config)?;

            let raw_skills = input_manager
                .load_skills(&skills)
                .await
                .with_context(|| format!("Failed to load skills from {}", skills.display()))?;
            let catalog_data = load_job_profiles(&mut input_manager, &catalog, industry.as_deref()).await?;

            let mut engine = AnalysisEngine::new(&config).context("Invalid analysis settings")?;
            if let Some(categories_path) = &categories {
                let skill_categories = input_manager
                    .load_skill_categories(categories_path)
                    .await
                    .with_context(|| format!("Failed to load skill categories from {}", categories_path.display()))?;
                engine = engine.with_skill_categories(skill_categories);
            }

            let (profile_category, sub_profile) = catalog_data.require_sub_profile(&profile, category.as_deref())?;
            let candidate = engine.candidate_skills(&raw_skills);
            let analysis = engine.analyze(&candidate, &profile_category.category, sub_profile);

            let demand = SkillFrequency::from_catalog(&catalog_data);
            let metadata = ReportMetadata::new(&config)
                .with_source(skills.display().to_string())
                .with_source(catalog.display().to_string());
            let report = AnalysisReport::build(analysis, &config, show_categories, Some(&demand), metadata);

            let generator = ReportGenerator::with_options(
                config.output.color_output,
                detailed || config.output.detailed,
                true,
                true,
                true,
            );
            let content = generator.generate_report(&report, &output_format)?;
            let save = save.map(|path| {
                if path.is_dir() {
                    path.join(suggest_filename(&output_format, &report.analysis.profile.name, true))
                } else {
                    path
                }
            });
            emit(&content, save.as_deref())?;
        }

        Commands::Profiles {
            catalog,
            industry,
            search,
            skills,
            sort,
            output,
            detailed,
        } => {
            let output_format = resolve_format(output.as_deref(), &config)?;
            let sort_key = cli::parse_sort_key(&sort).map_err(SkillAlignerError::InvalidInput)?;
            let catalog_data = load_job_profiles(&mut input_manager, &catalog, industry.as_deref()).await?;

            let mut filter = FilterState::new().with_sort(sort_key);
            if let Some(term) = &search {
                filter = filter.with_search(term);
            }
            for skill in &skills {
                filter = filter.with_skill(skill);
            }

            let metadata = ReportMetadata::new(&config).with_source(catalog.display().to_string());
            let listing = ProfileListing::build(&catalog_data, filter, metadata);
            info!(
                "{} of {} profiles match the filters",
                listing.matching_profiles, listing.total_profiles
            );

            let generator = ReportGenerator::with_options(
                config.output.color_output,
                detailed || config.output.detailed,
                true,
                true,
                true,
            );
            println!("{}", generator.generate_profiles(&listing, &output_format)?);
        }

        Commands::Stats {
            catalog,
            industry,
            top,
            output,
        } => {
            let output_format = resolve_format(output.as_deref(), &config)?;
            let catalog_data = load_job_profiles(&mut input_manager, &catalog, industry.as_deref()).await?;

            let top_n = top.unwrap_or(config.views.top_common_skills);
            let metadata = ReportMetadata::new(&config).with_source(catalog.display().to_string());
            let report = StatsReport::build(&catalog_data, top_n, metadata);

            let generator = ReportGenerator::from_config(&config.output);
            println!("{}", generator.generate_stats(&report, &output_format)?);
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                let content = toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save_to(config_path)?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Set { key, value }) => {
                config.set_value(&key, &value)?;
                config.validate()?;
                config.save_to(config_path)?;
                println!("✅ Set {} = {}", key, value);
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
        },
    }

    Ok(())
}

/// Plain catalog, or one industry's profiles when `industry` is given
async fn load_job_profiles(manager: &mut InputManager, path: &Path, industry: Option<&str>) -> Result<Catalog> {
    match industry {
        Some(name) => {
            let industries = manager
                .load_industries(path)
                .await
                .with_context(|| format!("Failed to load industries from {}", path.display()))?;
            let selected = industries.require_industry(name)?;
            info!(
                "Using {} profiles from industry '{}'",
                selected.job_profiles.sub_profile_count(),
                selected.name
            );
            Ok(selected.job_profiles.clone())
        }
        None => Ok(manager
            .load_catalog(path)
            .await
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?),
    }
}

fn resolve_format(output: Option<&str>, config: &Config) -> Result<skill_aligner::config::OutputFormat> {
    match output {
        Some(format) => Ok(cli::parse_output_format(format).map_err(SkillAlignerError::InvalidInput)?),
        None => Ok(config.output.format),
    }
}

/// Print the rendered report, or write it to `save` when given
fn emit(content: &str, save: Option<&Path>) -> Result<()> {
    match save {
        Some(path) => {
            save_report_to_file(content, path)
                .with_context(|| format!("Failed to save report to {}", path.display()))?;
            println!("💾 Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
