//! Integration tests for the skill aligner

use skill_aligner::config::{Config, OutputFormat};
use skill_aligner::input::manager::InputManager;
use skill_aligner::output::formatter::{save_report_to_file, ReportGenerator};
use skill_aligner::output::report::{AnalysisReport, ProfileListing, ReportMetadata};
use skill_aligner::processing::analyzer::{AnalysisEngine, AnalysisSession};
use skill_aligner::processing::catalog::{filter_and_sort, FilterState, SortKey};
use skill_aligner::processing::categories::SkillFrequency;
use skill_aligner::processing::matcher::SkillTier;
use skill_aligner::SkillAlignerError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CATALOG_JSON: &str = r#"{
  "job_profiles": [
    {
      "category": "Software Engineering",
      "sub_categories": [
        {
          "name": "Backend Developer",
          "required_skills": ["Python", "Java", "SQL"],
          "recommended_skills": ["React", "Docker"]
        },
        {
          "name": "Frontend Developer",
          "required_skills": ["JavaScript", "React", "CSS"],
          "recommended_skills": ["TypeScript"]
        }
      ]
    },
    {
      "category": "Data",
      "sub_categories": [
        {
          "name": "Data Analyst",
          "required_skills": ["SQL", "Excel", "Python"],
          "recommended_skills": null
        }
      ]
    }
  ]
}"#;

const SKILLS_TXT: &str = "# exported skills\n- python\n- SQL, React\n";

fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn test_load_catalog_and_skills() {
    let dir = TempDir::new().unwrap();
    let catalog_path = write_fixture(&dir, "catalog.json", CATALOG_JSON);
    let skills_path = write_fixture(&dir, "skills.txt", SKILLS_TXT);

    let mut manager = InputManager::new();
    let catalog = manager.load_catalog(&catalog_path).await.unwrap();
    assert_eq!(catalog.categories().len(), 2);
    assert_eq!(catalog.sub_profile_count(), 3);

    let (_, analyst) = catalog.find_sub_profile("Data Analyst", None).unwrap();
    assert!(analyst.recommended_skills.is_empty());

    let skills = manager.load_skills(&skills_path).await.unwrap();
    assert_eq!(skills, vec!["python", "SQL", "React"]);
}

#[tokio::test]
async fn test_caching_functionality() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "skills.json", r#"{"skills": ["Rust", "Go"]}"#);

    let mut manager = InputManager::new();
    let first = manager.load_skills(&path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.load_skills(&path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);

    let mut uncached = InputManager::new().with_cache(false);
    uncached.load_skills(&path).await.unwrap();
    assert_eq!(uncached.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "skills.xyz", "Rust");

    let mut manager = InputManager::new();
    let result = manager.load_skills(&path).await;
    assert!(matches!(result, Err(SkillAlignerError::UnsupportedFormat(_))));

    let text_catalog = write_fixture(&dir, "catalog.txt", "Data Analyst");
    assert!(manager.load_catalog(&text_catalog).await.is_err());
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager.load_catalog(Path::new("tests/fixtures/nonexistent.json")).await;
    assert!(matches!(result, Err(SkillAlignerError::InvalidInput(_))));
}

#[tokio::test]
async fn test_malformed_catalog() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "catalog.json", r#"{"job_profiles": [{"sub_categories": 5}]}"#);

    let mut manager = InputManager::new();
    assert!(manager.load_catalog(&path).await.is_err());
}

#[tokio::test]
async fn test_end_to_end_reference_scenario() {
    let dir = TempDir::new().unwrap();
    let catalog_path = write_fixture(&dir, "catalog.json", CATALOG_JSON);
    let skills_path = write_fixture(&dir, "skills.txt", SKILLS_TXT);

    let mut manager = InputManager::new();
    let catalog = manager.load_catalog(&catalog_path).await.unwrap();
    let raw_skills = manager.load_skills(&skills_path).await.unwrap();

    let config = Config::default();
    let engine = AnalysisEngine::new(&config).unwrap();
    let (category, profile) = catalog.require_sub_profile("backend developer", None).unwrap();
    let candidate = engine.candidate_skills(&raw_skills);
    let analysis = engine.analyze(&candidate, &category.category, profile);

    assert_eq!(analysis.scores.required, 67);
    assert_eq!(analysis.scores.recommended, 50);
    assert_eq!(analysis.scores.overall, 62);

    let result = &analysis.match_result;
    let matched: Vec<&str> = result.matched.required.iter().map(|s| s.key()).collect();
    assert_eq!(matched.len(), 2);
    assert!(matched.contains(&"python") && matched.contains(&"sql"));
    assert!(result.missing.required.contains_key("java"));
    assert!(result.matched.recommended.contains_key("react"));
    assert!(result.missing.recommended.contains_key("docker"));
    assert!(result.check_partition(SkillTier::Required, &profile.required_skills).is_ok());

    let demand = SkillFrequency::from_catalog(&catalog);
    let report = AnalysisReport::build(analysis, &config, Vec::new(), Some(&demand), ReportMetadata::new(&config));
    let json = ReportGenerator::new().generate_report(&report, &OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["analysis"]["overall_score"], 62);
    assert_eq!(value["views"]["pie"][0]["value"], 3);

    let out_path = dir.path().join("reports").join("backend.json");
    save_report_to_file(&json, &out_path).unwrap();
    assert!(out_path.exists());
}

#[tokio::test]
async fn test_empty_candidate_scores_zero() {
    let dir = TempDir::new().unwrap();
    let catalog_path = write_fixture(&dir, "catalog.json", CATALOG_JSON);
    let skills_path = write_fixture(&dir, "skills.json", "[]");

    let mut manager = InputManager::new();
    let catalog = manager.load_catalog(&catalog_path).await.unwrap();
    let raw_skills = manager.load_skills(&skills_path).await.unwrap();

    let engine = AnalysisEngine::new(&Config::default()).unwrap();
    let (category, profile) = catalog.require_sub_profile("Data Analyst", Some("data")).unwrap();
    let analysis = engine.analyze(&engine.candidate_skills(&raw_skills), &category.category, profile);

    assert!(analysis.match_result.matched.required.is_empty());
    assert_eq!(analysis.scores.required, 0);
    // no recommended skills, so that tier is vacuously complete
    assert_eq!(analysis.scores.recommended, 100);
    assert_eq!(analysis.scores.overall, 30);
}

#[tokio::test]
async fn test_profile_not_found() {
    let dir = TempDir::new().unwrap();
    let catalog_path = write_fixture(&dir, "catalog.json", CATALOG_JSON);
    let catalog = InputManager::new().load_catalog(&catalog_path).await.unwrap();

    let result = catalog.require_sub_profile("Data Analyst", Some("Software Engineering"));
    assert!(matches!(result, Err(SkillAlignerError::ProfileNotFound(_))));
}

#[tokio::test]
async fn test_industry_file_scopes_profiles() {
    let dir = TempDir::new().unwrap();
    let industries_json = format!(
        r#"{{"industries": [
            {{"name": "Information Technology", "description": "Software and IT", "job_profiles": {}}},
            {{"name": "Retail", "description": "Stores", "job_profiles": []}}
        ]}}"#,
        CATALOG_JSON
    );
    let path = write_fixture(&dir, "industries.json", &industries_json);

    let mut manager = InputManager::new();
    let industries = manager.load_industries(&path).await.unwrap();
    assert_eq!(industries.names(), vec!["Information Technology", "Retail"]);

    let it = industries.require_industry("information technology").unwrap();
    let (category, profile) = it.job_profiles.require_sub_profile("Backend Developer", None).unwrap();
    let engine = AnalysisEngine::new(&Config::default()).unwrap();
    let analysis = engine.analyze(&engine.candidate_skills(&["Python", "SQL", "React"]), &category.category, profile);
    assert_eq!(analysis.scores.overall, 62);

    let retail = industries.require_industry("Retail").unwrap();
    assert!(retail.job_profiles.require_sub_profile("Backend Developer", None).is_err());
    assert!(matches!(
        industries.require_industry("Energy"),
        Err(SkillAlignerError::ProfileNotFound(_))
    ));
}

#[tokio::test]
async fn test_category_drop_scenario() {
    let dir = TempDir::new().unwrap();
    let catalog_path = write_fixture(&dir, "catalog.json", CATALOG_JSON);
    let catalog = InputManager::new().load_catalog(&catalog_path).await.unwrap();

    let filtered = filter_and_sort(&catalog, &FilterState::new().with_search("excel"));
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].category, "Data");

    let none = filter_and_sort(&catalog, &FilterState::new().with_search("cobol"));
    assert!(none.is_empty());

    let conjunctive = filter_and_sort(&catalog, &FilterState::new().with_skill("Python").with_skill("SQL"));
    let names: Vec<&str> = conjunctive
        .iter()
        .flat_map(|c| c.sub_categories.iter().map(|p| p.name.as_str()))
        .collect();
    assert_eq!(names, vec!["Data Analyst", "Backend Developer"]);

    let by_total = filter_and_sort(&catalog, &FilterState::new().with_sort(SortKey::TotalSkills));
    assert_eq!(by_total[0].category, "Software Engineering");
}

#[tokio::test]
async fn test_skill_categories_file_and_session() {
    let dir = TempDir::new().unwrap();
    let categories_path = write_fixture(
        &dir,
        "categories.toml",
        "Data = [\"SQL\", \"Excel\"]\n\n[Languages]\nskills = [\"Python\", \"Java\"]\n",
    );
    let catalog_path = write_fixture(&dir, "catalog.json", CATALOG_JSON);

    let mut manager = InputManager::new();
    let categories = manager.load_skill_categories(&categories_path).await.unwrap();
    assert_eq!(categories.names(), vec!["Data", "Languages"]);
    let catalog = manager.load_catalog(&catalog_path).await.unwrap();

    let engine = AnalysisEngine::new(&Config::default())
        .unwrap()
        .with_skill_categories(categories);
    let mut session = AnalysisSession::new(engine);
    let (category, analyst) = catalog.require_sub_profile("Data Analyst", None).unwrap();

    let first = session.select_profile(&category.category, analyst).unwrap();
    assert_eq!(first.scores.required, 0);
    assert_eq!(first.scores.category("Data"), Some(0));

    let second = session.set_candidate_skills(["sql", "excel"]).unwrap();
    assert_eq!(second.scores.required, 67);
    assert_eq!(second.scores.category("Data"), Some(100));
    assert_eq!(second.scores.category("Languages"), Some(0));
}

#[tokio::test]
async fn test_profile_listing_renders() {
    let dir = TempDir::new().unwrap();
    let catalog_path = write_fixture(&dir, "catalog.json", CATALOG_JSON);
    let catalog = InputManager::new().load_catalog(&catalog_path).await.unwrap();

    let config = Config::default();
    let listing = ProfileListing::build(&catalog, FilterState::new().with_skill("react"), ReportMetadata::new(&config));
    assert_eq!(listing.matching_profiles, 2);
    assert_eq!(listing.total_profiles, 3);

    let markdown = ReportGenerator::new()
        .generate_profiles(&listing, &OutputFormat::Markdown)
        .unwrap();
    assert!(markdown.contains("## Software Engineering"));
    assert!(!markdown.contains("Data Analyst"));
}

#[test]
fn test_config_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = Config::load(Some(&path)).unwrap();
    assert!(path.exists());

    config.set_value("scoring.required_weight", "0.6").unwrap();
    config.set_value("output.format", "markdown").unwrap();
    config.save_to(&path).unwrap();

    let reloaded = Config::load(Some(&path)).unwrap();
    assert_eq!(reloaded.scoring.required_weight, 0.6);
    assert_eq!(reloaded.output.format, OutputFormat::Markdown);
}
