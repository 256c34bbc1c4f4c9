use anyhow::Result;
use gradecalc::adapters::decode::DelimitedDecoder;
use gradecalc::adapters::http::HttpSettings;
use gradecalc::config::grades::GradeFile;
use gradecalc::config::toml_config::TomlConfig;
use gradecalc::{
    CurriculumPipeline, DocumentSource, GradeCalcError, GradeEngine, HttpFetcher, LocalStorage,
    Overrides, Settings, Specialization,
};
use httpmock::prelude::*;
use std::time::Duration;
use tempfile::TempDir;

const CURRICULUM_CSV: &str = "\
Subject,Credits
Algoritmi și Structuri de Date,6.0
,3
Matematică,-1
Baze de Date,\"5,0\"
";

fn settings(base_url: &str) -> Settings {
    let mut settings = Settings::resolve(
        TomlConfig::default(),
        Overrides {
            base_url: Some(base_url.to_string()),
            academic_year: Some("2024-2025".to_string()),
            ..Overrides::default()
        },
    )
    .unwrap();
    settings.http.timeout = Duration::from_secs(5);
    settings
}

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(HttpSettings::default()).unwrap()
}

fn grade_sheet(toml: &str) -> Box<GradeFile> {
    Box::new(GradeFile::from_toml_str(toml).unwrap())
}

#[tokio::test]
async fn test_end_to_end_with_mock_server() -> Result<()> {
    let server = MockServer::start();
    let plan_mock = server.mock(|when, then| {
        when.method(GET).path("/plans/2024-2025/2_L_AIA_RO_2024-2025.pdf");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body(CURRICULUM_CSV);
    });

    let pipeline = CurriculumPipeline::new(
        DocumentSource::Remote {
            study_year: 2,
            specialization: Specialization::Au,
        },
        fetcher(),
        LocalStorage::new(".".to_string()),
        settings(&server.url("/plans")),
        Box::new(DelimitedDecoder::csv()),
        grade_sheet(
            r#"
[[grades]]
course = "Algoritmi și Structuri de Date"
grade = 9.5

[[grades]]
course = "Baze de Date"
grade = 3.0
"#,
        ),
    );

    let output = GradeEngine::new(pipeline).run().await?;
    plan_mock.assert();

    assert_eq!(output.courses.len(), 2);
    assert_eq!(output.result.total_credits, 11.0);
    assert_eq!(output.result.passing_count, 1);
    assert_eq!(output.result.failing_count, 1);
    assert!(output.result.mean < 5.0);
    assert_eq!(output.result.display_mean(), 4.79);
    Ok(())
}

#[tokio::test]
async fn test_server_error_is_fetch_failed() {
    let server = MockServer::start();
    let plan_mock = server.mock(|when, then| {
        when.method(GET).path("/plans/2024-2025/1_L_Calcro_2024-2025.pdf");
        then.status(500);
    });

    let pipeline = CurriculumPipeline::new(
        DocumentSource::Remote {
            study_year: 1,
            specialization: Specialization::Cti,
        },
        fetcher(),
        LocalStorage::new(".".to_string()),
        settings(&server.url("/plans")),
        Box::new(DelimitedDecoder::csv()),
        grade_sheet(""),
    );

    let result = GradeEngine::new(pipeline).run().await;
    plan_mock.assert();
    assert!(matches!(result, Err(GradeCalcError::FetchFailed { .. })));
}

#[tokio::test]
async fn test_invalid_study_year_never_hits_network() {
    let server = MockServer::start();
    let any_mock = server.mock(|when, then| {
        when.method(GET);
        then.status(200).body(CURRICULUM_CSV);
    });

    let pipeline = CurriculumPipeline::new(
        DocumentSource::Remote {
            study_year: 5,
            specialization: Specialization::Cti,
        },
        fetcher(),
        LocalStorage::new(".".to_string()),
        settings(&server.url("/plans")),
        Box::new(DelimitedDecoder::csv()),
        grade_sheet(""),
    );

    let result = GradeEngine::new(pipeline).load_courses().await;
    any_mock.assert_hits(0);
    assert!(matches!(result, Err(GradeCalcError::InvalidParameter { .. })));
}

#[tokio::test]
async fn test_local_document_with_grade_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let document_path = temp_dir.path().join("plan.csv");
    std::fs::write(&document_path, CURRICULUM_CSV)?;
    let grades_path = temp_dir.path().join("grades.toml");
    std::fs::write(
        &grades_path,
        "[[grades]]\nindex = 1\ngrade = 9.5\n\n[[grades]]\nindex = 2\ngrade = 8.7\n",
    )?;

    let pipeline = CurriculumPipeline::new(
        DocumentSource::Local {
            path: document_path.to_string_lossy().into_owned(),
        },
        fetcher(),
        LocalStorage::new(".".to_string()),
        settings("https://plans.example.edu"),
        Box::new(DelimitedDecoder::csv()),
        Box::new(GradeFile::from_file(&grades_path)?),
    );

    let engine = GradeEngine::new_with_monitoring(pipeline, true);
    let output = engine.run().await?;
    assert_eq!(output.result.display_mean(), 9.12);
    assert_eq!(output.result.course_count, 2);
    Ok(())
}

#[tokio::test]
async fn test_non_tabular_document_fails_extraction() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let document_path = temp_dir.path().join("plan.csv");
    std::fs::write(&document_path, "\n\n\n")?;

    let pipeline = CurriculumPipeline::new(
        DocumentSource::Local {
            path: document_path.to_string_lossy().into_owned(),
        },
        fetcher(),
        LocalStorage::new(".".to_string()),
        settings("https://plans.example.edu"),
        Box::new(DelimitedDecoder::csv()),
        grade_sheet(""),
    );

    let result = GradeEngine::new(pipeline).load_courses().await;
    assert!(matches!(result, Err(GradeCalcError::ExtractionFailed { .. })));
    Ok(())
}
