use clap::Parser;
use gradecalc::adapters::decode::{decoder_for, DocumentFormat};
use gradecalc::adapters::prompt::{InteractiveGradeSource, StdioPrompter};
use gradecalc::app::report::{write_courses, write_result};
use gradecalc::config::grades::GradeFile;
use gradecalc::config::toml_config::TomlConfig;
use gradecalc::core::{GradeSource, Prompter};
use gradecalc::utils::error::ErrorSeverity;
use gradecalc::utils::logger;
use gradecalc::{
    CliConfig, CurriculumPipeline, DocumentSource, GradeEngine, HttpFetcher, LocalStorage,
    Overrides, Result, Settings, Specialization,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // logging
    let interactive = cli.is_interactive();
    if cli.json_logs {
        logger::init_json_logger(cli.verbose, interactive);
    } else {
        logger::init_cli_logger(cli.verbose, interactive);
    }

    tracing::info!("Starting gradecalc");
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ Calculation failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // exit code follows severity
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<()> {
    // file config first, command line overrides on top
    let file = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            TomlConfig::from_file(path)?
        }
        None => TomlConfig::default(),
    };
    let settings = Settings::resolve(file, Overrides::from_cli(cli))?;
    tracing::debug!("Academic year {}, base URL {}", settings.academic_year, settings.base_url);

    // one reader over stdin for every prompt
    let mut prompter = StdioPrompter::stdio();

    let source = match &cli.document {
        Some(path) => DocumentSource::Local { path: path.clone() },
        None => ask_request(cli, &mut prompter)?,
    };

    let format = cli.format.unwrap_or_else(|| {
        cli.document
            .as_deref()
            .map(DocumentFormat::from_path)
            .unwrap_or(DocumentFormat::Pdf)
    });
    let decoder = decoder_for(format)?;

    let grades: Box<dyn GradeSource> = match &cli.grades {
        Some(path) => Box::new(GradeFile::from_file(path)?),
        None => Box::new(InteractiveGradeSource::new(prompter)),
    };

    let fetcher = HttpFetcher::new(settings.http.clone())?;
    let monitor_enabled = settings.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = CurriculumPipeline::new(
        source,
        fetcher,
        LocalStorage::new(".".to_string()),
        settings,
        decoder,
        grades,
    );
    let engine = GradeEngine::new_with_monitoring(pipeline, monitor_enabled);

    if cli.list {
        let courses = engine.load_courses().await?;
        write_courses(std::io::stdout().lock(), &courses, cli.output)?;
        return Ok(());
    }

    let output = engine.run().await?;
    write_result(std::io::stdout().lock(), &output.result, cli.output)?;
    Ok(())
}

/// Fills in whatever of study year and specialization was not given on the command line.
fn ask_request<P: Prompter>(cli: &CliConfig, prompter: &mut P) -> Result<DocumentSource> {
    let study_year = match cli.year {
        Some(year) => year,
        None => prompter.ask_integer("Enter your study year", 1, 4)? as u32,
    };

    let specialization = match &cli.specialization {
        Some(code) => code.parse()?,
        None => {
            let options: Vec<String> = Specialization::ALL
                .iter()
                .map(|spec| format!("{} ({})", spec.code(), spec.description()))
                .collect();
            let choice = prompter.choose("Select your specialization:", &options)?;
            Specialization::ALL[choice]
        }
    };

    Ok(DocumentSource::Remote {
        study_year,
        specialization,
    })
}
