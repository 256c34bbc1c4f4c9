use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Progress logs are held back to warnings while the user is being
/// prompted, so they do not interleave with the questions.
pub fn default_directives(verbose: bool, interactive: bool) -> &'static str {
    match (verbose, interactive) {
        (true, _) => "gradecalc=debug,info",
        (false, true) => "gradecalc=warn,warn",
        (false, false) => "gradecalc=info,warn",
    }
}

fn default_filter(verbose: bool, interactive: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose, interactive)))
}

// stdout carries the report, logs go to stderr
pub fn init_cli_logger(verbose: bool, interactive: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, interactive))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool, interactive: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose, interactive))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
