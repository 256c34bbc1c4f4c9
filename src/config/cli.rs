use crate::adapters::decode::DocumentFormat;
use crate::app::report::OutputFormat;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "gradecalc")]
#[command(about = "Weighted harmonic mean calculator for curriculum courses")]
pub struct CliConfig {
    /// Study year (1-4); asked interactively when omitted
    #[arg(short, long)]
    pub year: Option<u32>,

    /// Specialization code: CTI, CTI_EN, AU or AU_EN; asked interactively when omitted
    #[arg(short, long)]
    pub specialization: Option<String>,

    /// Academic year such as 2024-2025
    #[arg(long)]
    pub academic_year: Option<String>,

    /// Override the curriculum base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Read the curriculum from a local file instead of downloading it
    #[arg(long)]
    pub document: Option<String>,

    /// Document format; guessed from the file extension when omitted
    #[arg(long)]
    pub format: Option<DocumentFormat>,

    /// TOML grade sheet; skips the interactive selection
    #[arg(short, long)]
    pub grades: Option<String>,

    /// Only print the parsed course list
    #[arg(long)]
    pub list: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

impl CliConfig {
    /// Whether this run will stop to ask the user anything on stdin.
    pub fn is_interactive(&self) -> bool {
        let asks_request =
            self.document.is_none() && (self.year.is_none() || self.specialization.is_none());
        let asks_grades = !self.list && self.grades.is_none();
        asks_request || asks_grades
    }
}
