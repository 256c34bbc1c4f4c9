#[cfg(feature = "cli")]
pub mod cli;
pub mod grades;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::adapters::http::HttpSettings;
use crate::core::locator::current_academic_year;
use crate::core::parser::ParserOptions;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_academic_year, validate_url, Validate};
use std::time::Duration;
use toml_config::TomlConfig;

/// Effective configuration after layering defaults, the TOML file and
/// command-line overrides.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub academic_year: String,
    pub http: HttpSettings,
    pub parser: ParserOptions,
    pub monitor: bool,
}

/// Values that take precedence over the TOML file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub academic_year: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub monitor: bool,
}

impl Settings {
    pub fn resolve(file: TomlConfig, overrides: Overrides) -> Result<Self> {
        file.validate()?;

        let academic_year = overrides
            .academic_year
            .or(file.source.academic_year.clone())
            .unwrap_or_else(current_academic_year);

        let settings = Self {
            base_url: overrides.base_url.unwrap_or(file.source.base_url.clone()),
            academic_year,
            http: HttpSettings {
                timeout: Duration::from_secs(
                    overrides
                        .timeout_seconds
                        .unwrap_or(file.source.timeout_seconds),
                ),
                retry_attempts: file.source.retry_attempts,
                retry_delay: Duration::from_secs(file.source.retry_delay_seconds),
                user_agent: file.source.user_agent.clone(),
                referer: file.source.referer.clone(),
            },
            parser: ParserOptions {
                header_tokens: file.parser.header_tokens.clone(),
                strip_course_codes: file.parser.strip_course_codes,
            },
            monitor: overrides.monitor || file.monitoring_enabled(),
        };
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(feature = "cli")]
impl Overrides {
    pub fn from_cli(cli: &CliConfig) -> Self {
        Self {
            base_url: cli.base_url.clone(),
            academic_year: cli.academic_year.clone(),
            timeout_seconds: cli.timeout_seconds,
            monitor: cli.monitor,
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        validate_academic_year("academic_year", &self.academic_year)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn academic_year(&self) -> &str {
        &self.academic_year
    }

    fn header_tokens(&self) -> &[String] {
        &self.parser.header_tokens
    }

    fn strip_course_codes(&self) -> bool {
        self.parser.strip_course_codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let file = TomlConfig::from_toml_str(
            r#"
[source]
base_url = "https://example.edu/plans"
academic_year = "2023-2024"
timeout_seconds = 10
"#,
        )
        .unwrap();

        let settings = Settings::resolve(
            file,
            Overrides {
                academic_year: Some("2024-2025".to_string()),
                timeout_seconds: Some(5),
                ..Overrides::default()
            },
        )
        .unwrap();

        assert_eq!(settings.base_url(), "https://example.edu/plans");
        assert_eq!(settings.academic_year(), "2024-2025");
        assert_eq!(settings.http.timeout, Duration::from_secs(5));
        assert!(!settings.monitor);
    }

    #[test]
    fn test_default_academic_year_is_valid() {
        let settings = Settings::resolve(TomlConfig::default(), Overrides::default()).unwrap();
        assert!(validate_academic_year("academic_year", settings.academic_year()).is_ok());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let result = Settings::resolve(
            TomlConfig::default(),
            Overrides {
                academic_year: Some("2024/25".to_string()),
                ..Overrides::default()
            },
        );
        assert!(result.is_err());
    }
}
