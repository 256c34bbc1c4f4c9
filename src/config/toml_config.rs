use crate::adapters::http::{DEFAULT_REFERER, DEFAULT_USER_AGENT};
use crate::core::locator::DEFAULT_BASE_URL;
use crate::core::parser::DEFAULT_HEADER_TOKENS;
use crate::utils::error::{GradeCalcError, Result};
use crate::utils::validation::{
    validate_academic_year, validate_non_empty_string, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub parser: ParserConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub base_url: String,
    /// e.g. "2024-2025"; derived from today's date when unset
    pub academic_year: Option<String>,
    pub timeout_seconds: u64,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
    pub user_agent: String,
    pub referer: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            academic_year: None,
            timeout_seconds: 30,
            retry_attempts: 0,
            retry_delay_seconds: 1,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: Some(DEFAULT_REFERER.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub header_tokens: Vec<String>,
    pub strip_course_codes: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            header_tokens: DEFAULT_HEADER_TOKENS.iter().map(|t| t.to_string()).collect(),
            strip_course_codes: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"))
}

impl TomlConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GradeCalcError::config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses the configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// Replaces `${VAR}` references; undefined variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_url("source.base_url", &self.source.base_url)?;
        if let Some(academic_year) = &self.source.academic_year {
            validate_academic_year("source.academic_year", academic_year)?;
        }
        validate_range("source.timeout_seconds", self.source.timeout_seconds, 1, 600)?;
        validate_range("source.retry_attempts", self.source.retry_attempts, 0, 10)?;
        validate_non_empty_string("source.user_agent", &self.source.user_agent)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[source]
base_url = "https://example.edu/plans"
academic_year = "2023-2024"
timeout_seconds = 10
retry_attempts = 2

[parser]
header_tokens = ["Disciplina", "Total"]
strip_course_codes = false

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.base_url, "https://example.edu/plans");
        assert_eq!(config.source.academic_year.as_deref(), Some("2023-2024"));
        assert_eq!(config.source.retry_attempts, 2);
        assert_eq!(config.source.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.parser.header_tokens, vec!["Disciplina", "Total"]);
        assert!(!config.parser.strip_course_codes);
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.source.base_url, DEFAULT_BASE_URL);
        assert!(config.source.academic_year.is_none());
        assert!(config.parser.strip_course_codes);
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("GRADECALC_TEST_ACADEMIC_YEAR", "2022-2023");

        let config = TomlConfig::from_toml_str(
            r#"
[source]
academic_year = "${GRADECALC_TEST_ACADEMIC_YEAR}"
"#,
        )
        .unwrap();
        assert_eq!(config.source.academic_year.as_deref(), Some("2022-2023"));

        std::env::remove_var("GRADECALC_TEST_ACADEMIC_YEAR");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[source]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[source]
academic_year = "2024"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        assert!(matches!(
            TomlConfig::from_toml_str("[source\nbase_url = 1"),
            Err(GradeCalcError::TomlError(_))
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[source]\nacademic_year = \"2024-2025\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.source.academic_year.as_deref(), Some("2024-2025"));
    }
}
