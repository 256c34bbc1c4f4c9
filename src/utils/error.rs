use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradeCalcError {
    #[error("Invalid parameter '{field}' = '{value}': {reason}")]
    InvalidParameter {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to fetch '{url}': {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Document extraction failed: {message}")]
    ExtractionFailed { message: String },

    #[error("No eligible courses: select at least one course with positive credits")]
    NoEligibleCourses,

    #[error("Invalid grade {grade} for '{course}': grade must be greater than 0")]
    InvalidGrade { course: String, grade: f64 },

    #[error("Grade {grade} for '{course}' is outside the range 0-10")]
    GradeOutOfRange { course: String, grade: f64 },

    #[error("Invalid course entry: {message}")]
    InvalidCourse { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Input cancelled: {message}")]
    PromptCancelled { message: String },

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Document,
    Calculation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GradeCalcError {
    pub fn invalid_parameter(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::ExtractionFailed {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidParameter { .. }
            | Self::InvalidGrade { .. }
            | Self::GradeOutOfRange { .. }
            | Self::PromptCancelled { .. } => ErrorCategory::Input,
            Self::FetchFailed { .. } | Self::HttpError(_) => ErrorCategory::Network,
            Self::ExtractionFailed { .. } | Self::InvalidCourse { .. } | Self::CsvError(_) => {
                ErrorCategory::Document
            }
            Self::NoEligibleCourses => ErrorCategory::Calculation,
            Self::ConfigError { .. } | Self::TomlError(_) => ErrorCategory::Configuration,
            Self::IoError(_) | Self::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PromptCancelled { .. } => ErrorSeverity::Low,
            Self::FetchFailed { .. } | Self::HttpError(_) => ErrorSeverity::Medium,
            Self::IoError(_) | Self::SerializationError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidParameter { field, value, .. } => {
                format!("'{}' is not a valid value for {}", value, field)
            }
            Self::FetchFailed { url, .. } => {
                format!("Could not download the curriculum from {}", url)
            }
            Self::HttpError(_) => "Could not reach the curriculum server".to_string(),
            Self::ExtractionFailed { .. } => {
                "The curriculum document does not contain readable course tables".to_string()
            }
            Self::NoEligibleCourses => {
                "None of the selected courses carry credits, nothing to average".to_string()
            }
            Self::InvalidGrade { course, .. } => {
                format!("A grade of 0 cannot be used for '{}'", course)
            }
            Self::GradeOutOfRange { course, grade } => {
                format!("Grade {} for '{}' must be between 0 and 10", grade, course)
            }
            Self::PromptCancelled { .. } => "Operation cancelled".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check the study year (1-4), specialization and grades (0-10]",
            ErrorCategory::Network => {
                "Check your connection and the academic year, or pass --document with a local copy"
            }
            ErrorCategory::Document => {
                "The document layout may have changed; try --format or a CSV export with --document"
            }
            ErrorCategory::Calculation => "Select at least one course with credits",
            ErrorCategory::Configuration => "Fix the configuration file and try again",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, GradeCalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_severity() {
        let err = GradeCalcError::FetchFailed {
            url: "https://example.com/a.pdf".to_string(),
            reason: "HTTP 404".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);

        assert_eq!(
            GradeCalcError::NoEligibleCourses.category(),
            ErrorCategory::Calculation
        );
        assert_eq!(GradeCalcError::NoEligibleCourses.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_user_friendly_message() {
        let err = GradeCalcError::invalid_parameter("study_year", 5, "must be between 1 and 4");
        assert_eq!(err.user_friendly_message(), "'5' is not a valid value for study_year");
        assert!(err.to_string().contains("must be between 1 and 4"));
    }
}
