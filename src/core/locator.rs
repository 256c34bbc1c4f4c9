use crate::domain::model::Specialization;
use crate::utils::error::Result;
use crate::utils::validation::{validate_academic_year, validate_range};

pub const DEFAULT_BASE_URL: &str =
    "https://ac.utcluj.ro/files/Acasa/Site/documente/planuri_invatamant";

pub const MIN_STUDY_YEAR: u32 = 1;
pub const MAX_STUDY_YEAR: u32 = 4;

/// Builds curriculum document URLs from a base prefix and an academic year.
#[derive(Debug, Clone)]
pub struct CurriculumLocator {
    base_url: String,
    academic_year: String,
}

impl CurriculumLocator {
    pub fn new(base_url: impl Into<String>, academic_year: impl Into<String>) -> Result<Self> {
        let academic_year = academic_year.into();
        validate_academic_year("academic_year", &academic_year)?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            academic_year,
        })
    }

    pub fn academic_year(&self) -> &str {
        &self.academic_year
    }

    pub fn resource_url(&self, study_year: u32, specialization: Specialization) -> Result<String> {
        validate_range("study_year", study_year, MIN_STUDY_YEAR, MAX_STUDY_YEAR)?;

        Ok(format!(
            "{base}/{ay}/{year}_L_{slug}_{ay}.pdf",
            base = self.base_url,
            ay = self.academic_year,
            year = study_year,
            slug = specialization.slug(),
        ))
    }
}

/// Resolves the curriculum URL under the default base prefix.
pub fn locate(study_year: u32, specialization: &str, academic_year: &str) -> Result<String> {
    let specialization: Specialization = specialization.parse()?;
    CurriculumLocator::new(DEFAULT_BASE_URL, academic_year)?.resource_url(study_year, specialization)
}

/// Academic year containing `date`; a new year starts on 1 October.
pub fn academic_year_for(date: chrono::NaiveDate) -> String {
    use chrono::Datelike;

    let start = if date.month() >= 10 {
        date.year()
    } else {
        date.year() - 1
    };
    format!("{}-{}", start, start + 1)
}

pub fn current_academic_year() -> String {
    academic_year_for(chrono::Local::now().date_naive())
}
